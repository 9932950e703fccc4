// Integration tests across the Orbweaver crates: JSON documents in,
// materialized answers out, with custom collaborators plugged into the engine.

#[cfg(test)]
mod tests {
    use orbweaver_core::model::Iri;
    use orbweaver_core::ontology::{Ontology, OntologyChange, SharedOntology};
    use orbweaver_core::owl::{Axiom, ClassExpression, Individual, ObjectPropertyExpression};
    use orbweaver_engine::{BufferingMode, ReasonerConfig, ReasonerFactory, Staleness};
    use orbweaver_rules::{ForwardChainingCompiler, RuleCompiler, RuleEngine, RuleError, RuleSet};
    use orbweaver_store::FactStore;
    use orbweaver_structural::StructuralReasonerFactory;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const EX: &str = "http://example.org/";

    fn iri(name: &str) -> Iri {
        Iri::new(format!("{EX}{name}"))
    }

    fn property(name: &str) -> ObjectPropertyExpression {
        ObjectPropertyExpression::named(format!("{EX}{name}"))
    }

    fn individual(name: &str) -> Individual {
        Individual::named(format!("{EX}{name}"))
    }

    const FAMILY: &str = r#"{
        "iri": "http://example.org/family",
        "axioms": [
            { "SubClassOf": { "sub": { "Class": "http://example.org/Parent" },
                              "sup": { "Class": "http://example.org/Person" } } },
            { "ObjectPropertyDomain": { "property": { "Property": "http://example.org/hasChild" },
                                        "domain": { "Class": "http://example.org/Parent" } } },
            { "InverseObjectProperties": [ { "Property": "http://example.org/hasChild" },
                                           { "Property": "http://example.org/hasParent" } ] },
            { "TransitiveObjectProperty": { "Property": "http://example.org/hasAncestor" } },
            { "SubObjectPropertyOf": { "sub": { "Property": "http://example.org/hasParent" },
                                       "sup": { "Property": "http://example.org/hasAncestor" } } },
            { "ObjectPropertyAssertion": { "property": { "Property": "http://example.org/hasChild" },
                                           "subject": { "Named": "http://example.org/ann" },
                                           "object": { "Named": "http://example.org/bob" } } },
            { "ObjectPropertyAssertion": { "property": { "Property": "http://example.org/hasChild" },
                                           "subject": { "Named": "http://example.org/bob" },
                                           "object": { "Named": "http://example.org/cal" } } }
        ]
    }"#;

    fn family() -> SharedOntology {
        SharedOntology::new(Ontology::from_json_str(FAMILY).unwrap())
    }

    /// Counts compilations while delegating to forward chaining
    struct CountingCompiler {
        inner: ForwardChainingCompiler,
        compiled: AtomicUsize,
    }

    impl RuleCompiler for CountingCompiler {
        fn compile(&self, rules: Arc<RuleSet>) -> Result<Arc<dyn RuleEngine>, RuleError> {
            self.compiled.fetch_add(1, Ordering::SeqCst);
            self.inner.compile(rules)
        }
    }

    #[test]
    fn test_json_document_materializes_property_chains() {
        let reasoner = ReasonerFactory::new().create_reasoner(family()).unwrap();

        let ancestors = reasoner
            .get_object_property_values(&iri("cal"), &property("hasAncestor"))
            .unwrap()
            .flattened();
        assert_eq!(ancestors, [iri("ann"), iri("bob")].into_iter().collect());

        let parents_of_bob = reasoner
            .get_object_property_values(&iri("bob"), &ObjectPropertyExpression::inverse_of(format!("{EX}hasChild")))
            .unwrap();
        assert_eq!(parents_of_bob.flattened(), [iri("ann")].into_iter().collect());

        let types = reasoner.get_types(&iri("ann"), true).unwrap();
        assert!(types.contains_entity(&iri("Parent")));
        assert!(!types.contains_entity(&iri("Person")));
        assert!(reasoner.get_types(&iri("ann"), false).unwrap().contains_entity(&iri("Person")));
    }

    #[test]
    fn test_assertional_edits_reuse_the_compiled_engine() {
        let compiler = Arc::new(CountingCompiler {
            inner: ForwardChainingCompiler::default(),
            compiled: AtomicUsize::new(0),
        });
        let ontology = family();
        let reasoner = ReasonerFactory::new()
            .with_rule_compiler(compiler.clone())
            .create_reasoner(ontology.clone())
            .unwrap();
        assert_eq!(compiler.compiled.load(Ordering::SeqCst), 1);

        ontology.add_axiom(Axiom::object_property_assertion(property("hasChild"), individual("cal"), individual("dee")));
        assert_eq!(reasoner.staleness(), Staleness::DataStale);
        reasoner.flush().unwrap();
        assert_eq!(compiler.compiled.load(Ordering::SeqCst), 1);
        assert!(reasoner
            .get_object_property_values(&iri("dee"), &property("hasAncestor"))
            .unwrap()
            .contains_entity(&iri("ann")));

        ontology.add_axiom(Axiom::sub_class_of(ClassExpression::class(format!("{EX}Person")), ClassExpression::class(format!("{EX}Agent"))));
        assert_eq!(reasoner.staleness(), Staleness::AllStale);
        reasoner.flush().unwrap();
        assert_eq!(compiler.compiled.load(Ordering::SeqCst), 2);
        assert!(reasoner.get_types(&iri("bob"), false).unwrap().contains_entity(&iri("Agent")));
    }

    #[test]
    fn test_fact_store_matches_direct_chaining() {
        let ontology = family();
        let reasoner = ReasonerFactory::new().create_reasoner(ontology.clone()).unwrap();

        let document = ontology.read();
        let rules = reasoner.rule_set();
        let engine = ForwardChainingCompiler::default().compile(rules).unwrap();
        let base = orbweaver_engine::translator::base_facts(&document).unwrap();
        let expected = FactStore::from_triples(engine.run(&base).unwrap().into_facts());

        assert_eq!(*reasoner.fact_store(), expected);
    }

    #[test]
    fn test_readers_see_whole_snapshots_during_flushes() {
        let ontology = family();
        let reasoner = ReasonerFactory::new()
            .create_configured_reasoner(
                ontology.clone(),
                ReasonerConfig::default().with_buffering_mode(BufferingMode::Buffering),
            )
            .unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..20 {
                    let child = individual(&format!("kid{}", i));
                    ontology.apply_changes(vec![OntologyChange::AddAxiom(Axiom::object_property_assertion(
                        property("hasChild"),
                        individual("cal"),
                        child,
                    ))]);
                    reasoner.flush().unwrap();
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..20 {
                        let store = reasoner.fact_store();
                        let children = store.find_triples(None, Some(&iri("hasChild")), None).len();
                        let parents = store.find_triples(None, Some(&iri("hasParent")), None).len();
                        assert_eq!(children, parents);
                    }
                });
            }
        });

        assert_eq!(reasoner.staleness(), Staleness::Clean);
        assert_eq!(
            reasoner
                .get_object_property_values(&iri("cal"), &property("hasChild"))
                .unwrap()
                .len(),
            20
        );
    }

    #[test]
    fn test_terminology_queries_follow_edits_after_flush() {
        let ontology = family();
        let reasoner = ReasonerFactory::new()
            .with_terminology_factory(Arc::new(StructuralReasonerFactory))
            .create_reasoner(ontology.clone())
            .unwrap();

        let person = ClassExpression::class(format!("{EX}Person"));
        let before = reasoner.get_sub_classes(&person, true).unwrap();
        assert!(before.contains_entity(&iri("Parent")));

        ontology.add_axiom(Axiom::sub_class_of(ClassExpression::class(format!("{EX}Child")), person.clone()));
        assert!(!reasoner.get_sub_classes(&person, true).unwrap().contains_entity(&iri("Child")));

        reasoner.flush().unwrap();
        assert!(reasoner.get_sub_classes(&person, true).unwrap().contains_entity(&iri("Child")));
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let ontology = Ontology::from_json_str(FAMILY).unwrap();
        let reparsed = Ontology::from_json_str(&ontology.to_json_string().unwrap()).unwrap();
        assert_eq!(reparsed.axiom_count(), ontology.axiom_count());
        assert_eq!(reparsed.iri, ontology.iri);

        let value: serde_json::Value = serde_json::from_str(FAMILY).unwrap();
        assert_eq!(value["axioms"].as_array().map(Vec::len), Some(ontology.axiom_count()));
    }
}
