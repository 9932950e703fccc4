//! Tests for the orbweaver-engine reasoner façade

use orbweaver_core::model::{Iri, Triple};
use orbweaver_core::ontology::{Ontology, SharedOntology};
use orbweaver_core::owl::{Axiom, AxiomKind, ClassExpression, Individual, ObjectPropertyExpression};
use orbweaver_core::vocabulary;
use orbweaver_engine::pipeline::{TASK_CREATE_TERMINOLOGY, TASK_FLUSH_TERMINOLOGY, TASK_REALIZE};
use orbweaver_engine::*;
use orbweaver_rules::{ForwardChainingCompiler, RuleCompiler, RuleEngine};
use orbweaver_structural::TerminologyError;
use std::collections::HashSet;
use std::sync::Arc;

const EX: &str = "http://example.org/";

fn iri(local: &str) -> Iri {
    Iri::new(format!("{}{}", EX, local))
}

fn class(local: &str) -> ClassExpression {
    ClassExpression::Class(iri(local))
}

fn individual(local: &str) -> Individual {
    Individual::Named(iri(local))
}

fn prop(local: &str) -> ObjectPropertyExpression {
    ObjectPropertyExpression::Property(iri(local))
}

fn typed(ind: &str, cls: &str) -> Axiom {
    Axiom::class_assertion(class(cls), individual(ind))
}

fn zoo() -> SharedOntology {
    SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::sub_class_of(class("Dog"), class("Mammal")),
        Axiom::sub_class_of(class("Mammal"), class("Animal")),
        typed("rex", "Dog"),
    ]))
}

fn buffering(ontology: &SharedOntology) -> Reasoner {
    ReasonerFactory::new().create_reasoner(ontology.clone()).unwrap()
}

#[test]
fn test_flush_is_idempotent() {
    let ontology = zoo();
    let reasoner = buffering(&ontology);
    let facts = reasoner.fact_store();
    let rules = reasoner.rule_set();

    let stats = reasoner.flush().unwrap();
    assert!(!stats.rules_regenerated);
    assert!(!stats.data_rechained);
    assert!(Arc::ptr_eq(&facts, &reasoner.fact_store()));
    assert!(Arc::ptr_eq(&rules, &reasoner.rule_set()));
}

#[test]
fn test_fact_store_is_exact_fixpoint() {
    let ontology = zoo();
    ontology.add_axiom(Axiom::object_property_assertion(prop("owns"), individual("ann"), individual("rex")));
    let reasoner = buffering(&ontology);
    reasoner.flush().unwrap();

    let engine = ForwardChainingCompiler::default().compile(reasoner.rule_set()).unwrap();
    let base = translator::base_facts(&ontology.read()).unwrap();
    let expected = engine.run(&base).unwrap().into_facts();
    let actual: HashSet<Triple> = reasoner.fact_store().iter().cloned().collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_direct_and_indirect_types() {
    let ontology = zoo();
    let reasoner = buffering(&ontology);

    let direct = reasoner.get_types(&iri("rex"), true).unwrap();
    assert!(direct.contains_entity(&iri("Dog")));
    assert!(!direct.contains_entity(&iri("Mammal")));
    assert!(!direct.contains_entity(&iri("Animal")));

    let all = reasoner.get_types(&iri("rex"), false).unwrap();
    for expected in ["Dog", "Mammal", "Animal"] {
        assert!(all.contains_entity(&iri(expected)), "missing {}", expected);
    }
    assert!(!all.contains_entity(&vocabulary::indirect_type()));
}

#[test]
fn test_direct_and_indirect_instances() {
    let ontology = zoo();
    ontology.add_axiom(typed("felix", "Mammal"));
    let reasoner = buffering(&ontology);
    reasoner.flush().unwrap();

    let direct = reasoner.get_instances(&class("Mammal"), true).unwrap();
    assert_eq!(direct.flattened(), [iri("felix")].into_iter().collect());

    let all = reasoner.get_instances(&class("Mammal"), false).unwrap();
    assert_eq!(all.flattened(), [iri("felix"), iri("rex")].into_iter().collect());
}

#[test]
fn test_named_individual_type_is_hidden() {
    let ontology = zoo();
    ontology.add_axiom(Axiom::class_assertion(
        ClassExpression::Class(vocabulary::owl_named_individual()),
        individual("rex"),
    ));
    let reasoner = buffering(&ontology);

    let types = reasoner.get_types(&iri("rex"), false).unwrap();
    assert!(!types.contains_entity(&vocabulary::owl_named_individual()));
}

#[test]
fn test_thing_is_not_a_direct_type_beside_a_named_class() {
    let ontology = zoo();
    ontology.add_axiom(Axiom::class_assertion(ClassExpression::thing(), individual("rex")));
    ontology.add_axiom(Axiom::class_assertion(ClassExpression::thing(), individual("blob")));
    let reasoner = buffering(&ontology);

    let direct = reasoner.get_types(&iri("rex"), true).unwrap();
    assert!(direct.contains_entity(&iri("Dog")));
    assert!(!direct.contains_entity(&vocabulary::owl_thing()));
    assert!(reasoner.get_types(&iri("rex"), false).unwrap().contains_entity(&vocabulary::owl_thing()));

    let blob = reasoner.get_types(&iri("blob"), true).unwrap();
    assert!(blob.contains_entity(&vocabulary::owl_thing()));
}

#[test]
fn test_intersection_with_existential_still_types_named_conjunct() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::EquivalentClasses(vec![
            class("Kennel"),
            ClassExpression::IntersectionOf(vec![
                class("Building"),
                ClassExpression::some_values_from(prop("houses"), class("Dog")),
            ]),
        ]),
        typed("k9", "Kennel"),
    ]));
    let reasoner = buffering(&ontology);

    let all = reasoner.get_types(&iri("k9"), false).unwrap();
    assert!(all.contains_entity(&iri("Kennel")));
    assert!(all.contains_entity(&iri("Building")));
}

#[test]
fn test_inverse_assertion_round_trip() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![Axiom::object_property_assertion(
        prop("parentOf").inverse(),
        individual("bob"),
        individual("ann"),
    )]));
    let reasoner = buffering(&ontology);

    let children = reasoner.get_object_property_values(&iri("ann"), &prop("parentOf")).unwrap();
    assert!(children.contains_entity(&iri("bob")));

    let parents = reasoner.get_object_property_values(&iri("bob"), &prop("parentOf").inverse()).unwrap();
    assert!(parents.contains_entity(&iri("ann")));
}

#[test]
fn test_anonymous_class_assertion_adds_no_base_fact() {
    let owns_dog = ClassExpression::some_values_from(prop("owns"), class("Dog"));
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![Axiom::class_assertion(
        owns_dog,
        individual("ann"),
    )]));

    assert!(translator::base_facts(&ontology.read()).unwrap().is_empty());
    let reasoner = buffering(&ontology);
    assert_eq!(reasoner.last_flush().unwrap().base_triples, 0);
    assert!(reasoner.get_types(&iri("ann"), false).unwrap().is_empty());
}

#[test]
fn test_consistency_follows_data() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::DisjointClasses(vec![class("Cat"), class("Dog")]),
        typed("odd", "Cat"),
    ]));
    let reasoner = buffering(&ontology);
    assert!(reasoner.is_consistent());

    ontology.add_axiom(typed("odd", "Dog"));
    assert!(reasoner.is_consistent(), "buffered edit must not be visible before flush");
    reasoner.flush().unwrap();
    assert!(!reasoner.is_consistent());

    ontology.remove_axiom(typed("odd", "Dog"));
    reasoner.flush().unwrap();
    assert!(reasoner.is_consistent());
}

#[test]
fn test_negated_singleton_satisfiability() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::sub_class_of(class("Kitten"), class("Cat")),
        typed("tom", "Animal"),
    ]));
    let reasoner = buffering(&ontology);
    let probe = ClassExpression::IntersectionOf(vec![
        ClassExpression::OneOf(vec![individual("tom")]),
        ClassExpression::complement_of(class("Cat")),
    ]);
    assert!(reasoner.is_satisfiable(&probe).unwrap());

    ontology.add_axiom(typed("tom", "Kitten"));
    reasoner.flush().unwrap();
    assert!(!reasoner.is_satisfiable(&probe).unwrap());
}

#[test]
fn test_satisfiability_forwards_other_expressions() {
    let reasoner = buffering(&zoo());
    assert!(reasoner.is_satisfiable(&class("Dog")).unwrap());
    assert!(!reasoner.is_satisfiable(&ClassExpression::nothing()).unwrap());
    assert!(matches!(
        reasoner.is_satisfiable(&ClassExpression::some_values_from(prop("owns"), class("Dog"))),
        Err(ReasonerError::Terminology(TerminologyError::Unsupported(_)))
    ));
}

#[test]
fn test_staleness_propagation() {
    let ontology = zoo();
    let reasoner = buffering(&ontology);
    assert_eq!(reasoner.staleness(), Staleness::Clean);

    ontology.add_axiom(typed("fido", "Dog"));
    assert_eq!(reasoner.staleness(), Staleness::DataStale);
    let stats = reasoner.flush().unwrap();
    assert!(!stats.rules_regenerated && stats.data_rechained);
    assert_eq!(reasoner.staleness(), Staleness::Clean);

    ontology.add_axiom(Axiom::sub_class_of(class("Animal"), class("LivingThing")));
    assert_eq!(reasoner.staleness(), Staleness::AllStale);
    let stats = reasoner.flush().unwrap();
    assert!(stats.rules_regenerated && stats.data_rechained);
    assert!(reasoner.get_types(&iri("fido"), false).unwrap().contains_entity(&iri("LivingThing")));
}

#[test]
fn test_pending_changes_until_flush() {
    let ontology = zoo();
    let reasoner = buffering(&ontology);
    let added = typed("fido", "Dog");
    let removed = typed("rex", "Dog");

    ontology.add_axiom(added.clone());
    ontology.remove_axiom(removed.clone());
    assert_eq!(reasoner.pending_changes().len(), 2);
    assert_eq!(reasoner.pending_axiom_additions(), vec![added]);
    assert_eq!(reasoner.pending_axiom_removals(), vec![removed]);

    reasoner.flush().unwrap();
    assert!(reasoner.pending_changes().is_empty());
    assert!(reasoner.pending_axiom_additions().is_empty());
    assert!(reasoner.get_types(&iri("rex"), false).unwrap().is_empty());
}

#[test]
fn test_non_buffering_reasoner_flushes_on_change() {
    let ontology = zoo();
    let reasoner = ReasonerFactory::new().create_non_buffering_reasoner(ontology.clone()).unwrap();
    assert_eq!(reasoner.buffering_mode(), BufferingMode::NonBuffering);

    ontology.add_axiom(typed("fido", "Dog"));
    assert!(reasoner.pending_changes().is_empty());
    assert_eq!(reasoner.staleness(), Staleness::Clean);
    assert!(reasoner.get_types(&iri("fido"), false).unwrap().contains_entity(&iri("Animal")));
}

#[test]
fn test_dispose_unregisters_listener() {
    let ontology = zoo();
    let reasoner = buffering(&ontology);
    assert_eq!(ontology.listener_count(), 1);

    reasoner.dispose();
    assert_eq!(ontology.listener_count(), 0);
    ontology.add_axiom(typed("fido", "Dog"));
    assert!(reasoner.pending_changes().is_empty());

    {
        let _second = buffering(&ontology);
        assert_eq!(ontology.listener_count(), 1);
    }
    assert_eq!(ontology.listener_count(), 0);
}

#[test]
fn test_has_value_instances_rewrite() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::object_property_assertion(prop("owns"), individual("ann"), individual("rex")),
        Axiom::object_property_assertion(prop("owns"), individual("bob"), individual("rex")),
    ]));
    let reasoner = buffering(&ontology);

    let owners = reasoner
        .get_instances(&ClassExpression::has_value(prop("owns"), individual("rex")), false)
        .unwrap();
    assert_eq!(owners.flattened(), [iri("ann"), iri("bob")].into_iter().collect());

    let owned = reasoner
        .get_instances(&ClassExpression::has_value(prop("owns").inverse(), individual("ann")), false)
        .unwrap();
    assert_eq!(owned.flattened(), [iri("rex")].into_iter().collect());
}

#[test]
fn test_anonymous_instance_queries_fail_fast() {
    let reasoner = buffering(&zoo());
    let unsupported = [
        ClassExpression::some_values_from(prop("owns"), class("Dog")),
        ClassExpression::has_value(prop("owns"), Individual::anonymous("b0")),
        ClassExpression::IntersectionOf(vec![class("Dog"), class("Animal")]),
    ];
    for expression in &unsupported {
        assert!(matches!(
            reasoner.get_instances(expression, false),
            Err(ReasonerError::UnsupportedConstruct(_))
        ));
    }
}

#[test]
fn test_entailment() {
    let ontology = zoo();
    ontology.add_axiom(Axiom::object_property_assertion(prop("owns"), individual("ann"), individual("rex")));
    let reasoner = buffering(&ontology);
    reasoner.flush().unwrap();

    assert!(reasoner.is_entailed(&typed("rex", "Animal")).unwrap());
    assert!(!reasoner.is_entailed(&typed("ann", "Animal")).unwrap());
    assert!(reasoner
        .is_entailed(&Axiom::object_property_assertion(prop("owns").inverse(), individual("rex"), individual("ann")))
        .unwrap());
    assert!(reasoner
        .is_entailed(&typed_has_value("ann", "owns", "rex"))
        .unwrap());
    assert!(reasoner.is_entailed(&Axiom::sub_class_of(class("Dog"), class("Animal"))).unwrap());
    assert!(reasoner
        .is_entailed_all(&[typed("rex", "Dog"), typed("rex", "Mammal")])
        .unwrap());
    assert!(!reasoner
        .is_entailed_all(&[typed("rex", "Dog"), typed("ann", "Dog")])
        .unwrap());

    let chain = Axiom::SubPropertyChainOf { chain: vec![prop("p"), prop("q")], sup: prop("r") };
    assert_eq!(
        reasoner.is_entailed(&chain),
        Err(ReasonerError::UnsupportedEntailment(AxiomKind::SubPropertyChainOf))
    );
    assert!(reasoner.is_entailment_checking_supported(AxiomKind::ClassAssertion));
    assert!(!reasoner.is_entailment_checking_supported(AxiomKind::SubClassOf));
}

fn typed_has_value(ind: &str, property: &str, value: &str) -> Axiom {
    Axiom::class_assertion(ClassExpression::has_value(prop(property), individual(value)), individual(ind))
}

#[test]
fn test_same_and_different_individuals() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::SameIndividual(vec![individual("clark"), individual("superman")]),
        Axiom::DifferentIndividuals(vec![individual("clark"), individual("lex")]),
        typed("clark", "Reporter"),
    ]));
    let reasoner = buffering(&ontology);

    let same = reasoner.get_same_individuals(&iri("clark")).unwrap();
    assert_eq!(same.entities(), &[iri("clark"), iri("superman")].into_iter().collect());

    let reporters = reasoner.get_instances(&class("Reporter"), false).unwrap();
    assert_eq!(reporters.len(), 1, "same individuals share one node");
    assert_eq!(reporters.flattened(), [iri("clark"), iri("superman")].into_iter().collect());

    let different = reasoner.get_different_individuals(&iri("clark")).unwrap();
    assert!(different.contains_entity(&iri("lex")));
    assert!(!different.contains_entity(&iri("superman")));
}

#[test]
fn test_by_name_policy_uses_singletons() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::SameIndividual(vec![individual("clark"), individual("superman")]),
        typed("clark", "Reporter"),
    ]));
    let config = ReasonerConfig {
        individual_node_set_policy: IndividualNodeSetPolicy::ByName,
        ..ReasonerConfig::default()
    };
    let reasoner = ReasonerFactory::new().create_reasoner_with_config(ontology, config).unwrap();
    assert_eq!(reasoner.get_instances(&class("Reporter"), false).unwrap().len(), 2);
}

#[test]
fn test_fresh_entities_rejected_when_disallowed() {
    let config = ReasonerConfig {
        fresh_entity_policy: FreshEntityPolicy::Disallow,
        ..ReasonerConfig::default()
    };
    let reasoner = ReasonerFactory::new().create_reasoner_with_config(zoo(), config).unwrap();

    assert!(reasoner.get_types(&iri("rex"), false).is_ok());
    assert_eq!(
        reasoner.get_types(&iri("ghost"), false),
        Err(ReasonerError::FreshEntity(iri("ghost")))
    );
    assert!(matches!(
        reasoner.get_instances(&class("Unicorn"), false),
        Err(ReasonerError::FreshEntity(_))
    ));
    assert!(reasoner.get_instances(&ClassExpression::thing(), false).is_ok());
}

#[test]
fn test_terminology_pass_through() {
    let reasoner = buffering(&zoo());
    let supers = reasoner.get_super_classes(&class("Dog"), true).unwrap();
    assert!(supers.contains_entity(&iri("Mammal")));
    assert!(!supers.contains_entity(&iri("Animal")));
    assert!(reasoner.get_sub_classes(&class("Animal"), false).unwrap().contains_entity(&iri("Dog")));
    assert!(reasoner.top_class_node().unwrap().contains(&vocabulary::owl_thing()));
    assert!(reasoner.get_unsatisfiable_classes().unwrap().contains(&vocabulary::owl_nothing()));
}

#[test]
fn test_progress_reports_flush_stages() {
    let monitor = Arc::new(TracingProgressMonitor::new());
    let reasoner = ReasonerFactory::new()
        .with_progress_monitor(monitor.clone())
        .create_reasoner(zoo())
        .unwrap();
    assert_eq!(monitor.task_names().first().map(String::as_str), Some(TASK_CREATE_TERMINOLOGY));

    reasoner.root_ontology().add_axiom(typed("fido", "Dog"));
    reasoner.flush().unwrap();
    let names = monitor.task_names();
    assert_eq!(&names[names.len() - 2..], &[TASK_FLUSH_TERMINOLOGY.to_string(), TASK_REALIZE.to_string()]);
}

#[test]
fn test_chaining_limit_fails_flush() {
    let ontology = SharedOntology::new(Ontology::from_axioms(vec![
        Axiom::TransitiveObjectProperty(prop("before")),
        Axiom::object_property_assertion(prop("before"), individual("a"), individual("b")),
        Axiom::object_property_assertion(prop("before"), individual("b"), individual("c")),
        Axiom::object_property_assertion(prop("before"), individual("c"), individual("d")),
    ]));
    let config = ReasonerConfig { max_chaining_rounds: 1, ..ReasonerConfig::default() };
    let result = ReasonerFactory::new().create_reasoner_with_config(ontology.clone(), config);

    assert!(matches!(result, Err(ReasonerError::Pipeline(PipelineError::Rules(_)))));
    assert_eq!(ontology.listener_count(), 0);
}
