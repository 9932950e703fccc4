//! The reasoner façade
//!
//! A [`Reasoner`] observes one [`SharedOntology`]. Edits reach its change
//! tracker through a listener; `flush()` (or every edit, in non-buffering
//! mode) brings the materialization up to date. Individual-level questions
//! are answered from the fact store, hierarchy questions from the
//! terminology view.

use crate::config::{BufferingMode, FreshEntityPolicy, IndividualNodeSetPolicy, ReasonerConfig};
use crate::error::{PipelineError, ReasonerError};
use crate::pipeline::{Collaborators, FlushStats, Materializer};
use crate::progress::{NullProgressMonitor, ProgressMonitor};
use crate::query;
use crate::tracker::{ChangeTracker, Staleness};
use crate::translator;
use orbweaver_core::model::Iri;
use orbweaver_core::node::{Node, NodeSet};
use orbweaver_core::ontology::{ListenerId, Ontology, OntologyChange, OntologyChangeListener, SharedOntology};
use orbweaver_core::owl::{Axiom, AxiomKind, ClassExpression, Individual, Literal, ObjectPropertyExpression};
use orbweaver_core::vocabulary;
use orbweaver_rules::{ForwardChainingCompiler, OwlRuleTranslator, RuleCompiler, RuleSet, RuleTranslator};
use orbweaver_store::FactStore;
use orbweaver_structural::{StructuralReasonerFactory, TerminologyView, TerminologyViewFactory};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

pub const REASONER_NAME: &str = "Orbweaver";

/// Inference kinds a host may ask to precompute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InferenceType {
    ClassHierarchy,
    ObjectPropertyHierarchy,
    DataPropertyHierarchy,
    ClassAssertions,
    ObjectPropertyAssertions,
    DataPropertyAssertions,
    SameIndividual,
    DifferentIndividuals,
    DisjointClasses,
}

struct Inner {
    ontology: SharedOntology,
    config: ReasonerConfig,
    tracker: ChangeTracker,
    materializer: Materializer,
    listener: Mutex<Option<ListenerId>>,
}

impl Inner {
    fn flush(&self) -> Result<FlushStats, PipelineError> {
        let document = self.ontology.read();
        self.materializer.flush(&document, &self.tracker)
    }
}

/// Forwards change notifications to the tracker. Holds a weak reference so
/// the document never keeps a dropped reasoner alive.
struct TrackerListener {
    inner: Weak<Inner>,
}

impl OntologyChangeListener for TrackerListener {
    fn ontologies_changed(&self, changes: &[OntologyChange]) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        inner.tracker.record_changes(changes);

        if inner.config.buffering_mode == BufferingMode::NonBuffering {
            // The stages that failed stay stale; the next flush retries them.
            if let Err(error) = inner.flush() {
                warn!(%error, "flush after change notification failed");
            }
        }
    }
}

/// Materializing reasoner over a shared ontology document
pub struct Reasoner {
    inner: Arc<Inner>,
}

impl Reasoner {
    /// Register with `ontology` and run the initial flush
    pub fn new(
        ontology: SharedOntology,
        config: ReasonerConfig,
        collaborators: Collaborators,
        monitor: Arc<dyn ProgressMonitor>,
    ) -> Result<Self, ReasonerError> {
        let inner = Arc::new(Inner {
            ontology,
            config,
            tracker: ChangeTracker::new(),
            materializer: Materializer::new(collaborators, monitor),
            listener: Mutex::new(None),
        });

        let listener = Arc::new(TrackerListener {
            inner: Arc::downgrade(&inner),
        });
        let id = inner.ontology.add_listener(listener);
        *inner.listener.lock() = Some(id);
        debug!(?id, mode = ?inner.config.buffering_mode, "reasoner listener registered");

        let reasoner = Self { inner };
        reasoner.flush()?;
        Ok(reasoner)
    }

    /// Bring the terminology view, rule set and fact store up to date
    pub fn flush(&self) -> Result<FlushStats, ReasonerError> {
        Ok(self.inner.flush()?)
    }

    /// Stop observing the ontology. Further edits are not tracked.
    pub fn dispose(&self) {
        if let Some(id) = self.inner.listener.lock().take() {
            if let Err(error) = self.inner.ontology.remove_listener(id) {
                warn!(%error, "reasoner listener was already removed");
            } else {
                debug!(?id, "reasoner listener removed");
            }
        }
    }

    // Introspection

    pub fn reasoner_name(&self) -> &'static str {
        REASONER_NAME
    }

    pub fn reasoner_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn buffering_mode(&self) -> BufferingMode {
        self.inner.config.buffering_mode
    }

    pub fn fresh_entity_policy(&self) -> FreshEntityPolicy {
        self.inner.config.fresh_entity_policy
    }

    pub fn individual_node_set_policy(&self) -> IndividualNodeSetPolicy {
        self.inner.config.individual_node_set_policy
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.inner.config
    }

    pub fn root_ontology(&self) -> SharedOntology {
        self.inner.ontology.clone()
    }

    /// Milliseconds; reasoning operations never time out
    pub fn timeout(&self) -> u64 {
        u64::MAX
    }

    pub fn precomputable_inference_types(&self) -> BTreeSet<InferenceType> {
        BTreeSet::new()
    }

    pub fn is_precomputed(&self, _inference: InferenceType) -> bool {
        false
    }

    /// Materialization happens on flush; nothing else can be precomputed
    pub fn precompute_inferences(&self, _inferences: &[InferenceType]) {}

    pub fn pending_changes(&self) -> Vec<OntologyChange> {
        self.inner.tracker.pending_changes()
    }

    pub fn pending_axiom_additions(&self) -> Vec<Axiom> {
        self.inner.tracker.pending_axiom_additions()
    }

    pub fn pending_axiom_removals(&self) -> Vec<Axiom> {
        self.inner.tracker.pending_axiom_removals()
    }

    pub fn staleness(&self) -> Staleness {
        self.inner.tracker.staleness()
    }

    pub fn last_flush(&self) -> Option<FlushStats> {
        self.inner.materializer.last_flush()
    }

    /// The current materialization
    pub fn fact_store(&self) -> Arc<FactStore> {
        self.inner.materializer.facts()
    }

    pub fn rule_set(&self) -> Arc<RuleSet> {
        self.inner.materializer.rules()
    }

    // Fact store queries

    /// No subject is a member of owl:Nothing
    pub fn is_consistent(&self) -> bool {
        !self.fact_store().ask(&query::inconsistency())
    }

    pub fn get_types(&self, individual: &Iri, direct: bool) -> Result<NodeSet<Iri>, ReasonerError> {
        self.check_individual(individual)?;
        let types = self.fact_store().select_iris(&query::types(individual, direct))?;
        Ok(NodeSet::from_singletons(types))
    }

    /// Named instances of a named class, or of a has-value restriction with
    /// a named filler. Any other expression is unsupported.
    pub fn get_instances(&self, ce: &ClassExpression, direct: bool) -> Result<NodeSet<Iri>, ReasonerError> {
        info!(expression = ?ce, direct, "get instances");
        match ce {
            ClassExpression::Class(class) => {
                self.check_class(class)?;
                let store = self.fact_store();
                let instances = store.select_iris(&query::instances(class, direct))?;
                self.individual_nodes(&store, instances)
            }
            // ∃p.{o} holds for exactly the p-predecessors of o
            ClassExpression::HasValue { property, value: Individual::Named(filler) } => {
                self.get_object_property_values(filler, &property.inverse())
            }
            ClassExpression::HasValue { value: Individual::Anonymous(_), .. } => Err(
                ReasonerError::UnsupportedConstruct("has-value restriction with an anonymous filler".to_string()),
            ),
            other => Err(ReasonerError::UnsupportedConstruct(format!(
                "instance retrieval for anonymous class expression {:?}",
                other
            ))),
        }
    }

    pub fn get_object_property_values(
        &self,
        individual: &Iri,
        property: &ObjectPropertyExpression,
    ) -> Result<NodeSet<Iri>, ReasonerError> {
        self.check_individual(individual)?;
        self.check_property(property.base())?;
        let store = self.fact_store();
        let values = store.select_iris(&query::property_values(individual, property))?;
        self.individual_nodes(&store, values)
    }

    /// The individual together with everything it is known to be the same as
    pub fn get_same_individuals(&self, individual: &Iri) -> Result<Node<Iri>, ReasonerError> {
        self.check_individual(individual)?;
        self.same_as(&self.fact_store(), individual)
    }

    pub fn get_different_individuals(&self, individual: &Iri) -> Result<NodeSet<Iri>, ReasonerError> {
        self.check_individual(individual)?;
        let store = self.fact_store();
        let different = store.select_iris(&query::different_individuals(individual))?;
        self.individual_nodes(&store, different)
    }

    fn same_as(&self, store: &FactStore, individual: &Iri) -> Result<Node<Iri>, ReasonerError> {
        let mut same = store.select_iris(&query::same_individuals(individual))?;
        same.insert(individual.clone());
        Ok(Node::new(same))
    }

    /// Group individuals into nodes according to the node set policy
    fn individual_nodes(&self, store: &FactStore, individuals: BTreeSet<Iri>) -> Result<NodeSet<Iri>, ReasonerError> {
        match self.inner.config.individual_node_set_policy {
            IndividualNodeSetPolicy::ByName => Ok(NodeSet::from_singletons(individuals)),
            IndividualNodeSetPolicy::BySameAs => {
                let mut nodes = NodeSet::new();
                let mut grouped: HashSet<Iri> = HashSet::new();
                for individual in &individuals {
                    if grouped.contains(individual) {
                        continue;
                    }
                    let node = self.same_as(store, individual)?;
                    grouped.extend(node.iter().cloned());
                    nodes.insert(node);
                }
                Ok(nodes)
            }
        }
    }

    // Entailment and satisfiability

    /// Assertions are checked against the fact store; every other axiom is
    /// asked of the terminology view.
    pub fn is_entailed(&self, axiom: &Axiom) -> Result<bool, ReasonerError> {
        info!(?axiom, "is entailed");
        match axiom {
            Axiom::ClassAssertion { class, individual } => match class {
                ClassExpression::Class(_) => self.contains_encoding(axiom),
                ClassExpression::HasValue { property, value } => self.contains_encoding(
                    &Axiom::object_property_assertion(property.clone(), individual.clone(), value.clone()),
                ),
                other => Err(ReasonerError::UnsupportedConstruct(format!(
                    "class assertion entailment for {:?}",
                    other
                ))),
            },
            Axiom::ObjectPropertyAssertion { .. } | Axiom::SameIndividual(_) | Axiom::DifferentIndividuals(_) => {
                self.contains_encoding(axiom)
            }
            other => {
                let kind = other.kind();
                self.with_terminology(|view| {
                    if !view.is_entailment_checking_supported(kind) {
                        return Err(ReasonerError::UnsupportedEntailment(kind));
                    }
                    Ok(view.is_entailed(other)?)
                })?
            }
        }
    }

    fn contains_encoding(&self, axiom: &Axiom) -> Result<bool, ReasonerError> {
        let store = self.fact_store();
        Ok(translator::assertion_to_triples(axiom)?
            .iter()
            .all(|triple| store.contains(triple)))
    }

    pub fn is_entailed_all(&self, axioms: &[Axiom]) -> Result<bool, ReasonerError> {
        for axiom in axioms {
            if !self.is_entailed(axiom)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reports only the kinds answered from the fact store. `is_entailed`
    /// still forwards other kinds to the terminology view.
    pub fn is_entailment_checking_supported(&self, kind: AxiomKind) -> bool {
        kind.is_assertional()
    }

    /// `{o} ⊓ ¬C` is satisfiable iff `o` is not an inferred instance of `C`.
    /// Other expressions are asked of the terminology view.
    pub fn is_satisfiable(&self, ce: &ClassExpression) -> Result<bool, ReasonerError> {
        info!(expression = ?ce, "is satisfiable");
        if let Some((individual, negated)) = negated_singleton(ce) {
            let instances = self.get_instances(negated, false)?;
            return Ok(!instances.contains_entity(individual));
        }
        self.with_terminology(|view| view.is_satisfiable(ce))?
            .map_err(ReasonerError::from)
    }

    // Terminology pass-through

    fn with_terminology<R>(&self, f: impl FnOnce(&dyn TerminologyView) -> R) -> Result<R, ReasonerError> {
        Ok(self.inner.materializer.with_terminology(f)?)
    }

    pub fn top_class_node(&self) -> Result<Node<Iri>, ReasonerError> {
        self.with_terminology(|view| view.top_class_node())
    }

    pub fn bottom_class_node(&self) -> Result<Node<Iri>, ReasonerError> {
        self.with_terminology(|view| view.bottom_class_node())
    }

    pub fn top_object_property_node(&self) -> Result<Node<ObjectPropertyExpression>, ReasonerError> {
        self.with_terminology(|view| view.top_object_property_node())
    }

    pub fn bottom_object_property_node(&self) -> Result<Node<ObjectPropertyExpression>, ReasonerError> {
        self.with_terminology(|view| view.bottom_object_property_node())
    }

    pub fn get_sub_classes(&self, ce: &ClassExpression, direct: bool) -> Result<NodeSet<Iri>, ReasonerError> {
        Ok(self.with_terminology(|view| view.sub_classes(ce, direct))??)
    }

    pub fn get_super_classes(&self, ce: &ClassExpression, direct: bool) -> Result<NodeSet<Iri>, ReasonerError> {
        Ok(self.with_terminology(|view| view.super_classes(ce, direct))??)
    }

    pub fn get_equivalent_classes(&self, ce: &ClassExpression) -> Result<Node<Iri>, ReasonerError> {
        Ok(self.with_terminology(|view| view.equivalent_classes(ce))??)
    }

    pub fn get_disjoint_classes(&self, ce: &ClassExpression) -> Result<NodeSet<Iri>, ReasonerError> {
        Ok(self.with_terminology(|view| view.disjoint_classes(ce))??)
    }

    pub fn get_unsatisfiable_classes(&self) -> Result<Node<Iri>, ReasonerError> {
        self.with_terminology(|view| view.unsatisfiable_classes())
    }

    pub fn get_sub_object_properties(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> Result<NodeSet<ObjectPropertyExpression>, ReasonerError> {
        self.with_terminology(|view| view.sub_object_properties(property, direct))
    }

    pub fn get_super_object_properties(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> Result<NodeSet<ObjectPropertyExpression>, ReasonerError> {
        self.with_terminology(|view| view.super_object_properties(property, direct))
    }

    pub fn get_equivalent_object_properties(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<Node<ObjectPropertyExpression>, ReasonerError> {
        self.with_terminology(|view| view.equivalent_object_properties(property))
    }

    pub fn get_disjoint_object_properties(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<NodeSet<ObjectPropertyExpression>, ReasonerError> {
        self.with_terminology(|view| view.disjoint_object_properties(property))
    }

    pub fn get_inverse_object_properties(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<Node<ObjectPropertyExpression>, ReasonerError> {
        self.with_terminology(|view| view.inverse_object_properties(property))
    }

    pub fn get_object_property_domains(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> Result<NodeSet<Iri>, ReasonerError> {
        self.with_terminology(|view| view.object_property_domains(property, direct))
    }

    pub fn get_object_property_ranges(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> Result<NodeSet<Iri>, ReasonerError> {
        self.with_terminology(|view| view.object_property_ranges(property, direct))
    }

    pub fn get_data_property_values(&self, individual: &Iri, property: &Iri) -> Result<BTreeSet<Literal>, ReasonerError> {
        self.check_individual(individual)?;
        let individual = Individual::Named(individual.clone());
        self.with_terminology(|view| view.data_property_values(&individual, property))
    }

    // Fresh entity checks

    fn check_individual(&self, individual: &Iri) -> Result<(), ReasonerError> {
        self.check_fresh(individual, |document| document.individuals_in_signature().contains(individual))
    }

    fn check_class(&self, class: &Iri) -> Result<(), ReasonerError> {
        if class.as_str() == vocabulary::OWL_THING || class.as_str() == vocabulary::OWL_NOTHING {
            return Ok(());
        }
        self.check_fresh(class, |document| document.classes_in_signature().contains(class))
    }

    fn check_property(&self, property: &Iri) -> Result<(), ReasonerError> {
        self.check_fresh(property, |document| document.object_properties_in_signature().contains(property))
    }

    fn check_fresh(
        &self,
        entity: &Iri,
        in_signature: impl FnOnce(&Ontology) -> bool,
    ) -> Result<(), ReasonerError> {
        if self.inner.config.fresh_entity_policy == FreshEntityPolicy::Allow {
            return Ok(());
        }
        if in_signature(&*self.inner.ontology.read()) {
            Ok(())
        } else {
            Err(ReasonerError::FreshEntity(entity.clone()))
        }
    }
}

impl Drop for Reasoner {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Reasoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reasoner")
            .field("config", &self.inner.config)
            .field("staleness", &self.staleness())
            .field("materializer", &self.inner.materializer)
            .finish()
    }
}

/// Recognize `{o} ⊓ ¬C` (operands in either order) with a named `o`
fn negated_singleton(ce: &ClassExpression) -> Option<(&Iri, &ClassExpression)> {
    let ClassExpression::IntersectionOf(operands) = ce else {
        return None;
    };
    let [first, second] = operands.as_slice() else {
        return None;
    };
    let (one_of, negated) = match (first, second) {
        (ClassExpression::OneOf(individuals), ClassExpression::ComplementOf(negated))
        | (ClassExpression::ComplementOf(negated), ClassExpression::OneOf(individuals)) => (individuals, negated),
        _ => return None,
    };
    match one_of.as_slice() {
        [Individual::Named(individual)] => Some((individual, negated.as_ref())),
        _ => None,
    }
}

/// Builds reasoners with a chosen set of collaborators
#[derive(Clone)]
pub struct ReasonerFactory {
    terminology: Arc<dyn TerminologyViewFactory>,
    rule_translator: Arc<dyn RuleTranslator>,
    rule_compiler: Option<Arc<dyn RuleCompiler>>,
    monitor: Arc<dyn ProgressMonitor>,
}

impl ReasonerFactory {
    /// Structural terminology view, OWL rule translation and forward chaining
    pub fn new() -> Self {
        Self {
            terminology: Arc::new(StructuralReasonerFactory),
            rule_translator: Arc::new(OwlRuleTranslator::default()),
            rule_compiler: None,
            monitor: Arc::new(NullProgressMonitor),
        }
    }

    pub fn with_terminology_factory(mut self, factory: Arc<dyn TerminologyViewFactory>) -> Self {
        self.terminology = factory;
        self
    }

    pub fn with_rule_translator(mut self, translator: Arc<dyn RuleTranslator>) -> Self {
        self.rule_translator = translator;
        self
    }

    /// Replaces the default forward-chaining engine; `max_chaining_rounds`
    /// then no longer applies
    pub fn with_rule_compiler(mut self, compiler: Arc<dyn RuleCompiler>) -> Self {
        self.rule_compiler = Some(compiler);
        self
    }

    pub fn with_progress_monitor(mut self, monitor: Arc<dyn ProgressMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn reasoner_name(&self) -> &'static str {
        REASONER_NAME
    }

    pub fn create_reasoner(&self, ontology: SharedOntology) -> Result<Reasoner, ReasonerError> {
        self.create_reasoner_with_config(ontology, ReasonerConfig::default())
    }

    /// A buffering reasoner, whatever `config.buffering_mode` says
    pub fn create_reasoner_with_config(
        &self,
        ontology: SharedOntology,
        config: ReasonerConfig,
    ) -> Result<Reasoner, ReasonerError> {
        self.build(ontology, config.with_buffering_mode(BufferingMode::Buffering))
    }

    pub fn create_non_buffering_reasoner(&self, ontology: SharedOntology) -> Result<Reasoner, ReasonerError> {
        self.create_non_buffering_reasoner_with_config(ontology, ReasonerConfig::default())
    }

    /// A non-buffering reasoner, whatever `config.buffering_mode` says
    pub fn create_non_buffering_reasoner_with_config(
        &self,
        ontology: SharedOntology,
        config: ReasonerConfig,
    ) -> Result<Reasoner, ReasonerError> {
        self.build(ontology, config.with_buffering_mode(BufferingMode::NonBuffering))
    }

    /// A reasoner in the buffering mode `config` names
    pub fn create_configured_reasoner(
        &self,
        ontology: SharedOntology,
        config: ReasonerConfig,
    ) -> Result<Reasoner, ReasonerError> {
        self.build(ontology, config)
    }

    fn build(&self, ontology: SharedOntology, config: ReasonerConfig) -> Result<Reasoner, ReasonerError> {
        let rule_compiler = match &self.rule_compiler {
            Some(compiler) => Arc::clone(compiler),
            None => Arc::new(ForwardChainingCompiler::new(config.max_chaining_rounds)),
        };
        let collaborators = Collaborators {
            terminology: Arc::clone(&self.terminology),
            rule_translator: Arc::clone(&self.rule_translator),
            rule_compiler,
        };
        info!(
            terminology = self.terminology.name(),
            mode = ?config.buffering_mode,
            "creating reasoner"
        );
        Reasoner::new(ontology, config, collaborators, Arc::clone(&self.monitor))
    }
}

impl Default for ReasonerFactory {
    fn default() -> Self {
        Self::new()
    }
}
