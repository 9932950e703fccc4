//! Materialization pipeline
//!
//! A flush runs up to four stages in order: resynchronize the terminology
//! view, drain pending edits, regenerate rules when the terminology is
//! stale, and re-chain the assertional data when it is stale. Each stage
//! builds its result off to the side and publishes it by swapping an `Arc`,
//! so readers always see one complete snapshot.

use crate::error::PipelineError;
use crate::progress::{ProgressMonitor, TaskGuard};
use crate::tracker::ChangeTracker;
use crate::translator;
use orbweaver_core::ontology::Ontology;
use orbweaver_rules::{RuleCompiler, RuleEngine, RuleError, RuleSet, RuleTranslator};
use orbweaver_store::FactStore;
use orbweaver_structural::{TerminologyError, TerminologyView, TerminologyViewFactory};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub const TASK_CREATE_TERMINOLOGY: &str = "Creating structural reasoner for terminology";
pub const TASK_FLUSH_TERMINOLOGY: &str = "Flushing structural reasoner";
pub const TASK_TRANSLATE_RULES: &str = "Converting terminology to rules";
pub const TASK_COMPILE_RULES: &str = "Constructing rule engine from rules";
pub const TASK_REALIZE: &str = "Realizing assertions";

/// What one flush did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushStats {
    pub rules_regenerated: bool,
    pub data_rechained: bool,
    pub rule_count: usize,
    pub base_triples: usize,
    pub materialized_triples: usize,
    pub chaining_rounds: usize,
    pub drained_changes: usize,
    pub execution_time_ms: u64,
}

/// The external collaborators a pipeline drives
#[derive(Clone)]
pub struct Collaborators {
    pub terminology: Arc<dyn TerminologyViewFactory>,
    pub rule_translator: Arc<dyn RuleTranslator>,
    pub rule_compiler: Arc<dyn RuleCompiler>,
}

/// Owns the terminology view, the current rule set and engine, and the
/// published fact store. It is the only writer of all of them.
pub struct Materializer {
    collaborators: Collaborators,
    monitor: Arc<dyn ProgressMonitor>,
    flush_lock: Mutex<()>,
    terminology: RwLock<Option<Box<dyn TerminologyView>>>,
    rules: RwLock<Arc<RuleSet>>,
    engine: RwLock<Option<Arc<dyn RuleEngine>>>,
    facts: RwLock<Arc<FactStore>>,
    last_flush: Mutex<Option<FlushStats>>,
}

impl Materializer {
    pub fn new(collaborators: Collaborators, monitor: Arc<dyn ProgressMonitor>) -> Self {
        Self {
            collaborators,
            monitor,
            flush_lock: Mutex::new(()),
            terminology: RwLock::new(None),
            rules: RwLock::new(Arc::new(RuleSet::new())),
            engine: RwLock::new(None),
            facts: RwLock::new(Arc::new(FactStore::new())),
            last_flush: Mutex::new(None),
        }
    }

    /// Bring every stage up to date with `ontology`. Stages that are not
    /// stale are skipped; a failed stage publishes nothing and stays stale.
    pub fn flush(&self, ontology: &Ontology, tracker: &ChangeTracker) -> Result<FlushStats, PipelineError> {
        let _writer = self.flush_lock.lock();
        let start = Instant::now();
        let mut stats = FlushStats::default();

        self.sync_terminology(ontology)?;

        stats.drained_changes = tracker.drain_pending().changes.len();

        if let Some(ticket) = tracker.take_rules_stale() {
            let rules = {
                let _task = TaskGuard::start(self.monitor.as_ref(), TASK_TRANSLATE_RULES);
                Arc::new(self.collaborators.rule_translator.translate(ontology)?)
            };
            let engine = {
                let _task = TaskGuard::start(self.monitor.as_ref(), TASK_COMPILE_RULES);
                self.collaborators.rule_compiler.compile(Arc::clone(&rules))?
            };
            stats.rules_regenerated = true;
            info!(rules = rules.len(), "rule set regenerated");
            *self.rules.write() = rules;
            *self.engine.write() = Some(engine);
            tracker.commit(ticket);
        }
        stats.rule_count = self.rules.read().len();

        if let Some(ticket) = tracker.take_data_stale() {
            let _task = TaskGuard::start(self.monitor.as_ref(), TASK_REALIZE);
            let engine = self
                .engine
                .read()
                .clone()
                .ok_or_else(|| RuleError::Configuration("no rule engine has been constructed".to_string()))?;

            let base = translator::base_facts(ontology)?;
            stats.base_triples = base.len();
            let memory = engine.run(&base)?;
            stats.chaining_rounds = memory.rounds();

            let store = Arc::new(FactStore::from_triples(memory.into_facts()));
            stats.materialized_triples = store.len();
            stats.data_rechained = true;
            info!(
                base = stats.base_triples,
                materialized = stats.materialized_triples,
                rounds = stats.chaining_rounds,
                "assertions realized"
            );
            *self.facts.write() = store;
            tracker.commit(ticket);
        } else {
            stats.materialized_triples = self.facts.read().len();
        }

        stats.execution_time_ms = start.elapsed().as_millis() as u64;
        debug!(?stats, "flush complete");
        *self.last_flush.lock() = Some(stats.clone());
        Ok(stats)
    }

    fn sync_terminology(&self, ontology: &Ontology) -> Result<(), TerminologyError> {
        let mut terminology = self.terminology.write();
        match terminology.as_mut() {
            Some(view) => {
                let _task = TaskGuard::start(self.monitor.as_ref(), TASK_FLUSH_TERMINOLOGY);
                view.flush(ontology)
            }
            None => {
                let _task = TaskGuard::start(self.monitor.as_ref(), TASK_CREATE_TERMINOLOGY);
                let mut view = self.collaborators.terminology.create(ontology)?;
                view.flush(ontology)?;
                *terminology = Some(view);
                Ok(())
            }
        }
    }

    /// The current fact store snapshot
    pub fn facts(&self) -> Arc<FactStore> {
        Arc::clone(&self.facts.read())
    }

    /// The current rule set snapshot
    pub fn rules(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules.read())
    }

    /// Run `f` against the terminology view
    pub fn with_terminology<R>(
        &self,
        f: impl FnOnce(&dyn TerminologyView) -> R,
    ) -> Result<R, TerminologyError> {
        let terminology = self.terminology.read();
        match terminology.as_deref() {
            Some(view) => Ok(f(view)),
            None => Err(TerminologyError::Construction(
                "the terminology view has not been built".to_string(),
            )),
        }
    }

    pub fn last_flush(&self) -> Option<FlushStats> {
        self.last_flush.lock().clone()
    }

    pub fn terminology_name(&self) -> &str {
        self.collaborators.terminology.name()
    }
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("terminology", &self.terminology_name())
            .field("rules", &self.rules.read().len())
            .field("facts", &self.facts.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NullProgressMonitor, TracingProgressMonitor};
    use orbweaver_core::model::{Iri, Term, Triple};
    use orbweaver_core::ontology::OntologyChange;
    use orbweaver_core::owl::{Axiom, ClassExpression, Individual};
    use orbweaver_core::vocabulary;
    use orbweaver_rules::{ForwardChainingCompiler, OwlRuleTranslator};
    use orbweaver_structural::StructuralReasonerFactory;
    use std::collections::HashSet;

    fn collaborators() -> Collaborators {
        Collaborators {
            terminology: Arc::new(StructuralReasonerFactory),
            rule_translator: Arc::new(OwlRuleTranslator::default()),
            rule_compiler: Arc::new(ForwardChainingCompiler::default()),
        }
    }

    fn class(local: &str) -> ClassExpression {
        ClassExpression::class(format!("http://example.org/{}", local))
    }

    fn typed(individual: &str, class: &str) -> Triple {
        Triple::new(
            Term::iri(format!("http://example.org/{}", individual)),
            vocabulary::rdf_type(),
            Iri::new(format!("http://example.org/{}", class)),
        )
    }

    fn zoo() -> Ontology {
        Ontology::from_axioms(vec![
            Axiom::sub_class_of(class("Dog"), class("Animal")),
            Axiom::class_assertion(class("Dog"), Individual::named("http://example.org/rex")),
        ])
    }

    /// A compiler that rejects every rule set
    struct FailingCompiler;

    impl RuleCompiler for FailingCompiler {
        fn compile(&self, _rules: Arc<RuleSet>) -> Result<Arc<dyn RuleEngine>, RuleError> {
            Err(RuleError::Configuration("broken".to_string()))
        }
    }

    #[test]
    fn test_first_flush_materializes() {
        let monitor = Arc::new(TracingProgressMonitor::new());
        let materializer = Materializer::new(collaborators(), monitor.clone());
        let tracker = ChangeTracker::new();

        let stats = materializer.flush(&zoo(), &tracker).unwrap();
        assert!(stats.rules_regenerated && stats.data_rechained);
        assert!(materializer.facts().contains(&typed("rex", "Animal")));
        assert_eq!(
            monitor.task_names(),
            vec![TASK_CREATE_TERMINOLOGY, TASK_TRANSLATE_RULES, TASK_COMPILE_RULES, TASK_REALIZE]
        );
    }

    #[test]
    fn test_second_flush_publishes_nothing_new() {
        let materializer = Materializer::new(collaborators(), Arc::new(NullProgressMonitor));
        let tracker = ChangeTracker::new();
        let ontology = zoo();

        materializer.flush(&ontology, &tracker).unwrap();
        let facts = materializer.facts();
        let rules = materializer.rules();

        let stats = materializer.flush(&ontology, &tracker).unwrap();
        assert!(!stats.rules_regenerated && !stats.data_rechained);
        assert!(Arc::ptr_eq(&facts, &materializer.facts()));
        assert!(Arc::ptr_eq(&rules, &materializer.rules()));
    }

    #[test]
    fn test_data_change_keeps_rules() {
        let materializer = Materializer::new(collaborators(), Arc::new(NullProgressMonitor));
        let tracker = ChangeTracker::new();
        let mut ontology = zoo();
        materializer.flush(&ontology, &tracker).unwrap();
        let rules = materializer.rules();

        let added = Axiom::class_assertion(class("Dog"), Individual::named("http://example.org/fido"));
        ontology.add_axiom(added.clone());
        tracker.record_change(&OntologyChange::AddAxiom(added));

        let stats = materializer.flush(&ontology, &tracker).unwrap();
        assert!(!stats.rules_regenerated && stats.data_rechained);
        assert!(Arc::ptr_eq(&rules, &materializer.rules()));
        assert!(materializer.facts().contains(&typed("fido", "Animal")));
    }

    #[test]
    fn test_fixpoint_matches_direct_chaining() {
        let materializer = Materializer::new(collaborators(), Arc::new(NullProgressMonitor));
        let ontology = zoo();
        materializer.flush(&ontology, &ChangeTracker::new()).unwrap();

        let rules = OwlRuleTranslator::default().translate(&ontology).unwrap();
        let engine = ForwardChainingCompiler::default().compile(Arc::new(rules)).unwrap();
        let expected: HashSet<Triple> = engine.run(&translator::base_facts(&ontology).unwrap()).unwrap().into_facts();
        let actual: HashSet<Triple> = materializer.facts().iter().cloned().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_failed_stage_stays_stale() {
        let broken = Collaborators {
            rule_compiler: Arc::new(FailingCompiler),
            ..collaborators()
        };
        let materializer = Materializer::new(broken, Arc::new(NullProgressMonitor));
        let tracker = ChangeTracker::new();
        tracker.record_change(&OntologyChange::AddAxiom(Axiom::sub_class_of(class("A"), class("B"))));

        let result = materializer.flush(&zoo(), &tracker);
        assert!(matches!(result, Err(PipelineError::Rules(RuleError::Configuration(_)))));
        assert!(tracker.is_rules_stale());
        assert!(tracker.is_data_stale());
        assert!(tracker.pending_changes().is_empty());
        assert!(materializer.facts().is_empty());
        assert!(materializer.last_flush().is_none());
    }
}
