//! Forward chaining to a fixpoint
//!
//! The default engine evaluates rules semi-naively: each round only
//! considers rule matches that use at least one triple derived in the
//! previous round, and stops once a round derives nothing new.

use crate::rule::{Rule, RuleSet};
use crate::RuleError;
use orbweaver_core::model::{Iri, Term, Triple};
use orbweaver_core::pattern::{Bindings, TriplePattern};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Default bound on chaining rounds
pub const DEFAULT_MAX_ROUNDS: usize = 10_000;

/// Fixpoint of one chaining run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingMemory {
    facts: HashSet<Triple>,
    base_size: usize,
    rounds: usize,
}

impl WorkingMemory {
    pub fn facts(&self) -> &HashSet<Triple> {
        &self.facts
    }

    pub fn into_facts(self) -> HashSet<Triple> {
        self.facts
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.facts.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Number of distinct base triples the run started from
    pub fn base_size(&self) -> usize {
        self.base_size
    }

    /// Triples added by rule application
    pub fn derived_count(&self) -> usize {
        self.facts.len().saturating_sub(self.base_size)
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// A rule set bound to an evaluation strategy
pub trait RuleEngine: Send + Sync {
    fn rules(&self) -> &RuleSet;

    /// Compute the fixpoint of the rules over `base`
    fn run(&self, base: &HashSet<Triple>) -> Result<WorkingMemory, RuleError>;
}

/// Builds engines from rule sets
pub trait RuleCompiler: Send + Sync {
    fn compile(&self, rules: Arc<RuleSet>) -> Result<Arc<dyn RuleEngine>, RuleError>;
}

/// Compiler for [`ForwardChainingEngine`]
#[derive(Debug, Clone)]
pub struct ForwardChainingCompiler {
    pub max_rounds: usize,
}

impl ForwardChainingCompiler {
    pub fn new(max_rounds: usize) -> Self {
        Self { max_rounds }
    }
}

impl Default for ForwardChainingCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS)
    }
}

impl RuleCompiler for ForwardChainingCompiler {
    fn compile(&self, rules: Arc<RuleSet>) -> Result<Arc<dyn RuleEngine>, RuleError> {
        Ok(Arc::new(ForwardChainingEngine::new(rules, self.max_rounds)?))
    }
}

/// Body position of a rule: (rule index, pattern index)
type Trigger = (usize, usize);

/// Semi-naive forward-chaining engine
#[derive(Debug, Clone)]
pub struct ForwardChainingEngine {
    rules: Arc<RuleSet>,
    max_rounds: usize,
    /// Body positions keyed by their constant predicate
    by_predicate: HashMap<Iri, Vec<Trigger>>,
    /// Body positions with a variable predicate
    wildcard: Vec<Trigger>,
    /// Rules with an empty body
    unconditional: Vec<usize>,
}

impl ForwardChainingEngine {
    pub fn new(rules: Arc<RuleSet>, max_rounds: usize) -> Result<Self, RuleError> {
        if max_rounds == 0 {
            return Err(RuleError::Configuration("max_rounds must be positive".to_string()));
        }
        rules.validate()?;

        let mut by_predicate: HashMap<Iri, Vec<Trigger>> = HashMap::new();
        let mut wildcard = Vec::new();
        let mut unconditional = Vec::new();

        for (rule_index, rule) in rules.iter().enumerate() {
            if rule.body.is_empty() {
                unconditional.push(rule_index);
            }
            for (pattern_index, pattern) in rule.body.iter().enumerate() {
                match pattern.predicate_iri() {
                    Some(predicate) => by_predicate
                        .entry(predicate.clone())
                        .or_default()
                        .push((rule_index, pattern_index)),
                    None => wildcard.push((rule_index, pattern_index)),
                }
            }
        }

        Ok(Self {
            rules,
            max_rounds,
            by_predicate,
            wildcard,
            unconditional,
        })
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    fn rule(&self, index: usize) -> Option<&Rule> {
        self.rules.rules().get(index)
    }

    /// Fire every head of `rule` for each completion of `seed` over the body
    /// patterns other than `skip`
    fn fire(&self, rule: &Rule, skip: Option<usize>, seed: Bindings, memory: &FactIndex, derived: &mut Vec<Triple>) {
        let mut solutions = vec![seed];
        for (index, pattern) in rule.body.iter().enumerate() {
            if Some(index) == skip {
                continue;
            }
            solutions = solutions
                .iter()
                .flat_map(|bindings| memory.solutions(pattern, bindings))
                .collect();
            if solutions.is_empty() {
                return;
            }
        }

        for bindings in &solutions {
            for head in &rule.head {
                if let Some(triple) = head.instantiate(bindings) {
                    if !memory.contains(&triple) {
                        derived.push(triple);
                    }
                }
            }
        }
    }
}

impl RuleEngine for ForwardChainingEngine {
    fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn run(&self, base: &HashSet<Triple>) -> Result<WorkingMemory, RuleError> {
        let mut memory = FactIndex::default();
        let mut delta: Vec<Triple> = Vec::new();

        for triple in base {
            if memory.insert(triple.clone()) {
                delta.push(triple.clone());
            }
        }
        let base_size = memory.len();

        let mut derived = Vec::new();
        for &rule_index in &self.unconditional {
            if let Some(rule) = self.rule(rule_index) {
                self.fire(rule, None, Bindings::new(), &memory, &mut derived);
            }
        }
        for triple in derived {
            if memory.insert(triple.clone()) {
                delta.push(triple);
            }
        }

        let mut rounds = 0;
        while !delta.is_empty() {
            if rounds >= self.max_rounds {
                return Err(RuleError::IterationLimit(self.max_rounds));
            }
            rounds += 1;

            let mut derived = Vec::new();
            for triple in &delta {
                let triggers = self
                    .by_predicate
                    .get(&triple.predicate)
                    .into_iter()
                    .flatten()
                    .chain(self.wildcard.iter());

                for &(rule_index, pattern_index) in triggers {
                    let Some(rule) = self.rule(rule_index) else { continue };
                    let Some(pattern) = rule.body.get(pattern_index) else { continue };
                    if let Some(seed) = pattern.match_triple(triple, &Bindings::new()) {
                        self.fire(rule, Some(pattern_index), seed, &memory, &mut derived);
                    }
                }
            }

            delta.clear();
            for triple in derived {
                if memory.insert(triple.clone()) {
                    delta.push(triple);
                }
            }
            debug!(round = rounds, new_triples = delta.len(), "chaining round complete");
        }

        Ok(WorkingMemory {
            facts: memory.into_facts(),
            base_size,
            rounds,
        })
    }
}

type Positions = SmallVec<[usize; 4]>;

/// Growing triple set indexed by subject, predicate and object
#[derive(Debug, Default)]
struct FactIndex {
    triples: Vec<Triple>,
    members: HashSet<Triple>,
    by_subject: HashMap<Term, Positions>,
    by_predicate: HashMap<Iri, Positions>,
    by_object: HashMap<Term, Positions>,
}

impl FactIndex {
    fn insert(&mut self, triple: Triple) -> bool {
        if self.members.contains(&triple) {
            return false;
        }
        let position = self.triples.len();
        self.by_subject.entry(triple.subject.clone()).or_default().push(position);
        self.by_predicate.entry(triple.predicate.clone()).or_default().push(position);
        self.by_object.entry(triple.object.clone()).or_default().push(position);
        self.members.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    fn contains(&self, triple: &Triple) -> bool {
        self.members.contains(triple)
    }

    fn len(&self) -> usize {
        self.triples.len()
    }

    fn into_facts(self) -> HashSet<Triple> {
        self.members
    }

    /// Extensions of `bindings` matching `pattern`, scanning the smallest
    /// index among the bound positions
    fn solutions(&self, pattern: &TriplePattern, bindings: &Bindings) -> Vec<Bindings> {
        const EMPTY: &[usize] = &[];

        let subject = pattern
            .subject
            .resolve(bindings)
            .map(|subject| self.by_subject.get(&subject).map_or(EMPTY, |p| p.as_slice()));
        let predicate = match pattern.predicate.resolve(bindings) {
            Some(Term::Iri(predicate)) => Some(self.by_predicate.get(&predicate).map_or(EMPTY, |p| p.as_slice())),
            Some(Term::Blank(_)) => return Vec::new(),
            None => None,
        };
        let object = pattern
            .object
            .resolve(bindings)
            .map(|object| self.by_object.get(&object).map_or(EMPTY, |p| p.as_slice()));

        let candidates = [subject, predicate, object]
            .into_iter()
            .flatten()
            .min_by_key(|positions| positions.len());

        match candidates {
            Some(positions) => positions
                .iter()
                .filter_map(|&position| self.triples.get(position))
                .filter_map(|triple| pattern.match_triple(triple, bindings))
                .collect(),
            None => self
                .triples
                .iter()
                .filter_map(|triple| pattern.match_triple(triple, bindings))
                .collect(),
        }
    }
}
