//! Horn rules over triple patterns

use crate::RuleError;
use orbweaver_core::pattern::TriplePattern;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// `body → head`: every head pattern is instantiated for each joint match
/// of the body patterns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub body: Vec<TriplePattern>,
    pub head: Vec<TriplePattern>,
}

impl Rule {
    pub fn new<S: Into<String>>(name: S, body: Vec<TriplePattern>, head: Vec<TriplePattern>) -> Self {
        Self {
            name: name.into(),
            body,
            head,
        }
    }

    /// Head variables that no body pattern binds
    pub fn unbound_head_variables(&self) -> BTreeSet<String> {
        let bound: HashSet<&str> = self.body.iter().flat_map(TriplePattern::variables).collect();
        self.head
            .iter()
            .flat_map(TriplePattern::variables)
            .filter(|variable| !bound.contains(variable))
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        match self.unbound_head_variables().into_iter().next() {
            Some(variable) => Err(RuleError::UnboundVariable {
                rule: self.name.clone(),
                variable,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {} body, {} head]", self.name, self.body.len(), self.head.len())
    }
}

/// Ordered, duplicate-free collection of rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    seen: HashSet<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; returns false if an identical rule is already present
    pub fn insert(&mut self, rule: Rule) -> bool {
        if self.seen.contains(&rule) {
            return false;
        }
        self.seen.insert(rule.clone());
        self.rules.push(rule);
        true
    }

    /// Union of two rule sets, keeping the order of `self` first
    pub fn union(mut self, other: RuleSet) -> RuleSet {
        for rule in other.rules {
            self.insert(rule);
        }
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        self.rules.iter().try_for_each(Rule::validate)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for rule in iter {
            set.insert(rule);
        }
        set
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        for rule in iter {
            self.insert(rule);
        }
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}
