//! Query templates evaluated against a [`FactStore`]
//!
//! A select query is a single triple pattern with one projected variable,
//! a conjunction of filters, and distinct results. An ask query is a
//! single pattern checked for any solution.

use crate::store::FactStore;
use crate::QueryError;
use orbweaver_core::model::{Iri, Term};
use orbweaver_core::pattern::{Bindings, TriplePattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter applied to each solution of a select query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// The variable is bound to a named resource
    IsIri(String),
    /// The variable is not bound to the given term
    NotEqual(String, Term),
    /// No fact matches the pattern under the current bindings
    NotExists(TriplePattern),
}

/// SELECT DISTINCT ?projection WHERE { pattern FILTER(...) }
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub projection: String,
    pub pattern: TriplePattern,
    pub filters: Vec<Filter>,
}

impl SelectQuery {
    pub fn new<S: Into<String>>(projection: S, pattern: TriplePattern) -> Self {
        Self {
            projection: projection.into(),
            pattern,
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Apply `filter` only when `condition` holds
    pub fn filter_if(self, condition: bool, filter: Filter) -> Self {
        if condition {
            self.filter(filter)
        } else {
            self
        }
    }

    fn validate(&self) -> Result<(), QueryError> {
        let bound: BTreeSet<&str> = self.pattern.variables().collect();
        if !bound.contains(self.projection.as_str()) {
            return Err(QueryError::UnboundProjection(self.projection.clone()));
        }
        for filter in &self.filters {
            let variable = match filter {
                Filter::IsIri(variable) | Filter::NotEqual(variable, _) => variable,
                Filter::NotExists(_) => continue,
            };
            if !bound.contains(variable.as_str()) {
                return Err(QueryError::UnboundFilterVariable(variable.clone()));
            }
        }
        Ok(())
    }
}

/// ASK { pattern }
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskQuery {
    pub pattern: TriplePattern,
}

impl AskQuery {
    pub fn new(pattern: TriplePattern) -> Self {
        Self { pattern }
    }
}

impl FactStore {
    /// All solutions of a single pattern, extending `bindings`
    pub fn solutions(&self, pattern: &TriplePattern, bindings: &Bindings) -> Vec<Bindings> {
        let subject = pattern.subject.resolve(bindings);
        let object = pattern.object.resolve(bindings);
        let predicate = match pattern.predicate.resolve(bindings) {
            Some(Term::Iri(iri)) => Some(iri),
            Some(Term::Blank(_)) => return Vec::new(),
            None => None,
        };

        self.find_triples(subject.as_ref(), predicate.as_ref(), object.as_ref())
            .into_iter()
            .filter_map(|triple| pattern.match_triple(triple, bindings))
            .collect()
    }

    /// Evaluate a select query; results are distinct and sorted
    pub fn select(&self, query: &SelectQuery) -> Result<BTreeSet<Term>, QueryError> {
        query.validate()?;

        let mut results = BTreeSet::new();
        for solution in self.solutions(&query.pattern, &Bindings::new()) {
            if !query.filters.iter().all(|filter| self.accepts(filter, &solution)) {
                continue;
            }
            if let Some(term) = solution.get(&query.projection) {
                results.insert(term.clone());
            }
        }
        Ok(results)
    }

    /// Named resources selected by `query`; anonymous nodes are dropped
    pub fn select_iris(&self, query: &SelectQuery) -> Result<BTreeSet<Iri>, QueryError> {
        Ok(self.select(query)?.into_iter().filter_map(Term::into_iri).collect())
    }

    pub fn ask(&self, query: &AskQuery) -> bool {
        !self.solutions(&query.pattern, &Bindings::new()).is_empty()
    }

    fn accepts(&self, filter: &Filter, solution: &Bindings) -> bool {
        match filter {
            Filter::IsIri(variable) => solution.get(variable).map_or(false, Term::is_iri),
            Filter::NotEqual(variable, term) => solution.get(variable) != Some(term),
            Filter::NotExists(pattern) => self.solutions(pattern, solution).is_empty(),
        }
    }
}
