//! Triple patterns with variables, shared by rule bodies and store queries

use crate::model::{Iri, Term, Triple};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Variable bindings map
pub type Bindings = HashMap<String, Term>;

/// Pattern value (variable or constant)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternValue {
    Variable(String),
    Constant(Term),
}

impl PatternValue {
    pub fn var<S: Into<String>>(name: S) -> Self {
        PatternValue::Variable(name.into())
    }

    pub fn iri<S: Into<String>>(iri: S) -> Self {
        PatternValue::Constant(Term::iri(iri))
    }

    pub fn constant(term: Term) -> Self {
        PatternValue::Constant(term)
    }

    pub fn variable_name(&self) -> Option<&str> {
        match self {
            PatternValue::Variable(name) => Some(name),
            PatternValue::Constant(_) => None,
        }
    }

    /// Resolve against bindings; `None` when the variable is unbound
    pub fn resolve(&self, bindings: &Bindings) -> Option<Term> {
        match self {
            PatternValue::Variable(name) => bindings.get(name).cloned(),
            PatternValue::Constant(term) => Some(term.clone()),
        }
    }

    fn unify(&self, term: &Term, bindings: &mut Bindings) -> bool {
        match self {
            PatternValue::Constant(constant) => constant == term,
            PatternValue::Variable(name) => match bindings.get(name) {
                Some(bound) => bound == term,
                None => {
                    bindings.insert(name.clone(), term.clone());
                    true
                }
            },
        }
    }

    fn unify_iri(&self, iri: &Iri, bindings: &mut Bindings) -> bool {
        match self {
            PatternValue::Constant(Term::Iri(constant)) => constant == iri,
            PatternValue::Constant(Term::Blank(_)) => false,
            PatternValue::Variable(name) => match bindings.get(name) {
                Some(Term::Iri(bound)) => bound == iri,
                Some(Term::Blank(_)) => false,
                None => {
                    bindings.insert(name.clone(), Term::Iri(iri.clone()));
                    true
                }
            },
        }
    }
}

impl From<Term> for PatternValue {
    fn from(term: Term) -> Self {
        PatternValue::Constant(term)
    }
}

impl From<Iri> for PatternValue {
    fn from(iri: Iri) -> Self {
        PatternValue::Constant(Term::Iri(iri))
    }
}

/// Triple pattern for matching
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: PatternValue,
    pub predicate: PatternValue,
    pub object: PatternValue,
}

impl TriplePattern {
    pub fn new<S, P, O>(subject: S, predicate: P, object: O) -> Self
    where
        S: Into<PatternValue>,
        P: Into<PatternValue>,
        O: Into<PatternValue>,
    {
        TriplePattern {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Names of all variables in subject, predicate, object order
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(PatternValue::variable_name)
    }

    /// Constant predicate, if any. Used to pick an index.
    pub fn predicate_iri(&self) -> Option<&Iri> {
        match &self.predicate {
            PatternValue::Constant(Term::Iri(iri)) => Some(iri),
            _ => None,
        }
    }

    /// Match a triple, extending `bindings`. Returns the extended bindings on success.
    pub fn match_triple(&self, triple: &Triple, bindings: &Bindings) -> Option<Bindings> {
        let mut extended = bindings.clone();
        if self.subject.unify(&triple.subject, &mut extended)
            && self.predicate.unify_iri(&triple.predicate, &mut extended)
            && self.object.unify(&triple.object, &mut extended)
        {
            Some(extended)
        } else {
            None
        }
    }

    /// Instantiate the pattern. `None` if a variable is unbound or the
    /// predicate resolves to an anonymous node.
    pub fn instantiate(&self, bindings: &Bindings) -> Option<Triple> {
        let subject = self.subject.resolve(bindings)?;
        let predicate = self.predicate.resolve(bindings)?.into_iri()?;
        let object = self.object.resolve(bindings)?;
        Some(Triple { subject, predicate, object })
    }
}
