//! # Orbweaver Core
//!
//! Triples, triple patterns and the OWL axiom model shared by every
//! Orbweaver crate, plus the editable ontology document that reasoners
//! observe through change listeners.

pub mod model;
pub mod node;
pub mod ontology;
pub mod owl;
pub mod pattern;
pub mod vocabulary;

pub use model::{Iri, Term, Triple};
pub use node::{Node, NodeSet};
pub use ontology::{ListenerId, Ontology, OntologyChange, OntologyChangeListener, OntologyError, SharedOntology};
pub use owl::{
    Axiom, AxiomCategory, AxiomKind, ClassExpression, Entity, Individual, Literal, ObjectPropertyExpression,
};
pub use pattern::{Bindings, PatternValue, TriplePattern};
