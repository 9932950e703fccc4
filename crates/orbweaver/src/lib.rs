//! # Orbweaver
//!
//! A reasoner façade over an editable OWL ontology. Terminology axioms are
//! compiled into forward-chaining rules, assertions are encoded as triples,
//! and the rule engine's fixpoint is published as a fact store that answers
//! type, instance, property-value and equality queries. Edits are tracked
//! and folded in on the next flush, or immediately in non-buffering mode.
//!
//! ## Quick Start
//!
//! ```rust
//! use orbweaver::prelude::*;
//!
//! let ontology = SharedOntology::new(Ontology::from_axioms(vec![
//!     Axiom::sub_class_of(ClassExpression::class("http://example.org/Dog"), ClassExpression::class("http://example.org/Animal")),
//!     Axiom::class_assertion(ClassExpression::class("http://example.org/Dog"), Individual::named("http://example.org/rex")),
//! ]));
//!
//! let reasoner = ReasonerFactory::new().create_reasoner(ontology).unwrap();
//! let types = reasoner.get_types(&Iri::new("http://example.org/rex"), false).unwrap();
//! assert!(types.contains_entity(&Iri::new("http://example.org/Animal")));
//! ```
//!
//! ## Architecture
//!
//! - **`orbweaver-core`**: triples, the OWL axiom model and the shared ontology document
//! - **`orbweaver-store`**: indexed fact store with SELECT/ASK templates
//! - **`orbweaver-rules`**: OWL-to-rule translation and forward chaining
//! - **`orbweaver-structural`**: told-hierarchy terminology view
//! - **`orbweaver-engine`**: change tracking, the flush pipeline and the reasoner façade
//!
//! ## Feature Flags
//!
//! - `full` (default): every crate
//! - `core`, `store`, `rules`, `structural`, `engine`: individual crates

#[cfg(feature = "orbweaver-core")]
pub use orbweaver_core as core;

#[cfg(feature = "orbweaver-store")]
pub use orbweaver_store as store;

#[cfg(feature = "orbweaver-rules")]
pub use orbweaver_rules as rules;

#[cfg(feature = "orbweaver-structural")]
pub use orbweaver_structural as structural;

#[cfg(feature = "orbweaver-engine")]
pub use orbweaver_engine as engine;

#[cfg(feature = "orbweaver-core")]
pub use orbweaver_core::{model, owl};

#[cfg(feature = "orbweaver-engine")]
pub use orbweaver_engine::{Reasoner, ReasonerConfig, ReasonerError, ReasonerFactory};

pub use anyhow;
pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use orbweaver::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "orbweaver-core")]
    pub use orbweaver_core::{
        Axiom, ClassExpression, Individual, Iri, Node, NodeSet, ObjectPropertyExpression, Ontology, OntologyChange,
        SharedOntology, Term, Triple,
    };

    #[cfg(feature = "orbweaver-store")]
    pub use orbweaver_store::FactStore;

    #[cfg(feature = "orbweaver-rules")]
    pub use orbweaver_rules::{Rule, RuleSet};

    #[cfg(feature = "orbweaver-engine")]
    pub use orbweaver_engine::{
        BufferingMode, FlushStats, FreshEntityPolicy, IndividualNodeSetPolicy, Reasoner, ReasonerConfig, ReasonerError,
        ReasonerFactory, Staleness,
    };

    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
}

/// Current version of Orbweaver
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names and versions of the compiled-in crates
pub fn build_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION,
        "modules": {
            "core": cfg!(feature = "orbweaver-core"),
            "store": cfg!(feature = "orbweaver-store"),
            "rules": cfg!(feature = "orbweaver-rules"),
            "structural": cfg!(feature = "orbweaver-structural"),
            "engine": cfg!(feature = "orbweaver-engine"),
        }
    })
}
