//! # Orbweaver Rules
//!
//! Horn rules over triple patterns, the capability traits a materializing
//! reasoner needs from a rule engine (compile a rule set, run it to a
//! fixpoint), a semi-naive forward-chaining engine, and the translator
//! that turns an ontology's terminology into rules.

pub mod engine;
pub mod rule;
pub mod translator;

pub use engine::{ForwardChainingCompiler, ForwardChainingEngine, RuleCompiler, RuleEngine, WorkingMemory, DEFAULT_MAX_ROUNDS};
pub use rule::{Rule, RuleSet};
pub use translator::{OwlRuleTranslator, RuleTranslator};

use thiserror::Error;

/// Rule compilation and execution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Rule {rule} uses head variable ?{variable} that its body never binds")]
    UnboundVariable { rule: String, variable: String },

    #[error("No fixpoint reached within {0} chaining rounds")]
    IterationLimit(usize),

    #[error("Unsupported rule construct: {0}")]
    Unsupported(String),

    #[error("Invalid rule engine configuration: {0}")]
    Configuration(String),
}
