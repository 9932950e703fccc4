//! Engine error types

use orbweaver_core::model::Iri;
use orbweaver_core::owl::AxiomKind;
use orbweaver_rules::RuleError;
use orbweaver_store::QueryError;
use orbweaver_structural::TerminologyError;
use thiserror::Error;

/// An axiom shape with no triple encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Axiom kind {0:?} has no triple translation")]
    UnsupportedAxiom(AxiomKind),
}

/// A flush stage failed; nothing from the failed stage was published
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Terminology view failed: {0}")]
    Terminology(#[from] TerminologyError),

    #[error("Rule generation or chaining failed: {0}")]
    Rules(#[from] RuleError),

    #[error("Base fact translation failed: {0}")]
    Translation(#[from] TranslationError),
}

/// Errors surfaced by the [`crate::Reasoner`] façade
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReasonerError {
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("Entailment checking is not supported for {0:?} axioms")]
    UnsupportedEntailment(AxiomKind),

    #[error("Flush failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Terminology(#[from] TerminologyError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("Entity {0} is not in the ontology signature")]
    FreshEntity(Iri),

    #[error("Malformed query template: {0}")]
    Query(#[from] QueryError),
}

/// Reading or parsing a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
