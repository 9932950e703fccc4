//! # Orbweaver Engine
//!
//! Keeps a materialized view of an ontology's consequences in step with
//! the editable document, and answers reasoner queries against it.
//!
//! - [`tracker`] classifies edits into rule and data staleness
//! - [`translator`] encodes assertional axioms as triples
//! - [`pipeline`] rebuilds the terminology view, rule set and fact store
//! - [`query`] holds the fact store query templates
//! - [`reasoner`] is the façade tying them together

pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod reasoner;
pub mod tracker;
pub mod translator;

pub use config::{BufferingMode, FreshEntityPolicy, IndividualNodeSetPolicy, ReasonerConfig};
pub use error::{ConfigError, PipelineError, ReasonerError, TranslationError};
pub use pipeline::{Collaborators, FlushStats, Materializer};
pub use progress::{NullProgressMonitor, ProgressMonitor, TracingProgressMonitor};
pub use reasoner::{InferenceType, Reasoner, ReasonerFactory, REASONER_NAME};
pub use tracker::{ChangeTracker, PendingChanges, Stage, StaleTicket, Staleness};
