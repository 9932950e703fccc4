//! # Orbweaver Store
//!
//! Immutable, indexed triple store holding one materialization, and the
//! select/ask query templates the reasoner answers questions with.

pub mod query;
pub mod store;

pub use query::{AskQuery, Filter, SelectQuery};
pub use store::{FactStore, StoreStatistics};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("projected variable ?{0} does not occur in the pattern")]
    UnboundProjection(String),

    #[error("filter variable ?{0} does not occur in the pattern")]
    UnboundFilterVariable(String),
}
