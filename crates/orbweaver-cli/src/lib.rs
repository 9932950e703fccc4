//! # Orbweaver CLI Library
//!
//! Loads JSON ontology documents, materializes them and answers reasoner
//! queries from the command line or an interactive session.

pub mod commands;
pub mod interactive;

pub use commands::*;
pub use interactive::*;
