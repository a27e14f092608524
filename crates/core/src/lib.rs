//! Shared domain types for the status-hooks workspace: observed conditions,
//! emitted conditions and events, errors and configuration.

pub mod condition;
pub mod config;
pub mod error;
pub mod output;

pub use condition::*;
pub use config::Config;
pub use error::*;
pub use output::*;
