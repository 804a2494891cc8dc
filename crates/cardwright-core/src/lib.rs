//! Shared plumbing for the cardwright crates: error types, configuration
//! loading and logging bootstrap.

pub mod config;
pub mod error;
pub mod logging;
