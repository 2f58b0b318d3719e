//! Command-line interface
//!
//! Offline helpers around the client core: settings inspection, input
//! validation, display formatting and cost estimation.

pub mod commands;

pub use commands::{Command, Opt};
