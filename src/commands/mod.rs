//! CLI command implementations for procmem-api.
//!
//! This module provides implementations for all CLI subcommands:
//! - `parse`: Offline smaps parsing
//! - `check`: System validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod parse;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use parse::command_parse;
