//! CLI support for spleen
//!
//! Provides programmatic access to the `spleen` commands so other tools can
//! embed them.

mod check;
mod convert;
mod docs;
mod prioritize;

pub use check::{CheckOptions, CheckResult, execute_check, execute_format};
pub use convert::{json_to_value, value_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use prioritize::{PrioritizeCommand, StrategySource, execute_prioritize};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Invalid strategy: {0}")]
    Strategy(#[from] crate::StrategyError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("No priorities provided. Use --priority or --strategy.")]
    NoPriorities,

    #[error("Unknown category: '{0}'\nRun 'spleen docs' to see available categories.")]
    UnknownCategory(String),
}
