//! Validate spleen filters and run them against JSON input

use super::{CliError, json_to_value, value_to_json};
use crate::Value;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter text
    pub filter: String,
    /// JSON input string
    pub input: Option<String>,
    /// Only validate syntax, don't match
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed; holds the canonical filter text
    SyntaxValid(String),
    /// The input was a single record
    Matched(bool),
    /// The input was an array of records; holds the ones that matched
    Filtered(serde_json::Value),
}

/// Execute a spleen check operation.
///
/// An object (or scalar) input is matched as one record. An array input is
/// treated as a list of records and filtered.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let filter = crate::parse(&options.filter)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(filter.to_string()));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;

    match json_to_value(json_value) {
        Value::Array(records) => {
            let kept: Vec<serde_json::Value> = records
                .iter()
                .filter(|record| filter.matches(record))
                .map(value_to_json)
                .collect();
            tracing::debug!(total = records.len(), matched = kept.len(), "filtered records");
            Ok(CheckResult::Filtered(serde_json::Value::Array(kept)))
        }
        record => {
            tracing::debug!(kind = record.type_name(), "matching single record");
            Ok(CheckResult::Matched(filter.matches(&record)))
        }
    }
}

/// Parse a filter and print it back in canonical form.
pub fn execute_format(filter: &str, url_encode: bool) -> Result<String, CliError> {
    Ok(crate::parse(filter)?.to_text(url_encode))
}
