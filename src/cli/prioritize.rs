//! Reorder spleen filters by field priority

use serde_json::json;

use super::CliError;
use crate::{Precedence, PrioritizeOptions, PrioritizeStrategy, Prioritized, Priority};

/// Where the priority list comes from
#[derive(Debug, Clone)]
pub enum StrategySource {
    /// Entries from the command line: `/target` or `label:/target`
    Priorities(Vec<String>),
    /// A JSON priority array or strategy object
    Json(String),
}

/// Options for the prioritize command
#[derive(Debug, Clone)]
pub struct PrioritizeCommand {
    pub filter: String,
    pub source: StrategySource,
    pub precedence: Option<Precedence>,
    /// Precedence from the environment; a strategy object's own settings win
    pub default_precedence: Option<Precedence>,
    pub match_all_labels: bool,
}

/// Execute a spleen prioritize operation
pub fn execute_prioritize(command: &PrioritizeCommand) -> Result<Prioritized, CliError> {
    let filter = crate::parse(&command.filter)?;
    let mut options = PrioritizeOptions {
        precedence: command.precedence.or(command.default_precedence),
        match_all_labels: command.match_all_labels.then_some(true),
    };

    let strategy = match &command.source {
        StrategySource::Priorities(entries) => {
            if entries.is_empty() {
                return Err(CliError::NoPriorities);
            }
            let priorities: Vec<Priority> = entries.iter().map(|e| parse_priority(e)).collect();
            PrioritizeStrategy::new(&priorities, options)?
        }
        StrategySource::Json(text) => {
            let priorities: serde_json::Value = serde_json::from_str(text)?;
            if command.precedence.is_none() && priorities.is_object() {
                options.precedence = None;
            }
            let options = options_to_json(&options);
            PrioritizeStrategy::from_json(&priorities, options.as_ref())?
        }
    };

    Ok(filter.prioritize_by(&strategy))
}

/// `label:/target` carries a label; anything starting with `/` is a bare
/// target.
fn parse_priority(entry: &str) -> Priority {
    if !entry.starts_with('/')
        && let Some((label, target)) = entry.split_once(':')
    {
        return Priority::Labeled {
            target: target.to_string(),
            label: label.to_string(),
        };
    }
    Priority::from(entry)
}

/// Only flags actually given on the command line become options.
fn options_to_json(options: &PrioritizeOptions) -> Option<serde_json::Value> {
    if *options == PrioritizeOptions::default() {
        return None;
    }

    let mut map = serde_json::Map::new();
    if let Some(precedence) = options.precedence {
        map.insert("precedence".to_string(), json!(precedence.to_string()));
    }
    if let Some(all) = options.match_all_labels {
        map.insert("matchAllLabels".to_string(), json!(all));
    }
    Some(serde_json::Value::Object(map))
}
