//! Reordering filters by field priority.
//!
//! A [`PrioritizeStrategy`] ranks record fields, typically in the order an
//! index or storage engine prefers to read them. Prioritizing a filter sorts
//! the statements of every priority group by the best rank of the fields
//! they reference, leaving unranked statements last.
//!
//! The precedence connective splits a statement list into priority groups.
//! With the default `or` precedence, `/a eq 1 and /b eq 2 or /c eq 3` has the
//! groups `[/a, /b]` and `[/c]`, and only the first group can be reordered.
//!
//! ```
//! use spleen::{Priority, StrategyInput};
//!
//! let filter = spleen::parse("/bar eq 1 and /foo eq 0").unwrap();
//! let priorities = [Priority::from("/foo"), Priority::from("/bar")];
//!
//! let result = filter.prioritize(StrategyInput::Priorities(&priorities), None).unwrap();
//! assert_eq!(result.filter.to_string(), "/foo eq 0 and /bar eq 1");
//! ```

use std::{collections::HashMap, fmt, str::FromStr};

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::{
    ast::{Clause, Conjunction, Filter, Node},
    target::{Target, TargetError},
};

/// Errors raised for malformed priority strategies.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("priorities must be an array, got {found}")]
    NotAnArray { found: String },

    #[error("priority at index {index} must be a non-empty string or a {{target, label}} object")]
    InvalidPriority { index: usize },

    #[error("priority at index {index} is not a valid target: {source}")]
    InvalidTarget {
        index: usize,
        #[source]
        source: TargetError,
    },

    #[error("options must be an object, got {found}")]
    InvalidOptions { found: String },

    #[error("precedence must be \"and\" or \"or\", got {value}")]
    InvalidPrecedence { value: String },

    #[error("matchAllLabels must be a boolean, got {value}")]
    InvalidMatchAllLabels { value: String },

    #[error("a prebuilt strategy cannot be combined with separate options")]
    AmbiguousOptions,
}

/// The connective that separates priority groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precedence {
    And,
    #[default]
    Or,
}

impl Precedence {
    /// Connective joining priority groups.
    pub fn primary(self) -> Conjunction {
        match self {
            Precedence::And => Conjunction::And,
            Precedence::Or => Conjunction::Or,
        }
    }

    /// Connective joining statements inside a priority group.
    pub fn secondary(self) -> Conjunction {
        self.primary().opposite()
    }
}

impl FromStr for Precedence {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Precedence::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Precedence::Or)
        } else {
            Err(StrategyError::InvalidPrecedence {
                value: format!("\"{}\"", s),
            })
        }
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary().keyword())
    }
}

/// One entry of a priority list: a target pointer, optionally under a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Priority {
    Target(String),
    Labeled { target: String, label: String },
}

impl Priority {
    pub fn target(&self) -> &str {
        match self {
            Priority::Target(target) | Priority::Labeled { target, .. } => target,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Priority::Target(_) => None,
            Priority::Labeled { label, .. } => Some(label),
        }
    }
}

impl From<&str> for Priority {
    fn from(target: &str) -> Self {
        Priority::Target(target.to_string())
    }
}

impl From<String> for Priority {
    fn from(target: String) -> Self {
        Priority::Target(target)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrioritizeOptions {
    /// Defaults to [`Precedence::Or`].
    pub precedence: Option<Precedence>,
    /// Defaults to `false`.
    pub match_all_labels: Option<bool>,
}

/// Rank and labels of one prioritized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityEntry {
    pub order: usize,
    pub labels: Vec<String>,
}

/// The fields grouped under one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    pub label: String,
    pub targets: Vec<String>,
}

impl LabelEntry {
    pub fn count(&self) -> usize {
        self.targets.len()
    }
}

/// A validated, immutable field ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrioritizeStrategy {
    order: HashMap<String, PriorityEntry>,
    labels: Vec<LabelEntry>,
    precedence: Precedence,
    match_all_labels: bool,
}

impl PrioritizeStrategy {
    /// Build a strategy from an ordered priority list.
    ///
    /// Each distinct field gets the rank of its first occurrence. Targets are
    /// JSON pointers and rank by their field, so `/items/0/id` ranks
    /// `/items`.
    pub fn new(priorities: &[Priority], options: PrioritizeOptions) -> Result<Self, StrategyError> {
        let mut order: HashMap<String, PriorityEntry> = HashMap::new();
        let mut labels: Vec<LabelEntry> = Vec::new();

        for (index, priority) in priorities.iter().enumerate() {
            let field = field_of(index, priority.target())?;

            let next = order.len();
            let entry = order.entry(field.clone()).or_insert_with(|| PriorityEntry {
                order: next,
                labels: Vec::new(),
            });

            let Some(label) = priority.label() else {
                continue;
            };
            if label.is_empty() {
                return Err(StrategyError::InvalidPriority { index });
            }
            if !entry.labels.iter().any(|l| l == label) {
                entry.labels.push(label.to_string());
            }

            match labels.iter_mut().find(|l| l.label == label) {
                Some(existing) => {
                    if !existing.targets.contains(&field) {
                        existing.targets.push(field);
                    }
                }
                None => labels.push(LabelEntry {
                    label: label.to_string(),
                    targets: vec![field],
                }),
            }
        }

        let strategy = PrioritizeStrategy {
            order,
            labels,
            precedence: options.precedence.unwrap_or_default(),
            match_all_labels: options.match_all_labels.unwrap_or(false),
        };

        tracing::debug!(
            fields = strategy.order.len(),
            labels = strategy.labels.len(),
            precedence = %strategy.precedence,
            "built priority strategy"
        );
        Ok(strategy)
    }

    /// Build a strategy from untyped JSON input.
    ///
    /// `priorities` is either an array of target strings and
    /// `{"target", "label"}` objects, or a whole strategy object
    /// `{"priorities": [...], "precedence": "and", "matchAllLabels": true}`.
    /// A whole strategy object may not be combined with `options`.
    ///
    /// ```
    /// use serde_json::json;
    /// use spleen::{Precedence, PrioritizeStrategy};
    ///
    /// let strategy = PrioritizeStrategy::from_json(
    ///     &json!(["/foo", {"target": "/bar", "label": "ids"}]),
    ///     Some(&json!({"precedence": "AND"})),
    /// )
    /// .unwrap();
    /// assert_eq!(strategy.rank("/bar"), Some(1));
    /// assert_eq!(strategy.precedence(), Precedence::And);
    /// ```
    pub fn from_json(
        priorities: &JsonValue,
        options: Option<&JsonValue>,
    ) -> Result<Self, StrategyError> {
        let options = options.filter(|o| !o.is_null());

        if let JsonValue::Object(map) = priorities
            && let Some(list) = map.get("priorities")
        {
            if options.is_some() {
                return Err(StrategyError::AmbiguousOptions);
            }
            return PrioritizeStrategy::from_json(list, Some(priorities));
        }

        let JsonValue::Array(items) = priorities else {
            return Err(StrategyError::NotAnArray {
                found: json_kind(priorities).to_string(),
            });
        };

        let list = items
            .iter()
            .enumerate()
            .map(|(index, item)| priority_from_json(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        let options = match options {
            Some(value) => options_from_json(value)?,
            None => PrioritizeOptions::default(),
        };
        PrioritizeStrategy::new(&list, options)
    }

    /// Rank of `field`, if it was prioritized.
    pub fn rank(&self, field: &str) -> Option<usize> {
        self.order.get(field).map(|entry| entry.order)
    }

    pub fn entry(&self, field: &str) -> Option<&PriorityEntry> {
        self.order.get(field)
    }

    /// Labels in first-seen order.
    pub fn labels(&self) -> &[LabelEntry] {
        &self.labels
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn match_all_labels(&self) -> bool {
        self.match_all_labels
    }

    /// Best rank among the clause's subject and object targets.
    pub fn clause_rank(&self, clause: &Clause) -> Option<usize> {
        clause.targets().filter_map(|t| self.rank(t.field())).min()
    }

    /// Labels satisfied by a set of referenced fields.
    fn satisfied_labels(&self, fields: &[String]) -> Vec<String> {
        let referenced = |target: &String| fields.contains(target);

        self.labels
            .iter()
            .filter(|entry| {
                if self.match_all_labels {
                    entry.targets.iter().all(referenced)
                } else {
                    entry.targets.iter().any(referenced)
                }
            })
            .map(|entry| entry.label.clone())
            .collect()
    }
}

fn field_of(index: usize, target: &str) -> Result<String, StrategyError> {
    if target.is_empty() {
        return Err(StrategyError::InvalidPriority { index });
    }
    let target = Target::from_json_pointer(target)
        .map_err(|source| StrategyError::InvalidTarget { index, source })?;
    Ok(target.field().to_string())
}

fn priority_from_json(index: usize, item: &JsonValue) -> Result<Priority, StrategyError> {
    let invalid = || StrategyError::InvalidPriority { index };

    match item {
        JsonValue::String(target) => Ok(Priority::Target(target.clone())),
        JsonValue::Object(map) => {
            let target = map.get("target").and_then(JsonValue::as_str).ok_or_else(invalid)?;
            match map.get("label") {
                None | Some(JsonValue::Null) => Ok(Priority::Target(target.to_string())),
                Some(JsonValue::String(label)) => Ok(Priority::Labeled {
                    target: target.to_string(),
                    label: label.clone(),
                }),
                Some(_) => Err(invalid()),
            }
        }
        _ => Err(invalid()),
    }
}

fn options_from_json(value: &JsonValue) -> Result<PrioritizeOptions, StrategyError> {
    let JsonValue::Object(map) = value else {
        return Err(StrategyError::InvalidOptions {
            found: json_kind(value).to_string(),
        });
    };

    let precedence = match map.get("precedence") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s.parse()?),
        Some(other) => {
            return Err(StrategyError::InvalidPrecedence {
                value: other.to_string(),
            });
        }
    };

    let match_all_labels = match map.get("matchAllLabels") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::Bool(b)) => Some(*b),
        Some(other) => {
            return Err(StrategyError::InvalidMatchAllLabels {
                value: other.to_string(),
            });
        }
    };

    Ok(PrioritizeOptions {
        precedence,
        match_all_labels,
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Where a prioritization takes its strategy from.
#[derive(Debug, Clone, Copy)]
pub enum StrategyInput<'a> {
    Priorities(&'a [Priority]),
    Strategy(&'a PrioritizeStrategy),
}

/// Result of prioritizing a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Prioritized {
    pub filter: Filter,
    /// Strategy labels satisfied by the filter's fields, in label order.
    pub labels: Vec<String>,
}

impl Filter {
    /// Reorder this filter by field priority. The filter itself is left
    /// untouched.
    ///
    /// Options apply only to a priority list; passing them alongside a built
    /// strategy is [`StrategyError::AmbiguousOptions`].
    pub fn prioritize(
        &self,
        input: StrategyInput<'_>,
        options: Option<PrioritizeOptions>,
    ) -> Result<Prioritized, StrategyError> {
        match input {
            StrategyInput::Strategy(_) if options.is_some() => Err(StrategyError::AmbiguousOptions),
            StrategyInput::Strategy(strategy) => Ok(self.prioritize_by(strategy)),
            StrategyInput::Priorities(priorities) => {
                let strategy = PrioritizeStrategy::new(priorities, options.unwrap_or_default())?;
                Ok(self.prioritize_by(&strategy))
            }
        }
    }

    pub fn prioritize_by(&self, strategy: &PrioritizeStrategy) -> Prioritized {
        let (filter, best) = prioritize_filter(self, strategy);
        tracing::debug!(best = ?best, "prioritized filter");

        Prioritized {
            labels: strategy.satisfied_labels(self.fields()),
            filter,
        }
    }
}

/// A statement waiting to be rebuilt, with its rank at this level.
type Ranked = (Node, Option<usize>);

/// Prioritize one level, returning the rebuilt filter and the best rank
/// found anywhere inside it.
fn prioritize_filter(filter: &Filter, strategy: &PrioritizeStrategy) -> (Filter, Option<usize>) {
    let primary = strategy.precedence.primary();
    let mut groups: Vec<Vec<Ranked>> = Vec::new();
    let mut best = None;

    for statement in filter.statements() {
        let (node, rank) = match &statement.value {
            Node::Clause(clause) => (Node::Clause(clause.clone()), strategy.clause_rank(clause)),
            Node::Group(group) => {
                let (group, rank) = prioritize_filter(group, strategy);
                (Node::Group(group), rank)
            }
        };
        best = [best, rank].into_iter().flatten().min();

        match groups.last_mut() {
            Some(group) if statement.conjunctive != Some(primary) => {
                add_to_priority_group(group, node, rank);
            }
            _ => groups.push(vec![(node, rank)]),
        }
    }

    tracing::trace!(
        statements = filter.len(),
        groups = groups.len(),
        best = ?best,
        "prioritized level"
    );

    let secondary = primary.opposite();
    let mut nodes = groups.into_iter().flat_map(|group| {
        group.into_iter().enumerate().map(move |(i, (node, _))| {
            let conjunctive = if i == 0 { primary } else { secondary };
            (conjunctive, node)
        })
    });

    let Some((_, first)) = nodes.next() else {
        return (filter.clone(), best);
    };
    let mut rebuilt = Filter::start(first);
    for (conjunctive, node) in nodes {
        rebuilt.push(Some(conjunctive), node);
    }
    (rebuilt, best)
}

/// Insert after every statement ranked the same or better, so equal ranks
/// keep their original order and unranked statements stay last.
fn add_to_priority_group(group: &mut Vec<Ranked>, node: Node, rank: Option<usize>) {
    let sorts_after = |existing: Option<usize>| match (existing, rank) {
        (Some(existing), Some(rank)) => existing > rank,
        (None, Some(_)) => true,
        _ => false,
    };

    let position = group
        .iter()
        .position(|(_, existing)| sorts_after(*existing))
        .unwrap_or(group.len());
    group.insert(position, (node, rank));
}
