//! Evaluation of filters against records.
//!
//! Matching is pure: it reads the record through each clause's targets and
//! never mutates the tree or the record.

use std::cmp::Ordering;

use crate::{
    ast::{Clause, Comparison, Conjunction, Filter, Node, Predicate, Range},
    value::Value,
};

impl Filter {
    /// Evaluate the filter against `record`.
    ///
    /// Statements fold left to right. `and` narrows the running result. An
    /// `or` reached while the running result already holds ends evaluation
    /// with a match; otherwise the statement after it starts a fresh run.
    /// Groups are evaluated as a single operand.
    ///
    /// ```
    /// use spleen::Value;
    /// use std::collections::HashMap;
    ///
    /// let record = Value::Object(HashMap::from([
    ///     ("foo".to_string(), Value::Integer(1)),
    ///     ("bar".to_string(), Value::Integer(2)),
    /// ]));
    ///
    /// let filter = spleen::parse("/foo eq 1 and /bar eq 2").unwrap();
    /// assert!(filter.matches(&record));
    ///
    /// let filter = spleen::parse("/foo eq 9 or /bar eq 2 and /foo lt 0").unwrap();
    /// assert!(!filter.matches(&record));
    /// ```
    pub fn matches(&self, record: &Value) -> bool {
        let mut result = false;

        for statement in self.statements() {
            match statement.conjunctive {
                None => result = statement.value.matches(record),
                Some(Conjunction::And) => {
                    result = result && statement.value.matches(record);
                }
                Some(Conjunction::Or) => {
                    if result {
                        return true;
                    }
                    result = statement.value.matches(record);
                }
            }
        }
        result
    }
}

impl Node {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Node::Clause(clause) => clause.matches(record),
            Node::Group(filter) => filter.matches(record),
        }
    }
}

impl Clause {
    /// Evaluate this clause against `record`.
    ///
    /// A subject or object target missing from the record never satisfies a
    /// positive operator, so the negated operators hold for it.
    pub fn matches(&self, record: &Value) -> bool {
        let subject = self.subject_term().resolve(record);

        match self.predicate() {
            Predicate::Compare { comparison, object } => {
                compare(*comparison, subject, object.resolve(record))
            }
            Predicate::In { negated, values } => {
                let found = subject.is_some_and(|s| values.iter().any(|v| s.loose_eq(v)));
                found != *negated
            }
            Predicate::Between { negated, range } => {
                let within = subject.is_some_and(|s| range_contains(range, s));
                within != *negated
            }
            Predicate::Like { negated, pattern } => {
                let found = matches!(subject, Some(Value::String(s)) if pattern.is_match(s));
                found != *negated
            }
        }
    }
}

fn compare(comparison: Comparison, left: Option<&Value>, right: Option<&Value>) -> bool {
    let equal = match (left, right) {
        (Some(a), Some(b)) => a.loose_eq(b),
        (None, None) => true,
        _ => false,
    };

    let ordering = || left.zip(right).and_then(|(a, b)| a.compare(b));

    match comparison {
        Comparison::Eq => equal,
        Comparison::Neq => !equal,
        Comparison::Gt => ordering().is_some_and(Ordering::is_gt),
        Comparison::Gte => ordering().is_some_and(Ordering::is_ge),
        Comparison::Lt => ordering().is_some_and(Ordering::is_lt),
        Comparison::Lte => ordering().is_some_and(Ordering::is_le),
    }
}

/// Inclusive containment. A bound of a kind that does not order against the
/// value (number bound, string value) excludes it.
fn range_contains(range: &Range, value: &Value) -> bool {
    if !value.is_number() && !matches!(value, Value::String(_)) {
        return false;
    }

    let above_lower = range
        .lower
        .as_ref()
        .is_none_or(|lower| value.compare(lower).is_some_and(Ordering::is_ge));
    let below_upper = range
        .upper
        .as_ref()
        .is_none_or(|upper| value.compare(upper).is_some_and(Ordering::is_le));

    above_lower && below_upper
}
