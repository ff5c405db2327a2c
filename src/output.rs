//! Canonical text output for filters.
//!
//! Printing a parsed filter yields text that parses back to the same tree.
//! Statements are joined by ` and ` / ` or `, groups are parenthesized,
//! strings are double-quoted, and reserved characters inside target
//! segments are backslash-escaped.
//!
//! # Features
//!
//! - **Plain output** via `to_string()` / `to_text(false)`
//! - **URL-encoded output** via `to_text(true)`, encoded with the same rules
//!   as JavaScript's `encodeURIComponent`, so spaces become `%20`
//!
//! # Examples
//!
//! ```
//! let filter = spleen::parse(r#"/name eq "Ann Lee" or (/age gt 30)"#).unwrap();
//!
//! assert_eq!(filter.to_text(false), r#"/name eq "Ann Lee" or (/age gt 30)"#);
//! assert_eq!(
//!     filter.to_text(true),
//!     "%2Fname%20eq%20%22Ann%20Lee%22%20or%20(%2Fage%20gt%2030)"
//! );
//! ```

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    ast::{Clause, Filter, Like, Node, Predicate, Range, Term},
    lexer::is_reserved,
    target::{PathSegment, Target},
    value::Value,
};

/// Characters `encodeURIComponent` leaves as they are.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub struct TextPrinter {
    url_encode: bool,
}

impl TextPrinter {
    pub fn new(url_encode: bool) -> Self {
        TextPrinter { url_encode }
    }

    pub fn print_filter(&self, filter: &Filter) -> String {
        self.finish(self.filter_text(filter))
    }

    pub fn print_clause(&self, clause: &Clause) -> String {
        self.finish(self.clause_text(clause))
    }

    pub fn print_term(&self, term: &Term) -> String {
        self.finish(self.term_text(term))
    }

    pub fn print_target(&self, target: &Target) -> String {
        self.finish(self.target_text(target))
    }

    pub fn print_range(&self, range: &Range) -> String {
        self.finish(self.range_text(range))
    }

    pub fn print_like(&self, like: &Like) -> String {
        self.finish(self.quote(like.pattern()))
    }

    fn finish(&self, text: String) -> String {
        if self.url_encode {
            utf8_percent_encode(&text, URI_COMPONENT).to_string()
        } else {
            text
        }
    }

    fn filter_text(&self, filter: &Filter) -> String {
        let mut result = String::new();

        for statement in filter.statements() {
            if let Some(conjunctive) = statement.conjunctive {
                result.push(' ');
                result.push_str(conjunctive.keyword());
                result.push(' ');
            }
            match &statement.value {
                Node::Clause(clause) => result.push_str(&self.clause_text(clause)),
                Node::Group(group) => {
                    result.push('(');
                    result.push_str(&self.filter_text(group));
                    result.push(')');
                }
            }
        }
        result
    }

    fn clause_text(&self, clause: &Clause) -> String {
        let object = match clause.predicate() {
            Predicate::Compare { object, .. } => self.term_text(object),
            Predicate::In { values, .. } => self.array_text(values),
            Predicate::Between { range, .. } => self.range_text(range),
            Predicate::Like { pattern, .. } => self.quote(pattern.pattern()),
        };

        format!(
            "{} {} {}",
            self.term_text(clause.subject_term()),
            clause.operator().keyword(),
            object
        )
    }

    fn term_text(&self, term: &Term) -> String {
        match term {
            Term::Target(target) => self.target_text(target),
            Term::Literal(value) => self.value_text(value),
        }
    }

    fn target_text(&self, target: &Target) -> String {
        if target.path().is_empty() {
            return "/".to_string();
        }

        let mut result = String::new();
        for segment in target.path() {
            result.push('/');
            match segment {
                PathSegment::Key(key) => result.push_str(&self.escape_segment(key)),
                PathSegment::Index(n) => result.push_str(&n.to_string()),
            }
        }
        result
    }

    fn value_text(&self, value: &Value) -> String {
        match value {
            Value::Null => "nil".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => float_text(*n),
            Value::String(s) => self.quote(s),
            Value::Array(arr) => self.array_text(arr),
            Value::Object(obj) => self.object_text(obj),
        }
    }

    fn array_text(&self, arr: &[Value]) -> String {
        let items: Vec<String> = arr.iter().map(|v| self.value_text(v)).collect();
        format!("[{}]", items.join(","))
    }

    /// Objects have no filter syntax; they print as sorted `{"key":value}`
    /// for diagnostics only.
    fn object_text(&self, obj: &HashMap<String, Value>) -> String {
        let mut keys: Vec<_> = obj.keys().collect();
        keys.sort();

        let items: Vec<String> = keys
            .into_iter()
            .map(|k| format!("{}:{}", self.quote(k), self.value_text(&obj[k])))
            .collect();
        format!("{{{}}}", items.join(","))
    }

    fn range_text(&self, range: &Range) -> String {
        let bound = |b: &Option<Value>| match b {
            Some(value) => self.value_text(value),
            None => "nil".to_string(),
        };
        format!("{},{}", bound(&range.lower), bound(&range.upper))
    }

    fn quote(&self, s: &str) -> String {
        format!("\"{}\"", self.escape_string(s))
    }

    fn escape_string(&self, s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            if c == '"' || c == '\\' {
                result.push('\\');
            }
            result.push(c);
        }
        result
    }

    fn escape_segment(&self, s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            if is_reserved(c) {
                result.push('\\');
            }
            result.push(c);
        }
        result
    }
}

/// Floats always keep a fraction or exponent so they read back as floats.
fn float_text(n: f64) -> String {
    if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{:?}", n)
    }
}
