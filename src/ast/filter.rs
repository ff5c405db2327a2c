use std::fmt;

use crate::{
    ast::{Clause, Conjunction},
    output::TextPrinter,
};

/// Content of one statement: a clause, or a parenthesized group.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Clause(Clause),
    Group(Filter),
}

/// One entry of a filter body.
///
/// `conjunctive` is the connective preceding this statement; it is `None`
/// exactly for the first statement of a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub value: Node,
    pub conjunctive: Option<Conjunction>,
}

/// Clauses and nested groups joined left to right by `and`/`or`.
///
/// A filter is never empty. `fields` holds every distinct target field the
/// filter references, nested groups included, in first-seen order.
///
/// ```
/// use spleen::{Clause, Filter, Target};
///
/// let foo = Target::from_json_pointer("/foo").unwrap();
/// let bar = Target::from_json_pointer("/bar").unwrap();
///
/// let filter = Filter::clause(Clause::subject(foo).eq().literal(1))
///     .and(Clause::subject(bar).neq().literal("a"));
/// assert_eq!(filter.to_string(), r#"/foo eq 1 and /bar neq "a""#);
/// assert_eq!(filter.fields(), ["/foo", "/bar"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    fields: Vec<String>,
    statements: Vec<Statement>,
}

impl Filter {
    /// Start a filter with a clause.
    pub fn clause(clause: Clause) -> Self {
        Filter::start(Node::Clause(clause))
    }

    /// Start a filter with a parenthesized group.
    pub fn group(group: Filter) -> Self {
        Filter::start(Node::Group(group))
    }

    pub(crate) fn start(node: Node) -> Self {
        let mut filter = Filter {
            fields: Vec::new(),
            statements: Vec::new(),
        };
        filter.push(None, node);
        filter
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.push(Some(Conjunction::And), Node::Clause(clause));
        self
    }

    pub fn or(mut self, clause: Clause) -> Self {
        self.push(Some(Conjunction::Or), Node::Clause(clause));
        self
    }

    pub fn and_group(mut self, group: Filter) -> Self {
        self.push(Some(Conjunction::And), Node::Group(group));
        self
    }

    pub fn or_group(mut self, group: Filter) -> Self {
        self.push(Some(Conjunction::Or), Node::Group(group));
        self
    }

    /// Append a statement. The conjunctive of the first statement is
    /// always dropped.
    pub(crate) fn push(&mut self, conjunctive: Option<Conjunction>, value: Node) {
        match &value {
            Node::Clause(clause) => {
                for target in clause.targets() {
                    self.add_field(target.field());
                }
            }
            Node::Group(group) => {
                for field in &group.fields {
                    self.add_field(field);
                }
            }
        }

        let conjunctive = if self.statements.is_empty() {
            None
        } else {
            conjunctive
        };
        self.statements.push(Statement { value, conjunctive });
    }

    fn add_field(&mut self, field: &str) {
        if !self.fields.iter().any(|f| f == field) {
            self.fields.push(field.to_string());
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Number of top-level statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Canonical filter text, optionally URL-encoded.
    pub fn to_text(&self, url_encode: bool) -> String {
        TextPrinter::new(url_encode).print_filter(self)
    }
}

impl From<Clause> for Filter {
    fn from(clause: Clause) -> Self {
        Filter::clause(clause)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}
