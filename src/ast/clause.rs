use std::fmt;

use regex::Regex;

use crate::{ast::Operator, output::TextPrinter, target::Target, value::Value};

/// Subject or object of a comparison: a target read from the record, or a
/// literal carried in the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Target(Target),
    Literal(Value),
}

impl Term {
    /// Resolve against a record. A target that misses yields `None`.
    pub fn resolve<'a>(&'a self, record: &'a Value) -> Option<&'a Value> {
        match self {
            Term::Target(target) => target.get(record),
            Term::Literal(value) => Some(value),
        }
    }

    pub fn as_target(&self) -> Option<&Target> {
        match self {
            Term::Target(target) => Some(target),
            Term::Literal(_) => None,
        }
    }
}

impl From<Target> for Term {
    fn from(target: Target) -> Self {
        Term::Target(target)
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Literal(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TextPrinter::new(false).print_term(self))
    }
}

/// Inclusive range used by `between`/`nbetween`.
///
/// A `None` bound leaves that side open. Number bounds only contain
/// numbers and string bounds only contain strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub lower: Option<Value>,
    pub upper: Option<Value>,
}

impl Range {
    pub fn new(lower: Option<Value>, upper: Option<Value>) -> Self {
        Range { lower, upper }
    }

    pub fn to_text(&self, url_encode: bool) -> String {
        TextPrinter::new(url_encode).print_range(self)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

/// Wildcard search pattern used by `like`/`nlike`.
///
/// `*` matches any run of characters and `_` exactly one. A backslash makes
/// the following character literal. The whole subject must match.
///
/// ```
/// use spleen::Like;
///
/// let like = Like::new("ab*_z").unwrap();
/// assert!(like.is_match("abcdxyz"));
/// assert!(!like.is_match("abz"));
/// ```
#[derive(Debug, Clone)]
pub struct Like {
    pattern: String,
    regex: Regex,
}

impl Like {
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = compile_pattern(&pattern)?;
        Ok(Like { pattern, regex })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn to_text(&self, url_encode: bool) -> String {
        TextPrinter::new(url_encode).print_like(self)
    }
}

impl PartialEq for Like {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl fmt::Display for Like {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::from("(?s)^");
    let mut literal = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => literal.push(chars.next().unwrap_or('\\')),
            '*' | '_' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }

    source.push_str(&regex::escape(&literal));
    source.push('$');
    Regex::new(&source)
}

/// Comparison operators, the family whose object is a value or target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn operator(self) -> Operator {
        match self {
            Comparison::Eq => Operator::Eq,
            Comparison::Neq => Operator::Neq,
            Comparison::Gt => Operator::Gt,
            Comparison::Gte => Operator::Gte,
            Comparison::Lt => Operator::Lt,
            Comparison::Lte => Operator::Lte,
        }
    }
}

/// Operator together with the object its family requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `eq neq gt gte lt lte` followed by a value or target
    Compare { comparison: Comparison, object: Term },

    /// `in` / `nin` followed by an array of literals
    In { negated: bool, values: Vec<Value> },

    /// `between` / `nbetween` followed by `lower,upper`
    Between { negated: bool, range: Range },

    /// `like` / `nlike` followed by a string pattern
    Like { negated: bool, pattern: Like },
}

impl Predicate {
    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Compare { comparison, .. } => comparison.operator(),
            Predicate::In { negated: false, .. } => Operator::In,
            Predicate::In { negated: true, .. } => Operator::Nin,
            Predicate::Between { negated: false, .. } => Operator::Between,
            Predicate::Between { negated: true, .. } => Operator::NBetween,
            Predicate::Like { negated: false, .. } => Operator::Like,
            Predicate::Like { negated: true, .. } => Operator::NLike,
        }
    }
}

/// A single subject-operator-object comparison.
///
/// Clauses are only produced complete, either by the parser or through the
/// builder chain started by [`Clause::subject`]:
///
/// ```
/// use spleen::{Clause, Target, Value};
///
/// let clause = Clause::subject(Target::from_json_pointer("/age").unwrap())
///     .gte()
///     .literal(18);
/// assert_eq!(clause.to_string(), "/age gte 18");
///
/// let clause = Clause::subject(Target::from_json_pointer("/tag").unwrap())
///     .in_()
///     .array(vec![Value::from("a"), Value::from("b")]);
/// assert_eq!(clause.to_string(), r#"/tag in ["a","b"]"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    subject: Term,
    predicate: Predicate,
}

impl Clause {
    /// Start building a clause from its subject.
    pub fn subject(subject: impl Into<Term>) -> OperatorStep {
        OperatorStep {
            subject: subject.into(),
        }
    }

    pub(crate) fn from_parts(subject: Term, predicate: Predicate) -> Self {
        Clause { subject, predicate }
    }

    pub fn subject_term(&self) -> &Term {
        &self.subject
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn operator(&self) -> Operator {
        self.predicate.operator()
    }

    /// The object when it is a term, i.e. for comparison operators.
    pub fn object_term(&self) -> Option<&Term> {
        match &self.predicate {
            Predicate::Compare { object, .. } => Some(object),
            _ => None,
        }
    }

    /// Targets referenced as subject or object, subject first.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.subject
            .as_target()
            .into_iter()
            .chain(self.object_term().and_then(Term::as_target))
    }

    pub fn to_text(&self, url_encode: bool) -> String {
        TextPrinter::new(url_encode).print_clause(self)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

/// Builder state after the subject: choose the operator.
#[derive(Debug, Clone)]
pub struct OperatorStep {
    subject: Term,
}

impl OperatorStep {
    fn compare(self, comparison: Comparison) -> CompareStep {
        CompareStep {
            subject: self.subject,
            comparison,
        }
    }

    pub fn eq(self) -> CompareStep {
        self.compare(Comparison::Eq)
    }

    pub fn neq(self) -> CompareStep {
        self.compare(Comparison::Neq)
    }

    pub fn gt(self) -> CompareStep {
        self.compare(Comparison::Gt)
    }

    pub fn gte(self) -> CompareStep {
        self.compare(Comparison::Gte)
    }

    pub fn lt(self) -> CompareStep {
        self.compare(Comparison::Lt)
    }

    pub fn lte(self) -> CompareStep {
        self.compare(Comparison::Lte)
    }

    pub fn in_(self) -> ArrayStep {
        ArrayStep {
            subject: self.subject,
            negated: false,
        }
    }

    pub fn nin(self) -> ArrayStep {
        ArrayStep {
            subject: self.subject,
            negated: true,
        }
    }

    pub fn between(self) -> RangeStep {
        RangeStep {
            subject: self.subject,
            negated: false,
        }
    }

    pub fn nbetween(self) -> RangeStep {
        RangeStep {
            subject: self.subject,
            negated: true,
        }
    }

    pub fn like(self) -> PatternStep {
        PatternStep {
            subject: self.subject,
            negated: false,
        }
    }

    pub fn nlike(self) -> PatternStep {
        PatternStep {
            subject: self.subject,
            negated: true,
        }
    }
}

/// Builder state after a comparison operator.
#[derive(Debug, Clone)]
pub struct CompareStep {
    subject: Term,
    comparison: Comparison,
}

impl CompareStep {
    pub fn term(self, object: impl Into<Term>) -> Clause {
        Clause::from_parts(
            self.subject,
            Predicate::Compare {
                comparison: self.comparison,
                object: object.into(),
            },
        )
    }

    pub fn target(self, target: Target) -> Clause {
        self.term(target)
    }

    pub fn literal(self, value: impl Into<Value>) -> Clause {
        self.term(value.into())
    }
}

/// Builder state after `in`/`nin`.
#[derive(Debug, Clone)]
pub struct ArrayStep {
    subject: Term,
    negated: bool,
}

impl ArrayStep {
    pub fn array(self, values: Vec<Value>) -> Clause {
        Clause::from_parts(
            self.subject,
            Predicate::In {
                negated: self.negated,
                values,
            },
        )
    }
}

/// Builder state after `between`/`nbetween`.
#[derive(Debug, Clone)]
pub struct RangeStep {
    subject: Term,
    negated: bool,
}

impl RangeStep {
    pub fn range(self, lower: Option<Value>, upper: Option<Value>) -> Clause {
        Clause::from_parts(
            self.subject,
            Predicate::Between {
                negated: self.negated,
                range: Range::new(lower, upper),
            },
        )
    }
}

/// Builder state after `like`/`nlike`.
#[derive(Debug, Clone)]
pub struct PatternStep {
    subject: Term,
    negated: bool,
}

impl PatternStep {
    pub fn pattern(self, pattern: Like) -> Clause {
        Clause::from_parts(
            self.subject,
            Predicate::Like {
                negated: self.negated,
                pattern,
            },
        )
    }
}
