use std::str::FromStr;

use thiserror::Error;

use crate::{
    ast::{Clause, Comparison, Conjunction, Filter, Like, Node, Operator, Predicate, Term, Token},
    lexer::{LexError, Lexer},
    value::Value,
};

pub mod operator;
pub mod path;
pub mod range;

/// Deepest group nesting the parser accepts.
pub const MAX_NESTING: usize = 128;

/// Errors raised while parsing filter text.
///
/// Every variant records the offending text (empty at end of input) and the
/// zero-based character offset where it was found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected token \"{value}\" at position {offset}")]
    UnexpectedToken { value: String, offset: usize },

    #[error("unexpected end of filter at position {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("unmatched ')' at position {offset}")]
    UnmatchedCloseGroup { offset: usize },

    #[error("unclosed '(' opened at position {offset}")]
    UnclosedGroup { offset: usize },

    #[error("groups nested deeper than {max} levels at position {offset}", max = MAX_NESTING)]
    NestingTooDeep { offset: usize },

    #[error("expected an operator, got \"{value}\" at position {offset}")]
    UnknownOperator { value: String, offset: usize },

    #[error("invalid like pattern \"{value}\" at position {offset}: {reason}")]
    InvalidPattern {
        value: String,
        offset: usize,
        reason: String,
    },
}

impl ParseError {
    /// Error for whatever token the lexer currently holds.
    pub(crate) fn unexpected(lexer: &Lexer) -> Self {
        let offset = lexer.token_offset();
        match lexer.token() {
            Token::None => ParseError::UnexpectedEnd { offset },
            token => ParseError::UnexpectedToken {
                value: token.describe(),
                offset,
            },
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.offset(),
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnexpectedEnd { offset }
            | ParseError::UnmatchedCloseGroup { offset }
            | ParseError::UnclosedGroup { offset }
            | ParseError::NestingTooDeep { offset }
            | ParseError::UnknownOperator { offset, .. }
            | ParseError::InvalidPattern { offset, .. } => *offset,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ParseError::Lex(e) => e.value(),
            ParseError::UnexpectedToken { value, .. }
            | ParseError::UnknownOperator { value, .. }
            | ParseError::InvalidPattern { value, .. } => value,
            ParseError::UnexpectedEnd { .. } => "",
            ParseError::UnmatchedCloseGroup { .. } => ")",
            ParseError::UnclosedGroup { .. } | ParseError::NestingTooDeep { .. } => "(",
        }
    }
}

/// Parse filter text into a [`Filter`].
///
/// Never panics: every malformed input, lexical or structural, comes back as
/// a [`ParseError`] and no partial tree is exposed. Groups nested deeper than
/// [`MAX_NESTING`] are rejected.
///
/// ```
/// let filter = spleen::parse(r#"/foo gt 42 and /bar neq "a?""#).unwrap();
/// assert_eq!(filter.to_string(), r#"/foo gt 42 and /bar neq "a?""#);
///
/// assert!(spleen::parse("(/foo eq 1 or /bar eq 2").is_err());
/// ```
pub fn parse(text: &str) -> Result<Filter, ParseError> {
    let result = Lexer::new(text)
        .map_err(ParseError::from)
        .and_then(Parser::new)
        .and_then(|mut parser| parser.parse());

    if let Err(e) = &result {
        tracing::debug!(offset = e.offset(), "failed to parse filter: {}", e);
    }
    result
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Recursive-descent parser over the lexer's token stream.
///
/// # Grammar
///
/// ```text
/// filter          ::= group_or_clause (("and" | "or") group_or_clause)*
/// group_or_clause ::= "(" filter ")" | clause
/// clause          ::= term operator object
/// term            ::= target | value
/// value           ::= string | number | boolean | "nil" | array
/// array           ::= "[" (literal ("," literal)*)? "]"
/// object          ::= term          (eq neq gt gte lt lte)
///                   | array         (in nin)
///                   | bound "," bound (between nbetween)
///                   | string        (like nlike)
/// ```
pub struct Parser {
    lexer: Lexer,
    depth: usize,
}

impl Parser {
    /// Wrap a lexer and read its first token.
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        lexer.advance()?;
        Ok(Parser { lexer, depth: 0 })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.lexer.advance()?;
        Ok(())
    }

    fn current(&self) -> &Token {
        self.lexer.token()
    }

    fn unexpected(&self) -> ParseError {
        ParseError::unexpected(&self.lexer)
    }

    /// Parse the complete input as one filter.
    pub fn parse(&mut self) -> Result<Filter, ParseError> {
        let filter = self.parse_filter()?;

        match self.current() {
            Token::None => Ok(filter),
            Token::CloseGroup => Err(ParseError::UnmatchedCloseGroup {
                offset: self.lexer.token_offset(),
            }),
            _ => Err(self.unexpected()),
        }
    }

    /// Statements up to the first token that is not a connective.
    fn parse_filter(&mut self) -> Result<Filter, ParseError> {
        let mut filter = Filter::start(self.parse_group_or_clause()?);

        loop {
            let conjunctive = match self.current() {
                Token::And => Conjunction::And,
                Token::Or => Conjunction::Or,
                _ => return Ok(filter),
            };
            self.advance()?;

            let node = self.parse_group_or_clause()?;
            filter.push(Some(conjunctive), node);
        }
    }

    fn parse_group_or_clause(&mut self) -> Result<Node, ParseError> {
        if *self.current() != Token::OpenGroup {
            return Ok(Node::Clause(self.parse_clause()?));
        }

        let open = self.lexer.token_offset();
        if self.depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep { offset: open });
        }
        self.advance()?; // Consume '('

        self.depth += 1;
        let group = self.parse_filter()?;
        self.depth -= 1;

        match self.current() {
            Token::CloseGroup => {
                self.advance()?;
                Ok(Node::Group(group))
            }
            Token::None => Err(ParseError::UnclosedGroup { offset: open }),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_clause(&mut self) -> Result<Clause, ParseError> {
        let subject = self.parse_term()?;

        let Some(operator) = operator::parse(&mut self.lexer, true)? else {
            return Err(self.unexpected());
        };

        let predicate = match operator {
            Operator::Eq => self.parse_comparison(Comparison::Eq)?,
            Operator::Neq => self.parse_comparison(Comparison::Neq)?,
            Operator::Gt => self.parse_comparison(Comparison::Gt)?,
            Operator::Gte => self.parse_comparison(Comparison::Gte)?,
            Operator::Lt => self.parse_comparison(Comparison::Lt)?,
            Operator::Lte => self.parse_comparison(Comparison::Lte)?,
            Operator::In | Operator::Nin => Predicate::In {
                negated: operator.is_negated(),
                values: self.parse_array()?,
            },
            Operator::Between | Operator::NBetween => Predicate::Between {
                negated: operator.is_negated(),
                range: range::parse(&mut self.lexer)?,
            },
            Operator::Like | Operator::NLike => Predicate::Like {
                negated: operator.is_negated(),
                pattern: self.parse_pattern()?,
            },
        };

        Ok(Clause::from_parts(subject, predicate))
    }

    fn parse_comparison(&mut self, comparison: Comparison) -> Result<Predicate, ParseError> {
        let object = self.parse_term()?;
        Ok(Predicate::Compare { comparison, object })
    }

    /// Target, literal or array.
    fn parse_term(&mut self) -> Result<Term, ParseError> {
        if let Some(target) = path::parse(&mut self.lexer, false)? {
            return Ok(Term::Target(target));
        }

        if *self.current() == Token::OpenArray {
            return Ok(Term::Literal(Value::Array(self.parse_array()?)));
        }
        Ok(Term::Literal(self.parse_literal()?))
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let value = match self.current() {
            Token::String(s) => Value::String(s.clone()),
            Token::Integer(n) => Value::Integer(*n),
            Token::Float(n) => Value::Float(*n),
            Token::Boolean(b) => Value::Boolean(*b),
            Token::Unknown(word) if word == "nil" => Value::Null,
            _ => return Err(self.unexpected()),
        };
        self.advance()?;
        Ok(value)
    }

    fn parse_array(&mut self) -> Result<Vec<Value>, ParseError> {
        if *self.current() != Token::OpenArray {
            return Err(self.unexpected());
        }
        self.advance()?; // Consume '['

        let mut values = vec![];
        if *self.current() == Token::CloseArray {
            self.advance()?;
            return Ok(values);
        }

        loop {
            values.push(self.parse_literal()?);

            match self.current() {
                Token::ListDelimiter => self.advance()?,
                Token::CloseArray => {
                    self.advance()?;
                    return Ok(values);
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_pattern(&mut self) -> Result<Like, ParseError> {
        let Token::String(text) = self.current() else {
            return Err(self.unexpected());
        };

        let like = Like::new(text.as_str()).map_err(|e| ParseError::InvalidPattern {
            value: text.clone(),
            offset: self.lexer.token_offset(),
            reason: e.to_string(),
        })?;
        self.advance()?;
        Ok(like)
    }
}
