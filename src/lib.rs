//! Spleen: a boolean filter language over JSON-shaped records.
//!
//! Filter text is tokenized and parsed into a [`Filter`], which can be
//! matched against a [`Value`], printed back to canonical text, and reordered
//! by a [`PrioritizeStrategy`].
//!
//! ```
//! use spleen::Value;
//! use std::collections::HashMap;
//!
//! let filter = spleen::parse(r#"/name like "A*" and /age between 18,65"#).unwrap();
//!
//! let record = Value::Object(HashMap::from([
//!     ("name".to_string(), Value::from("Ada")),
//!     ("age".to_string(), Value::from(36)),
//! ]));
//! assert!(filter.matches(&record));
//! ```
pub mod ast;
pub mod lexer;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod prioritize;
pub mod target;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{
    Clause, Comparison, Conjunction, Filter, Like, Node, Operator, Predicate, Range,
    Statement, Term, Token,
};
pub use lexer::{LexError, Lexer, tokenize};
pub use output::TextPrinter;
pub use parser::{ParseError, Parser, parse};
pub use prioritize::{
    Precedence, PrioritizeOptions, PrioritizeStrategy, Prioritized, Priority, StrategyError,
    StrategyInput,
};
pub use target::{PathSegment, Target, TargetError};
pub use value::Value;
