//! # Spleen Filter Language - Expression Tree
//!
//! This module defines the tree produced by parsing spleen filter text and
//! consumed by matching, serialization and prioritization.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Clause operators and the `and`/`or` connectives
//! - **[clause]** - Subject-operator-object clauses and their builder
//! - **[filter]** - Filters: statements joined by connectives, with groups
//!
//! ## Quick Start
//!
//! ```text
//! /status eq "active" and (/age gte 18 or /guardian neq nil)
//! ```
//!
//! ## Core Concepts
//!
//! ### Targets
//!
//! A target is a path into the record, written as slash-separated segments.
//! Numeric segments index arrays:
//!
//! ```text
//! /orders/0/total
//! ```
//!
//! ### Operator Families
//!
//! - **Comparison** `eq neq gt gte lt lte` - value or target object
//! - **Membership** `in nin` - array object, `[1, 2, "three"]`
//! - **Range** `between nbetween` - `lower,upper`, inclusive
//! - **Pattern** `like nlike` - string with `*` and `_` wildcards
//!
//! ### Connectives
//!
//! Statements are read left to right. An `or` reached while everything so
//! far already holds ends evaluation with a match, so each `or` separates a
//! run of `and`-joined statements. Parentheses nest a whole filter as one
//! statement.
pub mod clause;
pub mod filter;
pub mod operators;
pub mod tokens;

pub use clause::{
    ArrayStep, Clause, CompareStep, Comparison, Like, OperatorStep, PatternStep, Predicate,
    Range, RangeStep, Term,
};
pub use filter::{Filter, Node, Statement};
pub use operators::{Conjunction, Operator};
pub use tokens::Token;
