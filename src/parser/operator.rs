//! Operator keyword sub-parser.

use crate::{
    ast::{Operator, Token},
    lexer::Lexer,
    parser::ParseError,
};

/// Read the current token as an operator and step past it.
///
/// When the token is not one of the twelve operators, strict mode fails with
/// [`ParseError::UnknownOperator`] and lenient mode returns `None` without
/// moving the lexer.
pub fn parse(lexer: &mut Lexer, strict: bool) -> Result<Option<Operator>, ParseError> {
    match lexer.token() {
        Token::Operator(op) => {
            let op = *op;
            lexer.advance()?;
            Ok(Some(op))
        }
        Token::None if strict => Err(ParseError::unexpected(lexer)),
        token if strict => Err(ParseError::UnknownOperator {
            value: token.describe(),
            offset: lexer.token_offset(),
        }),
        _ => Ok(None),
    }
}

/// Canonical keyword of the current token, or `"unknown"`.
pub fn keyword(lexer: &Lexer) -> &'static str {
    match lexer.token() {
        Token::Operator(op) => op.keyword(),
        _ => "unknown",
    }
}
