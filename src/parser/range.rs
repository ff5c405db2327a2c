//! Range sub-parser: `lower,upper`.

use crate::{
    ast::{Range, Token},
    lexer::Lexer,
    parser::ParseError,
    value::Value,
};

/// Parse `bound , bound`, where a bound is a string or number. `nil`
/// leaves that side open.
pub fn parse(lexer: &mut Lexer) -> Result<Range, ParseError> {
    let lower = parse_bound(lexer)?;

    if *lexer.token() != Token::ListDelimiter {
        return Err(ParseError::unexpected(lexer));
    }
    lexer.advance()?;

    let upper = parse_bound(lexer)?;
    Ok(Range::new(lower, upper))
}

fn parse_bound(lexer: &mut Lexer) -> Result<Option<Value>, ParseError> {
    let bound = match lexer.token() {
        Token::String(s) => Some(Value::String(s.clone())),
        Token::Integer(n) => Some(Value::Integer(*n)),
        Token::Float(n) => Some(Value::Float(*n)),
        Token::Unknown(word) if word == "nil" => None,
        _ => return Err(ParseError::unexpected(lexer)),
    };
    lexer.advance()?;
    Ok(bound)
}
