//! Target sub-parser: consecutive target tokens form one path.

use crate::{
    ast::Token,
    lexer::Lexer,
    parser::ParseError,
    target::{PathSegment, Target},
};

/// Collect target tokens into a [`Target`].
///
/// Only segments written back to back belong to one path; whitespace ends
/// it. Stops on the first token that does not continue the path and leaves
/// the lexer there. A lone `/` is the root target. With no target token at
/// all, strict mode fails and lenient mode returns `None`.
pub fn parse(lexer: &mut Lexer, strict: bool) -> Result<Option<Target>, ParseError> {
    let mut path = Vec::new();
    let mut end = None;

    while let Token::Target(segment) = lexer.token() {
        if end.is_some_and(|end| end != lexer.token_offset()) {
            break;
        }
        path.push(segment.clone());
        end = Some(lexer.token_end());
        lexer.advance()?;
    }

    if path.is_empty() {
        if strict {
            return Err(ParseError::unexpected(lexer));
        }
        return Ok(None);
    }
    if path == [PathSegment::Key(String::new())] {
        return Ok(Some(Target::root()));
    }
    Ok(Some(Target::new(path)))
}
