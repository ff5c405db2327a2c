use thiserror::Error;

use crate::{
    ast::{Operator, Token},
    target::PathSegment,
    value::{Value, parse_number},
};

/// Errors raised while scanning filter text. Offsets are zero-based
/// character positions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("filter text is empty")]
    EmptyInput,

    #[error("unterminated string literal \"{value}\" starting at position {offset}")]
    UnterminatedString { value: String, offset: usize },

    #[error("dangling escape at position {offset}")]
    DanglingEscape { value: String, offset: usize },

    #[error("unexpected character '{character}' after \"{value}\" at position {offset}")]
    IllegalCharacter {
        character: char,
        value: String,
        offset: usize,
    },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::EmptyInput => 0,
            LexError::UnterminatedString { offset, .. }
            | LexError::DanglingEscape { offset, .. }
            | LexError::IllegalCharacter { offset, .. } => *offset,
        }
    }

    /// The raw text accumulated when the error was raised.
    pub fn value(&self) -> &str {
        match self {
            LexError::EmptyInput => "",
            LexError::UnterminatedString { value, .. }
            | LexError::DanglingEscape { value, .. }
            | LexError::IllegalCharacter { value, .. } => value,
        }
    }
}

/// Type of the token being accumulated within one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Target,
    String,
    Unknown,
}

/// Single-pass scanner over filter text.
///
/// Each [`advance`](Lexer::advance) scans forward from the cursor and sets
/// the current [`token`](Lexer::token). Structural punctuation ends the
/// token in front of it without being consumed, so it is read as its own
/// token on the next call.
///
/// ```
/// use spleen::{Lexer, Token};
///
/// let mut lexer = Lexer::new("true)").unwrap();
/// assert!(lexer.advance().unwrap());
/// assert_eq!(lexer.token(), &Token::Boolean(true));
/// assert_eq!(lexer.position(), 4);
///
/// assert!(!lexer.advance().unwrap());
/// assert_eq!(lexer.token(), &Token::CloseGroup);
/// assert!(lexer.is_end());
/// ```
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    started: bool,
    token: Token,
    token_start: usize,
    token_end: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Result<Self, LexError> {
        if input.is_empty() {
            return Err(LexError::EmptyInput);
        }
        Ok(Lexer {
            input: input.chars().collect(),
            position: 0,
            started: false,
            token: Token::None,
            token_start: 0,
            token_end: 0,
        })
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Offset where the current token starts.
    pub fn token_offset(&self) -> usize {
        self.token_start
    }

    /// Offset just past the current token's text, before any whitespace
    /// that ended it.
    pub fn token_end(&self) -> usize {
        self.token_end
    }

    /// Zero-based character offset of the cursor.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// No `advance` has been made yet.
    pub fn is_start(&self) -> bool {
        !self.started
    }

    /// Scan the next token.
    ///
    /// Returns `true` when a token was produced and input may remain, and
    /// `false` once the input is exhausted. A final token ending exactly at
    /// the end of input is still set as the current token when `false` is
    /// returned; the token is [`Token::None`] if nothing was left to read.
    pub fn advance(&mut self) -> Result<bool, LexError> {
        self.started = true;
        self.token = Token::None;

        let mut value = String::new();
        let mut pending = Pending::None;
        let mut escaping = false;

        while let Some(ch) = self.current_char() {
            if pending == Pending::None && !escaping {
                self.token_start = self.position;
            }
            if escaping {
                escaping = false;
                if pending == Pending::None {
                    pending = Pending::Unknown;
                }
                value.push(ch);
                self.position += 1;
                continue;
            }

            match ch {
                '\\' => {
                    escaping = true;
                    self.position += 1;
                }
                '"' => match pending {
                    Pending::None => {
                        pending = Pending::String;
                        self.position += 1;
                    }
                    Pending::String => {
                        self.position += 1;
                        self.token_end = self.position;
                        self.token = Token::String(value);
                        return Ok(!self.is_end());
                    }
                    Pending::Target | Pending::Unknown => {
                        return Err(self.illegal(ch, value));
                    }
                },
                _ if pending == Pending::String => {
                    value.push(ch);
                    self.position += 1;
                }
                '/' => match pending {
                    Pending::None => {
                        pending = Pending::Target;
                        self.position += 1;
                    }
                    // Left in place: it opens the next segment.
                    Pending::Target => {
                        self.token_end = self.position;
                        self.token = Token::Target(PathSegment::from_text(&value));
                        return Ok(true);
                    }
                    Pending::String | Pending::Unknown => {
                        return Err(self.illegal(ch, value));
                    }
                },
                '(' | ')' | '[' | ']' | ',' => {
                    if pending == Pending::None {
                        self.position += 1;
                        self.token_end = self.position;
                        self.token = punctuation(ch);
                        return Ok(!self.is_end());
                    }
                    self.token_end = self.position;
                    self.token = finish(pending, value);
                    return Ok(true);
                }
                c if is_whitespace(c) => {
                    if pending != Pending::None {
                        self.token_end = self.position;
                        self.position += 1;
                        self.token = finish(pending, value);
                        return Ok(!self.is_end());
                    }
                    self.position += 1;
                }
                _ => {
                    if pending == Pending::None {
                        pending = Pending::Unknown;
                    }
                    value.push(ch);
                    self.position += 1;
                }
            }
        }

        if escaping {
            return Err(LexError::DanglingEscape {
                value,
                offset: self.position - 1,
            });
        }

        self.token_end = self.position;
        match pending {
            Pending::None => self.token_start = self.position,
            Pending::String => {
                return Err(LexError::UnterminatedString {
                    value,
                    offset: self.token_start,
                });
            }
            Pending::Target | Pending::Unknown => self.token = finish(pending, value),
        }
        Ok(false)
    }

    fn illegal(&self, character: char, value: String) -> LexError {
        LexError::IllegalCharacter {
            character,
            value,
            offset: self.position,
        }
    }
}

/// Scan `input` to the end and collect every token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input)?;
    let mut tokens = Vec::new();
    loop {
        let more = lexer.advance()?;
        if *lexer.token() != Token::None {
            tokens.push(lexer.token().clone());
        }
        if !more {
            return Ok(tokens);
        }
    }
}

fn punctuation(ch: char) -> Token {
    match ch {
        '(' => Token::OpenGroup,
        ')' => Token::CloseGroup,
        '[' => Token::OpenArray,
        ']' => Token::CloseArray,
        _ => Token::ListDelimiter,
    }
}

fn finish(pending: Pending, value: String) -> Token {
    match pending {
        Pending::Target => Token::Target(PathSegment::from_text(&value)),
        _ => analyze(value),
    }
}

/// Keyword analysis of a bare word: booleans, connectives, operators and
/// numbers get their own token types, anything else stays `Unknown`.
pub fn analyze(text: String) -> Token {
    match text.as_str() {
        "true" => return Token::Boolean(true),
        "false" => return Token::Boolean(false),
        "and" => return Token::And,
        "or" => return Token::Or,
        _ => {}
    }

    if let Ok(op) = text.parse::<Operator>() {
        return Token::Operator(op);
    }

    match parse_number(&text) {
        Some(Value::Integer(n)) => Token::Integer(n),
        Some(Value::Float(n)) => Token::Float(n),
        _ => Token::Unknown(text),
    }
}

/// Space separators and invisible format characters that separate tokens.
pub fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | '\0'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{180E}'
            | '\u{2000}'..='\u{200D}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{2060}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Characters that must be escaped to appear inside a bare token.
pub fn is_reserved(ch: char) -> bool {
    is_whitespace(ch) || matches!(ch, '\\' | '"' | '/' | '(' | ')' | '[' | ']' | ',')
}

#[test]
fn test_keywords() {
    let tokens = tokenize("and or true false between").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::And,
            Token::Or,
            Token::Boolean(true),
            Token::Boolean(false),
            Token::Operator(Operator::Between),
        ]
    );
}

#[test]
fn test_clause() {
    let mut lexer = Lexer::new("/foo/0 gt 42").unwrap();
    assert!(lexer.is_start());
    assert!(lexer.advance().unwrap());
    assert_eq!(lexer.token(), &Token::Target(PathSegment::Key("foo".into())));
    assert!(lexer.advance().unwrap());
    assert_eq!(lexer.token(), &Token::Target(PathSegment::Index(0)));
    assert!(lexer.advance().unwrap());
    assert_eq!(lexer.token(), &Token::Operator(Operator::Gt));
    assert!(!lexer.advance().unwrap());
    assert_eq!(lexer.token(), &Token::Integer(42));
    assert!(!lexer.advance().unwrap());
    assert_eq!(lexer.token(), &Token::None);
}

#[test]
fn test_token_end() {
    let mut lexer = Lexer::new("/foo/bar  /baz").unwrap();
    lexer.advance().unwrap();
    assert_eq!((lexer.token_offset(), lexer.token_end()), (0, 4));
    lexer.advance().unwrap();
    assert_eq!((lexer.token_offset(), lexer.token_end()), (4, 8));
    lexer.advance().unwrap();
    assert_eq!((lexer.token_offset(), lexer.token_end()), (10, 14));
}
