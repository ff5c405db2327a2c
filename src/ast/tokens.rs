use crate::{ast::Operator, target::PathSegment};

/// A lexical token.
///
/// The lexer holds exactly one current token; nothing before it is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// No token: before the first advance, or input exhausted
    None,

    /// One path segment of a target
    ///
    /// `/foo/bar` is read as two consecutive target tokens.
    ///
    /// # Examples
    /// ```text
    /// /foo
    /// /items/0
    /// ```
    Target(PathSegment),

    /// String literal enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "say \"hi\""
    /// ```
    String(String),

    /// Integer, including `0x`, `0o`, `0b` forms
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0x2A
    /// -10
    /// ```
    Integer(i64),

    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1e3
    /// ```
    Float(f64),

    /// Boolean values
    Boolean(bool),

    /// Logical AND (`and`)
    And,

    /// Logical OR (`or`)
    Or,

    /// One of the twelve operator keywords
    ///
    /// # Examples
    /// ```text
    /// eq  neq  gt  gte  lt  lte
    /// in  nin  between  nbetween  like  nlike
    /// ```
    Operator(Operator),

    /// `(`
    OpenGroup,

    /// `)`
    CloseGroup,

    /// `[`
    OpenArray,

    /// `]`
    CloseArray,

    /// `,`
    ListDelimiter,

    /// Any other bare word, such as `nil`
    Unknown(String),
}

impl Token {
    /// Text of the token as it would appear in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::None => "end of input".to_string(),
            Token::Target(PathSegment::Key(key)) => format!("/{}", key),
            Token::Target(PathSegment::Index(n)) => format!("/{}", n),
            Token::String(s) => format!("\"{}\"", s),
            Token::Integer(n) => n.to_string(),
            Token::Float(n) => n.to_string(),
            Token::Boolean(b) => b.to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::Operator(op) => op.keyword().to_string(),
            Token::OpenGroup => "(".to_string(),
            Token::CloseGroup => ")".to_string(),
            Token::OpenArray => "[".to_string(),
            Token::CloseArray => "]".to_string(),
            Token::ListDelimiter => ",".to_string(),
            Token::Unknown(s) => s.clone(),
        }
    }
}
