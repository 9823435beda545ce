use super::position::Position;
use serde::Serialize;

/// A single token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Value carried by identifiers, numbers and strings
    pub payload: Option<Payload>,
    /// Exact source text of the token (strings keep their quotes)
    pub lexeme: String,
    /// Position of the token's first character
    pub position: Position,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(
        kind: TokenKind,
        payload: Option<Payload>,
        lexeme: impl Into<String>,
        position: Position,
    ) -> Self {
        Token {
            kind,
            payload,
            lexeme: lexeme.into(),
            position,
        }
    }
}

/// `<KindName>(<payload>) at [<line>, <column>]`, payload omitted when absent
impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({}) at {}", self.kind, payload, self.position),
            None => write!(f, "{} at {}", self.kind, self.position),
        }
    }
}

/// Data attached to a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Value of an integer literal
    Integer(i64),
    /// Identifier name or raw (undecoded) string literal body
    Text(String),
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Payload::Integer(n) => write!(f, "{}", n),
            Payload::Text(s) => write!(f, "{}", s),
        }
    }
}

/// All lexical kinds of the Tiger language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Punctuation
    /// Point (.)
    Point,
    /// Colon (:)
    Colon,
    /// Assignment operator (:=)
    Assign,
    /// Comma delimiter
    Comma,
    /// Semicolon delimiter
    Semicolon,
    /// Left parenthesis (
    OpenParen,
    /// Right parenthesis )
    CloseParen,
    /// Left bracket [
    OpenBracket,
    /// Right bracket ]
    CloseBracket,
    /// Left brace {
    OpenBraces,
    /// Right brace }
    CloseBraces,

    // Operators
    /// Logical AND operator (&)
    Ampersand,
    /// Logical OR operator (|)
    Pipe,
    /// Equality operator (=)
    Equals,
    /// Less than operator (<)
    Lt,
    /// Less than or equal operator (<=)
    Lte,
    /// Greater than operator (>)
    Gt,
    /// Greater than or equal operator (>=)
    Gte,
    /// Inequality operator (<>)
    Neq,
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Times operator (*)
    Times,
    /// Division operator (/)
    Div,

    // Keywords
    /// TYPE keyword
    Type,
    /// ARRAY keyword
    Array,
    /// OF keyword
    Of,
    /// VAR keyword
    Var,
    /// FUNCTION keyword
    Function,
    /// LET keyword
    Let,
    /// IN keyword
    In,
    /// END keyword
    End,
    /// IF keyword
    If,
    /// THEN keyword
    Then,
    /// ELSE keyword
    Else,
    /// WHILE keyword
    While,
    /// DO keyword
    Do,
    /// FOR keyword
    For,
    /// TO keyword
    To,
    /// BREAK keyword
    Break,
    /// NIL keyword
    Nil,

    // Literals
    /// Identifier
    Symbol,
    /// String literal
    Str,
    /// Integer literal
    Number,

    // Structural markers, never emitted
    /// Block comment opener (/*)
    OpenComment,
    /// Block comment closer (*/)
    CloseComment,
    /// Line comment marker (//)
    LineComment,
    /// Opening quote of a string literal (")
    Quote,
}

impl TokenKind {
    /// Whether tokens of this kind are handed to the consumer.
    ///
    /// Structural markers only drive scanner mode transitions.
    pub fn is_emittable(&self) -> bool {
        !matches!(
            self,
            TokenKind::OpenComment
                | TokenKind::CloseComment
                | TokenKind::LineComment
                | TokenKind::Quote
        )
    }

    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Type
                | TokenKind::Array
                | TokenKind::Of
                | TokenKind::Var
                | TokenKind::Function
                | TokenKind::Let
                | TokenKind::In
                | TokenKind::End
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::To
                | TokenKind::Break
                | TokenKind::Nil
        )
    }

    /// Name used in the diagnostic display format
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Point => "Point",
            TokenKind::Colon => "Colon",
            TokenKind::Assign => "Assign",
            TokenKind::Comma => "Comma",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::OpenParen => "OpenParen",
            TokenKind::CloseParen => "CloseParen",
            TokenKind::OpenBracket => "OpenBracket",
            TokenKind::CloseBracket => "CloseBracket",
            TokenKind::OpenBraces => "OpenBraces",
            TokenKind::CloseBraces => "CloseBraces",
            TokenKind::Ampersand => "Ampersand",
            TokenKind::Pipe => "Pipe",
            TokenKind::Equals => "Equals",
            TokenKind::Lt => "Lt",
            TokenKind::Lte => "Lte",
            TokenKind::Gt => "Gt",
            TokenKind::Gte => "Gte",
            TokenKind::Neq => "Neq",
            TokenKind::Plus => "Plus",
            TokenKind::Minus => "Minus",
            TokenKind::Times => "Times",
            TokenKind::Div => "Div",
            TokenKind::Type => "Type",
            TokenKind::Array => "Array",
            TokenKind::Of => "Of",
            TokenKind::Var => "Var",
            TokenKind::Function => "Function",
            TokenKind::Let => "Let",
            TokenKind::In => "In",
            TokenKind::End => "End",
            TokenKind::If => "If",
            TokenKind::Then => "Then",
            TokenKind::Else => "Else",
            TokenKind::While => "While",
            TokenKind::Do => "Do",
            TokenKind::For => "For",
            TokenKind::To => "To",
            TokenKind::Break => "Break",
            TokenKind::Nil => "Nil",
            TokenKind::Symbol => "Symbol",
            TokenKind::Str => "Str",
            TokenKind::Number => "Number",
            TokenKind::OpenComment => "OpenComment",
            TokenKind::CloseComment => "CloseComment",
            TokenKind::LineComment => "LineComment",
            TokenKind::Quote => "Quote",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
