//! Classification of candidate lexemes.
//!
//! Every pattern lives in one ordered table. Several candidates match more
//! than one pattern (`for` is both a keyword and an identifier, `:=` starts
//! with `:`), and the earliest entry in the table always wins.

use super::token::{Payload, TokenKind};
use lazy_static::lazy_static;
use regex::RegexSet;

/// Patterns in priority order. Two-character punctuation precedes its
/// one-character prefix, keywords precede the identifier pattern.
const PATTERNS: &[(TokenKind, &str)] = &[
    // Two-character punctuation and markers
    (TokenKind::Assign, r"^:=$"),
    (TokenKind::Lte, r"^<=$"),
    (TokenKind::Neq, r"^<>$"),
    (TokenKind::Gte, r"^>=$"),
    (TokenKind::OpenComment, r"^/\*$"),
    (TokenKind::CloseComment, r"^\*/$"),
    (TokenKind::LineComment, r"^//$"),
    // One-character punctuation
    (TokenKind::Point, r"^\.$"),
    (TokenKind::Colon, r"^:$"),
    (TokenKind::Comma, r"^,$"),
    (TokenKind::Semicolon, r"^;$"),
    (TokenKind::OpenParen, r"^\($"),
    (TokenKind::CloseParen, r"^\)$"),
    (TokenKind::OpenBracket, r"^\[$"),
    (TokenKind::CloseBracket, r"^\]$"),
    (TokenKind::OpenBraces, r"^\{$"),
    (TokenKind::CloseBraces, r"^\}$"),
    (TokenKind::Ampersand, r"^&$"),
    (TokenKind::Pipe, r"^\|$"),
    (TokenKind::Equals, r"^=$"),
    (TokenKind::Lt, r"^<$"),
    (TokenKind::Gt, r"^>$"),
    (TokenKind::Plus, r"^\+$"),
    (TokenKind::Minus, r"^-$"),
    (TokenKind::Times, r"^\*$"),
    (TokenKind::Div, r"^/$"),
    (TokenKind::Quote, r#"^"$"#),
    // Keywords
    (TokenKind::Type, r"^type$"),
    (TokenKind::Array, r"^array$"),
    (TokenKind::Of, r"^of$"),
    (TokenKind::Var, r"^var$"),
    (TokenKind::Function, r"^function$"),
    (TokenKind::Let, r"^let$"),
    (TokenKind::In, r"^in$"),
    (TokenKind::End, r"^end$"),
    (TokenKind::If, r"^if$"),
    (TokenKind::Then, r"^then$"),
    (TokenKind::Else, r"^else$"),
    (TokenKind::While, r"^while$"),
    (TokenKind::Do, r"^do$"),
    (TokenKind::For, r"^for$"),
    (TokenKind::To, r"^to$"),
    (TokenKind::Break, r"^break$"),
    (TokenKind::Nil, r"^nil$"),
    // Generic patterns
    (TokenKind::Number, r"^[0-9]+$"),
    (TokenKind::Symbol, r"^[a-zA-Z_][a-zA-Z0-9_]*$"),
    (TokenKind::Str, r#"(?s)^"(?:[^"\\]|\\.)*"$"#),
];

lazy_static! {
    static ref MATCHERS: RegexSet = RegexSet::new(PATTERNS.iter().map(|(_, pattern)| *pattern))
        .expect("lexeme patterns are valid regular expressions");
}

/// Outcome of classifying a candidate lexeme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The matched kind
    pub kind: TokenKind,
    /// Extracted payload, if the kind carries one
    pub payload: Option<Payload>,
}

/// Returns the kind of `candidate`, ignoring payloads.
///
/// This is the cheap check used while extending a maximal-munch buffer.
pub fn kind_of(candidate: &str) -> Option<TokenKind> {
    if candidate.is_empty() {
        return None;
    }
    MATCHERS
        .matches(candidate)
        .iter()
        .next()
        .map(|index| PATTERNS[index].0)
}

/// Classifies a candidate lexeme into at most one kind plus its payload.
///
/// Digit runs too large for an `i64` do not classify.
pub fn classify(candidate: &str) -> Option<Classification> {
    let kind = kind_of(candidate)?;
    let payload = payload_for(kind, candidate).ok()?;
    Some(Classification { kind, payload })
}

/// Extracts the payload of a lexeme already known to be of `kind`.
///
/// Fails only for integer literals that overflow `i64`.
pub fn payload_for(kind: TokenKind, lexeme: &str) -> Result<Option<Payload>, String> {
    match kind {
        TokenKind::Number => lexeme
            .parse::<i64>()
            .map(|n| Some(Payload::Integer(n)))
            .map_err(|_| format!("Integer literal '{}' is out of range", lexeme)),
        TokenKind::Symbol => Ok(Some(Payload::Text(lexeme.to_string()))),
        TokenKind::Str => {
            let body = &lexeme[1..lexeme.len() - 1];
            Ok(Some(Payload::Text(body.to_string())))
        }
        _ => Ok(None),
    }
}
