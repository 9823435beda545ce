//! The lexical state machine.
//!
//! One handler per mode. Each handler consumes a single character and
//! returns the next state together with at most one finished token. A
//! handler may also hand the character back unconsumed, in which case it is
//! dispatched again under the new state.

use super::classifier;
use super::position::Position;
use super::token::{Payload, Token, TokenKind};
use crate::error::{LexError, LexErrorKind};
use std::collections::VecDeque;

/// Current scanning mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexerState {
    /// Plain maximal-munch scanning
    #[default]
    Scanning,
    /// Inside a `//` comment; left only at the next line boundary
    InLineComment,
    /// Inside a (possibly nested) block comment
    InBlockComment {
        /// Number of currently open `/*` (always >= 1)
        depth: usize,
        /// Previous character of the current word, for `*/` and `/*` detection
        prev: Option<char>,
    },
    /// Inside a string literal
    InString {
        /// Raw, undecoded body accumulated so far
        buffer: String,
        /// Position of the opening quote
        opened_at: Position,
    },
}

impl LexerState {
    /// Short mode name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            LexerState::Scanning => "scanning",
            LexerState::InLineComment => "line-comment",
            LexerState::InBlockComment { .. } => "block-comment",
            LexerState::InString { .. } => "string",
        }
    }
}

/// The lexeme currently being extended by maximal munch
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    text: String,
    kind: TokenKind,
    start: Position,
}

/// Result of feeding one character to a mode handler
#[derive(Debug)]
struct Step {
    next: LexerState,
    emit: Option<Token>,
    consumed: bool,
}

impl Step {
    fn consume(next: LexerState) -> Self {
        Step {
            next,
            emit: None,
            consumed: true,
        }
    }

    fn emit(next: LexerState, token: Token) -> Self {
        Step {
            next,
            emit: Some(token),
            consumed: true,
        }
    }
}

/// Owns the lexer state of a single lexical pass
#[derive(Debug, Default)]
pub struct StateMachine {
    state: LexerState,
    pending: Option<Pending>,
}

impl StateMachine {
    /// Creates a machine in the `Scanning` state
    pub fn new() -> Self {
        Self::default()
    }

    /// The current mode
    pub fn state(&self) -> &LexerState {
        &self.state
    }

    /// Whether the machine is scanning with no partially built lexeme
    pub fn is_idle(&self) -> bool {
        self.state == LexerState::Scanning && self.pending.is_none()
    }

    /// Feeds the character `c` found at `pos`
    pub fn feed(
        &mut self,
        c: char,
        pos: Position,
        out: &mut VecDeque<Token>,
    ) -> Result<(), LexError> {
        loop {
            let step = match std::mem::take(&mut self.state) {
                LexerState::Scanning => scan_plain(&mut self.pending, c, pos)?,
                LexerState::InLineComment => Step::consume(LexerState::InLineComment),
                LexerState::InBlockComment { depth, prev } => scan_block_comment(depth, prev, c),
                LexerState::InString { buffer, opened_at } => scan_string(buffer, opened_at, c),
            };
            self.state = step.next;
            if let Some(token) = step.emit {
                out.push_back(token);
            }
            if step.consumed {
                return Ok(());
            }
        }
    }

    /// Signals that the characters of the current word are exhausted
    pub fn end_word(&mut self, out: &mut VecDeque<Token>) -> Result<(), LexError> {
        match &mut self.state {
            LexerState::Scanning => {
                let (next, emit) = close_pending(&mut self.pending)?;
                self.state = next;
                if let Some(token) = emit {
                    out.push_back(token);
                }
            }
            LexerState::InBlockComment { prev, .. } => *prev = None,
            LexerState::InLineComment | LexerState::InString { .. } => {}
        }
        Ok(())
    }

    /// Signals that a new logical line begins
    pub fn end_line(&mut self) {
        match &mut self.state {
            LexerState::InLineComment => {
                tracing::trace!("line comment closed by line break");
                self.state = LexerState::Scanning;
            }
            LexerState::InBlockComment { prev, .. } => *prev = None,
            LexerState::Scanning | LexerState::InString { .. } => {}
        }
    }

    /// Appends whitespace consumed by word splitting to an open string
    pub fn push_string_whitespace(&mut self, text: &str) {
        if let LexerState::InString { buffer, .. } = &mut self.state {
            buffer.push_str(text);
        }
    }

    /// Checks that input may end in the current state.
    ///
    /// `end` is the position just past the last character of the input.
    pub fn finish(&mut self, end: Position) -> Result<(), LexError> {
        match std::mem::take(&mut self.state) {
            LexerState::Scanning | LexerState::InLineComment => Ok(()),
            LexerState::InBlockComment { depth, .. } => Err(LexError::new(
                LexErrorKind::UnterminatedComment,
                format!("Unterminated block comment ({} still open)", depth),
                end,
            )),
            LexerState::InString { opened_at, .. } => Err(LexError::new(
                LexErrorKind::UnterminatedString,
                format!("Unterminated string literal opened at {}", opened_at),
                end,
            )),
        }
    }
}

fn scan_plain(pending: &mut Option<Pending>, c: char, pos: Position) -> Result<Step, LexError> {
    let unit = match pending {
        Some(unit) => unit,
        None => {
            let mut text = String::new();
            text.push(c);
            return match classifier::kind_of(&text) {
                Some(kind) => {
                    *pending = Some(Pending {
                        text,
                        kind,
                        start: pos,
                    });
                    Ok(Step::consume(LexerState::Scanning))
                }
                None => Err(LexError::malformed(
                    format!("Cannot build token from '{}'", text),
                    pos,
                )),
            };
        }
    };

    unit.text.push(c);
    if let Some(kind) = classifier::kind_of(&unit.text) {
        unit.kind = kind;
        return Ok(Step::consume(LexerState::Scanning));
    }
    unit.text.pop();

    // The lexeme ended one character ago
    let (next, emit) = close_pending(pending)?;
    Ok(Step {
        next,
        emit,
        consumed: false,
    })
}

/// Finishes the pending lexeme, either as a token or as a mode transition
fn close_pending(
    pending: &mut Option<Pending>,
) -> Result<(LexerState, Option<Token>), LexError> {
    let Pending { text, kind, start } = match pending.take() {
        Some(unit) => unit,
        None => return Ok((LexerState::Scanning, None)),
    };

    let next = match kind {
        TokenKind::LineComment => LexerState::InLineComment,
        TokenKind::OpenComment => LexerState::InBlockComment {
            depth: 1,
            prev: None,
        },
        TokenKind::Quote => LexerState::InString {
            buffer: String::new(),
            opened_at: start,
        },
        TokenKind::CloseComment => {
            return Err(LexError::malformed(
                "Unexpected '*/' outside of a block comment",
                start,
            ))
        }
        _ => {
            let payload = classifier::payload_for(kind, &text)
                .map_err(|message| LexError::malformed(message, start))?;
            let token = Token::new(kind, payload, text, start);
            tracing::trace!(token = %token, "token");
            return Ok((LexerState::Scanning, Some(token)));
        }
    };

    tracing::trace!(at = %start, mode = next.name(), "entering mode");
    Ok((next, None))
}

fn scan_block_comment(depth: usize, prev: Option<char>, c: char) -> Step {
    match (prev, c) {
        (Some('*'), '/') if depth == 1 => {
            tracing::trace!("block comment closed");
            Step::consume(LexerState::Scanning)
        }
        (Some('*'), '/') => Step::consume(LexerState::InBlockComment {
            depth: depth - 1,
            prev: None,
        }),
        (Some('/'), '*') => Step::consume(LexerState::InBlockComment {
            depth: depth + 1,
            prev: None,
        }),
        _ => Step::consume(LexerState::InBlockComment {
            depth,
            prev: Some(c),
        }),
    }
}

fn scan_string(mut buffer: String, opened_at: Position, c: char) -> Step {
    if c == '"' && !ends_with_escape(&buffer) {
        let lexeme = format!("\"{}\"", buffer);
        let token = Token::new(TokenKind::Str, Some(Payload::Text(buffer)), lexeme, opened_at);
        tracing::trace!(token = %token, "token");
        return Step::emit(LexerState::Scanning, token);
    }
    buffer.push(c);
    Step::consume(LexerState::InString { buffer, opened_at })
}

/// Whether the next character of `buffer` would be escaped
fn ends_with_escape(buffer: &str) -> bool {
    buffer.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds `word` as a single word on line 0 starting at column 0
    fn run_word(machine: &mut StateMachine, word: &str) -> Result<Vec<Token>, LexError> {
        let mut out = VecDeque::new();
        for (i, c) in word.chars().enumerate() {
            machine.feed(c, Position::new(0, i), &mut out)?;
        }
        machine.end_word(&mut out)?;
        Ok(out.into_iter().collect())
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_maximal_munch() {
        let mut machine = StateMachine::new();
        let tokens = run_word(&mut machine, "x:=y<=10").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Symbol,
                TokenKind::Assign,
                TokenKind::Symbol,
                TokenKind::Lte,
                TokenKind::Number
            ]
        );
        assert_eq!(tokens[1].position, Position::new(0, 1));
        assert_eq!(tokens[4].payload, Some(Payload::Integer(10)));
        assert!(machine.is_idle());
    }

    #[test]
    fn test_keyword_prefix_of_identifier() {
        let mut machine = StateMachine::new();
        let tokens = run_word(&mut machine, "to2;").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Symbol, TokenKind::Semicolon]);
        assert_eq!(tokens[0].lexeme, "to2");
    }

    #[test]
    fn test_nested_block_comment_depth() {
        let mut machine = StateMachine::new();
        let mut out = VecDeque::new();
        for (i, c) in "/*/*".chars().enumerate() {
            machine.feed(c, Position::new(0, i), &mut out).unwrap();
        }
        assert!(matches!(
            machine.state(),
            LexerState::InBlockComment { depth: 2, .. }
        ));
        for (i, c) in "*/*/".chars().enumerate() {
            machine.feed(c, Position::new(0, 4 + i), &mut out).unwrap();
        }
        assert_eq!(machine.state(), &LexerState::Scanning);
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_block_comment() {
        let mut machine = StateMachine::new();
        let tokens = run_word(&mut machine, "a/**/b").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Symbol, TokenKind::Symbol]);
        assert_eq!(tokens[1].position, Position::new(0, 5));
    }

    #[test]
    fn test_comment_lookback_cleared_between_words() {
        let mut machine = StateMachine::new();
        run_word(&mut machine, "/*").unwrap();
        run_word(&mut machine, "*").unwrap();
        run_word(&mut machine, "/").unwrap();
        assert!(matches!(
            machine.state(),
            LexerState::InBlockComment { depth: 1, .. }
        ));
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let mut machine = StateMachine::new();
        let tokens = run_word(&mut machine, r#""a\"b";"#).unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Str, TokenKind::Semicolon]);
        assert_eq!(tokens[0].payload, Some(Payload::Text(r#"a\"b"#.to_string())));
        assert_eq!(tokens[0].lexeme, r#""a\"b""#);
        assert_eq!(tokens[0].position, Position::new(0, 0));
    }

    #[test]
    fn test_escaped_backslash_does_not_escape_quote() {
        let mut machine = StateMachine::new();
        let tokens = run_word(&mut machine, r#""a\\"x"#).unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Str, TokenKind::Symbol]);
        assert_eq!(tokens[0].payload, Some(Payload::Text(r#"a\\"#.to_string())));
    }

    #[test]
    fn test_line_comment_until_line_end() {
        let mut machine = StateMachine::new();
        let tokens = run_word(&mut machine, "x//y").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Symbol]);
        assert_eq!(machine.state(), &LexerState::InLineComment);
        assert!(run_word(&mut machine, "z").unwrap().is_empty());
        machine.end_line();
        assert_eq!(machine.state(), &LexerState::Scanning);
    }

    #[test]
    fn test_word_that_is_only_a_marker() {
        let mut machine = StateMachine::new();
        assert!(run_word(&mut machine, "//").unwrap().is_empty());
        assert_eq!(machine.state(), &LexerState::InLineComment);

        let mut machine = StateMachine::new();
        assert!(run_word(&mut machine, "\"").unwrap().is_empty());
        assert!(matches!(machine.state(), LexerState::InString { .. }));
    }

    #[test]
    fn test_malformed_character() {
        let mut machine = StateMachine::new();
        let err = run_word(&mut machine, "ab!").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedToken);
        assert_eq!(err.position, Position::new(0, 2));
    }

    #[test]
    fn test_stray_close_comment() {
        let mut machine = StateMachine::new();
        let err = run_word(&mut machine, "a*/").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedToken);
        assert_eq!(err.position, Position::new(0, 1));
    }

    #[test]
    fn test_integer_overflow_is_malformed() {
        let mut machine = StateMachine::new();
        let err = run_word(&mut machine, "123456789012345678901234").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedToken);
        assert_eq!(err.position, Position::new(0, 0));
    }

    #[test]
    fn test_finish_in_each_state() {
        let end = Position::new(3, 7);

        let mut machine = StateMachine::new();
        assert!(machine.finish(end).is_ok());

        let mut machine = StateMachine::new();
        run_word(&mut machine, "//").unwrap();
        assert!(machine.finish(end).is_ok());

        let mut machine = StateMachine::new();
        run_word(&mut machine, "/*").unwrap();
        let err = machine.finish(end).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.position, end);

        let mut machine = StateMachine::new();
        run_word(&mut machine, "\"abc").unwrap();
        let err = machine.finish(end).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert!(err.message.contains("[1, 1]"));
    }

    #[test]
    fn test_ends_with_escape() {
        assert!(!ends_with_escape(""));
        assert!(ends_with_escape("a\\"));
        assert!(!ends_with_escape("a\\\\"));
        assert!(ends_with_escape("\\\\\\"));
    }
}
