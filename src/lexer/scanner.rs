use super::classifier::{self, Classification};
use super::position::Position;
use super::reassembler::Line;
use super::state::{LexerState, StateMachine};
use super::token::Token;
use super::words::{Segment, Segments};
use crate::config::{LexerConfig, StringWhitespace};
use crate::error::LexError;
use std::collections::VecDeque;

/// One lexical pass over a sequence of logical lines.
///
/// Lines must be fed in order, each exactly once, followed by a single call
/// to [`Scanner::finish`].
#[derive(Debug)]
pub struct Scanner {
    machine: StateMachine,
    string_whitespace: StringWhitespace,
    /// Whether at least one line has been scanned
    started: bool,
    /// Position just past the last scanned character
    end: Position,
}

impl Scanner {
    /// Creates a scanner for a fresh lexical pass
    pub fn new(config: &LexerConfig) -> Self {
        Scanner {
            machine: StateMachine::new(),
            string_whitespace: config.string_whitespace,
            started: false,
            end: Position::default(),
        }
    }

    /// The current mode of the state machine
    pub fn state(&self) -> &LexerState {
        self.machine.state()
    }

    /// Scans one logical line, appending finished tokens to `out`
    pub fn scan_line(&mut self, line: &Line, out: &mut VecDeque<Token>) -> Result<(), LexError> {
        if self.started {
            self.line_break();
        }
        self.started = true;
        tracing::debug!(line = line.number, mode = self.machine.state().name(), "scanning line");

        for segment in Segments::new(&line.text) {
            match segment {
                Segment::Blank(text) => {
                    if self.string_whitespace == StringWhitespace::Preserve {
                        self.machine.push_string_whitespace(text);
                    }
                }
                Segment::Word { column, text } => {
                    self.scan_word(Position::new(line.number, column), text, out)?;
                    if self.string_whitespace == StringWhitespace::Collapse {
                        self.machine.push_string_whitespace(" ");
                    }
                }
            }
        }

        self.end = Position::new(line.number, line.text.chars().count());
        Ok(())
    }

    /// Checks the terminal state once every line has been scanned
    pub fn finish(&mut self) -> Result<(), LexError> {
        self.machine.finish(self.end)
    }

    fn line_break(&mut self) {
        if self.string_whitespace == StringWhitespace::Preserve {
            self.machine.push_string_whitespace("\n");
        }
        self.machine.end_line();
    }

    fn scan_word(
        &mut self,
        start: Position,
        word: &str,
        out: &mut VecDeque<Token>,
    ) -> Result<(), LexError> {
        // Whole-word fast path for ordinary tokens
        if self.machine.is_idle() {
            if let Some(Classification { kind, payload }) = classifier::classify(word) {
                if kind.is_emittable() {
                    let token = Token::new(kind, payload, word, start);
                    tracing::trace!(token = %token, "token");
                    out.push_back(token);
                    return Ok(());
                }
            }
        }

        for (i, c) in word.chars().enumerate() {
            self.machine.feed(c, start.offset(i), out)?;
        }
        self.machine.end_word(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexErrorKind;
    use crate::lexer::token::{Payload, TokenKind};

    fn scan(lines: &[&str], config: &LexerConfig) -> Result<Vec<Token>, LexError> {
        let mut scanner = Scanner::new(config);
        let mut out = VecDeque::new();
        for (number, text) in lines.iter().enumerate() {
            let line = Line {
                number,
                text: text.to_string(),
            };
            scanner.scan_line(&line, &mut out)?;
        }
        scanner.finish()?;
        Ok(out.into_iter().collect())
    }

    #[test]
    fn test_fast_path_positions() {
        let tokens = scan(&["  var  x := 10"], &LexerConfig::default()).unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| t.position.column).collect();
        assert_eq!(positions, vec![2, 7, 9, 12]);
        assert_eq!(tokens[0].kind, TokenKind::Var);
    }

    #[test]
    fn test_string_whitespace_collapse() {
        let tokens = scan(&["s := \"a   b", "   c\""], &LexerConfig::default()).unwrap();
        let string = tokens.last().unwrap();
        assert_eq!(string.kind, TokenKind::Str);
        assert_eq!(string.payload, Some(Payload::Text("a b c".to_string())));
        assert_eq!(string.position, Position::new(0, 5));
    }

    #[test]
    fn test_string_whitespace_preserve() {
        let config = LexerConfig::default().with_string_whitespace(StringWhitespace::Preserve);
        let tokens = scan(&["s := \"a   b", "   c\""], &config).unwrap();
        assert_eq!(
            tokens.last().unwrap().payload,
            Some(Payload::Text("a   b\n   c".to_string()))
        );
    }

    #[test]
    fn test_quote_as_separate_word() {
        let tokens = scan(&["\" hello \""], &LexerConfig::default()).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].payload, Some(Payload::Text(" hello ".to_string())));
    }

    #[test]
    fn test_line_comment_reset_at_line_break() {
        let tokens = scan(&["x := 1 // rest := ignored", "y"], &LexerConfig::default()).unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Symbol,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Symbol
            ]
        );
        assert_eq!(tokens[3].position, Position::new(1, 0));
    }

    #[test]
    fn test_unterminated_comment_reports_end_of_input() {
        let err = scan(&["/* never", "closed"], &LexerConfig::default()).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.position, Position::new(1, 6));
    }
}
