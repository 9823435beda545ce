//! Reassembly of arbitrarily fragmented input into logical lines.

use std::collections::VecDeque;

/// A complete logical line, without its terminating newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line number (0-indexed)
    pub number: usize,
    /// Line contents
    pub text: String,
}

/// Turns a sequence of text fragments into a sequence of logical lines.
///
/// The trailing piece of every fragment is carried over, since the next
/// fragment may continue it. Line numbers therefore never depend on where
/// the transport happened to split the input.
#[derive(Debug, Default)]
pub struct LineAssembler {
    /// Trailing, possibly incomplete line of the previous fragment
    carry: String,
    /// Number of complete lines emitted so far
    next_line: usize,
    /// Set once `finish` has run
    finished: bool,
}

impl LineAssembler {
    /// Creates an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one fragment, appending every line it completes to `out`
    pub fn push(&mut self, fragment: &str, out: &mut VecDeque<Line>) {
        debug_assert!(!self.finished, "fragment pushed after finish");
        let mut pieces = fragment.split('\n');
        // `split` always yields at least one piece
        let mut current = match pieces.next() {
            Some(first) => {
                let mut line = std::mem::take(&mut self.carry);
                line.push_str(first);
                line
            }
            None => return,
        };
        for piece in pieces {
            out.push_back(Line {
                number: self.next_line,
                text: current,
            });
            self.next_line += 1;
            current = piece.to_string();
        }
        self.carry = current;
    }

    /// Flushes the carried-over text as the final logical line
    pub fn finish(&mut self) -> Line {
        self.finished = true;
        Line {
            number: self.next_line,
            text: std::mem::take(&mut self.carry),
        }
    }

    /// Number of the line currently being carried over
    pub fn current_line(&self) -> usize {
        self.next_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(fragments: &[&str]) -> Vec<(usize, String)> {
        let mut assembler = LineAssembler::new();
        let mut out = VecDeque::new();
        for fragment in fragments {
            assembler.push(fragment, &mut out);
        }
        out.push_back(assembler.finish());
        out.into_iter().map(|l| (l.number, l.text)).collect()
    }

    #[test]
    fn test_single_fragment() {
        assert_eq!(
            assemble(&["let\nin\nend"]),
            vec![
                (0, "let".to_string()),
                (1, "in".to_string()),
                (2, "end".to_string())
            ]
        );
    }

    #[test]
    fn test_line_split_across_fragments() {
        let expected = assemble(&["var x := 10\nx := x + 1\n"]);
        assert_eq!(assemble(&["var x :", "= 10\nx := x", " + 1\n"]), expected);
        assert_eq!(assemble(&["var x := 10", "\n", "x := x + 1\n"]), expected);
    }

    #[test]
    fn test_trailing_newline_yields_empty_final_line() {
        assert_eq!(
            assemble(&["a\n"]),
            vec![(0, "a".to_string()), (1, String::new())]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(assemble(&[]), vec![(0, String::new())]);
        assert_eq!(assemble(&["", ""]), vec![(0, String::new())]);
    }

    #[test]
    fn test_single_character_fragments() {
        let source = "ab\n\ncd";
        let chars: Vec<String> = source.chars().map(|c| c.to_string()).collect();
        let fragments: Vec<&str> = chars.iter().map(|s| s.as_str()).collect();
        assert_eq!(assemble(&fragments), assemble(&[source]));
    }
}
