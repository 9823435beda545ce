use serde::Serialize;

/// A zero-indexed line/column coordinate in the source text.
///
/// Columns count characters, not bytes. The [`Display`](std::fmt::Display)
/// form is one-indexed, e.g. `[1, 1]` for the very first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl Position {
    /// Creates a new position
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    /// Returns the position `n` characters further along the same line
    pub fn offset(self, n: usize) -> Self {
        Position {
            line: self.line,
            column: self.column + n,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.line + 1, self.column + 1)
    }
}
