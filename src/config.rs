//! Lexer configuration

/// How whitespace between words is recorded inside a string literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringWhitespace {
    /// Every whitespace run (and every line break) becomes a single space
    #[default]
    Collapse,
    /// Whitespace runs and line breaks are kept exactly as written
    Preserve,
}

/// Configuration for a lexical pass
#[derive(Debug, Clone)]
pub struct LexerConfig {
    /// Bytes requested per read from reader-backed sources (default: 8 KiB)
    pub chunk_size: usize,
    /// Whitespace handling inside string literals (default: collapse)
    pub string_whitespace: StringWhitespace,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8 * 1024,
            string_whitespace: StringWhitespace::Collapse,
        }
    }
}

impl LexerConfig {
    /// Sets the read chunk size. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Sets whitespace handling inside string literals
    pub fn with_string_whitespace(mut self, mode: StringWhitespace) -> Self {
        self.string_whitespace = mode;
        self
    }

    /// Read size actually used by sources
    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}
