//! Whitespace splitting of a logical line.

/// A maximal run of either whitespace or non-whitespace characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A whitespace-delimited word starting at `column`
    Word {
        /// Character offset of the word's first character
        column: usize,
        /// The word itself
        text: &'a str,
    },
    /// A run of whitespace between (or around) words
    Blank(&'a str),
}

/// Iterator over the segments of one line.
///
/// Columns are character offsets, so a run of several spaces or a tab
/// advances them by its exact length.
pub struct Segments<'a> {
    line: &'a str,
    /// Byte offset of the next unread character
    offset: usize,
    /// Character offset of the next unread character
    column: usize,
}

impl<'a> Segments<'a> {
    /// Creates a segment iterator over `line`
    pub fn new(line: &'a str) -> Self {
        Segments {
            line,
            offset: 0,
            column: 0,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let rest = &self.line[self.offset..];
        let first = rest.chars().next()?;
        let blank = first.is_whitespace();

        let mut len = 0;
        let mut chars = 0;
        for c in rest.chars() {
            if c.is_whitespace() != blank {
                break;
            }
            len += c.len_utf8();
            chars += 1;
        }

        let text = &rest[..len];
        let column = self.column;
        self.offset += len;
        self.column += chars;

        if blank {
            Some(Segment::Blank(text))
        } else {
            Some(Segment::Word { column, text })
        }
    }
}
