use crate::SrcId;
use std::{fmt, ops::Range};

/// Character offsets `start..end` into one source text.
///
/// Offsets count `char`s, not bytes, which is what the lexer stream and
/// ariadne's `Source` both index by.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    src: SrcId,
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(src: SrcId, range: Range<usize>) -> Self {
        assert!(range.start <= range.end, "inverted span {:?}", range);
        Self {
            src,
            start: range.start,
            end: range.end,
        }
    }

    /// The single character at offset `idx`
    pub fn char_at(src: SrcId, idx: usize) -> Self {
        Self::new(src, idx..idx + 1)
    }

    /// Empty span just past the last character of `text`; errors about a
    /// missing `.` or `)` point here.
    pub fn end_of(src: SrcId, text: &str) -> Self {
        let len = text.chars().count();
        Self::new(src, len..len)
    }

    pub fn src(&self) -> SrcId {
        self.src
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Pair every character of `text` with its one-character span
pub(crate) fn spanned_chars(text: &str, src: SrcId) -> impl Iterator<Item = (char, Span)> + '_ {
    text.chars()
        .enumerate()
        .map(move |(idx, ch)| (ch, Span::char_at(src, idx)))
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.src, self.start, self.end)
    }
}

impl chumsky::Span for Span {
    type Context = SrcId;
    type Offset = usize;

    fn new(src: SrcId, range: Range<usize>) -> Self {
        Span::new(src, range)
    }

    fn context(&self) -> SrcId {
        self.src
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

// Parse errors go straight into ariadne labels.
impl ariadne::Span for Span {
    type SourceId = SrcId;

    fn source(&self) -> &SrcId {
        &self.src
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}
