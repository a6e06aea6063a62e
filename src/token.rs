use std::ops::Range;

/// Kind of a JSON token. Containers carry a child count; scalars do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    #[default]
    Primitive,
    String,
    Object,
    Array,
}

impl TokenKind {
    pub fn is_container(self) -> bool {
        matches!(self, TokenKind::Object | TokenKind::Array)
    }
}

/// Half-open byte range `[start, end)` into the source text.
///
/// For `String` tokens the range excludes the surrounding quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn as_range(self) -> Range<usize> {
        self.start..self.end
    }
}

/// One slot in the flat pre-order token sequence.
///
/// A container is immediately followed by the flattened pre-order traversal
/// of its children; there are no parent or child pointers. `children` counts
/// an object's key/value pairs or an array's elements. For a string in key
/// position, `children == 1` signals that a value subtree follows the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub children: usize,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            children: 0,
        }
    }

    /// Slice the source text covered by this token's span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.as_range()]
    }
}
