/// A byte range into the source text handed to a [`Parser`](crate::Parser).
///
/// Every slice a token owns (its original stream, delimiters, processed
/// content and remaining stream) is a `Span` into the same source, so a
/// closed token can always be reconstructed by slicing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-length span positioned at `at`.
    #[inline]
    pub const fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Returns the length of this span.
    ///
    /// Inverted spans (`end < start`) clamp to `0`.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first `len` bytes of this span.
    #[inline]
    pub fn prefix(&self, len: usize) -> Self {
        Self::new(self.start, (self.start + len).min(self.end))
    }

    /// Everything from `offset` (relative to `start`) to the end.
    #[inline]
    pub fn skip(&self, offset: usize) -> Self {
        Self::new((self.start + offset).min(self.end), self.end)
    }

    /// Join two spans into one covering both regions.
    #[inline]
    pub fn join(&self, other: &Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Slices `source` by this span.
    ///
    /// Spans produced by the scanner always fall on `char` boundaries of the
    /// source they were produced for.
    #[inline]
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_skip_partition() {
        let span = Span::new(3, 10);
        let (head, tail) = (span.prefix(4), span.skip(4));
        assert_eq!(head, Span::new(3, 7));
        assert_eq!(tail, Span::new(7, 10));
        assert_eq!(head.len() + tail.len(), span.len());
    }

    #[test]
    fn test_prefix_and_skip_clamp() {
        let span = Span::new(3, 5);
        assert_eq!(span.prefix(10), span);
        assert!(span.skip(10).is_empty());
        assert_eq!(span.skip(10).start, 5);
    }

    #[test]
    fn test_inverted_span_is_empty() {
        assert!(Span::new(10, 5).is_empty());
    }

    #[test]
    fn test_slice() {
        assert_eq!(Span::new(1, 3).slice("a<<b"), "<<");
        assert_eq!(Span::empty(4).slice("a<<b"), "");
    }
}
