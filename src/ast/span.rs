//! Source span primitives.

use std::ops::Range;

/// A span representing a byte range in source text.
/// This is the canonical span type used by tokens and parse errors.
pub type Span = Range<usize>;

/// Merges two spans into a single span covering both.
pub fn merge_spans(start: &Span, end: &Span) -> Span {
    start.start.min(end.start)..start.end.max(end.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basic_properties() {
        let span: Span = 5..10;
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 10);
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn span_empty() {
        let span: Span = 5..5;
        assert!(span.is_empty());
    }

    #[test]
    fn merge_covers_both() {
        assert_eq!(merge_spans(&(2..4), &(8..12)), 2..12);
        assert_eq!(merge_spans(&(8..12), &(2..4)), 2..12);
    }
}
