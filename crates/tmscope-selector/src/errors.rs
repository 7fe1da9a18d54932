//! Error type surfaced by the selector parser.

use thiserror::Error;

/// A selector string that violates the selector grammar.
///
/// The parser raises this for a negation with nothing to negate, for a `(`
/// that is never closed, and for a group or alternative that has no operand.
/// There is no partial result: the whole selector is invalid.
///
/// # Examples
/// ```
/// use tmscope_selector::SyntaxError;
///
/// let err = SyntaxError::new("unclosed group", 2);
/// assert_eq!(err.to_string(), "unclosed group at byte 2 (zero-based)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position} (zero-based)")]
pub struct SyntaxError {
    /// Human-readable description of the violation.
    pub message: &'static str,
    /// Byte offset in the selector source where the violation was found.
    pub position: usize,
}

impl SyntaxError {
    /// Create a new syntax error.
    #[must_use]
    pub const fn new(message: &'static str, position: usize) -> Self {
        Self { message, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_message_with_position() {
        let err = SyntaxError::new("expected operand after negation", 0);
        assert_eq!(
            err.to_string(),
            "expected operand after negation at byte 0 (zero-based)"
        );
    }
}
