//! Scoped spans produced by the tokenizer.

use std::ops::Range;

use tmscope_selector::ScopeName;

/// A non-empty span of a line and the scopes active over it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Byte range within the line.
    pub range: Range<usize>,
    /// Scope names, outermost first.
    pub scopes: Vec<ScopeName>,
}

impl Token {
    /// A token covering `range` with `scopes`.
    #[must_use]
    pub const fn new(range: Range<usize>, scopes: Vec<ScopeName>) -> Self {
        Self { range, scopes }
    }

    /// The slice of `line` covered by the token.
    #[must_use]
    pub fn text<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.get(self.range.clone())
    }

    /// Scope names rendered as strings, outermost first.
    #[must_use]
    pub fn scope_strings(&self) -> Vec<String> {
        self.scopes.iter().map(ScopeName::as_string).collect()
    }
}
