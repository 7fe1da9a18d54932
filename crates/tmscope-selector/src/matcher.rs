//! Scope-name matching capability injected into parsed selectors.

use std::sync::Arc;

use crate::ScopeName;

/// Shared predicate deciding whether a selector name accepts a candidate
/// scope name.
///
/// The parser stores it in every name expression without interpreting it, so
/// callers decide what "compatible" means.
pub type NameMatcher = Arc<dyn Fn(&ScopeName, &ScopeName) -> bool + Send + Sync>;

/// Wrap a closure or function as a [`NameMatcher`].
///
/// # Examples
/// ```
/// use tmscope_selector::{ScopeName, name_matcher};
///
/// let exact = name_matcher(|pattern: &ScopeName, candidate: &ScopeName| pattern == candidate);
/// assert!(exact(&ScopeName::new("a.b"), &ScopeName::new("a.b")));
/// ```
pub fn name_matcher<F>(matcher: F) -> NameMatcher
where
    F: Fn(&ScopeName, &ScopeName) -> bool + Send + Sync + 'static,
{
    Arc::new(matcher)
}

/// Conventional TextMate policy: the pattern's segments are a prefix of the
/// candidate's segments.
///
/// # Examples
/// ```
/// use tmscope_selector::{ScopeName, prefix_matcher};
///
/// let pattern = ScopeName::new("string.quoted");
/// assert!(prefix_matcher(&pattern, &ScopeName::new("string.quoted.double")));
/// assert!(!prefix_matcher(&pattern, &ScopeName::new("string.quotedx")));
/// ```
#[must_use]
pub fn prefix_matcher(pattern: &ScopeName, candidate: &ScopeName) -> bool {
    candidate.parts().starts_with(pattern.parts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("source", "source.rust", true)]
    #[case("source.rust", "source.rust", true)]
    #[case("source.rust", "source", false)]
    #[case("string.quoted", "string.quotedx.double", false)]
    #[case("keyword", "storage.keyword", false)]
    fn prefix_matching_is_segment_aligned(
        #[case] pattern: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            prefix_matcher(&ScopeName::new(pattern), &ScopeName::new(candidate)),
            expected
        );
    }

    #[test]
    fn wraps_function_pointers() {
        let matcher = name_matcher(prefix_matcher);
        assert!(matcher(&ScopeName::new("a"), &ScopeName::new("a.b")));
    }
}
