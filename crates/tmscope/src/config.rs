//! Runtime configuration for tmscope.
//!
//! The module currently exposes the maximum line length the tokenizer will
//! scan. Longer lines are emitted as a single token carrying the scopes that
//! are open when the line starts.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable holding the maximum line length in bytes.
pub const MAX_LINE_LENGTH_ENV: &str = "TMSCOPE_MAX_LINE_LENGTH";

const OVERRIDE_UNSET: usize = usize::MAX;
const UNLIMITED: usize = 0;

static MAX_LINE_LENGTH_OVERRIDE: AtomicUsize = AtomicUsize::new(OVERRIDE_UNSET);

fn parse_env_length(value: &str) -> Option<usize> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|length| *length != UNLIMITED)
}

fn env_max_line_length() -> Option<usize> {
    std::env::var(MAX_LINE_LENGTH_ENV)
        .ok()
        .as_deref()
        .and_then(parse_env_length)
}

/// Determine the longest line, in bytes, the tokenizer will scan.
///
/// `None` means no limit. An in-process override takes precedence over
/// [`MAX_LINE_LENGTH_ENV`]; an unset, empty, zero or unparsable variable
/// means no limit.
#[must_use]
pub fn max_line_length() -> Option<usize> {
    match MAX_LINE_LENGTH_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_UNSET => env_max_line_length(),
        UNLIMITED => None,
        length => Some(length),
    }
}

/// Override the maximum line length for the current process.
///
/// `None` (or `Some(0)`) removes the limit regardless of the environment.
/// Tests may call [`clear_max_line_length_override`] to restore environment
/// driven behaviour.
pub fn set_max_line_length(limit: Option<usize>) {
    let value = match limit {
        Some(length) if length != OVERRIDE_UNSET => length,
        _ => UNLIMITED,
    };
    MAX_LINE_LENGTH_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override for the maximum line length.
pub fn clear_max_line_length_override() {
    MAX_LINE_LENGTH_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

/// Settings a [`Tokenizer`](crate::Tokenizer) resolves once at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Lines longer than this many bytes are not scanned.
    pub max_line_length: Option<usize>,
}

impl TokenizerOptions {
    /// Resolve options from the process override and the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_line_length: max_line_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    #[rstest]
    #[case("120", Some(120))]
    #[case(" 64 ", Some(64))]
    #[case("0", None)]
    #[case("", None)]
    #[case("lots", None)]
    #[case("-3", None)]
    fn parses_environment_values(#[case] value: &str, #[case] expected: Option<usize>) {
        assert_eq!(parse_env_length(value), expected);
    }

    #[test]
    #[serial]
    fn override_takes_precedence() {
        set_max_line_length(Some(80));
        assert_eq!(max_line_length(), Some(80));
        assert_eq!(TokenizerOptions::from_env().max_line_length, Some(80));
        clear_max_line_length_override();
    }

    #[test]
    #[serial]
    fn override_can_remove_the_limit() {
        set_max_line_length(None);
        assert_eq!(max_line_length(), None);
        set_max_line_length(Some(0));
        assert_eq!(max_line_length(), None);
        clear_max_line_length_override();
    }

    #[test]
    #[serial]
    fn clearing_restores_environment_behaviour() {
        set_max_line_length(Some(10));
        clear_max_line_length_override();
        assert_eq!(max_line_length(), env_max_line_length());
    }
}
