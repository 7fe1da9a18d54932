//! Regex capability used by the tokenizer, and its compiled-pattern cache.
//!
//! The tokenizer never talks to a regex library directly: it compiles
//! patterns through a [`RegexEngine`] and searches through the resulting
//! [`PatternMatcher`]. [`DefaultRegexEngine`] implements both on top of the
//! `regex` crate.

use std::ops::Range;
use std::sync::LazyLock;

use hashbrown::HashMap;
use hashbrown::hash_map::EntryRef;
use regex::{Captures, Regex};

/// Compiles pattern text into searchable matchers.
pub trait RegexEngine {
    /// Compiled form of a pattern.
    type Matcher: PatternMatcher;
    /// Failure to compile a pattern.
    type Error: std::error::Error;

    /// Compile `pattern`.
    ///
    /// # Errors
    /// Returns the engine's error when `pattern` is not valid syntax.
    fn compile(&self, pattern: &str) -> Result<Self::Matcher, Self::Error>;
}

/// A compiled pattern that can be searched forward from an offset.
pub trait PatternMatcher {
    /// Find the leftmost match in `haystack` starting at or after byte `from`.
    ///
    /// Anchors and look-around still see the text before `from`.
    fn search(&self, haystack: &str, from: usize) -> Option<RegexMatch>;
}

/// The outcome of a successful search: the full match plus numbered groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexMatch {
    range: Range<usize>,
    groups: Vec<Option<Range<usize>>>,
}

impl RegexMatch {
    /// Build a match from its full range and its groups.
    ///
    /// `groups[0]` describes group 1; non-participating groups are `None`.
    #[must_use]
    pub const fn new(range: Range<usize>, groups: Vec<Option<Range<usize>>>) -> Self {
        Self { range, groups }
    }

    /// Byte range of the whole match.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Start of the whole match.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.range.start
    }

    /// End of the whole match.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.range.end
    }

    /// Whether the match consumed no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.range.start >= self.range.end
    }

    /// Range of group `index`; `0` is the whole match.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        match index.checked_sub(1) {
            None => Some(self.range()),
            Some(slot) => self.groups.get(slot).cloned().flatten(),
        }
    }

    /// Number of numbered groups, excluding the whole match.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// [`RegexEngine`] backed by the `regex` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRegexEngine;

impl RegexEngine for DefaultRegexEngine {
    type Matcher = Regex;
    type Error = regex::Error;

    fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(pattern)
    }
}

impl PatternMatcher for Regex {
    fn search(&self, haystack: &str, from: usize) -> Option<RegexMatch> {
        if from > haystack.len() {
            return None;
        }
        let caps = self.captures_at(haystack, from)?;
        let whole = caps.get(0)?;
        let groups = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.range()))
            .collect();
        Some(RegexMatch::new(whole.range(), groups))
    }
}

/// Most resolved end patterns kept before the resolved set is dropped.
pub(crate) const RESOLVED_PATTERN_LIMIT: usize = 64;

/// Compiled matchers keyed by pattern text.
///
/// Owned by one tokenizer and reused across lines. Patterns written in the
/// grammar are compiled at most once. End patterns resolved against a begin
/// match depend on the input, so they live in a separate set that is cleared
/// once it holds [`RESOLVED_PATTERN_LIMIT`] entries.
#[derive(Debug)]
pub struct PatternCache<M> {
    compiled: HashMap<String, M>,
    resolved: HashMap<String, M>,
}

impl<M> Default for PatternCache<M> {
    fn default() -> Self {
        Self {
            compiled: HashMap::new(),
            resolved: HashMap::new(),
        }
    }
}

impl<M> PatternCache<M> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the matcher for a grammar pattern, compiling it on first use.
    ///
    /// # Errors
    /// Propagates the engine's compilation error; failures are not cached.
    pub fn get_or_compile<E>(&mut self, engine: &E, pattern: &str) -> Result<&M, E::Error>
    where
        E: RegexEngine<Matcher = M>,
    {
        compile_into(&mut self.compiled, engine, pattern)
    }

    /// Return the matcher for an end pattern resolved from a begin match.
    ///
    /// # Errors
    /// Propagates the engine's compilation error; failures are not cached.
    pub fn get_or_compile_resolved<E>(&mut self, engine: &E, pattern: &str) -> Result<&M, E::Error>
    where
        E: RegexEngine<Matcher = M>,
    {
        if self.resolved.len() >= RESOLVED_PATTERN_LIMIT && !self.resolved.contains_key(pattern) {
            log::debug!("dropping {} resolved end patterns", self.resolved.len());
            self.resolved.clear();
        }
        compile_into(&mut self.resolved, engine, pattern)
    }

    /// Number of compiled patterns held, resolved ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.len() + self.resolved.len()
    }

    /// Number of resolved end patterns held.
    #[must_use]
    pub fn resolved_len(&self) -> usize {
        self.resolved.len()
    }

    /// Whether nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty() && self.resolved.is_empty()
    }
}

fn compile_into<'c, E>(
    compiled: &'c mut HashMap<String, E::Matcher>,
    engine: &E,
    pattern: &str,
) -> Result<&'c E::Matcher, E::Error>
where
    E: RegexEngine,
{
    match compiled.entry_ref(pattern) {
        EntryRef::Occupied(entry) => Ok(entry.into_mut()),
        EntryRef::Vacant(entry) => {
            log::debug!("compiling pattern {pattern:?}");
            let matcher = engine.compile(pattern)?;
            Ok(entry.insert(matcher))
        }
    }
}

static BACK_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safe: The regex pattern is a compile-time constant and is valid.
    Regex::new(r"(?s)\\(\d+|.)")
        .unwrap_or_else(|_| unreachable!("back-reference regex is valid"))
});

/// Substitute `\N` in an end pattern with the escaped text of group `N` of
/// the begin match.
///
/// Returns `None` when `pattern` contains no back-references, so callers can
/// keep using the pattern as written. Groups that did not participate are
/// replaced by nothing; escaped backslashes (`\\1`) are left alone.
///
/// # Examples
/// ```
/// use tmscope::{RegexMatch, resolve_back_references};
///
/// let line = "<<EOT";
/// let begin = RegexMatch::new(0..5, vec![Some(2..5)]);
/// assert_eq!(resolve_back_references(r"^\1$", line, &begin).as_deref(), Some("^EOT$"));
/// assert_eq!(resolve_back_references(r"\d+", line, &begin), None);
/// ```
#[must_use]
pub fn resolve_back_references(pattern: &str, line: &str, begin: &RegexMatch) -> Option<String> {
    let has_reference = BACK_REFERENCE_RE
        .captures_iter(pattern)
        .any(|caps| caps.get(1).is_some_and(|m| m.as_str().starts_with(|c: char| c.is_ascii_digit())));
    if !has_reference {
        return None;
    }
    let resolved = BACK_REFERENCE_RE.replace_all(pattern, |caps: &Captures<'_>| {
        let escape = caps.get(0).map_or("", |m| m.as_str());
        let Some(index) = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) else {
            return escape.to_owned();
        };
        begin
            .group(index)
            .and_then(|range| line.get(range))
            .map_or_else(String::new, regex::escape)
    });
    Some(resolved.into_owned())
}
