//! Dot-segmented scope names such as `string.quoted.double`.

use std::fmt;
use std::str::FromStr;

/// A scope name made of non-empty, dot-separated segments.
///
/// Equality is structural: two names are equal when their segment sequences
/// are equal. Empty segments (from leading, trailing or doubled dots) are
/// discarded during construction.
///
/// # Examples
/// ```
/// use tmscope_selector::ScopeName;
///
/// let name = ScopeName::from("string.quoted.double");
/// assert_eq!(name.parts(), ["string", "quoted", "double"]);
/// assert_eq!(name.to_string(), "string.quoted.double");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct ScopeName {
    parts: Vec<String>,
}

impl ScopeName {
    /// Build a scope name by splitting `source` on `.`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self::from_parts(source.split('.'))
    }

    /// Build a scope name from already separated segments.
    ///
    /// # Examples
    /// ```
    /// use tmscope_selector::ScopeName;
    ///
    /// let name = ScopeName::from_parts(["source", "rust"]);
    /// assert_eq!(name, ScopeName::new("source.rust"));
    /// ```
    #[must_use]
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts = parts
            .into_iter()
            .map(Into::into)
            .filter(|part: &String| !part.is_empty())
            .collect();
        Self { parts }
    }

    /// Segments in order, outermost category first.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the name has no segments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render the name with its segments joined by `.`.
    #[must_use]
    pub fn as_string(&self) -> String {
        self.parts.join(".")
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.parts.iter();
        if let Some(first) = parts.next() {
            f.write_str(first)?;
        }
        for part in parts {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

impl FromStr for ScopeName {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(value))
    }
}

impl From<&str> for ScopeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScopeName {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<ScopeName> for String {
    fn from(value: ScopeName) -> Self {
        value.as_string()
    }
}
