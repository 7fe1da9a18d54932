//! Grammar rule arena consumed by the tokenizer.
//!
//! Rules reference each other through [`RuleId`] handles so recursive and
//! mutually recursive grammars (`include` cycles, `$self` references) are
//! plain indices rather than nested copies. The tokenizer only reads a
//! [`Grammar`]; building one is the job of [`GrammarBuilder`].

use std::collections::BTreeMap;

use tmscope_selector::ScopeName;

/// Capture index → scope name assigned to that regex group.
pub type Captures = BTreeMap<usize, ScopeName>;

static NO_CAPTURES: Captures = BTreeMap::new();

/// Build a [`Captures`] map from `(group, scope)` pairs.
///
/// # Examples
/// ```
/// use tmscope::captures;
///
/// let map = captures([(1, "punctuation.definition.string")]);
/// assert_eq!(map.len(), 1);
/// ```
pub fn captures<I, S>(entries: I) -> Captures
where
    I: IntoIterator<Item = (usize, S)>,
    S: Into<ScopeName>,
{
    entries
        .into_iter()
        .map(|(index, scope)| (index, scope.into()))
        .collect()
}

/// Handle addressing a rule inside a [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleId(usize);

impl RuleId {
    /// Position of the rule in its grammar's arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Begin/end condition of a scope rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeginEnd {
    begin: String,
    end: String,
    begin_captures: Captures,
    end_captures: Captures,
    captures: Captures,
}

impl BeginEnd {
    /// A condition opening on `begin` and closing on `end`.
    ///
    /// `end` may refer back to groups of the begin match with `\1` … `\N`.
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
            begin_captures: Captures::new(),
            end_captures: Captures::new(),
            captures: Captures::new(),
        }
    }

    /// Scopes for groups of the begin match.
    #[must_use]
    pub fn with_begin_captures(mut self, captures: Captures) -> Self {
        self.begin_captures = captures;
        self
    }

    /// Scopes for groups of the end match.
    #[must_use]
    pub fn with_end_captures(mut self, captures: Captures) -> Self {
        self.end_captures = captures;
        self
    }

    /// Scopes shared by begin and end matches that declare none of their own.
    #[must_use]
    pub fn with_captures(mut self, captures: Captures) -> Self {
        self.captures = captures;
        self
    }

    /// The begin pattern.
    #[must_use]
    pub fn begin(&self) -> &str {
        &self.begin
    }

    /// The end pattern as written, before back-reference resolution.
    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Captures applied to a begin match.
    #[must_use]
    pub fn begin_captures(&self) -> &Captures {
        if self.begin_captures.is_empty() {
            &self.captures
        } else {
            &self.begin_captures
        }
    }

    /// Captures applied to an end match.
    #[must_use]
    pub fn end_captures(&self) -> &Captures {
        if self.end_captures.is_empty() {
            &self.captures
        } else {
            &self.end_captures
        }
    }
}

/// What a rule does when the tokenizer reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// A single regex whose match is scoped and consumed in one step.
    Match {
        /// Pattern searched for.
        pattern: String,
        /// Scopes for groups of the match.
        captures: Captures,
    },
    /// Indirection to another rule; expanded in place.
    Include(RuleId),
    /// A scope: with a condition it opens and closes around nested content,
    /// without one it only groups its child patterns.
    Scope(Option<BeginEnd>),
}

/// A node of the grammar tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    kind: RuleKind,
    scope_name: Option<ScopeName>,
    patterns: Vec<RuleId>,
}

impl Rule {
    /// Wrap `kind` with no scope name and no child patterns.
    #[must_use]
    pub const fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            scope_name: None,
            patterns: Vec::new(),
        }
    }

    /// A plain match rule without captures.
    pub fn matching(pattern: impl Into<String>) -> Self {
        Self::matching_with_captures(pattern, Captures::new())
    }

    /// A plain match rule scoping some of its groups.
    pub fn matching_with_captures(pattern: impl Into<String>, captures: Captures) -> Self {
        Self::new(RuleKind::Match {
            pattern: pattern.into(),
            captures,
        })
    }

    /// A begin/end scope rule.
    #[must_use]
    pub const fn begin_end(condition: BeginEnd) -> Self {
        Self::new(RuleKind::Scope(Some(condition)))
    }

    /// A condition-less rule grouping child patterns (e.g. a grammar root or
    /// a repository entry).
    #[must_use]
    pub const fn container() -> Self {
        Self::new(RuleKind::Scope(None))
    }

    /// An indirection to `target`.
    #[must_use]
    pub const fn include(target: RuleId) -> Self {
        Self::new(RuleKind::Include(target))
    }

    /// Set the scope name pushed when the rule is entered or matched.
    #[must_use]
    pub fn with_scope(mut self, scope_name: impl Into<ScopeName>) -> Self {
        self.scope_name = Some(scope_name.into());
        self
    }

    /// Replace the child patterns.
    #[must_use]
    pub fn with_patterns(mut self, patterns: Vec<RuleId>) -> Self {
        self.patterns = patterns;
        self
    }

    /// The rule discriminator.
    #[must_use]
    pub const fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Scope name contributed by the rule, if any.
    #[must_use]
    pub const fn scope_name(&self) -> Option<&ScopeName> {
        self.scope_name.as_ref()
    }

    /// Child patterns in declaration order.
    #[must_use]
    pub fn patterns(&self) -> &[RuleId] {
        &self.patterns
    }

    /// The begin/end condition of a scope rule.
    #[must_use]
    pub const fn condition(&self) -> Option<&BeginEnd> {
        match &self.kind {
            RuleKind::Scope(condition) => condition.as_ref(),
            RuleKind::Match { .. } | RuleKind::Include(_) => None,
        }
    }

    /// Captures of a plain match rule; empty for other kinds.
    #[must_use]
    pub fn captures(&self) -> &Captures {
        match &self.kind {
            RuleKind::Match { captures, .. } => captures,
            RuleKind::Include(_) | RuleKind::Scope(_) => &NO_CAPTURES,
        }
    }
}

/// An immutable arena of rules with a designated root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: Vec<Rule>,
    root: RuleId,
}

impl Grammar {
    /// Start building a grammar.
    #[must_use]
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// The rule the outermost match state refers to.
    #[must_use]
    pub const fn root(&self) -> RuleId {
        self.root
    }

    /// Look up a rule by handle.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    /// Number of rules in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Incremental construction of a [`Grammar`].
///
/// Rules are added first and wired afterwards, which is what allows cycles.
///
/// # Examples
/// ```
/// use tmscope::{BeginEnd, Grammar, Rule};
///
/// let mut builder = Grammar::builder();
/// let root = builder.add(Rule::container().with_scope("source.demo"));
/// let string = builder.add(Rule::begin_end(BeginEnd::new("\"", "\"")).with_scope("string.quoted"));
/// builder.push_pattern(root, string);
/// let grammar = builder.build(root);
/// assert_eq!(grammar.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
}

impl GrammarBuilder {
    /// Add a rule to the arena and return its handle.
    pub fn add(&mut self, rule: Rule) -> RuleId {
        self.rules.push(rule);
        RuleId(self.rules.len() - 1)
    }

    /// Append `child` to the patterns of `parent`.
    ///
    /// Handles that do not belong to this builder are ignored.
    pub fn push_pattern(&mut self, parent: RuleId, child: RuleId) -> &mut Self {
        if let Some(rule) = self.rules.get_mut(parent.0) {
            rule.patterns.push(child);
        }
        self
    }

    /// Append several children to the patterns of `parent`, in order.
    pub fn extend_patterns<I>(&mut self, parent: RuleId, children: I) -> &mut Self
    where
        I: IntoIterator<Item = RuleId>,
    {
        if let Some(rule) = self.rules.get_mut(parent.0) {
            rule.patterns.extend(children);
        }
        self
    }

    /// Freeze the arena with `root` as the outermost rule.
    #[must_use]
    pub fn build(self, root: RuleId) -> Grammar {
        Grammar {
            rules: self.rules,
            root,
        }
    }
}
