//! Selector expression tree and its evaluation against scope stacks.
//!
//! Candidate stacks are ordered outermost scope first. Evaluation walks the
//! stack left to right: every name in a conjunction must match an entry
//! after the entry matched by the previous name, and alternative positions
//! are retried when a later operand or an anchor fails. Negations look at the
//! whole stack and consume nothing.

use std::fmt;

use crate::{NameMatcher, ScopeName};

/// A scope-name pattern paired with the matcher that interprets it.
#[derive(Clone)]
pub struct NameExpression {
    name: ScopeName,
    matcher: NameMatcher,
}

impl NameExpression {
    /// Pair `name` with the capability deciding which candidates it accepts.
    #[must_use]
    pub fn new(name: ScopeName, matcher: NameMatcher) -> Self {
        Self { name, matcher }
    }

    /// The raw pattern as written in the selector.
    #[must_use]
    pub const fn name(&self) -> &ScopeName {
        &self.name
    }

    /// Whether the matcher accepts `candidate` for this pattern.
    #[must_use]
    pub fn accepts(&self, candidate: &ScopeName) -> bool {
        (self.matcher)(&self.name, candidate)
    }
}

impl fmt::Debug for NameExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NameExpression").field(&self.name).finish()
    }
}

// Matchers are opaque closures, so only the patterns take part in equality.
impl PartialEq for NameExpression {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A node of the selector expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchExpression {
    /// A single scope-name pattern.
    Name(NameExpression),
    /// Logical NOT of the wrapped expression.
    Negation(Box<MatchExpression>),
    /// Operands that must all hold, in order (adjacency in the source).
    Conjunction(Vec<MatchExpression>),
    /// Operands of which at least one must hold (`|` or `,` inside a group).
    Disjunction(Vec<MatchExpression>),
}

/// How far a partial match has walked the candidate stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Reach {
    first: Option<usize>,
    last: Option<usize>,
    next: usize,
}

impl Reach {
    fn consume(self, index: usize) -> Self {
        Self {
            first: self.first.or(Some(index)),
            last: Some(index),
            next: index + 1,
        }
    }
}

impl MatchExpression {
    /// Evaluate the expression against `scopes` (outermost first).
    ///
    /// # Examples
    /// ```
    /// use tmscope_selector::{ScopeName, ScopeSelector, prefix_matcher, name_matcher};
    ///
    /// let selector = ScopeSelector::parse("source string", name_matcher(prefix_matcher))
    ///     .expect("selector parses");
    /// let scopes = [ScopeName::new("source.rust"), ScopeName::new("string.quoted")];
    /// assert!(selector.expressions()[0].expression().matches(&scopes));
    /// ```
    #[must_use]
    pub fn matches(&self, scopes: &[ScopeName]) -> bool {
        self.reach(scopes, Reach::default(), &mut |_| true)
    }

    fn reach(
        &self,
        scopes: &[ScopeName],
        from: Reach,
        accept: &mut dyn FnMut(Reach) -> bool,
    ) -> bool {
        match self {
            Self::Name(name) => {
                for (index, candidate) in scopes.iter().enumerate().skip(from.next) {
                    if name.accepts(candidate) && accept(from.consume(index)) {
                        return true;
                    }
                }
                false
            }
            Self::Negation(inner) => {
                !inner.reach(scopes, Reach::default(), &mut |_| true) && accept(from)
            }
            Self::Conjunction(items) => reach_all(items, scopes, from, accept),
            Self::Disjunction(items) => {
                for item in items {
                    if item.reach(scopes, from, &mut *accept) {
                        return true;
                    }
                }
                false
            }
        }
    }
}

fn reach_all(
    items: &[MatchExpression],
    scopes: &[ScopeName],
    from: Reach,
    accept: &mut dyn FnMut(Reach) -> bool,
) -> bool {
    match items.split_first() {
        None => accept(from),
        Some((head, rest)) => head.reach(scopes, from, &mut |reached| {
            reach_all(rest, scopes, reached, &mut *accept)
        }),
    }
}

impl fmt::Display for MatchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name.name()),
            Self::Negation(inner) => write!(f, "-{inner}"),
            Self::Conjunction(items) => write_joined(f, items, " "),
            Self::Disjunction(items) => {
                f.write_str("(")?;
                write_joined(f, items, " | ")?;
                f.write_str(")")
            }
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Anchor required by a positional expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// No anchor (`a.b`).
    #[default]
    None,
    /// Anchored at the outermost candidate entry (`L:a.b`).
    Left,
    /// Anchored at the innermost candidate entry (`R:a.b`).
    Right,
}

/// A top-level conjunction with an optional `L:`/`R:` qualifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalExpression {
    position: Position,
    expression: MatchExpression,
}

impl PositionalExpression {
    /// Qualify a conjunction with `position`.
    #[must_use]
    pub const fn new(position: Position, expression: MatchExpression) -> Self {
        Self {
            position,
            expression,
        }
    }

    /// The position qualifier.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The qualified conjunction.
    #[must_use]
    pub const fn expression(&self) -> &MatchExpression {
        &self.expression
    }

    /// Evaluate the conjunction and check its anchor.
    ///
    /// With `Left` the first name consumed must match the outermost entry;
    /// with `Right` the last name consumed must match the innermost entry.
    /// A conjunction that consumes no entry satisfies either anchor.
    #[must_use]
    pub fn matches(&self, scopes: &[ScopeName]) -> bool {
        let innermost = scopes.len().checked_sub(1);
        let position = self.position;
        self.expression
            .reach(scopes, Reach::default(), &mut |reached| match position {
                Position::None => true,
                Position::Left => reached.first.is_none_or(|index| index == 0),
                Position::Right => reached.last.is_none_or(|index| Some(index) == innermost),
            })
    }
}

impl fmt::Display for PositionalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Position::None => {}
            Position::Left => f.write_str("L:")?,
            Position::Right => f.write_str("R:")?,
        }
        write!(f, "{}", self.expression)
    }
}

/// A parsed selector: comma-separated positional expressions, OR'd together.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSelector {
    expressions: Vec<PositionalExpression>,
}

impl ScopeSelector {
    /// Wrap already parsed positional expressions.
    #[must_use]
    pub const fn new(expressions: Vec<PositionalExpression>) -> Self {
        Self { expressions }
    }

    /// The top-level alternatives in source order.
    #[must_use]
    pub fn expressions(&self) -> &[PositionalExpression] {
        &self.expressions
    }

    /// Whether any alternative matches `scopes` (outermost first).
    #[must_use]
    pub fn matches(&self, scopes: &[ScopeName]) -> bool {
        self.expressions
            .iter()
            .any(|expression| expression.matches(scopes))
    }
}

impl fmt::Display for ScopeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.expressions, ", ")
    }
}
