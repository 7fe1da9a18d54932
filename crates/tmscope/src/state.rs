//! The nesting stack threaded through consecutive lines.

use tmscope_selector::ScopeName;

use crate::grammar::{Grammar, RuleId};

/// One open rule and the scope name it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    rule: RuleId,
    scope_name: Option<ScopeName>,
    end_pattern: Option<String>,
}

impl MatchState {
    /// A state for `rule`, contributing `scope_name` while open.
    #[must_use]
    pub const fn new(rule: RuleId, scope_name: Option<ScopeName>) -> Self {
        Self {
            rule,
            scope_name,
            end_pattern: None,
        }
    }

    /// Record the end pattern this state closes on after back-references to
    /// its begin match were resolved.
    #[must_use]
    pub fn with_end_pattern(mut self, end_pattern: Option<String>) -> Self {
        self.end_pattern = end_pattern;
        self
    }

    /// The open rule.
    #[must_use]
    pub const fn rule(&self) -> RuleId {
        self.rule
    }

    /// Scope contributed by the state, if any.
    #[must_use]
    pub const fn scope_name(&self) -> Option<&ScopeName> {
        self.scope_name.as_ref()
    }

    /// Resolved end pattern, when it differs from the rule's own.
    #[must_use]
    pub fn end_pattern(&self) -> Option<&str> {
        self.end_pattern.as_deref()
    }
}

/// Last-in-first-out stack of open rules; never empty.
///
/// The outermost (root) state is fixed at construction and cannot be popped.
/// Callers own the stack and pass it from one line to the next so begin/end
/// constructs may span lines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchStateStack {
    root: MatchState,
    nested: Vec<MatchState>,
}

impl MatchStateStack {
    /// A stack holding only `root`.
    #[must_use]
    pub const fn new(root: MatchState) -> Self {
        Self {
            root,
            nested: Vec::new(),
        }
    }

    /// A stack positioned at the start of a document for `grammar`.
    #[must_use]
    pub fn for_grammar(grammar: &Grammar) -> Self {
        let root = grammar.root();
        let scope_name = grammar
            .rule(root)
            .and_then(|rule| rule.scope_name())
            .cloned();
        Self::new(MatchState::new(root, scope_name))
    }

    /// Open a nested state.
    pub fn push(&mut self, state: MatchState) {
        self.nested.push(state);
    }

    /// Close the innermost state; the root is never removed.
    pub fn pop(&mut self) -> Option<MatchState> {
        self.nested.pop()
    }

    /// The innermost open state.
    #[must_use]
    pub fn top(&self) -> &MatchState {
        self.nested.last().unwrap_or(&self.root)
    }

    /// Number of open states, the root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    /// States from outermost to innermost.
    pub fn items(&self) -> impl Iterator<Item = &MatchState> {
        std::iter::once(&self.root).chain(self.nested.iter())
    }

    /// Scope names of all open states, outermost first.
    #[must_use]
    pub fn scope_names(&self) -> Vec<ScopeName> {
        collect_scopes(self.items())
    }

    /// Scope names of every state below the innermost one.
    #[must_use]
    pub fn ambient_scope_names(&self) -> Vec<ScopeName> {
        collect_scopes(self.items().take(self.depth() - 1))
    }
}

fn collect_scopes<'a>(states: impl Iterator<Item = &'a MatchState>) -> Vec<ScopeName> {
    states.filter_map(MatchState::scope_name).cloned().collect()
}
