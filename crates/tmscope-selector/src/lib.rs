//! Scope names and the scope selector language.
//!
//! A scope selector is a small boolean language over dot-segmented scope
//! names, used to decide whether a stack of scopes (for instance the stack
//! attached to a token by `tmscope`) satisfies a predicate such as
//! `source.js string -comment` or `L:text.html, R:punctuation`.
//!
//! What it means for a selector name to match a scope name is decided by the
//! caller through a [`NameMatcher`]; [`prefix_matcher`] implements the
//! conventional segment-prefix policy.

mod errors;
mod matcher;
mod scope_name;
mod selector;

pub use errors::SyntaxError;
pub use matcher::{NameMatcher, name_matcher, prefix_matcher};
pub use scope_name::ScopeName;
pub use selector::{
    MatchExpression, NameExpression, Position, PositionalExpression, ScopeSelector,
    parse_selector,
};
