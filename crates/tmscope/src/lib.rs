//! TextMate-style line tokenizer.
//!
//! A [`Grammar`] is an arena of rules: plain matches, begin/end scopes and
//! includes. A [`Tokenizer`] walks one line at a time, producing [`Token`]s
//! that cover the line and carry the stack of scope names active over each
//! span. The [`MatchStateStack`] it returns is passed back in for the next
//! line, so constructs such as block comments and strings may span lines.
//!
//! Scope names and scope selectors come from `tmscope-selector` and are
//! re-exported here, so `tmscope` alone is enough to tokenize a document and
//! query the resulting scopes.
//!
//! # Examples
//! ```
//! use tmscope::{Grammar, Rule, ScopeSelector, Tokenizer, name_matcher, prefix_matcher};
//!
//! let mut builder = Grammar::builder();
//! let root = builder.add(Rule::container().with_scope("source.demo"));
//! let comment = builder.add(Rule::matching("#.*").with_scope("comment.line"));
//! builder.push_pattern(root, comment);
//! let grammar = builder.build(root);
//!
//! let mut tokenizer = Tokenizer::new(&grammar);
//! let line = "x = 1 # note";
//! let result = tokenizer
//!     .tokenize_line(line, tokenizer.initial_stack())
//!     .expect("grammar patterns compile");
//!
//! let selector = ScopeSelector::parse("source comment", name_matcher(prefix_matcher))
//!     .expect("selector is valid");
//! let commented: Vec<_> = result
//!     .tokens
//!     .iter()
//!     .filter(|token| selector.matches(&token.scopes))
//!     .filter_map(|token| token.text(line))
//!     .collect();
//! assert_eq!(commented, ["# note"]);
//! ```

mod accumulator;
pub mod config;
mod grammar;
mod plan;
mod regex_engine;
mod state;
mod token;
mod tokenizer;

pub use config::TokenizerOptions;
pub use grammar::{BeginEnd, Captures, Grammar, GrammarBuilder, Rule, RuleId, RuleKind, captures};
pub use plan::{MatchPlan, MatchResult, PlanKind, collect_plans, find_best_match};
pub use regex_engine::{
    DefaultRegexEngine, PatternCache, PatternMatcher, RegexEngine, RegexMatch,
    resolve_back_references,
};
pub use state::{MatchState, MatchStateStack};
pub use token::Token;
pub use tokenizer::{LineTokens, TokenizedLines, Tokenizer};
pub use tmscope_selector::{
    MatchExpression, NameExpression, NameMatcher, Position, PositionalExpression, ScopeName,
    ScopeSelector, SyntaxError, name_matcher, parse_selector, prefix_matcher,
};
