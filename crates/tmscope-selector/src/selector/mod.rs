//! Scope selector lexing, parsing and evaluation.

mod expression;
mod lexer;
mod parser;

pub use expression::{
    MatchExpression, NameExpression, Position, PositionalExpression, ScopeSelector,
};
pub use parser::parse_selector;
