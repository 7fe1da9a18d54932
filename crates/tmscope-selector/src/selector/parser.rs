//! Recursive-descent parser turning selector tokens into an expression tree.

use crate::errors::SyntaxError;
use crate::{NameMatcher, ScopeName};

use super::expression::{
    MatchExpression, NameExpression, Position, PositionalExpression, ScopeSelector,
};
use super::lexer::{Lexer, Token, TokenKind};

struct Parser<'a> {
    lexer: Lexer<'a>,
    token: Token<'a>,
    matcher: NameMatcher,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, matcher: NameMatcher) -> Self {
        let mut lexer = Lexer::new(source);
        let token = lexer.next_token();
        Self {
            lexer,
            token,
            matcher,
        }
    }

    fn advance(&mut self) {
        self.token = self.lexer.next_token();
    }

    fn parse_selector(mut self) -> Result<ScopeSelector, SyntaxError> {
        let mut expressions = vec![self.parse_positional()?];
        while self.token.kind == TokenKind::Comma {
            self.advance();
            expressions.push(self.parse_positional()?);
        }
        if self.token.kind != TokenKind::End {
            log::debug!(
                "selector parsing stopped at byte {} with unconsumed input",
                self.token.start
            );
        }
        Ok(ScopeSelector::new(expressions))
    }

    fn parse_positional(&mut self) -> Result<PositionalExpression, SyntaxError> {
        let position = match self.token.kind {
            TokenKind::Left => Position::Left,
            TokenKind::Right => Position::Right,
            _ => Position::None,
        };
        if position != Position::None {
            self.advance();
        }
        let conjunction = self.parse_conjunction()?;
        Ok(PositionalExpression::new(position, conjunction))
    }

    fn parse_conjunction(&mut self) -> Result<MatchExpression, SyntaxError> {
        let mut items = Vec::new();
        while let Some(item) = self.parse_unary()? {
            items.push(item);
        }
        Ok(MatchExpression::Conjunction(items))
    }

    /// Parse the alternatives of a group whose `(` has been consumed.
    fn parse_disjunction(&mut self) -> Result<MatchExpression, SyntaxError> {
        let mut items = vec![self.expect_operand("expected operand in group")?];
        while matches!(self.token.kind, TokenKind::Pipe | TokenKind::Comma) {
            self.advance();
            items.push(self.expect_operand("expected operand after alternative separator")?);
        }
        Ok(MatchExpression::Disjunction(items))
    }

    fn parse_unary(&mut self) -> Result<Option<MatchExpression>, SyntaxError> {
        match self.token.kind {
            TokenKind::Minus => {
                self.advance();
                let operand = self.expect_operand("expected operand after negation")?;
                Ok(Some(MatchExpression::Negation(Box::new(operand))))
            }
            TokenKind::Open => {
                let open = self.token.start;
                self.advance();
                let group = self.parse_disjunction()?;
                if self.token.kind != TokenKind::Close {
                    return Err(SyntaxError::new("unclosed group", open));
                }
                self.advance();
                Ok(Some(group))
            }
            TokenKind::Name(text) => {
                self.advance();
                Ok(Some(MatchExpression::Name(NameExpression::new(
                    ScopeName::new(text),
                    NameMatcher::clone(&self.matcher),
                ))))
            }
            _ => Ok(None),
        }
    }

    fn expect_operand(&mut self, message: &'static str) -> Result<MatchExpression, SyntaxError> {
        let at = self.token.start;
        self.parse_unary()?
            .ok_or_else(|| SyntaxError::new(message, at))
    }
}

/// Parse a scope selector, attaching `matcher` to every name it contains.
///
/// Alternatives are separated by `,` at the top level, optionally prefixed
/// with `L:` or `R:`. Adjacent operands are AND'd; `-` negates the next
/// operand; parentheses group alternatives separated by `|` or `,`.
///
/// Parsing stops at the first top-level token that cannot continue the
/// selector, so `"a)"` yields the selector `a`.
///
/// # Errors
/// Returns [`SyntaxError`] when a negation has no operand, a group is not
/// closed, or a group or alternative separator is not followed by an
/// operand.
///
/// # Examples
/// ```
/// use tmscope_selector::{name_matcher, parse_selector, prefix_matcher, Position};
///
/// let selector = parse_selector("L:source.js -comment, string", name_matcher(prefix_matcher))
///     .expect("selector parses");
/// assert_eq!(selector.expressions().len(), 2);
/// assert_eq!(selector.expressions()[0].position(), Position::Left);
/// assert!(parse_selector("(a", name_matcher(prefix_matcher)).is_err());
/// ```
pub fn parse_selector(source: &str, matcher: NameMatcher) -> Result<ScopeSelector, SyntaxError> {
    Parser::new(source, matcher).parse_selector()
}

impl ScopeSelector {
    /// Parse `source`; see [`parse_selector`].
    ///
    /// # Errors
    /// Returns [`SyntaxError`] for malformed selector text.
    pub fn parse(source: &str, matcher: NameMatcher) -> Result<Self, SyntaxError> {
        parse_selector(source, matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{name_matcher, prefix_matcher};
    use rstest::rstest;

    fn parse_ok(source: &str) -> ScopeSelector {
        match parse_selector(source, name_matcher(prefix_matcher)) {
            Ok(selector) => selector,
            Err(err) => panic!("selector {source:?} should parse: {err}"),
        }
    }

    fn first_expression(selector: &ScopeSelector) -> &MatchExpression {
        match selector.expressions().first() {
            Some(positional) => positional.expression(),
            None => panic!("selector should have at least one alternative"),
        }
    }

    fn parse_err(source: &str) -> SyntaxError {
        match parse_selector(source, name_matcher(prefix_matcher)) {
            Ok(selector) => panic!("selector {source:?} should fail, parsed as {selector}"),
            Err(err) => err,
        }
    }

    #[rstest]
    #[case("a.b - c", "a.b -c")]
    #[case("a.b, c.d", "a.b, c.d")]
    #[case("(a|b) c", "(a | b) c")]
    #[case("(a, b)", "(a | b)")]
    #[case("--x", "--x")]
    #[case("-(a | b)", "-(a | b)")]
    #[case("L:a.b", "L:a.b")]
    #[case("R:a b, L:c", "R:a b, L:c")]
    fn renders_parsed_structure(#[case] source: &str, #[case] rendered: &str) {
        assert_eq!(parse_ok(source).to_string(), rendered);
    }

    #[test]
    fn nests_groups() {
        let selector = parse_ok("((a) | -b)");
        let MatchExpression::Conjunction(items) = first_expression(&selector) else {
            panic!("top level must be a conjunction");
        };
        let [MatchExpression::Disjunction(alternatives)] = items.as_slice() else {
            panic!("expected a single group, got {items:?}");
        };
        assert!(matches!(alternatives.as_slice(), [
            MatchExpression::Disjunction(_),
            MatchExpression::Negation(_)
        ]));
    }

    #[test]
    fn empty_source_yields_empty_conjunction() {
        let selector = parse_ok("");
        assert_eq!(selector.expressions().len(), 1);
        assert_eq!(
            first_expression(&selector),
            &MatchExpression::Conjunction(Vec::new())
        );
    }

    #[rstest]
    #[case("-", "expected operand after negation", 1)]
    #[case("a -", "expected operand after negation", 3)]
    #[case("(a", "unclosed group", 0)]
    #[case("x (a b)", "unclosed group", 2)]
    #[case("()", "expected operand in group", 1)]
    #[case("(a|)", "expected operand after alternative separator", 3)]
    fn reports_syntax_errors(
        #[case] source: &str,
        #[case] message: &str,
        #[case] position: usize,
    ) {
        let err = parse_err(source);
        assert_eq!(err.message, message);
        assert_eq!(err.position, position);
    }

    #[test]
    fn stops_at_unexpected_trailing_tokens() {
        assert_eq!(parse_ok("a)").to_string(), "a");
        assert_eq!(parse_ok("a | b").to_string(), "a");
    }
}
