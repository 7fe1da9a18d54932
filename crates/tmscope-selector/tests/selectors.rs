//! Behavioural tests for selector parsing and matching.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use tmscope_selector::{
    MatchExpression, NameMatcher, Position, ScopeName, ScopeSelector, SyntaxError, name_matcher,
    parse_selector, prefix_matcher,
};

#[fixture]
fn prefix() -> NameMatcher {
    name_matcher(prefix_matcher)
}

fn parse(source: &str, matcher: &NameMatcher) -> ScopeSelector {
    parse_selector(source, NameMatcher::clone(matcher))
        .unwrap_or_else(|err| panic!("selector {source:?} should parse: {err}"))
}

fn only_conjunction(selector: &ScopeSelector) -> &[MatchExpression] {
    let [positional] = selector.expressions() else {
        panic!("expected one alternative in {selector}");
    };
    let MatchExpression::Conjunction(items) = positional.expression() else {
        panic!("alternatives wrap conjunctions");
    };
    items
}

fn name_of(expr: &MatchExpression) -> &ScopeName {
    match expr {
        MatchExpression::Name(name) => name.name(),
        other => panic!("expected a name, got {other:?}"),
    }
}

fn scopes(names: &[&str]) -> Vec<ScopeName> {
    names.iter().copied().map(ScopeName::new).collect()
}

#[rstest]
fn subtraction_is_conjunction_with_negation(prefix: NameMatcher) {
    let selector = parse("a.b - c", &prefix);
    let [first, MatchExpression::Negation(negated)] = only_conjunction(&selector) else {
        panic!("expected name followed by negation in {selector}");
    };
    assert_eq!(name_of(first), &ScopeName::new("a.b"));
    assert_eq!(name_of(negated), &ScopeName::new("c"));
}

#[rstest]
fn top_level_comma_splits_alternatives(prefix: NameMatcher) {
    let selector = parse("a.b, c.d", &prefix);
    assert_eq!(selector.expressions().len(), 2);
    assert!(
        selector
            .expressions()
            .iter()
            .all(|positional| positional.position() == Position::None)
    );
}

#[rstest]
fn group_binds_tighter_than_adjacency(prefix: NameMatcher) {
    let selector = parse("(a|b) c", &prefix);
    let [MatchExpression::Disjunction(alternatives), last] = only_conjunction(&selector) else {
        panic!("expected group followed by a name in {selector}");
    };
    let names: Vec<_> = alternatives.iter().map(name_of).collect();
    assert_eq!(names, [&ScopeName::new("a"), &ScopeName::new("b")]);
    assert_eq!(name_of(last), &ScopeName::new("c"));
}

#[rstest]
#[case("L:a.b", Position::Left)]
#[case("R:a.b", Position::Right)]
#[case("a.b", Position::None)]
fn reads_position_qualifiers(prefix: NameMatcher, #[case] source: &str, #[case] expected: Position) {
    let selector = parse(source, &prefix);
    let [positional] = selector.expressions() else {
        panic!("expected one alternative");
    };
    assert_eq!(positional.position(), expected);
    let [inner] = only_conjunction(&selector) else {
        panic!("expected a single operand");
    };
    assert_eq!(name_of(inner), &ScopeName::new("a.b"));
}

#[rstest]
#[case("-")]
#[case("(a")]
fn rejects_malformed_selectors(prefix: NameMatcher, #[case] source: &str) {
    let result: Result<ScopeSelector, SyntaxError> = parse_selector(source, prefix);
    assert!(result.is_err(), "{source:?} should be rejected");
}

#[rstest]
fn accepts_and_stops_at_stray_closing_parenthesis(prefix: NameMatcher) {
    // Unconsumed top-level input ends parsing rather than failing it.
    let selector = parse("a)", &prefix);
    assert_eq!(selector.to_string(), "a");
}

#[rstest]
#[case("source.js string", &["source.js", "meta.block", "string.quoted"], true)]
#[case("string source.js", &["source.js", "string.quoted"], false)]
#[case("string - comment", &["source.js", "string.quoted"], true)]
#[case("string - comment", &["comment.block", "string.quoted"], false)]
#[case("comment, string", &["source.js", "string.quoted"], true)]
#[case("(comment | keyword) -invalid", &["source", "keyword.control"], true)]
#[case("L:source string", &["source.js", "string.quoted"], true)]
#[case("L:string", &["source.js", "string.quoted"], false)]
#[case("R:string", &["source.js", "string.quoted"], true)]
#[case("R:source", &["source.js", "string.quoted"], false)]
#[case("--string", &["string"], true)]
fn evaluates_against_scope_stacks(
    prefix: NameMatcher,
    #[case] source: &str,
    #[case] stack: &[&str],
    #[case] expected: bool,
) {
    let selector = parse(source, &prefix);
    assert_eq!(
        selector.matches(&scopes(stack)),
        expected,
        "{source:?} against {stack:?}"
    );
}

#[test]
fn consults_the_injected_matcher() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let exact = name_matcher(move |pattern: &ScopeName, candidate: &ScopeName| {
        if let Ok(mut log) = recorded.lock() {
            log.push((pattern.to_string(), candidate.to_string()));
        }
        pattern == candidate
    });

    let selector = parse("string", &exact);
    assert!(!selector.matches(&scopes(&["string.quoted"])));
    assert!(selector.matches(&scopes(&["string"])));

    let calls = calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    assert_eq!(
        calls.as_slice(),
        [
            ("string".to_string(), "string.quoted".to_string()),
            ("string".to_string(), "string".to_string()),
        ]
    );
}

#[rstest]
#[case("source.js string -comment")]
#[case("L:(a | -b) c, R:d")]
#[case("--x")]
fn rendered_selectors_reparse_to_the_same_tree(prefix: NameMatcher, #[case] source: &str) {
    let selector = parse(source, &prefix);
    let reparsed = parse(&selector.to_string(), &prefix);
    assert_eq!(selector, reparsed);
}

#[cfg(feature = "serde")]
#[test]
fn scope_names_serialise_as_strings() {
    let name = ScopeName::new("string.quoted.double");
    let json = serde_json::to_string(&name).unwrap_or_else(|err| panic!("serialise: {err}"));
    assert_eq!(json, "\"string.quoted.double\"");
    let back: ScopeName =
        serde_json::from_str(&json).unwrap_or_else(|err| panic!("deserialise: {err}"));
    assert_eq!(back, name);
}
