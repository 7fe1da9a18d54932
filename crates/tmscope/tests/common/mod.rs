//! Grammars and invariant checks shared by the tokenizer behavioural tests.

use tmscope::{BeginEnd, Grammar, Rule, Token, captures};

/// `source` root with a double-quoted string rule.
pub fn quoted_grammar() -> Grammar {
    let mut builder = Grammar::builder();
    let root = builder.add(Rule::container().with_scope("source"));
    let string = builder.add(Rule::begin_end(BeginEnd::new("\"", "\"")).with_scope("string.quoted"));
    builder.push_pattern(root, string);
    builder.build(root)
}

/// C-like grammar with block comments, self-including blocks, calls with
/// captures, keywords and numbers.
pub fn c_like_grammar() -> Grammar {
    let mut builder = Grammar::builder();
    let root = builder.add(Rule::container().with_scope("source.c"));
    let statements = builder.add(Rule::container());
    let self_include = builder.add(Rule::include(root));
    let comment = builder.add(
        Rule::begin_end(
            BeginEnd::new(r"/\*", r"\*/").with_captures(captures([(0, "punctuation.definition.comment")])),
        )
        .with_scope("comment.block"),
    );
    let block = builder.add(
        Rule::begin_end(BeginEnd::new(r"\{", r"\}"))
            .with_scope("meta.block")
            .with_patterns(vec![self_include]),
    );
    let call = builder.add(
        Rule::matching_with_captures(
            r"(\w+)(\()",
            captures([(1, "entity.name.function"), (2, "punctuation.section.arguments")]),
        )
        .with_scope("meta.function-call"),
    );
    let keyword = builder.add(Rule::matching(r"\b(?:if|return)\b").with_scope("keyword.control"));
    let number = builder.add(Rule::matching(r"\d+").with_scope("constant.numeric"));
    builder.extend_patterns(statements, [keyword, call, number]);
    builder.extend_patterns(root, [comment, block, statements]);
    builder.build(root)
}

/// Describe the first way `tokens` fail to cover `line` exactly once, left
/// to right with non-empty tokens; `None` when coverage holds.
pub fn coverage_gap(line: &str, tokens: &[Token]) -> Option<String> {
    let mut next = 0;
    for token in tokens {
        if token.range.start != next {
            return Some(format!("expected a token at byte {next}, found {token:?}"));
        }
        if token.range.is_empty() {
            return Some(format!("empty token {token:?}"));
        }
        next = token.range.end;
    }
    (next != line.len()).then(|| format!("tokens stop at byte {next} of {}", line.len()))
}
