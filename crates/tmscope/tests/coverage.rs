//! Property tests: tokens cover generated lines exactly once.

mod common;

use proptest::prelude::*;
use tmscope::{Grammar, Token, TokenizedLines, Tokenizer, TokenizerOptions};

/// Characters the test grammars react to, plus filler.
const GRAMMAR_TEXT: &str = "[a-z0-9 \"{}()/*]{0,48}";

fn tokenizer(grammar: &Grammar) -> Tokenizer<'_> {
    Tokenizer::new(grammar).with_options(TokenizerOptions::default())
}

fn tokenize(grammar: &Grammar, line: &str) -> Vec<Token> {
    let mut tokenizer = tokenizer(grammar);
    tokenizer
        .tokenize_line(line, tokenizer.initial_stack())
        .unwrap_or_else(|err| panic!("grammar should compile: {err}"))
        .tokens
}

fn grammars() -> [Grammar; 2] {
    [common::quoted_grammar(), common::c_like_grammar()]
}

fn coverage_config() -> ProptestConfig {
    ProptestConfig::with_cases(256)
}

proptest! {
    #![proptest_config(coverage_config())]

    #[test]
    fn grammar_heavy_lines_are_covered(line in GRAMMAR_TEXT) {
        for grammar in grammars() {
            let tokens = tokenize(&grammar, &line);
            prop_assert_eq!(common::coverage_gap(&line, &tokens), None, "line {:?}", line);
        }
    }

    #[test]
    fn arbitrary_lines_are_covered(line in "\\PC{0,80}") {
        for grammar in grammars() {
            let tokens = tokenize(&grammar, &line);
            prop_assert_eq!(common::coverage_gap(&line, &tokens), None, "line {:?}", line);
        }
    }

    #[test]
    fn every_line_of_a_document_is_covered(
        lines in prop::collection::vec(GRAMMAR_TEXT, 0..6),
    ) {
        for grammar in grammars() {
            let mut tokenizer = tokenizer(&grammar);
            let TokenizedLines { lines: tokenized, stack } = tokenizer
                .tokenize_lines(lines.iter().map(String::as_str), tokenizer.initial_stack())
                .unwrap_or_else(|err| panic!("grammar should compile: {err}"));
            prop_assert_eq!(tokenized.len(), lines.len());
            for (line, tokens) in lines.iter().zip(&tokenized) {
                prop_assert_eq!(common::coverage_gap(line, tokens), None, "line {:?}", line);
            }
            prop_assert!(stack.depth() >= 1);
        }
    }

    #[test]
    fn tokenizing_is_deterministic(line in GRAMMAR_TEXT) {
        let grammar = common::c_like_grammar();
        prop_assert_eq!(tokenize(&grammar, &line), tokenize(&grammar, &line));
    }
}
