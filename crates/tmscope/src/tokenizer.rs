//! Line tokenizer driving match plans over a state stack.

use std::fmt;

use hashbrown::HashSet;

use crate::accumulator::ScopeAccumulator;
use crate::config::TokenizerOptions;
use crate::grammar::{Captures, Grammar, RuleId};
use crate::plan::{MatchResult, PlanKind, collect_plans, find_best_match};
use crate::regex_engine::{DefaultRegexEngine, PatternCache, RegexEngine, resolve_back_references};
use crate::state::{MatchState, MatchStateStack};
use crate::token::Token;

/// Tokens of one line and the stack to continue the next line with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    /// Tokens covering the line left to right.
    pub tokens: Vec<Token>,
    /// Open states after the line.
    pub stack: MatchStateStack,
}

/// Tokens of consecutive lines and the stack to continue after the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLines {
    /// Tokens of each line, in input order.
    pub lines: Vec<Vec<Token>>,
    /// Open states after the last line.
    pub stack: MatchStateStack,
}

/// Tokenizes lines against a grammar, caching compiled patterns across lines.
///
/// # Examples
/// ```
/// use tmscope::{BeginEnd, Grammar, Rule, Tokenizer};
///
/// let mut builder = Grammar::builder();
/// let root = builder.add(Rule::container().with_scope("source.demo"));
/// let string = builder.add(Rule::begin_end(BeginEnd::new("\"", "\"")).with_scope("string.quoted"));
/// builder.push_pattern(root, string);
/// let grammar = builder.build(root);
///
/// let mut tokenizer = Tokenizer::new(&grammar);
/// let line = r#"a "b" c"#;
/// let result = tokenizer
///     .tokenize_line(line, tokenizer.initial_stack())
///     .expect("grammar patterns compile");
/// let texts: Vec<_> = result.tokens.iter().filter_map(|token| token.text(line)).collect();
/// assert_eq!(texts, ["a ", "\"", "b", "\"", " c"]);
/// ```
pub struct Tokenizer<'g, E: RegexEngine = DefaultRegexEngine> {
    grammar: &'g Grammar,
    engine: E,
    cache: PatternCache<E::Matcher>,
    options: TokenizerOptions,
}

impl<E: RegexEngine> fmt::Debug for Tokenizer<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("rules", &self.grammar.len())
            .field("compiled_patterns", &self.cache.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'g> Tokenizer<'g> {
    /// A tokenizer using the `regex` crate.
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_engine(grammar, DefaultRegexEngine)
    }
}

impl<'g, E: RegexEngine> Tokenizer<'g, E> {
    /// A tokenizer compiling patterns with `engine`.
    ///
    /// Options are resolved from [`crate::config`] at this point.
    #[must_use]
    pub fn with_engine(grammar: &'g Grammar, engine: E) -> Self {
        Self {
            grammar,
            engine,
            cache: PatternCache::new(),
            options: TokenizerOptions::from_env(),
        }
    }

    /// Replace the resolved options.
    #[must_use]
    pub fn with_options(mut self, options: TokenizerOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> TokenizerOptions {
        self.options
    }

    /// The engine patterns are compiled with.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// The grammar being applied.
    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// The stack for the first line of a document.
    #[must_use]
    pub fn initial_stack(&self) -> MatchStateStack {
        MatchStateStack::for_grammar(self.grammar)
    }

    /// Tokenize `line` starting from `stack`.
    ///
    /// The returned tokens cover the whole line without gaps or overlaps.
    /// A zero-width match that repeats a plan already applied at the same
    /// position ends the line; the rest keeps the scopes open at that point.
    ///
    /// # Errors
    /// Propagates the engine's error when a grammar pattern fails to compile.
    pub fn tokenize_line(
        &mut self,
        line: &str,
        stack: MatchStateStack,
    ) -> Result<LineTokens, E::Error> {
        let mut stack = stack;
        let mut tokens = Vec::new();

        if let Some(limit) = self.options.max_line_length {
            if line.len() > limit {
                log::warn!(
                    "line of {} bytes exceeds the {limit} byte limit; not tokenized",
                    line.len()
                );
                extend_current_scope(&mut tokens, 0, line.len(), &stack);
                return Ok(LineTokens { tokens, stack });
            }
        }

        let mut pos = 0;
        let mut zero_width_steps: HashSet<(usize, PlanKind, RuleId)> = HashSet::new();
        loop {
            let best = {
                let plans = collect_plans(self.grammar, &stack);
                find_best_match(&plans, line, pos, &self.engine, &mut self.cache)?
            };
            let Some(result) = best else {
                break;
            };
            let found = result.found();
            extend_current_scope(&mut tokens, pos, found.start(), &stack);
            pos = found.start();

            if found.is_empty() {
                let step = (pos, result.kind(), result.rule());
                if !zero_width_steps.insert(step) {
                    log::warn!(
                        "grammar repeats a zero-width {:?} of rule {:?} at byte {pos}; \
                         leaving the rest of the line in the current scope",
                        result.kind(),
                        result.rule()
                    );
                    break;
                }
            }

            self.apply(&result, line, &mut stack, &mut tokens);
            pos = found.end();
        }
        extend_current_scope(&mut tokens, pos, line.len(), &stack);

        Ok(LineTokens { tokens, stack })
    }

    /// Tokenize consecutive lines, threading the stack from one to the next.
    ///
    /// # Errors
    /// Propagates the engine's error when a grammar pattern fails to compile.
    pub fn tokenize_lines<'l, I>(
        &mut self,
        lines: I,
        stack: MatchStateStack,
    ) -> Result<TokenizedLines, E::Error>
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut stack = stack;
        let mut all = Vec::new();
        for line in lines {
            let LineTokens {
                tokens,
                stack: next,
            } = self.tokenize_line(line, stack)?;
            all.push(tokens);
            stack = next;
        }
        Ok(TokenizedLines { lines: all, stack })
    }

    fn apply(
        &self,
        result: &MatchResult,
        line: &str,
        stack: &mut MatchStateStack,
        tokens: &mut Vec<Token>,
    ) {
        let found = result.found();
        log::trace!(
            "applying {:?} of rule {:?} at {:?}",
            result.kind(),
            result.rule(),
            found.range()
        );
        let Some(rule) = self.grammar.rule(result.rule()) else {
            log::warn!("matched rule {:?} is missing from the grammar", result.rule());
            return;
        };
        match result.kind() {
            PlanKind::Match => {
                stack.push(MatchState::new(result.rule(), rule.scope_name().cloned()));
                accumulate(result, rule.captures(), stack, tokens);
                stack.pop();
            }
            PlanKind::Begin => {
                let condition = rule.condition();
                let end_pattern = condition
                    .and_then(|condition| resolve_back_references(condition.end(), line, found));
                stack.push(
                    MatchState::new(result.rule(), rule.scope_name().cloned())
                        .with_end_pattern(end_pattern),
                );
                if let Some(condition) = condition {
                    accumulate(result, condition.begin_captures(), stack, tokens);
                }
            }
            PlanKind::End => {
                if let Some(condition) = rule.condition() {
                    accumulate(result, condition.end_captures(), stack, tokens);
                }
                if stack.pop().is_none() {
                    log::debug!("end pattern of the root rule matched; root state kept");
                }
            }
        }
    }
}

/// Scope the match against the innermost state, layered over every state
/// below it.
fn accumulate(
    result: &MatchResult,
    captures: &Captures,
    stack: &MatchStateStack,
    tokens: &mut Vec<Token>,
) {
    let ambient = stack.ambient_scope_names();
    let accumulator = ScopeAccumulator::new(result.found(), stack.top().scope_name(), captures);
    tokens.extend(accumulator.into_tokens(&ambient));
}

fn extend_current_scope(tokens: &mut Vec<Token>, start: usize, end: usize, stack: &MatchStateStack) {
    if start < end {
        tokens.push(Token::new(start..end, stack.scope_names()));
    }
}
