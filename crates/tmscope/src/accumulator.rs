//! Flattening a match and its captures into non-overlapping tokens.
//!
//! A match contributes layered ranges: the whole match with the scope of the
//! rule that produced it, then each scoped capture group. The layers nest, so
//! the accumulator cuts the match at every layer boundary and gives each
//! piece the scopes of all layers covering it, outer layers first.

use std::ops::Range;

use tmscope_selector::ScopeName;

use crate::grammar::Captures;
use crate::regex_engine::RegexMatch;
use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AccumulatorItem {
    range: Range<usize>,
    scope: Option<ScopeName>,
}

impl AccumulatorItem {
    const fn covers(&self, start: usize, end: usize) -> bool {
        self.range.start <= start && end <= self.range.end
    }
}

/// Layers of a single match, ready to be flattened.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScopeAccumulator {
    items: Vec<AccumulatorItem>,
}

impl ScopeAccumulator {
    /// Layer `found` under `bottom`, then every group named in `captures`.
    ///
    /// Groups absent from the match, empty, or outside the whole match are
    /// dropped; the rest are clipped to the whole match.
    pub(crate) fn new(found: &RegexMatch, bottom: Option<&ScopeName>, captures: &Captures) -> Self {
        let full = found.range();
        let mut items = vec![AccumulatorItem {
            range: full.clone(),
            scope: bottom.cloned(),
        }];
        for (&index, scope) in captures {
            let Some(group) = found.group(index) else {
                continue;
            };
            let range = group.start.max(full.start)..group.end.min(full.end);
            if range.is_empty() {
                continue;
            }
            items.push(AccumulatorItem {
                range,
                scope: Some(scope.clone()),
            });
        }
        Self { items }
    }

    /// Cut the layers into tokens, each prefixed with `ambient`.
    pub(crate) fn into_tokens(self, ambient: &[ScopeName]) -> Vec<Token> {
        let mut bounds: Vec<usize> = self
            .items
            .iter()
            .flat_map(|item| [item.range.start, item.range.end])
            .collect();
        bounds.sort_unstable();
        bounds.dedup();

        let mut tokens: Vec<Token> = Vec::new();
        for window in bounds.windows(2) {
            let &[start, end] = window else {
                continue;
            };
            // Every bound lies inside the whole match, so its layer always covers.
            let mut scopes = ambient.to_vec();
            for item in self.items.iter().filter(|item| item.covers(start, end)) {
                scopes.extend(item.scope.iter().cloned());
            }
            match tokens.last_mut() {
                Some(last) if last.range.end == start && last.scopes == scopes => {
                    last.range.end = end;
                }
                _ => tokens.push(Token::new(start..end, scopes)),
            }
        }
        tokens
    }
}
