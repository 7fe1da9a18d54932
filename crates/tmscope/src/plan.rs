//! Candidate actions at a scan position and selection of the winner.
//!
//! Plans are rebuilt from the innermost open rule on every step: the rule's
//! own end pattern first, then every reachable child in declaration order.
//! The earliest match wins and ties go to the plan collected first, so grammar
//! authors list more specific rules before general ones.

use hashbrown::HashSet;

use crate::grammar::{Grammar, RuleId, RuleKind};
use crate::regex_engine::{PatternCache, PatternMatcher, RegexEngine, RegexMatch};
use crate::state::MatchStateStack;

/// What applying a plan does to the state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanKind {
    /// Scope a plain match; nothing stays open.
    Match,
    /// Open a begin/end rule.
    Begin,
    /// Close the innermost begin/end rule.
    End,
}

/// A rule-derived pattern that could fire at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPlan<'a> {
    kind: PlanKind,
    rule: RuleId,
    pattern: &'a str,
    resolved: bool,
}

impl<'a> MatchPlan<'a> {
    /// A plan applying `rule` as `kind` when `pattern` matches.
    #[must_use]
    pub const fn new(kind: PlanKind, rule: RuleId, pattern: &'a str) -> Self {
        Self {
            kind,
            rule,
            pattern,
            resolved: false,
        }
    }

    /// An end plan whose pattern was resolved against the begin match of
    /// the open state.
    #[must_use]
    pub const fn resolved_end(rule: RuleId, pattern: &'a str) -> Self {
        Self {
            kind: PlanKind::End,
            rule,
            pattern,
            resolved: true,
        }
    }

    /// How the plan changes the stack.
    #[must_use]
    pub const fn kind(&self) -> PlanKind {
        self.kind
    }

    /// The rule the plan belongs to.
    #[must_use]
    pub const fn rule(&self) -> RuleId {
        self.rule
    }

    /// The pattern searched for.
    #[must_use]
    pub const fn pattern(&self) -> &'a str {
        self.pattern
    }

    /// Whether the pattern depends on an earlier begin match.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }
}

/// The winning plan together with the match it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    kind: PlanKind,
    rule: RuleId,
    found: RegexMatch,
}

impl MatchResult {
    /// Pair `plan` with the match it produced.
    #[must_use]
    pub const fn new(plan: &MatchPlan<'_>, found: RegexMatch) -> Self {
        Self {
            kind: plan.kind,
            rule: plan.rule,
            found,
        }
    }

    /// How the winning plan changes the stack.
    #[must_use]
    pub const fn kind(&self) -> PlanKind {
        self.kind
    }

    /// The rule of the winning plan.
    #[must_use]
    pub const fn rule(&self) -> RuleId {
        self.rule
    }

    /// The regex match.
    #[must_use]
    pub const fn found(&self) -> &RegexMatch {
        &self.found
    }
}

/// Collect the plans available while the innermost state of `stack` is open.
///
/// `include` rules and condition-less containers are expanded in place; a
/// container or include already expanded during this collection is skipped,
/// which keeps cyclic grammars finite without changing which plan wins.
#[must_use]
pub fn collect_plans<'a>(grammar: &'a Grammar, stack: &'a MatchStateStack) -> Vec<MatchPlan<'a>> {
    let top = stack.top();
    let mut plans = Vec::new();
    let Some(active) = grammar.rule(top.rule()) else {
        log::warn!("open rule {:?} is missing from the grammar", top.rule());
        return plans;
    };
    if let Some(condition) = active.condition() {
        plans.push(top.end_pattern().map_or_else(
            || MatchPlan::new(PlanKind::End, top.rule(), condition.end()),
            |resolved| MatchPlan::resolved_end(top.rule(), resolved),
        ));
    }
    let mut expanded = HashSet::new();
    expanded.insert(top.rule());
    expand_patterns(grammar, active.patterns(), &mut expanded, &mut plans);
    plans
}

fn expand_patterns<'a>(
    grammar: &'a Grammar,
    children: &[RuleId],
    expanded: &mut HashSet<RuleId>,
    plans: &mut Vec<MatchPlan<'a>>,
) {
    for &child in children {
        let Some(rule) = grammar.rule(child) else {
            log::warn!("pattern refers to missing rule {child:?}");
            continue;
        };
        match rule.kind() {
            RuleKind::Match { pattern, .. } => {
                plans.push(MatchPlan::new(PlanKind::Match, child, pattern));
            }
            RuleKind::Scope(Some(condition)) => {
                plans.push(MatchPlan::new(PlanKind::Begin, child, condition.begin()));
            }
            RuleKind::Include(target) => {
                if expanded.insert(child) {
                    expand_patterns(grammar, std::slice::from_ref(target), expanded, plans);
                } else {
                    log::debug!("include {child:?} already expanded; skipping");
                }
            }
            RuleKind::Scope(None) => {
                if expanded.insert(child) {
                    expand_patterns(grammar, rule.patterns(), expanded, plans);
                } else {
                    log::debug!("container {child:?} already expanded; skipping");
                }
            }
        }
    }
}

/// Search every plan from `from` and return the earliest match.
///
/// Every plan is compiled before any search runs, so a broken pattern
/// reachable from the open state fails the step whatever the line holds.
/// Ties keep the plan that comes first in `plans`. A match starting at
/// `from` cannot be beaten, so the search stops there.
///
/// # Errors
/// Propagates the engine's error when a pattern fails to compile.
pub fn find_best_match<E>(
    plans: &[MatchPlan<'_>],
    line: &str,
    from: usize,
    engine: &E,
    cache: &mut PatternCache<E::Matcher>,
) -> Result<Option<MatchResult>, E::Error>
where
    E: RegexEngine,
{
    for plan in plans {
        matcher_for(plan, engine, cache)?;
    }
    let mut best: Option<MatchResult> = None;
    for plan in plans {
        let matcher = matcher_for(plan, engine, cache)?;
        let Some(found) = matcher.search(line, from) else {
            continue;
        };
        if best
            .as_ref()
            .is_none_or(|current| found.start() < current.found.start())
        {
            let immediate = found.start() == from;
            best = Some(MatchResult::new(plan, found));
            if immediate {
                break;
            }
        }
    }
    Ok(best)
}

fn matcher_for<'c, E>(
    plan: &MatchPlan<'_>,
    engine: &E,
    cache: &'c mut PatternCache<E::Matcher>,
) -> Result<&'c E::Matcher, E::Error>
where
    E: RegexEngine,
{
    if plan.is_resolved() {
        cache.get_or_compile_resolved(engine, plan.pattern())
    } else {
        cache.get_or_compile(engine, plan.pattern())
    }
}
