//! Hit/miss projection of a match onto caller-owned display units.
//!
//! The engine never creates, destroys, or restyles display elements — it
//! only toggles a hit state on handles the caller provides, keeping the
//! matching logic independent of any rendering toolkit.

use crate::align::MatchResult;
use crate::matcher::TokenCounts;

/// A caller-owned visual element tied to one or more reference tokens.
pub trait HighlightTarget {
    /// Canonical tokens this unit represents. A unit may cover several
    /// tokens when the reference display fused them.
    fn tokens(&self) -> &[String];

    /// Toggle the unit's hit/miss state.
    fn mark(&mut self, hit: bool);
}

/// Ready-made display unit for callers (and tests) without their own
/// widget type.
#[derive(Debug, Clone)]
pub struct SimpleUnit {
    tokens: Vec<String>,
    pub hit: bool,
}

impl SimpleUnit {
    pub fn new<S: Into<String>>(tokens: impl IntoIterator<Item = S>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            hit: false,
        }
    }
}

impl HighlightTarget for SimpleUnit {
    fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn mark(&mut self, hit: bool) {
        self.hit = hit;
    }
}

/// Mark every display unit hit or miss against the match's consumed tokens.
///
/// Simple units share one working copy of the matched counts, so duplicated
/// reference words light up only as many units as were actually matched.
/// Chunk units are each judged against their own fresh copy, so
/// overlapping or competing groupings do not interfere with each other.
/// Units representing no tokens are always a miss.
pub fn project(
    result: &MatchResult,
    simple_units: &mut [impl HighlightTarget],
    chunk_units: &mut [impl HighlightTarget],
) {
    let mut shared = result.matched_counts.clone();
    for unit in simple_units.iter_mut() {
        let hit = consume_all(&mut shared, unit.tokens());
        unit.mark(hit);
    }

    for unit in chunk_units.iter_mut() {
        let mut scratch = result.matched_counts.clone();
        let hit = consume_all(&mut scratch, unit.tokens());
        unit.mark(hit);
    }
}

/// Try to consume every token of a unit, exact first then fuzzy, rolling
/// the attempt back when any token fails so later units see an untouched
/// multiset.
fn consume_all(counts: &mut TokenCounts, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let mut consumed: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if counts.consume_exact(token) {
            consumed.push(token.clone());
        } else if let Some((matched, _kind)) = counts.consume_equivalent(token) {
            consumed.push(matched);
        } else {
            for rollback in &consumed {
                counts.restore(rollback);
            }
            return false;
        }
    }
    true
}
