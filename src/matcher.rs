//! Order-tolerant reconciliation of hypothesis tokens against a reference
//! multiset.
//!
//! The reference becomes a remaining-count map; hypothesis tokens consume
//! from it left to right, exact match first, then the first remaining entry
//! (in reference order) that passes fuzzy equivalence. Whatever is left
//! unconsumed is missing; whatever matched non-exactly is recorded so the
//! caller can surface homophone/near-miss feedback.

use crate::fuzzy::{classify, MatchKind};
use serde::Serialize;

/// A reference/hypothesis token pairing that matched by something other
/// than exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneticMatch {
    pub reference: String,
    pub hypothesis: String,
}

/// Insertion-ordered token multiset.
///
/// Entries keep the order tokens were first inserted (reference order),
/// which makes fuzzy consumption deterministic: ties go to the
/// earliest-inserted remaining entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenCounts {
    entries: Vec<(String, usize)>,
}

impl TokenCounts {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut counts = Self::default();
        for token in tokens {
            counts.add(token.as_ref());
        }
        counts
    }

    pub fn add(&mut self, token: &str) {
        match self.entries.iter_mut().find(|(t, _)| t == token) {
            Some(entry) => entry.1 += 1,
            None => self.entries.push((token.to_string(), 1)),
        }
    }

    pub fn count(&self, token: &str) -> usize {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Consume one occurrence of exactly `token`, if any remain.
    pub fn consume_exact(&mut self, token: &str) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|(t, n)| *n > 0 && t == token)
        {
            Some(entry) => {
                entry.1 -= 1;
                true
            }
            None => false,
        }
    }

    /// Consume one occurrence of the first remaining entry (insertion order)
    /// equivalent to `token`, returning the consumed entry's token and how
    /// it matched.
    pub fn consume_equivalent(&mut self, token: &str) -> Option<(String, MatchKind)> {
        for (t, n) in self.entries.iter_mut() {
            if *n == 0 {
                continue;
            }
            if let Some(kind) = classify(token, t.as_str()) {
                *n -= 1;
                return Some((t.clone(), kind));
            }
        }
        None
    }

    /// Put one occurrence back (highlight rollback).
    pub fn restore(&mut self, token: &str) {
        self.add(token);
    }

    /// Each token repeated by its remaining count, in insertion order.
    pub fn flatten(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(t, n)| std::iter::repeat(t.clone()).take(*n))
            .collect()
    }
}

/// Outcome of reconciling one hypothesis window against the reference.
#[derive(Debug, Clone, Default)]
pub(crate) struct WindowMatch {
    /// Reference-side tokens consumed, in the order they were matched.
    pub matched: Vec<String>,
    /// How many times each reference token was consumed.
    pub matched_counts: TokenCounts,
    /// Leftover reference tokens, repeated by remaining count.
    pub missing: Vec<String>,
    /// Every non-exact acceptance, reference paired with hypothesis.
    pub phonetic_matches: Vec<PhoneticMatch>,
}

pub(crate) fn match_window(reference: &[String], window: &[String]) -> WindowMatch {
    let mut remaining = TokenCounts::from_tokens(reference);
    let mut outcome = WindowMatch::default();

    for hyp in window {
        if remaining.consume_exact(hyp) {
            outcome.matched.push(hyp.clone());
            outcome.matched_counts.add(hyp);
        } else if let Some((reference_token, _kind)) = remaining.consume_equivalent(hyp) {
            outcome.matched_counts.add(&reference_token);
            outcome.phonetic_matches.push(PhoneticMatch {
                reference: reference_token.clone(),
                hypothesis: hyp.clone(),
            });
            outcome.matched.push(reference_token);
        }
        // Anything else is extra hypothesis content; precision already pays
        // for it.
    }

    outcome.missing = remaining.flatten();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_counts_preserve_insertion_order() {
        let counts = TokenCounts::from_tokens(&toks("the cat the hat"));
        assert_eq!(counts.count("the"), 2);
        assert_eq!(counts.count("cat"), 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.flatten(), toks("the the cat hat"));
    }

    #[test]
    fn test_consume_and_restore() {
        let mut counts = TokenCounts::from_tokens(&toks("a b"));
        assert!(counts.consume_exact("a"));
        assert!(!counts.consume_exact("a"));
        counts.restore("a");
        assert!(counts.consume_exact("a"));
    }

    #[test]
    fn test_exact_match_consumes_all() {
        let reference = toks("the cat sat");
        let outcome = match_window(&reference, &reference);
        assert_eq!(outcome.matched, reference);
        assert!(outcome.missing.is_empty());
        assert!(outcome.phonetic_matches.is_empty());
    }

    #[test]
    fn test_fuzzy_match_recorded_as_non_exact() {
        let outcome = match_window(&toks("the cat"), &toks("the kat"));
        assert_eq!(outcome.matched, toks("the cat"));
        assert!(outcome.missing.is_empty());
        assert_eq!(
            outcome.phonetic_matches,
            vec![PhoneticMatch {
                reference: "cat".into(),
                hypothesis: "kat".into()
            }]
        );
    }

    #[test]
    fn test_unmatched_hypothesis_skipped() {
        let outcome = match_window(&toks("the cat"), &toks("a zebra cat"));
        assert_eq!(outcome.matched, toks("cat"));
        assert_eq!(outcome.missing, toks("the"));
    }

    #[test]
    fn test_fuzzy_tie_goes_to_earliest_reference_entry() {
        // "bat" is one edit from both "bad" and "bet"; reference order wins.
        let outcome = match_window(&toks("bad bet"), &toks("bat"));
        assert_eq!(outcome.matched, toks("bad"));
        assert_eq!(outcome.missing, toks("bet"));
    }

    #[test]
    fn test_duplicate_reference_tokens_consumed_per_occurrence() {
        let outcome = match_window(&toks("the the cat"), &toks("the cat"));
        assert_eq!(outcome.matched, toks("the cat"));
        assert_eq!(outcome.missing, toks("the"));
        assert_eq!(outcome.matched_counts.count("the"), 1);
    }

    #[test]
    fn test_exact_preferred_over_fuzzy() {
        // "cat" must take the exact reference entry even though "cut" was
        // inserted earlier.
        let outcome = match_window(&toks("cut cat"), &toks("cat"));
        assert_eq!(outcome.matched, toks("cat"));
        assert_eq!(outcome.missing, toks("cut"));
        assert!(outcome.phonetic_matches.is_empty());
    }
}
