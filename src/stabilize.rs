//! Incremental transcript stabilization for streaming recognition.
//!
//! Recognition engines emit a stream of "final" fragments that overlap,
//! re-transcribe, or stutter. [`append_stable_final`] merges one fragment
//! into the running stable transcript; [`TranscriptSession`] owns that
//! state for the lifetime of a listening session.

use crate::canonicalize::canonicalize;
use crate::fuzzy::equivalent;
use serde::Serialize;
use tracing::debug;

/// Merge one finalized recognizer fragment into the stable transcript.
///
/// Both sides are canonicalized. A fragment that re-transcribes everything
/// stable (or is itself already contained) replaces wholesale; otherwise
/// the longest fuzzy suffix-of-stable / prefix-of-fragment token overlap is
/// spliced; with no overlap at all, the longer side wins. Adjacent
/// identical tokens always collapse to one occurrence — recognizer stutter,
/// not legitimate repeats spoken far apart.
pub fn append_stable_final(stable: &str, fragment: &str) -> String {
    let a = canonicalize(stable);
    let b = canonicalize(fragment);

    if b.is_empty() {
        return dedup(&a).join(" ");
    }
    if a.is_empty() {
        return dedup(&b).join(" ");
    }

    let joined_a = a.join(" ");
    let joined_b = b.join(" ");

    if joined_b.contains(&joined_a) {
        debug!("fragment re-transcribes the stable text, replacing");
        return dedup(&b).join(" ");
    }
    if joined_a.contains(&joined_b) {
        debug!("fragment already contained in stable text");
        return dedup(&a).join(" ");
    }

    // Longest overlap first, down to a single token.
    let max_overlap = a.len().min(b.len());
    for overlap in (1..=max_overlap).rev() {
        let suffix = &a[a.len() - overlap..];
        let prefix = &b[..overlap];
        if suffix
            .iter()
            .zip(prefix.iter())
            .all(|(s, p)| equivalent(s, p))
        {
            debug!(overlap, "merging fragment on token overlap");
            let mut merged = a.clone();
            merged.extend_from_slice(&b[overlap..]);
            return dedup(&merged).join(" ");
        }
    }

    debug!("no overlap found, keeping the longer side");
    if b.len() > a.len() {
        dedup(&b).join(" ")
    } else {
        dedup(&a).join(" ")
    }
}

/// Collapse runs of adjacent identical tokens to one occurrence.
fn dedup(tokens: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if out.last() != Some(token) {
            out.push(token.clone());
        }
    }
    out
}

/// Streaming update payload: the running stable transcript plus whatever
/// transient interim text the recognizer just produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FragmentUpdate {
    pub stable_text: String,
    pub interim_text: String,
}

/// Session-scoped stabilization state: one running stable transcript per
/// recognition session. Created when listening starts, mutated once per
/// finalized fragment, discarded when the session ends. Each session owns
/// its state exclusively; fragments are folded in to completion one at a
/// time.
#[derive(Debug, Default)]
pub struct TranscriptSession {
    stable: String,
}

impl TranscriptSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the stable transcript for a new session.
    pub fn reset(&mut self) {
        self.stable.clear();
    }

    pub fn stable_text(&self) -> &str {
        &self.stable
    }

    /// Fold one recognizer fragment into the session. Final fragments merge
    /// into the stable transcript; non-final fragments are reported as
    /// transient interim text and never merged.
    pub fn append_fragment(&mut self, fragment: &str, is_final: bool) -> FragmentUpdate {
        if is_final {
            self.stable = append_stable_final(&self.stable, fragment);
            FragmentUpdate {
                stable_text: self.stable.clone(),
                interim_text: String::new(),
            }
        } else {
            FragmentUpdate {
                stable_text: self.stable.clone(),
                interim_text: fragment.trim().to_string(),
            }
        }
    }
}
