//! Sliding-window alignment: find the contiguous hypothesis sub-range that
//! best represents an attempt at the reference.
//!
//! Hypotheses carry false starts, trailing chatter, or early stops; the
//! aligner searches windows of reference-comparable length (plus the full
//! hypothesis as a baseline) and keeps the best one. Candidates are ranked
//! by harmonic score over fixed denominators — the reference length and the
//! full hypothesis length — so windows compete on how much of the exchange
//! they explain rather than on per-window density; ties fall to length
//! closest to the reference, then to the earliest start. The winning
//! window's reported precision is the per-window value.

use crate::canonicalize::canonicalize;
use crate::matcher::{match_window, PhoneticMatch, TokenCounts, WindowMatch};
use serde::Serialize;
use tracing::debug;

/// Window-search tuning. Defaults give the engine's standard slack: at
/// least four tokens of play, scaling with half the reference length, with
/// windows capped at twice the reference length.
#[derive(Debug, Clone)]
pub struct AlignerConfig {
    /// Minimum slack in tokens regardless of reference length.
    pub slack_floor: usize,
    /// Slack as a fraction of the reference length, rounded up.
    pub slack_ratio: f64,
    /// Cap on window length as a multiple of the reference length.
    pub max_len_factor: usize,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            slack_floor: 4,
            slack_ratio: 0.5,
            max_len_factor: 2,
        }
    }
}

/// Half-open index range `[start, start + length)` over the hypothesis
/// token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchWindow {
    pub start: usize,
    pub length: usize,
    pub hyp_length: usize,
}

/// Everything one scoring call produces: recall/precision, the consumed and
/// missing reference tokens, the winning window and its tokens, and the
/// non-exact match pairs for feedback.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub recall: f64,
    pub precision: f64,
    /// Reference tokens consumed, in match order.
    pub matched: Vec<String>,
    /// Reference tokens never consumed.
    pub missing: Vec<String>,
    pub ref_count: usize,
    /// Hypothesis tokens inside the winning window.
    pub hyp_tokens: Vec<String>,
    /// The scored span: window tokens joined by single spaces.
    pub transcript: String,
    /// The literal (trimmed) hypothesis text, surrounding words included.
    pub source: String,
    pub matched_counts: TokenCounts,
    pub match_window: MatchWindow,
    pub phonetic_matches: Vec<PhoneticMatch>,
}

impl MatchResult {
    /// Scalar quality of this match.
    pub fn score(&self) -> f64 {
        score(self.ref_count, self.recall, self.precision)
    }
}

/// Harmonic-mean quality score: 1.0 when there was nothing to miss, 0.0
/// when nothing matched at all, F1 otherwise. The window shape never
/// affects the formula, so full-hypothesis scoring stays comparable to
/// windowed scoring.
pub fn score(ref_count: usize, recall: f64, precision: f64) -> f64 {
    if ref_count == 0 {
        return 1.0;
    }
    if recall + precision <= 0.0 {
        return 0.0;
    }
    2.0 * recall * precision / (recall + precision)
}

struct Candidate {
    start: usize,
    len: usize,
    rank_score: f64,
    rank_recall: f64,
    rank_precision: f64,
    outcome: WindowMatch,
}

/// Align a hypothesis against a reference with the default window slack.
pub fn align(reference: &str, hypothesis: &str) -> MatchResult {
    align_with(&AlignerConfig::default(), reference, hypothesis)
}

/// Align a hypothesis against a reference. Both inputs pass through the
/// identical canonicalization; the raw (trimmed) hypothesis survives as
/// `source` while `transcript` reflects only the winning window.
pub fn align_with(config: &AlignerConfig, reference: &str, hypothesis: &str) -> MatchResult {
    let ref_tokens = canonicalize(reference);
    let all_hyp = canonicalize(hypothesis);
    let r = ref_tokens.len();
    let h = all_hyp.len();

    // The full hypothesis is always the baseline candidate. An empty
    // reference stops here: every window would tie at zero matches and the
    // length tie-break would degenerate to a one-token span.
    let mut best = evaluate(&ref_tokens, &all_hyp, 0, h);

    if r > 0 && h > 0 {
        let slack = config
            .slack_floor
            .max((r as f64 * config.slack_ratio).ceil() as usize);
        let min_len = r.saturating_sub(slack).max(1);
        let max_len = min_len.max(h.min((r + slack).max((r * config.max_len_factor).max(1))));

        for len in min_len..=max_len {
            if len > h {
                break;
            }
            for start in 0..=(h - len) {
                let candidate = evaluate(&ref_tokens, &all_hyp, start, len);
                if beats(&candidate, &best, r) {
                    best = candidate;
                }
            }
        }
    }

    debug!(
        start = best.start,
        length = best.len,
        hyp_length = h,
        matched = best.outcome.matched.len(),
        "alignment window selected"
    );

    let window_tokens = all_hyp[best.start..best.start + best.len].to_vec();
    let transcript = window_tokens.join(" ");
    let matched_count = best.outcome.matched.len();
    let recall = if r == 0 {
        1.0
    } else {
        matched_count as f64 / r as f64
    };
    let precision = if best.len == 0 {
        1.0
    } else {
        matched_count as f64 / best.len as f64
    };

    MatchResult {
        recall,
        precision,
        matched: best.outcome.matched,
        missing: best.outcome.missing,
        ref_count: r,
        hyp_tokens: window_tokens,
        transcript,
        source: hypothesis.trim().to_string(),
        matched_counts: best.outcome.matched_counts,
        match_window: MatchWindow {
            start: best.start,
            length: best.len,
            hyp_length: h,
        },
        phonetic_matches: best.outcome.phonetic_matches,
    }
}

fn evaluate(reference: &[String], hypothesis: &[String], start: usize, len: usize) -> Candidate {
    let outcome = match_window(reference, &hypothesis[start..start + len]);
    let matched = outcome.matched.len();
    let rank_recall = if reference.is_empty() {
        1.0
    } else {
        matched as f64 / reference.len() as f64
    };
    let rank_precision = if hypothesis.is_empty() {
        1.0
    } else {
        matched as f64 / hypothesis.len() as f64
    };
    Candidate {
        start,
        len,
        rank_score: score(reference.len(), rank_recall, rank_precision),
        rank_recall,
        rank_precision,
        outcome,
    }
}

/// Strict-improvement cascade: score, recall, precision, window length
/// closest to the reference, earliest start.
fn beats(candidate: &Candidate, best: &Candidate, ref_len: usize) -> bool {
    if candidate.rank_score != best.rank_score {
        return candidate.rank_score > best.rank_score;
    }
    if candidate.rank_recall != best.rank_recall {
        return candidate.rank_recall > best.rank_recall;
    }
    if candidate.rank_precision != best.rank_precision {
        return candidate.rank_precision > best.rank_precision;
    }
    let candidate_gap = candidate.len.abs_diff(ref_len);
    let best_gap = best.len.abs_diff(ref_len);
    if candidate_gap != best_gap {
        return candidate_gap < best_gap;
    }
    candidate.start < best.start
}
