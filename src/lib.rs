//! Alignment and scoring engine for spoken-response evaluation.
//!
//! Given a reference sentence and a (possibly noisy, partial, or
//! over/under-captured) transcribed hypothesis of what a speaker said aloud,
//! the engine computes how well the hypothesis matches the reference —
//! tolerating word-order noise, small mis-transcriptions, homophone
//! substitutions, compound-word splits, and extraneous or missing words —
//! and exposes per-token hit/miss data plus a single scalar quality score.
//!
//! The pipeline: raw strings pass through [`canonicalize`], the [`align`]
//! search finds the best-scoring contiguous hypothesis window against the
//! reference (consuming tokens from a reference multiset with exact,
//! single-edit, and phonetic matching), and the resulting [`MatchResult`]
//! feeds [`project`] for visual feedback. A [`TranscriptSession`] stabilizes
//! streamed recognizer fragments into one running transcript between
//! alignment calls.
//!
//! Everything here is a pure computation over UTF-8 strings; the only
//! stateful object is the session-scoped [`TranscriptSession`].

pub mod align;
pub mod canonicalize;
pub mod fuzzy;
pub mod highlight;
pub mod matcher;
pub mod phonetics;
pub mod stabilize;

pub use align::{align, align_with, score, AlignerConfig, MatchResult, MatchWindow};
pub use canonicalize::canonicalize;
pub use fuzzy::{classify, equivalent, MatchKind};
pub use highlight::{project, HighlightTarget, SimpleUnit};
pub use matcher::{PhoneticMatch, TokenCounts};
pub use phonetics::{phonetic_key, PhoneticKey};
pub use stabilize::{append_stable_final, FragmentUpdate, TranscriptSession};
