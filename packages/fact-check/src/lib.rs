//! Multi-Source Claim Verification
//!
//! Takes a natural-language statement, pulls out the verifiable claims in
//! it, gathers evidence from independent sources in parallel, scores that
//! evidence for relevance and credibility, and combines everything into a
//! confidence-scored [`Verdict`].
//!
//! # Design
//!
//! - Always answers: source failures become missing evidence, pipeline
//!   failures become a fixed low-confidence verdict. "I don't know" is a low
//!   confidence plus an explanatory issue, never an error.
//! - Bounded: every source call has a timeout, the whole verification has a
//!   deadline, and each source has a per-minute admission budget.
//! - Deterministic without AI: an analyst is optional; a reproducible
//!   heuristic stands in when there is none.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fact_check::{Verifier, VerifierConfig};
//!
//! let verifier = Verifier::from_config(VerifierConfig::default())?;
//! let verdict = verifier
//!     .verify("Stanford University was founded in 1885", "")
//!     .await;
//!
//! println!("{} ({:.2})", verdict.status().label(), verdict.confidence);
//! ```
//!
//! # Modules
//!
//! - [`extract`] - Claim extraction and categorization
//! - [`sources`] - Evidence source trait and providers
//! - [`scoring`] - Relevance scoring, dedup and ranking
//! - [`aggregate`] - Verdict aggregation and override rules
//! - [`pipeline`] - The [`Verifier`] orchestrating all of the above
//! - [`cache`] - TTL result cache
//! - [`limiter`] - Per-source rate limiting
//! - [`testing`] - Mock implementations for testing

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod extract;
pub mod limiter;
pub mod pipeline;
pub mod scoring;
pub mod security;
pub mod sources;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use cache::{CacheKey, CacheStats, ResultCache};
pub use error::{CacheError, SourceError, VerifyError};
pub use limiter::RateLimiter;
pub use pipeline::{
    DegradedReason, Stage, Verification, VerificationOutcome, Verifier, VerifierBuilder,
};
pub use security::Credential;
pub use sources::{Analyst, EvidenceSource, SourceKind};
pub use types::{
    claim::{Category, Claim},
    config::{
        AggregationConfig, CacheConfig, ScoringConfig, SourceConfig, SourcesConfig,
        VerifierConfig,
    },
    evidence::{EvidenceResult, ScoredEvidence},
    verdict::{Analysis, SourceLink, Verdict, VerdictStatus},
};
