//! Pipeline stages and terminal outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::verdict::Verdict;

/// Confidence of the verdict returned when orchestration itself fails.
pub const FAILED_CONFIDENCE: f32 = 0.25;

/// Issue carried by the failure verdict.
pub const FAILED_ISSUE: &str = "error during fact-checking";

/// Stages a verification passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CacheCheck,
    Extracting,
    Dispatching,
    Scoring,
    Aggregating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CacheCheck => "cache_check",
            Stage::Extracting => "extracting",
            Stage::Dispatching => "dispatching",
            Stage::Scoring => "scoring",
            Stage::Aggregating => "aggregating",
        };
        f.write_str(name)
    }
}

/// Why a verification ended early with a default verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    /// The statement holds nothing checkable (opinion, empty, no claim shape)
    NoClaims,
    /// No enabled source handles this category
    NoSources,
    /// Sources were asked but none returned anything
    NoEvidence,
}

impl DegradedReason {
    pub fn confidence(&self) -> f32 {
        match self {
            DegradedReason::NoClaims => 0.2,
            DegradedReason::NoSources | DegradedReason::NoEvidence => 0.3,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DegradedReason::NoClaims => "No verifiable claims found",
            DegradedReason::NoSources => "No enabled sources for this fact type",
            DegradedReason::NoEvidence => "No evidence found from available sources",
        }
    }

    /// Whether a later retry could do better. Retryable outcomes aren't cached.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DegradedReason::NoEvidence)
    }

    /// The default verdict for this reason.
    pub fn verdict(&self) -> Verdict {
        Verdict::builder(self.confidence())
            .issue(self.message())
            .explanation(self.message())
            .build()
    }
}

/// How a verification ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum VerificationOutcome {
    /// Served from the result cache
    FromCache,
    /// Evidence gathered and aggregated
    Fresh,
    /// Ended early with a default verdict
    Degraded(DegradedReason),
    /// Orchestration failed; the fixed fallback verdict was returned
    Failed,
}

impl VerificationOutcome {
    /// Whether the verdict may be stored in the result cache.
    pub fn is_cacheable(&self) -> bool {
        match self {
            VerificationOutcome::Fresh => true,
            VerificationOutcome::Degraded(reason) => !reason.is_retryable(),
            VerificationOutcome::FromCache | VerificationOutcome::Failed => false,
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationOutcome::FromCache => f.write_str("from_cache"),
            VerificationOutcome::Fresh => f.write_str("fresh"),
            VerificationOutcome::Degraded(reason) => write!(f, "degraded({:?})", reason),
            VerificationOutcome::Failed => f.write_str("failed"),
        }
    }
}

/// A verdict plus how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub verdict: Verdict,
    pub outcome: VerificationOutcome,
}

impl Verification {
    pub(crate) fn degraded(reason: DegradedReason) -> Self {
        Self {
            verdict: reason.verdict(),
            outcome: VerificationOutcome::Degraded(reason),
        }
    }

    pub(crate) fn failed() -> Self {
        Self {
            verdict: Verdict::builder(FAILED_CONFIDENCE)
                .issue(FAILED_ISSUE)
                .explanation("Verification could not be completed")
                .build(),
            outcome: VerificationOutcome::Failed,
        }
    }
}
