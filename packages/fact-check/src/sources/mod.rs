//! Evidence sources.
//!
//! Every provider sits behind the same [`EvidenceSource`] shape, keyed by the
//! closed [`SourceKind`] enumeration. Providers return errors honestly;
//! [`settle_query`] and [`settle_analysis`] apply the per-source timeout and
//! turn any failure into "no evidence" so one bad provider never sinks a
//! verification.
//!
//! # Implementations
//!
//! - [`WikipediaSource`] - encyclopedic lookup, no credential
//! - [`WorldBankSource`] - statistical indicators, no credential
//! - [`GoogleFactCheckSource`] - curated fact-check reviews, API key
//! - [`TavilySource`] - general web search, API key
//! - [`OpenAiAnalyst`] - AI analysis of the collected evidence, API key
//! - [`MockSource`](crate::testing::MockSource) - for testing

mod credibility;
mod fact_check;
mod openai;
mod tavily;
mod wikipedia;
mod world_bank;

pub use credibility::{credibility_for, UNKNOWN_DOMAIN_WEIGHT};
pub use fact_check::GoogleFactCheckSource;
pub use openai::OpenAiAnalyst;
pub use tavily::TavilySource;
pub use wikipedia::WikipediaSource;
pub use world_bank::WorldBankSource;

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{panic_message, SourceError, SourceResult};
use crate::types::claim::{Category, Claim};
use crate::types::evidence::{EvidenceResult, ScoredEvidence};
use crate::types::verdict::Analysis;

/// The kinds of evidence provider the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Encyclopedic lookup
    Encyclopedia,
    /// Statistical indicators (demographic and economic claims only)
    Statistics,
    /// Curated fact-check database
    FactCheck,
    /// Generic web search
    WebSearch,
    /// AI analysis of collected evidence
    AiAnalysis,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Encyclopedia,
        SourceKind::Statistics,
        SourceKind::FactCheck,
        SourceKind::WebSearch,
        SourceKind::AiAnalysis,
    ];

    /// Stable identifier used in logs and serialized output.
    pub fn id(&self) -> &'static str {
        match self {
            SourceKind::Encyclopedia => "encyclopedia",
            SourceKind::Statistics => "statistics",
            SourceKind::FactCheck => "fact_check",
            SourceKind::WebSearch => "web_search",
            SourceKind::AiAnalysis => "ai_analysis",
        }
    }

    /// Whether the provider is unusable without an API key.
    pub fn requires_credential(&self) -> bool {
        match self {
            SourceKind::Encyclopedia | SourceKind::Statistics => false,
            SourceKind::FactCheck | SourceKind::WebSearch | SourceKind::AiAnalysis => true,
        }
    }

    /// Whether this kind should be queried for a claim of `category`.
    pub fn handles(&self, category: Category) -> bool {
        match self {
            SourceKind::Statistics => category.is_statistical(),
            SourceKind::Encyclopedia
            | SourceKind::FactCheck
            | SourceKind::WebSearch
            | SourceKind::AiAnalysis => true,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A provider of evidence for claims.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Which kind of source this is (drives config, rate limits and dispatch).
    fn kind(&self) -> SourceKind;

    /// Query the provider for evidence about `claim`.
    ///
    /// Every returned item must carry a credibility weight from
    /// [`credibility_for`]; [`EvidenceResult::from_url`] does this.
    async fn query(&self, claim: &Claim) -> SourceResult<Vec<EvidenceResult>>;
}

/// A provider of structured judgments over collected evidence.
#[async_trait]
pub trait Analyst: Send + Sync {
    async fn analyze(&self, claim: &Claim, evidence: &[ScoredEvidence]) -> SourceResult<Analysis>;
}

/// Query a source within `timeout`, absorbing every failure.
pub async fn settle_query(
    source: &dyn EvidenceSource,
    claim: &Claim,
    timeout: Duration,
) -> Vec<EvidenceResult> {
    let kind = source.kind();
    let outcome = match tokio::time::timeout(timeout, source.query(claim)).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout { kind }),
    };

    match outcome {
        Ok(results) => {
            debug!(source = %kind, count = results.len(), "source returned evidence");
            results
        }
        Err(e) => {
            warn!(source = %kind, error = %e, "source query failed, continuing without it");
            Vec::new()
        }
    }
}

/// Run an analyst within `timeout`. `None` means "use the heuristic".
/// A panicking analyst counts as a failed one.
pub async fn settle_analysis(
    analyst: &dyn Analyst,
    claim: &Claim,
    evidence: &[ScoredEvidence],
    timeout: Duration,
) -> Option<Analysis> {
    let kind = SourceKind::AiAnalysis;
    let call = tokio::time::timeout(timeout, analyst.analyze(claim, evidence));
    let outcome = match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(SourceError::Timeout { kind }),
        Err(panic) => Err(SourceError::Panicked {
            kind,
            message: panic_message(panic.as_ref()),
        }),
    };

    match outcome {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            warn!(error = %e, "analysis failed, falling back to heuristic");
            None
        }
    }
}

/// Fail with [`SourceError::Status`] on non-success responses.
pub(crate) async fn read_body(response: reqwest::Response) -> SourceResult<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// Cut text to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAnalyst, MockSource};

    fn claim() -> Claim {
        Claim::new("Water boils at 100 degrees", Category::Scientific, "")
    }

    #[test]
    fn test_statistics_only_for_statistical_categories() {
        assert!(SourceKind::Statistics.handles(Category::Demographic));
        assert!(SourceKind::Statistics.handles(Category::Economic));
        assert!(!SourceKind::Statistics.handles(Category::Scientific));
        assert!(SourceKind::Encyclopedia.handles(Category::Scientific));
        assert!(SourceKind::FactCheck.handles(Category::General));
    }

    #[tokio::test]
    async fn test_settle_absorbs_errors() {
        let source = MockSource::new(SourceKind::WebSearch).failing();
        let results = settle_query(&source, &claim(), Duration::from_secs(1)).await;
        assert!(results.is_empty());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_absorbs_timeout() {
        let source = MockSource::new(SourceKind::Encyclopedia)
            .with_result("Boiling point", "https://en.wikipedia.org/wiki/Boiling_point", "100 C")
            .with_delay(Duration::from_secs(30));
        let results = settle_query(&source, &claim(), Duration::from_secs(5)).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_settle_passes_results_through() {
        let source = MockSource::new(SourceKind::Encyclopedia).with_result(
            "Boiling point",
            "https://en.wikipedia.org/wiki/Boiling_point",
            "Water boils at 100 degrees Celsius at sea level",
        );
        let results = settle_query(&source, &claim(), Duration::from_secs(5)).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].domain, "en.wikipedia.org");
    }

    #[tokio::test]
    async fn test_settle_analysis_absorbs_panic() {
        let analyst = MockAnalyst::scoring(0.9, 0.9).panicking();
        let analysis = settle_analysis(&analyst, &claim(), &[], Duration::from_secs(5)).await;
        assert!(analysis.is_none());
        assert_eq!(analyst.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_analysis_absorbs_timeout() {
        let analyst = MockAnalyst::scoring(0.9, 0.9).with_delay(Duration::from_secs(30));
        let analysis = settle_analysis(&analyst, &claim(), &[], Duration::from_secs(5)).await;
        assert!(analysis.is_none());
    }

    #[tokio::test]
    async fn test_settle_analysis_passes_analysis_through() {
        let analyst = MockAnalyst::scoring(0.8, 0.7);
        let analysis = settle_analysis(&analyst, &claim(), &[], Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(analysis.accuracy, 0.8);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
