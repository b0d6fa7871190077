//! Evidence returned by sources and its scored form.

use serde::{Deserialize, Serialize};

use crate::sources::{credibility_for, SourceKind};

/// One piece of evidence from an evidence source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceResult {
    /// Which kind of source produced this item
    pub source: SourceKind,

    /// Title of the article, indicator or review
    pub title: String,

    /// Link to the evidence, when the provider has one
    pub url: Option<String>,

    /// Text compared against the claim
    pub content: String,

    /// Host the evidence came from (lowercase, no `www.`)
    pub domain: String,

    /// Static trust weight of `domain` (0.0-1.0)
    pub credibility_weight: f32,
}

impl EvidenceResult {
    /// Create evidence from a URL, deriving domain and credibility from it.
    ///
    /// Unparseable URLs keep the item but fall back to an empty domain and
    /// the unknown-domain weight.
    pub fn from_url(
        source: SourceKind,
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let domain = domain_of(&url).unwrap_or_default();
        Self {
            source,
            title: title.into(),
            credibility_weight: credibility_for(&domain),
            url: Some(url),
            content: content.into(),
            domain,
        }
    }

    /// Create evidence with no link, attributed to a named domain.
    pub fn without_url(
        source: SourceKind,
        title: impl Into<String>,
        domain: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let domain = normalize_domain(&domain.into());
        Self {
            source,
            title: title.into(),
            url: None,
            content: content.into(),
            credibility_weight: credibility_for(&domain),
            domain,
        }
    }
}

/// Extract the normalized host from a URL.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed.host_str().map(normalize_domain)
}

fn normalize_domain(host: &str) -> String {
    let host = host.trim().to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Evidence with its per-claim scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvidence {
    #[serde(flatten)]
    pub evidence: EvidenceResult,

    /// Textual overlap with the claim (0.0-1.0)
    pub relevance_score: f32,

    /// `relevance * 0.6 + credibility * 0.4`, always within 0.0-1.0
    pub overall_score: f32,
}

impl ScoredEvidence {
    /// Score evidence, clamping both inputs so the overall score stays in range.
    pub fn new(evidence: EvidenceResult, relevance_score: f32) -> Self {
        let relevance_score = relevance_score.clamp(0.0, 1.0);
        let credibility = evidence.credibility_weight.clamp(0.0, 1.0);
        Self {
            overall_score: relevance_score * 0.6 + credibility * 0.4,
            relevance_score,
            evidence,
        }
    }

    /// Credibility of the underlying evidence.
    pub fn credibility(&self) -> f32 {
        self.evidence.credibility_weight
    }

    /// Key used for ranking: `relevance * credibility`.
    pub fn rank_key(&self) -> f32 {
        self.relevance_score * self.evidence.credibility_weight
    }
}
