//! Configuration types for the verification pipeline.
//!
//! Every constant the pipeline uses (timeouts, limits, weights, thresholds)
//! is a field here rather than a literal in the code.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::security::Credential;
use crate::sources::SourceKind;

/// Top-level configuration for a [`Verifier`](crate::Verifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Per-source settings
    pub sources: SourcesConfig,

    /// Result cache settings
    pub cache: CacheConfig,

    /// Evidence scoring settings
    pub scoring: ScoringConfig,

    /// Verdict aggregation settings
    pub aggregation: AggregationConfig,

    /// Wall-clock bound on one verification, across all sources.
    ///
    /// Default: 10 000 ms.
    pub pipeline_timeout_ms: u64,

    /// Chat model for the AI analyst. `None` uses the provider default.
    #[serde(default)]
    pub ai_model: Option<String>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            sources: SourcesConfig::default(),
            cache: CacheConfig::default(),
            scoring: ScoringConfig::default(),
            aggregation: AggregationConfig::default(),
            pipeline_timeout_ms: 10_000,
            ai_model: None,
        }
    }
}

impl VerifierConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pipeline-wide timeout.
    pub fn with_pipeline_timeout(mut self, timeout: Duration) -> Self {
        self.pipeline_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl_secs = ttl.as_secs();
        self
    }

    /// Set the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache.capacity = capacity;
        self
    }

    /// Set the confidence below which a verdict is flagged.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.aggregation.confidence_threshold = threshold;
        self
    }

    /// Set how many evidence items are kept per verification.
    pub fn with_max_evidence(mut self, max: usize) -> Self {
        self.scoring.max_evidence = max;
        self
    }

    /// Replace the settings for one source.
    pub fn with_source(mut self, kind: SourceKind, source: SourceConfig) -> Self {
        *self.sources.get_mut(kind) = source;
        self
    }

    /// Disable every source.
    pub fn with_all_sources_disabled(mut self) -> Self {
        for kind in SourceKind::ALL {
            self.sources.get_mut(kind).enabled = false;
        }
        self
    }

    /// Set the chat model used by the AI analyst.
    pub fn with_ai_model(mut self, model: impl Into<String>) -> Self {
        self.ai_model = Some(model.into());
        self
    }

    pub fn pipeline_timeout(&self) -> Duration {
        Duration::from_millis(self.pipeline_timeout_ms)
    }
}

/// Settings for one evidence source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Whether the source may be queried at all
    pub enabled: bool,

    /// API key, when the provider needs one. Never serialized.
    #[serde(skip)]
    pub credential: Option<Credential>,

    /// Admissions per rolling minute
    pub max_per_minute: u32,

    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl SourceConfig {
    /// Enabled source with the given rate limit and an 8 s timeout.
    pub fn enabled(max_per_minute: u32) -> Self {
        Self {
            enabled: true,
            credential: None,
            max_per_minute,
            timeout_ms: 8_000,
        }
    }

    /// Disabled source.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::enabled(0)
        }
    }

    /// Attach a credential. Blank tokens leave the source without one.
    pub fn with_credential(mut self, token: impl Into<String>) -> Self {
        self.credential = Credential::new(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_max_per_minute(mut self, max: u32) -> Self {
        self.max_per_minute = max;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Settings for every source kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub encyclopedia: SourceConfig,
    pub statistics: SourceConfig,
    pub fact_check: SourceConfig,
    pub web_search: SourceConfig,
    pub ai_analysis: SourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            encyclopedia: SourceConfig::enabled(60),
            statistics: SourceConfig::enabled(30),
            fact_check: SourceConfig::enabled(30),
            web_search: SourceConfig::enabled(20),
            ai_analysis: SourceConfig::enabled(10).with_timeout(Duration::from_secs(15)),
        }
    }
}

impl SourcesConfig {
    pub fn get(&self, kind: SourceKind) -> &SourceConfig {
        match kind {
            SourceKind::Encyclopedia => &self.encyclopedia,
            SourceKind::Statistics => &self.statistics,
            SourceKind::FactCheck => &self.fact_check,
            SourceKind::WebSearch => &self.web_search,
            SourceKind::AiAnalysis => &self.ai_analysis,
        }
    }

    pub fn get_mut(&mut self, kind: SourceKind) -> &mut SourceConfig {
        match kind {
            SourceKind::Encyclopedia => &mut self.encyclopedia,
            SourceKind::Statistics => &mut self.statistics,
            SourceKind::FactCheck => &mut self.fact_check,
            SourceKind::WebSearch => &mut self.web_search,
            SourceKind::AiAnalysis => &mut self.ai_analysis,
        }
    }

    /// Enabled, and holding a credential if the provider needs one.
    pub fn is_available(&self, kind: SourceKind) -> bool {
        let source = self.get(kind);
        source.enabled && (!kind.requires_credential() || source.credential.is_some())
    }
}

/// Settings for the result cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a verdict stays valid. Default: 15 minutes.
    pub ttl_secs: u64,

    /// Maximum cached verdicts. Default: 500.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            capacity: 500,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Settings for evidence scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Evidence items kept after ranking. Default: 5.
    pub max_evidence: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { max_evidence: 5 }
    }
}

/// Weights and caps for turning an analysis into a final confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Verdicts below this confidence are flagged. Default: 0.6.
    pub confidence_threshold: f32,

    /// Weight of the analysis accuracy. Default: 0.6.
    pub accuracy_weight: f32,

    /// Weight of the analysis confidence. Default: 0.3.
    pub confidence_weight: f32,

    /// Bonus per evidence item. Default: 0.06.
    pub count_bonus_per_source: f32,

    /// Cap on the evidence-count bonus. Default: 0.2.
    pub max_count_bonus: f32,

    /// Multiplier on average credibility. Default: 0.125 (full bonus at 0.8).
    pub credibility_bonus_weight: f32,

    /// Cap on the credibility bonus. Default: 0.1.
    pub max_credibility_bonus: f32,

    /// Ceiling for non-override verdicts. Default: 0.95.
    pub max_confidence: f32,

    /// Confidence pinned by a falsehood override. Default: 0.1.
    pub falsehood_confidence: f32,

    /// Confidence pinned by an established-truth override. Default: 0.99.
    pub established_truth_confidence: f32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            accuracy_weight: 0.6,
            confidence_weight: 0.3,
            count_bonus_per_source: 0.06,
            max_count_bonus: 0.2,
            credibility_bonus_weight: 0.125,
            max_credibility_bonus: 0.1,
            max_confidence: 0.95,
            falsehood_confidence: 0.1,
            established_truth_confidence: 0.99,
        }
    }
}
