//! The verification pipeline.
//!
//! # Flow
//!
//! ```text
//! statement ─► CacheCheck ─► Extracting ─► Dispatching ─► Scoring ─► Aggregating ─► Verdict
//!                  │              │              │                         │
//!                  └─ hit         └─ no claims   └─ no sources             └─ override / analysis
//! ```
//!
//! Dispatch fans out one task per (claim, source) pair on a
//! [`JoinSet`](tokio::task::JoinSet). Each task is bounded by its source's
//! timeout; the whole fan-out is bounded by the pipeline timeout, after which
//! stragglers are aborted and whatever arrived is used.
//!
//! Source failures never fail a verification. Orchestration errors and
//! panics are caught in [`Verifier::verify_with_outcome`] and turned into the
//! fixed fallback verdict, so callers always get a well-formed [`Verdict`].

mod batch;
mod outcome;

pub use outcome::{
    DegradedReason, Stage, Verification, VerificationOutcome, FAILED_CONFIDENCE, FAILED_ISSUE,
};

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::aggregate::{aggregate, apply_override, check_overrides};
use crate::cache::{CacheKey, ResultCache};
use crate::error::{panic_message, Result, VerifyError};
use crate::extract::{extract_claims, is_opinion};
use crate::limiter::RateLimiter;
use crate::scoring::{dedupe, rank, score};
use crate::sources::{
    settle_analysis, settle_query, Analyst, EvidenceSource, GoogleFactCheckSource, OpenAiAnalyst,
    SourceKind, TavilySource, WikipediaSource, WorldBankSource,
};
use crate::types::claim::Claim;
use crate::types::config::VerifierConfig;
use crate::types::evidence::{EvidenceResult, ScoredEvidence};
use crate::types::verdict::{Analysis, Verdict};

const USER_AGENT: &str = concat!("fact-check/", env!("CARGO_PKG_VERSION"));

/// Verifies statements against the configured evidence sources.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Verifier {
    config: VerifierConfig,
    sources: Vec<Arc<dyn EvidenceSource>>,
    analyst: Option<Arc<dyn Analyst>>,
    cache: Arc<ResultCache>,
    limiter: Arc<RateLimiter>,
}

impl Verifier {
    /// Start building a verifier with explicit components.
    pub fn builder(config: VerifierConfig) -> VerifierBuilder {
        VerifierBuilder::new(config)
    }

    /// Build a verifier with every provider the config makes available.
    ///
    /// Providers that are disabled, or that need a credential the config
    /// doesn't hold, are left out.
    pub fn from_config(config: VerifierConfig) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let sources = &config.sources;
        let credential = |kind: SourceKind| {
            if sources.is_available(kind) {
                sources.get(kind).credential.clone()
            } else {
                None
            }
        };

        let mut builder = VerifierBuilder::new(config.clone());

        if sources.is_available(SourceKind::Encyclopedia) {
            builder = builder.with_source(WikipediaSource::new().with_client(client.clone()));
        }
        if sources.is_available(SourceKind::Statistics) {
            builder = builder.with_source(WorldBankSource::new().with_client(client.clone()));
        }
        if let Some(key) = credential(SourceKind::FactCheck) {
            builder =
                builder.with_source(GoogleFactCheckSource::new(key).with_client(client.clone()));
        }
        if let Some(key) = credential(SourceKind::WebSearch) {
            builder = builder.with_source(TavilySource::new(key).with_client(client.clone()));
        }
        if let Some(key) = credential(SourceKind::AiAnalysis) {
            let mut analyst = OpenAiAnalyst::new(key).with_client(client.clone());
            if let Some(model) = &config.ai_model {
                analyst = analyst.with_model(model.clone());
            }
            builder = builder.with_analyst(analyst);
        }

        let verifier = builder.build();
        info!(
            sources = ?verifier.source_kinds(),
            analyst = verifier.analyst.is_some(),
            "verifier ready"
        );
        Ok(verifier)
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Kinds of the registered evidence sources, in registration order.
    pub fn source_kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }

    /// Verify a statement. Never fails; see [`Verifier::verify_with_outcome`].
    pub async fn verify(&self, statement: &str, context: &str) -> Verdict {
        self.verify_with_outcome(statement, context).await.verdict
    }

    /// Verify a statement and report how the verdict was reached.
    pub async fn verify_with_outcome(&self, statement: &str, context: &str) -> Verification {
        let started = Instant::now();

        let result = AssertUnwindSafe(self.run(statement, context, started))
            .catch_unwind()
            .await;

        let verification = match result {
            Ok(Ok(verification)) => verification,
            Ok(Err(e)) => {
                error!(error = %e, "verification failed, returning fallback verdict");
                Verification::failed()
            }
            Err(panic) => {
                let e = VerifyError::Panicked(panic_message(panic.as_ref()));
                error!(error = %e, "verification panicked, returning fallback verdict");
                Verification::failed()
            }
        };

        info!(
            outcome = %verification.outcome,
            confidence = verification.verdict.confidence,
            has_issues = verification.verdict.has_issues,
            sources = verification.verdict.source_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "verification complete"
        );
        verification
    }

    async fn run(&self, statement: &str, context: &str, started: Instant) -> Result<Verification> {
        debug!(stage = %Stage::CacheCheck, "checking cache");
        let key = CacheKey::new(statement, context);
        if let Some(verdict) = self.cache.get(&key)? {
            return Ok(Verification {
                verdict,
                outcome: VerificationOutcome::FromCache,
            });
        }

        let deadline = started + self.config.pipeline_timeout();
        let verification = self.evaluate(statement, context, deadline).await;

        if verification.outcome.is_cacheable() {
            self.cache.put(key, verification.verdict.clone())?;
        }
        Ok(verification)
    }

    async fn evaluate(&self, statement: &str, context: &str, deadline: Instant) -> Verification {
        debug!(stage = %Stage::Extracting, "extracting claims");
        let rule = check_overrides(statement);
        let extraction = extract_claims(statement, context);
        let category = extraction.category;
        let mut claims = extraction.claims;

        // Override statements are checkable even without a claim shape
        if claims.is_empty() && rule.is_some() && !is_opinion(statement) {
            let text = statement.trim().trim_end_matches(['.', '!', '?']);
            claims.push(Claim::new(text, category, context));
        }
        if claims.is_empty() {
            return Verification::degraded(DegradedReason::NoClaims);
        }
        debug!(claims = claims.len(), %category, "claims extracted");

        debug!(stage = %Stage::Dispatching, "dispatching sources");
        let selected: Vec<Arc<dyn EvidenceSource>> = self
            .sources
            .iter()
            .filter(|source| {
                let kind = source.kind();
                self.config.sources.get(kind).enabled && kind.handles(category)
            })
            .cloned()
            .collect();

        if selected.is_empty() {
            return match rule {
                Some(rule) => fresh(apply_override(rule, &[], &self.config.aggregation)),
                None => Verification::degraded(DegradedReason::NoSources),
            };
        }

        let gathered = self.gather(&claims, &selected, deadline).await;

        debug!(stage = %Stage::Scoring, "scoring evidence");
        let mut scored = Vec::new();
        for (claim_idx, results) in gathered {
            let claim = &claims[claim_idx];
            scored.extend(results.into_iter().map(|evidence| score(claim, evidence)));
        }
        let evidence = rank(dedupe(scored), self.config.scoring.max_evidence);
        debug!(kept = evidence.len(), "evidence ranked");

        debug!(stage = %Stage::Aggregating, "aggregating verdict");
        if let Some(rule) = rule {
            return fresh(apply_override(rule, &evidence, &self.config.aggregation));
        }
        if evidence.is_empty() {
            return Verification::degraded(DegradedReason::NoEvidence);
        }

        let primary = &claims[0];
        let analysis = self.analyze(primary, &evidence, deadline).await;
        fresh(aggregate(
            primary,
            &evidence,
            analysis,
            &self.config.aggregation,
        ))
    }

    /// Query every admitted (claim, source) pair until done or `deadline`.
    ///
    /// Results come back in dispatch order regardless of completion order.
    async fn gather(
        &self,
        claims: &[Claim],
        sources: &[Arc<dyn EvidenceSource>],
        deadline: Instant,
    ) -> Vec<(usize, Vec<EvidenceResult>)> {
        let mut tasks = JoinSet::new();

        for (claim_idx, claim) in claims.iter().enumerate() {
            for (source_idx, source) in sources.iter().enumerate() {
                let kind = source.kind();
                if !self.limiter.try_acquire(kind) {
                    debug!(source = %kind, "rate limited, skipping source");
                    continue;
                }

                let order = claim_idx * sources.len() + source_idx;
                let source = Arc::clone(source);
                let claim = claim.clone();
                let timeout = self.config.sources.get(kind).timeout();
                tasks.spawn(async move {
                    let results = settle_query(source.as_ref(), &claim, timeout).await;
                    (order, claim_idx, results)
                });
            }
        }

        let mut gathered = Vec::with_capacity(tasks.len());
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(done))) => gathered.push(done),
                Ok(Some(Err(e))) => warn!(error = %e, "source task did not complete"),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        pending = tasks.len(),
                        "pipeline deadline reached, abandoning pending sources"
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        gathered.sort_by_key(|(order, _, _)| *order);
        gathered
            .into_iter()
            .map(|(_, claim_idx, results)| (claim_idx, results))
            .collect()
    }

    /// Ask the analyst, if one is configured, admitted and there's time left.
    async fn analyze(
        &self,
        claim: &Claim,
        evidence: &[ScoredEvidence],
        deadline: Instant,
    ) -> Option<Analysis> {
        let analyst = self.analyst.as_ref()?;
        let config = self.config.sources.get(SourceKind::AiAnalysis);
        if !config.enabled {
            return None;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            debug!("no time left for analysis, using heuristic");
            return None;
        }
        if !self.limiter.try_acquire(SourceKind::AiAnalysis) {
            debug!("analysis rate limited, using heuristic");
            return None;
        }

        settle_analysis(analyst.as_ref(), claim, evidence, config.timeout().min(remaining)).await
    }
}

fn fresh(verdict: Verdict) -> Verification {
    Verification {
        verdict,
        outcome: VerificationOutcome::Fresh,
    }
}

/// Assembles a [`Verifier`] from injected components.
pub struct VerifierBuilder {
    config: VerifierConfig,
    sources: Vec<Arc<dyn EvidenceSource>>,
    analyst: Option<Arc<dyn Analyst>>,
    cache: Option<Arc<ResultCache>>,
    limiter: Option<Arc<RateLimiter>>,
}

impl VerifierBuilder {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            analyst: None,
            cache: None,
            limiter: None,
        }
    }

    /// Register an evidence source. It is queried only while its kind is
    /// enabled in the config.
    pub fn with_source(self, source: impl EvidenceSource + 'static) -> Self {
        self.with_shared_source(Arc::new(source))
    }

    pub fn with_shared_source(mut self, source: Arc<dyn EvidenceSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Set the analyst. Without one, the deterministic heuristic is used.
    pub fn with_analyst(mut self, analyst: impl Analyst + 'static) -> Self {
        self.analyst = Some(Arc::new(analyst));
        self
    }

    /// Share a cache between verifiers. Defaults to a fresh one from config.
    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Share a rate limiter between verifiers. Defaults to a fresh one from config.
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn build(self) -> Verifier {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResultCache::from_config(&self.config.cache)));
        let limiter = self
            .limiter
            .unwrap_or_else(|| Arc::new(RateLimiter::from_config(&self.config.sources)));

        Verifier {
            config: self.config,
            sources: self.sources,
            analyst: self.analyst,
            cache,
            limiter,
        }
    }
}
