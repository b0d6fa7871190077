//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the verifier without
//! making real network calls. Mocks are cheap to clone and clones share call
//! tracking, so a test can hand one copy to the verifier and keep another for
//! assertions.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{SourceError, SourceResult};
use crate::sources::{Analyst, EvidenceSource, SourceKind};
use crate::types::claim::Claim;
use crate::types::evidence::{EvidenceResult, ScoredEvidence};
use crate::types::verdict::Analysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Succeed,
    Fail,
    Panic,
}

/// A mock evidence source for testing.
///
/// Returns the same configured evidence for every claim, optionally after a
/// delay (use `tokio::time::pause` to keep tests fast).
#[derive(Clone)]
pub struct MockSource {
    kind: SourceKind,
    results: Vec<EvidenceResult>,
    delay: Option<Duration>,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
    claims: Arc<Mutex<Vec<String>>>,
}

impl MockSource {
    /// Create a mock that returns no evidence.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            results: Vec::new(),
            delay: None,
            behavior: Behavior::Succeed,
            calls: Arc::new(AtomicUsize::new(0)),
            claims: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a result with a URL (domain and credibility derived from it).
    pub fn with_result(
        mut self,
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.results
            .push(EvidenceResult::from_url(self.kind, title, url, content));
        self
    }

    /// Add a prebuilt result.
    pub fn with_evidence(mut self, evidence: EvidenceResult) -> Self {
        self.results.push(evidence);
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every query with an HTTP error.
    pub fn failing(mut self) -> Self {
        self.behavior = Behavior::Fail;
        self
    }

    /// Panic inside every query.
    pub fn panicking(mut self) -> Self {
        self.behavior = Behavior::Panic;
        self
    }

    /// Number of queries received (across all clones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Claim texts received, in arrival order.
    pub fn queried_claims(&self) -> Vec<String> {
        self.claims
            .lock()
            .map(|claims| claims.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EvidenceSource for MockSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn query(&self, claim: &Claim) -> SourceResult<Vec<EvidenceResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut claims) = self.claims.lock() {
            claims.push(claim.text.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.behavior {
            Behavior::Succeed => Ok(self.results.clone()),
            Behavior::Fail => Err(SourceError::Http("mock source failure".into())),
            Behavior::Panic => panic!("mock source panicked"),
        }
    }
}

/// A mock analyst for testing.
#[derive(Clone)]
pub struct MockAnalyst {
    analysis: Analysis,
    delay: Option<Duration>,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl MockAnalyst {
    /// Create a mock that always returns `analysis`.
    pub fn new(analysis: Analysis) -> Self {
        Self {
            analysis,
            delay: None,
            behavior: Behavior::Succeed,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shorthand for an analysis with the given scores and explanation.
    pub fn scoring(accuracy: f32, confidence: f32) -> Self {
        Self::new(Analysis {
            accuracy,
            confidence,
            explanation: "Mock analysis".to_string(),
            ..Default::default()
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call, forcing the heuristic fallback.
    pub fn failing(mut self) -> Self {
        self.behavior = Behavior::Fail;
        self
    }

    /// Panic inside every call.
    pub fn panicking(mut self) -> Self {
        self.behavior = Behavior::Panic;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyst for MockAnalyst {
    async fn analyze(&self, _claim: &Claim, _evidence: &[ScoredEvidence]) -> SourceResult<Analysis> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.behavior {
            Behavior::Succeed => Ok(self.analysis.clone()),
            Behavior::Fail => Err(SourceError::MalformedResponse("mock analyst failure".into())),
            Behavior::Panic => panic!("mock analyst panicked"),
        }
    }
}
