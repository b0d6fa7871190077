//! End-to-end tests for the verification pipeline.
//!
//! Every test runs against mock sources, so nothing here touches the network.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use fact_check::{
    testing::{MockAnalyst, MockSource},
    DegradedReason, RateLimiter, SourceConfig, SourceKind, VerificationOutcome, Verifier,
    VerifierConfig,
};

const STANFORD: &str = "Stanford University was founded in 1885";
const ABSOLUTE: &str = "100% of people believe everything they read on the internet.";
const OPINION: &str = "I think this might be true.";

/// Helper to create an encyclopedia source that knows about Stanford.
fn encyclopedia() -> MockSource {
    MockSource::new(SourceKind::Encyclopedia).with_result(
        "Stanford University",
        "https://en.wikipedia.org/wiki/Stanford_University",
        "Stanford University is a private research university in Stanford, California. \
         It was founded in 1885 by Leland and Jane Stanford.",
    )
}

fn web_search() -> MockSource {
    MockSource::new(SourceKind::WebSearch).with_result(
        "Internet literacy survey",
        "https://www.pewresearch.org/internet/2023/literacy",
        "Most adults say they check the source of news they read online.",
    )
}

#[tokio::test]
async fn test_well_sourced_claim_is_confident() {
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .build();

    let result = verifier.verify_with_outcome(STANFORD, "").await;

    assert_eq!(result.outcome, VerificationOutcome::Fresh);
    assert!(result.verdict.confidence >= 0.7, "{}", result.verdict.confidence);
    assert!(!result.verdict.has_issues);
    assert!(result.verdict.issues.is_empty());
    assert_eq!(result.verdict.sources, vec!["en.wikipedia.org"]);
    assert_eq!(
        result.verdict.source_links[0].url,
        "https://en.wikipedia.org/wiki/Stanford_University"
    );
}

#[tokio::test]
async fn test_summary_without_every_claim_word_still_confident() {
    // The summary never mentions Leland
    let source = MockSource::new(SourceKind::Encyclopedia).with_result(
        "Stanford University",
        "https://en.wikipedia.org/wiki/Stanford_University",
        "Stanford University, founded in 1885, is a private research university in California.",
    );
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(source.clone())
        .build();

    let result = verifier
        .verify_with_outcome("Stanford University was founded in 1885 by Leland Stanford.", "")
        .await;

    assert_eq!(result.outcome, VerificationOutcome::Fresh);
    assert_eq!(
        source.queried_claims(),
        vec!["Stanford University was founded in 1885 by Leland Stanford"]
    );
    assert!(result.verdict.confidence >= 0.7, "{}", result.verdict.confidence);
    assert!(!result.verdict.has_issues);
}

#[tokio::test]
async fn test_panicking_analyst_keeps_gathered_evidence() {
    let analyst = MockAnalyst::scoring(0.9, 0.9).panicking();
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .with_analyst(analyst.clone())
        .build();

    let result = verifier.verify_with_outcome(STANFORD, "").await;

    assert_eq!(analyst.call_count(), 1);
    assert_eq!(result.outcome, VerificationOutcome::Fresh);
    assert_eq!(result.verdict.sources, vec!["en.wikipedia.org"]);
    assert!(result.verdict.confidence >= 0.7);
    assert!(result.verdict.explanation.starts_with("Based on 1 source"));
}

#[tokio::test]
async fn test_absolute_claim_is_overridden_but_attributed() {
    let search = web_search();
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .with_source(search.clone())
        .build();

    let verdict = verifier.verify(ABSOLUTE, "").await;

    assert!(verdict.confidence <= 0.2);
    assert!(verdict.confidence >= 0.1);
    assert!(verdict.has_issues);
    assert!(verdict
        .issues
        .iter()
        .any(|issue| issue.to_lowercase().contains("absolute")));
    // Evidence is still gathered for transparency
    assert_eq!(search.call_count(), 1);
    assert!(verdict.sources.contains(&"pewresearch.org".to_string()));
}

#[tokio::test]
async fn test_opinion_has_no_claims() {
    let source = encyclopedia();
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(source.clone())
        .build();

    let result = verifier.verify_with_outcome(OPINION, "").await;

    assert_eq!(
        result.outcome,
        VerificationOutcome::Degraded(DegradedReason::NoClaims)
    );
    assert_eq!(result.verdict.confidence, 0.2);
    assert_eq!(result.verdict.issues, vec!["No verifiable claims found"]);
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn test_all_sources_disabled() {
    let config = VerifierConfig::default()
        .with_all_sources_disabled()
        .with_pipeline_timeout(Duration::from_secs(10));
    let source = encyclopedia();
    let verifier = Verifier::builder(config).with_source(source.clone()).build();

    let started = Instant::now();
    let result = verifier.verify_with_outcome(STANFORD, "").await;

    assert_eq!(
        result.outcome,
        VerificationOutcome::Degraded(DegradedReason::NoSources)
    );
    assert_eq!(result.verdict.confidence, 0.3);
    assert_eq!(
        result.verdict.issues,
        vec!["No enabled sources for this fact type"]
    );
    assert!(result.verdict.sources.is_empty());
    assert_eq!(result.verdict.source_count, 0);
    assert_eq!(source.call_count(), 0);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_from_config_with_everything_disabled_builds_no_providers() {
    let verifier = Verifier::from_config(VerifierConfig::default().with_all_sources_disabled())
        .expect("client builds");
    assert!(verifier.source_kinds().is_empty());

    let verdict = verifier.verify(STANFORD, "").await;
    assert_eq!(verdict.confidence, 0.3);
}

#[tokio::test]
async fn test_from_config_skips_keyed_providers_without_keys() {
    let verifier = Verifier::from_config(VerifierConfig::default()).expect("client builds");
    assert_eq!(
        verifier.source_kinds(),
        vec![SourceKind::Encyclopedia, SourceKind::Statistics]
    );
}

#[tokio::test]
async fn test_repeat_calls_hit_cache() {
    let source = encyclopedia();
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(source.clone())
        .build();

    let first = verifier.verify(STANFORD, "University history").await;
    let second = verifier.verify("  stanford university was founded in 1885 ", " University History").await;

    assert_eq!(first, second);
    assert_eq!(source.call_count(), 1);
    assert_eq!(verifier.cache().stats().hits, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cache_expires_after_ttl() {
    let source = encyclopedia();
    let config = VerifierConfig::default().with_cache_ttl(Duration::from_secs(300));
    let verifier = Verifier::builder(config).with_source(source.clone()).build();

    verifier.verify(STANFORD, "").await;
    tokio::time::advance(Duration::from_secs(301)).await;
    verifier.verify(STANFORD, "").await;

    assert_eq!(source.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_keeps_partial_results() {
    let slow = MockSource::new(SourceKind::WebSearch)
        .with_result("Slow", "https://example.com/slow", "Stanford founded 1885")
        .with_delay(Duration::from_secs(30));
    let config = VerifierConfig::default()
        .with_pipeline_timeout(Duration::from_secs(2))
        .with_source(
            SourceKind::WebSearch,
            SourceConfig::enabled(20).with_timeout(Duration::from_secs(60)),
        );
    let verifier = Verifier::builder(config)
        .with_source(encyclopedia())
        .with_source(slow.clone())
        .build();

    let started = Instant::now();
    let result = verifier.verify_with_outcome(STANFORD, "").await;

    assert!(started.elapsed() <= Duration::from_secs(3));
    assert_eq!(result.outcome, VerificationOutcome::Fresh);
    assert_eq!(result.verdict.sources, vec!["en.wikipedia.org"]);
    assert_eq!(slow.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_sources_give_uncached_no_evidence() {
    let slow = encyclopedia().with_delay(Duration::from_secs(30));
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(slow)
        .build();

    let result = verifier.verify_with_outcome(STANFORD, "").await;

    assert_eq!(
        result.outcome,
        VerificationOutcome::Degraded(DegradedReason::NoEvidence)
    );
    assert_eq!(result.verdict.confidence, 0.3);
    assert_eq!(
        result.verdict.issues,
        vec!["No evidence found from available sources"]
    );
    assert!(verifier.cache().is_empty());
}

#[tokio::test]
async fn test_failing_source_does_not_fail_verification() {
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .with_source(MockSource::new(SourceKind::FactCheck).failing())
        .build();

    let result = verifier.verify_with_outcome(STANFORD, "").await;
    assert_eq!(result.outcome, VerificationOutcome::Fresh);
    assert!(result.verdict.confidence >= 0.7);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_source_is_skipped() {
    let source = encyclopedia();
    let limiter = Arc::new(RateLimiter::with_limits(
        [(SourceKind::Encyclopedia, 1)],
        Duration::from_secs(60),
    ));
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(source.clone())
        .with_rate_limiter(limiter.clone())
        .build();

    let first = verifier
        .verify_with_outcome("Stanford University was founded in 1885", "")
        .await;
    let second = verifier
        .verify_with_outcome("Harvard University was founded in 1636", "")
        .await;

    assert_eq!(first.outcome, VerificationOutcome::Fresh);
    assert_eq!(
        second.outcome,
        VerificationOutcome::Degraded(DegradedReason::NoEvidence)
    );
    assert_eq!(source.call_count(), 1);
    assert_eq!(limiter.remaining(SourceKind::Encyclopedia), 0);

    // A new window admits again
    tokio::time::advance(Duration::from_secs(61)).await;
    verifier
        .verify("Yale University was founded in 1701", "")
        .await;
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn test_duplicate_evidence_across_sources_counted_once() {
    let mirror = MockSource::new(SourceKind::WebSearch).with_result(
        "STANFORD UNIVERSITY",
        "https://en.wikipedia.org/wiki/Stanford_University?mirror=1",
        "Stanford University was founded in 1885.",
    );
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .with_source(mirror)
        .build();

    let verdict = verifier.verify(STANFORD, "").await;
    assert_eq!(verdict.source_count, 1);
    assert_eq!(verdict.source_links.len(), 1);
}

#[tokio::test]
async fn test_every_claim_is_queried() {
    let source = MockSource::new(SourceKind::Encyclopedia).with_result(
        "Tokyo",
        "https://en.wikipedia.org/wiki/Tokyo",
        "Tokyo has 14 million residents and is the largest city in Japan.",
    );
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(source.clone())
        .build();

    verifier
        .verify(
            "Tokyo has 14 million residents. It is the largest city in Japan.",
            "",
        )
        .await;

    let mut claims = source.queried_claims();
    claims.sort();
    assert_eq!(
        claims,
        vec![
            "It is the largest city in Japan".to_string(),
            "Tokyo has 14 million residents".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_analyst_judgment_drives_verdict() {
    let analyst = MockAnalyst::scoring(0.95, 0.9);
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .with_analyst(analyst.clone())
        .build();

    let verdict = verifier.verify(STANFORD, "").await;

    assert_eq!(analyst.call_count(), 1);
    assert_eq!(verdict.confidence, 0.95);
    assert_eq!(verdict.explanation, "Mock analysis");
}

#[tokio::test]
async fn test_failing_analyst_falls_back_to_heuristic() {
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .with_analyst(MockAnalyst::scoring(0.0, 0.0).failing())
        .build();

    let verdict = verifier.verify(STANFORD, "").await;
    assert!(verdict.confidence >= 0.7);
    assert!(verdict.explanation.starts_with("Based on 1 source"));
}

#[tokio::test]
async fn test_established_truth_override() {
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(MockSource::new(SourceKind::Encyclopedia))
        .build();

    let result = verifier
        .verify_with_outcome("The Earth orbits the Sun.", "")
        .await;

    assert_eq!(result.outcome, VerificationOutcome::Fresh);
    assert_eq!(result.verdict.confidence, 0.99);
    assert!(!result.verdict.has_issues);
}

#[tokio::test]
async fn test_confidence_bounds_across_paths() {
    let verifier = Verifier::builder(VerifierConfig::default())
        .with_source(encyclopedia())
        .with_source(web_search())
        .with_analyst(MockAnalyst::scoring(1.0, 1.0))
        .build();

    let statements = [
        STANFORD,
        ABSOLUTE,
        OPINION,
        "Tokyo has 14 million residents",
        "The Earth is flat",
        "Hello there, nice weather.",
    ];
    let items: Vec<(&str, &str)> = statements.iter().map(|s| (*s, "")).collect();

    for verdict in verifier.verify_batch(&items, 3).await {
        assert!((0.0..=0.99).contains(&verdict.confidence));
    }
}
