//! Verdict aggregation.
//!
//! Combines an [`Analysis`] (from an analyst, or the deterministic
//! [`heuristic_analysis`] when there is none) with the ranked evidence into a
//! final [`Verdict`]. Override rules bypass the weighting entirely but still
//! attribute the retrieved evidence.

mod heuristic;
mod overrides;

pub use heuristic::{heuristic_analysis, EvidenceSummary};
pub use overrides::{check_overrides, Override, OverrideKind};

use tracing::debug;

use crate::types::claim::Claim;
use crate::types::config::AggregationConfig;
use crate::types::evidence::ScoredEvidence;
use crate::types::verdict::{Analysis, Verdict, VerdictBuilder};

/// Issue recorded when a verdict falls below the threshold with no other issue.
pub const INSUFFICIENT_EVIDENCE: &str = "Insufficient evidence to confirm this claim";

/// Build the verdict for a claim from its ranked evidence.
pub fn aggregate(
    claim: &Claim,
    evidence: &[ScoredEvidence],
    analysis: Option<Analysis>,
    config: &AggregationConfig,
) -> Verdict {
    let analysis = analysis.unwrap_or_else(|| heuristic_analysis(evidence));
    let accuracy = finite_or_zero(analysis.accuracy);
    let analysis_confidence = finite_or_zero(analysis.confidence);
    let summary = EvidenceSummary::of(evidence);

    let count_bonus =
        (config.count_bonus_per_source * summary.count as f32).min(config.max_count_bonus);
    let credibility_bonus = (config.credibility_bonus_weight * summary.avg_credibility)
        .min(config.max_credibility_bonus);

    let confidence = (config.accuracy_weight * accuracy
        + config.confidence_weight * analysis_confidence
        + count_bonus
        + credibility_bonus)
        .clamp(0.0, config.max_confidence);

    debug!(
        claim = %claim.text,
        accuracy,
        analysis_confidence,
        count_bonus,
        credibility_bonus,
        confidence,
        "aggregated verdict"
    );

    // A flagged verdict always says why
    let needs_reason = confidence < config.confidence_threshold
        && analysis.issues.iter().all(|issue| issue.trim().is_empty());

    let mut builder = attribute(Verdict::builder(confidence), evidence)
        .issues(analysis.issues)
        .suggestions(analysis.suggestions)
        .explanation(analysis.explanation);
    if needs_reason {
        builder = builder.issue(INSUFFICIENT_EVIDENCE);
    }
    builder.build()
}

// Injected analysts may return NaN or infinities
fn finite_or_zero(score: f32) -> f32 {
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Build the verdict dictated by an override rule.
pub fn apply_override(
    rule: Override,
    evidence: &[ScoredEvidence],
    config: &AggregationConfig,
) -> Verdict {
    let (confidence, has_issues) = match rule.kind {
        OverrideKind::Falsehood => (config.falsehood_confidence, true),
        OverrideKind::EstablishedTruth => (config.established_truth_confidence, false),
    };
    debug!(rule = rule.rule, confidence, "override applied");

    attribute(Verdict::builder(confidence), evidence)
        .issues(rule.issues)
        .suggestions(rule.suggestions)
        .explanation(rule.explanation)
        .has_issues(has_issues)
        .build()
}

/// Add source names, links and the evidence count.
fn attribute(mut builder: VerdictBuilder, evidence: &[ScoredEvidence]) -> VerdictBuilder {
    for item in evidence {
        let ev = &item.evidence;
        let name = if ev.domain.is_empty() {
            ev.source.id().to_string()
        } else {
            ev.domain.clone()
        };
        builder = builder.source(name);
        if let Some(url) = &ev.url {
            builder = builder.link(ev.title.clone(), url.clone());
        }
    }
    builder.source_count(evidence.len())
}
