//! Deterministic stand-in for an AI analysis.

use crate::types::evidence::ScoredEvidence;
use crate::types::verdict::Analysis;

const HIGH_QUALITY_CREDIBILITY: f32 = 0.8;
const RELEVANT_SCORE: f32 = 0.5;
const HIGH_OVERALL_SCORE: f32 = 0.6;

/// Evidence count at which the volume part of confidence saturates.
const FULL_EVIDENCE_COUNT: f32 = 5.0;

/// Averages over a set of scored evidence. All zero when empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvidenceSummary {
    pub count: usize,
    pub avg_credibility: f32,
    pub avg_relevance: f32,
    pub avg_overall: f32,
}

impl EvidenceSummary {
    pub fn of(evidence: &[ScoredEvidence]) -> Self {
        if evidence.is_empty() {
            return Self::default();
        }
        let n = evidence.len() as f32;
        let sum = |f: fn(&ScoredEvidence) -> f32| evidence.iter().map(f).sum::<f32>() / n;
        Self {
            count: evidence.len(),
            avg_credibility: sum(|e| e.credibility()),
            avg_relevance: sum(|e| e.relevance_score),
            avg_overall: sum(|e| e.overall_score),
        }
    }
}

/// Judge a claim from evidence scores alone.
pub fn heuristic_analysis(evidence: &[ScoredEvidence]) -> Analysis {
    let summary = EvidenceSummary::of(evidence);

    let high_quality = evidence
        .iter()
        .filter(|e| e.credibility() >= HIGH_QUALITY_CREDIBILITY)
        .count();
    let relevant = evidence
        .iter()
        .filter(|e| e.relevance_score >= RELEVANT_SCORE)
        .count();
    let high_overall = evidence
        .iter()
        .filter(|e| e.overall_score >= HIGH_OVERALL_SCORE)
        .count();

    let accuracy = if high_overall >= 2 {
        (0.5 + 0.4 * summary.avg_overall).min(0.9)
    } else if high_quality >= 1 && relevant >= 2 {
        (0.4 + 0.3 * summary.avg_credibility + 0.2 * summary.avg_relevance).min(0.8)
    } else if relevant >= 1 {
        (0.35 + 0.3 * summary.avg_relevance).min(0.7)
    } else {
        0.3
    };

    let volume = (summary.count as f32 / FULL_EVIDENCE_COUNT).min(1.0);
    let confidence = (0.8 * summary.avg_credibility + 0.2 * volume).min(0.9);

    let mut analysis = Analysis {
        accuracy,
        confidence,
        explanation: format!(
            "Based on {} source{} with average credibility {:.2} and relevance {:.2}.",
            summary.count,
            if summary.count == 1 { "" } else { "s" },
            summary.avg_credibility,
            summary.avg_relevance,
        ),
        ..Default::default()
    };

    if relevant == 0 {
        analysis
            .issues
            .push("Available sources do not directly address this claim".to_string());
        analysis
            .suggestions
            .push("Look for a primary source that states this directly".to_string());
    } else if accuracy < 0.5 {
        analysis
            .issues
            .push("Evidence only weakly supports this claim".to_string());
        analysis
            .suggestions
            .push("Verify this claim against a primary source".to_string());
    }

    analysis
}
