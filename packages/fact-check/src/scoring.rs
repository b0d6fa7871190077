//! Relevance scoring, deduplication and ranking of evidence.

use std::collections::HashSet;

use crate::types::claim::Claim;
use crate::types::evidence::{EvidenceResult, ScoredEvidence};

/// Words of this length or shorter are ignored when comparing text.
const MIN_TOKEN_LEN: usize = 3;

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() > MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}

/// Textual overlap between a claim and some evidence text, 0.0-1.0.
///
/// Each distinct claim token scores 2 when it appears verbatim among the
/// evidence tokens, 1 when it only appears as part of one (or one appears as
/// part of it), 0 otherwise.
pub fn relevance(claim_text: &str, evidence_text: &str) -> f32 {
    let mut seen = HashSet::new();
    let claim_tokens: Vec<String> = tokens(claim_text)
        .filter(|token| seen.insert(token.clone()))
        .collect();
    if claim_tokens.is_empty() {
        return 0.0;
    }

    let evidence_tokens: HashSet<String> = tokens(evidence_text).collect();

    let mut exact = 0usize;
    let mut partial = 0usize;
    for token in &claim_tokens {
        if evidence_tokens.contains(token) {
            exact += 1;
        } else if evidence_tokens
            .iter()
            .any(|ev| ev.contains(token.as_str()) || token.contains(ev.as_str()))
        {
            partial += 1;
        }
    }

    let score = (2 * exact + partial) as f32 / (2 * claim_tokens.len()) as f32;
    score.min(1.0)
}

/// Score one evidence item against a claim.
pub fn score(claim: &Claim, evidence: EvidenceResult) -> ScoredEvidence {
    let text = format!("{} {}", evidence.title, evidence.content);
    let relevance = relevance(&claim.text, &text);
    ScoredEvidence::new(evidence, relevance)
}

/// Drop evidence whose `(domain, title)` was already seen, case-insensitively.
pub fn dedupe(evidence: Vec<ScoredEvidence>) -> Vec<ScoredEvidence> {
    let mut seen = HashSet::new();
    evidence
        .into_iter()
        .filter(|item| {
            seen.insert((
                item.evidence.domain.to_lowercase(),
                item.evidence.title.trim().to_lowercase(),
            ))
        })
        .collect()
}

/// Order by `relevance * credibility` descending and keep the top `max`.
///
/// The sort is stable, so ties keep arrival order.
pub fn rank(mut scored: Vec<ScoredEvidence>, max: usize) -> Vec<ScoredEvidence> {
    scored.sort_by(|a, b| b.rank_key().total_cmp(&a.rank_key()));
    scored.truncate(max);
    scored
}
