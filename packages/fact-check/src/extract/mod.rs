//! Claim extraction.
//!
//! Turns a raw statement into at most [`MAX_CLAIMS`] verifiable claims and a
//! category. Opinions yield no claims. Everything here is a pure function of
//! its inputs.

mod category;
mod patterns;

pub use category::categorize;
pub use patterns::{ClaimPattern, CLAIM_PATTERNS, FACTUAL_INDICATORS, MAX_CLAIMS};

use patterns::{MIN_CLAIM_WORDS, RE_OPINION};
use tracing::trace;

use crate::types::claim::{Category, Claim};

/// Claims found in one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub claims: Vec<Claim>,
    pub category: Category,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Whether the statement is framed as an opinion.
pub fn is_opinion(statement: &str) -> bool {
    RE_OPINION.is_match(statement)
}

/// Extract verifiable claims from a statement.
pub fn extract_claims(statement: &str, context: &str) -> Extraction {
    let category = categorize(statement);
    let statement = statement.trim();

    if statement.is_empty() || is_opinion(statement) {
        return Extraction {
            claims: Vec::new(),
            category,
        };
    }

    let mut texts = match_claim_shapes(statement);

    if texts.is_empty() && has_factual_indicator(statement) {
        texts.push(statement.trim_end_matches(['.', '!', '?']).to_string());
    }

    texts.truncate(MAX_CLAIMS);

    Extraction {
        claims: texts
            .into_iter()
            .map(|text| Claim::new(text, category, context))
            .collect(),
        category,
    }
}

/// Run every claim-shape pattern and merge the candidates.
///
/// A candidate that contains an already kept claim replaces it; one that is
/// contained by a kept claim is dropped. Comparison is case-insensitive.
fn match_claim_shapes(statement: &str) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();

    for pattern in CLAIM_PATTERNS {
        for found in pattern.regex.find_iter(statement) {
            let candidate = found.as_str().trim().trim_end_matches(',').trim();
            if candidate.split_whitespace().count() < MIN_CLAIM_WORDS {
                continue;
            }
            trace!(pattern = pattern.name, candidate, "claim candidate");
            merge_candidate(&mut kept, candidate);
        }
    }

    kept
}

fn merge_candidate(kept: &mut Vec<String>, candidate: &str) {
    let lower = candidate.to_lowercase();

    if kept
        .iter()
        .any(|existing| existing.to_lowercase().contains(&lower))
    {
        return;
    }

    // Longest match wins: drop shorter claims this one subsumes
    kept.retain(|existing| !lower.contains(&existing.to_lowercase()));
    kept.push(candidate.to_string());
}

fn has_factual_indicator(statement: &str) -> bool {
    let lower = statement.to_lowercase();
    FACTUAL_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opinion_yields_no_claims() {
        let extraction = extract_claims("I think this might be true.", "");
        assert!(extraction.is_empty());

        let extraction = extract_claims(
            "The senator allegedly took 5 million dollars in bribes.",
            "",
        );
        assert!(extraction.is_empty());
    }

    #[test]
    fn test_founding_claim() {
        let extraction = extract_claims(
            "Stanford University was founded in 1885 by Leland Stanford.",
            "History page",
        );
        assert_eq!(extraction.category, Category::Institutional);
        assert_eq!(extraction.claims.len(), 1);
        assert_eq!(
            extraction.claims[0].text,
            "Stanford University was founded in 1885 by Leland Stanford"
        );
        assert_eq!(extraction.claims[0].originating_context, "History page");
    }

    #[test]
    fn test_duplicate_shapes_collapse() {
        // Both comparative and definitional match the second sentence
        let extraction = extract_claims(
            "Tokyo has 14 million residents. It is the largest city in Japan.",
            "",
        );
        assert_eq!(extraction.claims.len(), 2);
        assert_eq!(extraction.claims[0].text, "Tokyo has 14 million residents");
        assert_eq!(extraction.claims[1].text, "It is the largest city in Japan");
    }

    #[test]
    fn test_longest_match_wins() {
        let mut kept = vec!["the largest city".to_string()];
        merge_candidate(&mut kept, "Tokyo is the largest city in Japan");
        assert_eq!(kept, vec!["Tokyo is the largest city in Japan"]);

        merge_candidate(&mut kept, "THE LARGEST CITY IN JAPAN");
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_at_most_three_claims() {
        let extraction = extract_claims(
            "Canada has 40 million people. Nigeria has 220 million people. \
             Brazil has 216 million people. India has 1.4 billion people.",
            "",
        );
        assert_eq!(extraction.claims.len(), MAX_CLAIMS);
        assert_eq!(extraction.claims[0].text, "Canada has 40 million people");
    }

    #[test]
    fn test_factual_indicator_fallback() {
        let extraction = extract_claims("According to officials the bridge reopened.", "");
        assert_eq!(extraction.claims.len(), 1);
        assert_eq!(
            extraction.claims[0].text,
            "According to officials the bridge reopened"
        );
    }

    #[test]
    fn test_plain_sentence_has_no_claims() {
        let extraction = extract_claims("Hello there, nice weather.", "");
        assert!(extraction.is_empty());
        assert_eq!(extraction.category, Category::General);
    }
}
