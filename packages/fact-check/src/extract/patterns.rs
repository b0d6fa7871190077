//! Pattern tables for claim extraction.
//!
//! Claim-shape patterns run in the order of [`CLAIM_PATTERNS`]. Every
//! pattern stops at sentence punctuation but lets decimals like `13.9`
//! through.

use regex::Regex;
use std::sync::LazyLock;

/// A named claim-shape pattern.
pub struct ClaimPattern {
    pub name: &'static str,
    pub regex: &'static LazyLock<Regex>,
}

static RE_QUANTITATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[a-z](?:[^.!?;\n]|\.\d)*?)?(?:\$\s?\d[\d,]*(?:\.\d+)?|\b\d[\d,]*(?:\.\d+)?\s*(?:%|percent\b|per cent\b|million\b|billion\b|trillion\b|thousand\b|people\b|residents\b|inhabitants\b|citizens\b|dollars\b))(?:[^.!?;\n]|\.\d)*",
    )
    .unwrap()
});

static RE_TEMPORAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[a-z](?:[^.!?;\n]|\.\d)*?)?\b(?:(?:founded|established|created|built|born|died|opened|invented|discovered|signed|launched|incorporated)\b(?:[^.!?;\n]|\.\d)*?\b(?:1\d{3}|20\d{2})\b|(?:in|since) (?:1\d{3}|20\d{2})\b)(?:[^.!?;\n]|\.\d)*",
    )
    .unwrap()
});

static RE_COMPARATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[a-z](?:[^.!?;\n]|\.\d)*?)?\b(?:largest|smallest|tallest|longest|shortest|oldest|newest|highest|lowest|biggest|fastest|richest|poorest|most|least|first|only|more than|less than|fewer than|greater than|larger than|smaller than)\b(?:[^.!?;\n]|\.\d)*",
    )
    .unwrap()
});

static RE_DEFINITIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b[A-Z][\w'-]*(?:\s+[\w'-]+){0,6}?\s+(?:is|are|was|were)\s+(?:the|a|an)\s+(?:[^.!?;\n]|\.\d)+",
    )
    .unwrap()
});

/// Claim-shape patterns in priority order.
pub static CLAIM_PATTERNS: &[ClaimPattern] = &[
    ClaimPattern {
        name: "quantitative",
        regex: &RE_QUANTITATIVE,
    },
    ClaimPattern {
        name: "temporal",
        regex: &RE_TEMPORAL,
    },
    ClaimPattern {
        name: "comparative",
        regex: &RE_COMPARATIVE,
    },
    ClaimPattern {
        name: "definitional",
        regex: &RE_DEFINITIONAL,
    },
];

/// Hedges and first-person framing. Any match makes a statement an opinion.
pub static RE_OPINION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:i think|i believe|i feel|i guess|i suppose|in my opinion|in my view|imo|probably|allegedly|supposedly|maybe|perhaps|might|possibly|seems|apparently|could be|rumou?red)\b",
    )
    .unwrap()
});

/// Phrases that mark a statement as factual even without a claim shape.
pub const FACTUAL_INDICATORS: &[&str] = &[
    "according to",
    "census",
    "founded in",
    "established in",
    "studies show",
    "study found",
    "research shows",
    "survey",
    "statistics",
    "data shows",
    "reported that",
    "percent",
    "population",
    "official",
];

/// Maximum claims taken from one statement.
pub const MAX_CLAIMS: usize = 3;

/// Candidates with fewer words than this are fragments, not claims.
pub const MIN_CLAIM_WORDS: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for pattern in CLAIM_PATTERNS {
            assert!(!pattern.regex.as_str().is_empty(), "{}", pattern.name);
        }
        assert!(RE_OPINION.is_match("I think so"));
    }

    #[test]
    fn test_quantitative_keeps_decimals() {
        let m = RE_QUANTITATIVE
            .find("The population of Tokyo is 13.9 million people. It rains.")
            .unwrap();
        assert_eq!(m.as_str(), "The population of Tokyo is 13.9 million people");
    }

    #[test]
    fn test_quantitative_leading_number() {
        let m = RE_QUANTITATIVE
            .find("100% of people believe everything they read on the internet.")
            .unwrap();
        assert_eq!(
            m.as_str(),
            "100% of people believe everything they read on the internet"
        );
    }

    #[test]
    fn test_temporal_founding() {
        let m = RE_TEMPORAL
            .find("Stanford University was founded in 1885 by Leland Stanford.")
            .unwrap();
        assert_eq!(
            m.as_str(),
            "Stanford University was founded in 1885 by Leland Stanford"
        );
    }

    #[test]
    fn test_opinion_word_boundaries() {
        assert!(RE_OPINION.is_match("This might be true"));
        assert!(!RE_OPINION.is_match("The mighty Mississippi is the longest river"));
    }
}
