//! Static domain credibility weights.
//!
//! Weights describe how much a domain is trusted in general, independent of
//! any particular claim. Lookups match the domain itself or any subdomain
//! of it, then fall back to top-level-domain rules.

/// Weight for domains not in either table.
pub const UNKNOWN_DOMAIN_WEIGHT: f32 = 0.5;

const DOMAIN_WEIGHTS: &[(&str, f32)] = &[
    // Governmental, intergovernmental and standards bodies
    ("who.int", 0.95),
    ("un.org", 0.95),
    ("worldbank.org", 0.95),
    ("census.gov", 0.95),
    ("nist.gov", 0.95),
    ("iso.org", 0.95),
    ("europa.eu", 0.9),
    ("imf.org", 0.9),
    ("oecd.org", 0.9),
    // Journals
    ("nature.com", 0.9),
    ("science.org", 0.9),
    ("thelancet.com", 0.9),
    // Reference works
    ("britannica.com", 0.85),
    ("wikipedia.org", 0.8),
    // Fact-checkers and wire services
    ("factcheck.org", 0.85),
    ("reuters.com", 0.85),
    ("apnews.com", 0.85),
    ("politifact.com", 0.8),
    ("snopes.com", 0.8),
    ("fullfact.org", 0.8),
    ("bbc.com", 0.8),
    ("bbc.co.uk", 0.8),
    // Social and user-generated
    ("reddit.com", 0.3),
    ("quora.com", 0.3),
    ("facebook.com", 0.2),
    ("x.com", 0.2),
    ("twitter.com", 0.2),
];

const SUFFIX_WEIGHTS: &[(&str, f32)] = &[
    (".gov", 0.95),
    (".mil", 0.9),
    (".int", 0.9),
    (".edu", 0.85),
    (".ac.uk", 0.85),
];

/// Credibility weight for a normalized domain (lowercase, no `www.`).
pub fn credibility_for(domain: &str) -> f32 {
    let domain = domain.trim().trim_end_matches('.').to_lowercase();
    if domain.is_empty() {
        return UNKNOWN_DOMAIN_WEIGHT;
    }

    let known = DOMAIN_WEIGHTS.iter().find(|(known, _)| {
        domain == *known
            || domain
                .strip_suffix(known)
                .is_some_and(|prefix| prefix.ends_with('.'))
    });
    if let Some((_, weight)) = known {
        return *weight;
    }

    SUFFIX_WEIGHTS
        .iter()
        .find(|(suffix, _)| domain.ends_with(suffix))
        .map(|(_, weight)| *weight)
        .unwrap_or(UNKNOWN_DOMAIN_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_subdomain() {
        assert_eq!(credibility_for("wikipedia.org"), 0.8);
        assert_eq!(credibility_for("en.wikipedia.org"), 0.8);
        assert_eq!(credibility_for("data.worldbank.org"), 0.95);
    }

    #[test]
    fn test_lookalike_not_matched() {
        // "notwikipedia.org" is not a subdomain of wikipedia.org
        assert_eq!(credibility_for("notwikipedia.org"), UNKNOWN_DOMAIN_WEIGHT);
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(credibility_for("bls.gov"), 0.95);
        assert_eq!(credibility_for("stanford.edu"), 0.85);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(credibility_for("random-blog.net"), UNKNOWN_DOMAIN_WEIGHT);
        assert_eq!(credibility_for(""), UNKNOWN_DOMAIN_WEIGHT);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(credibility_for("EN.Wikipedia.ORG"), 0.8);
    }
}
