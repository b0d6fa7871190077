//! Deterministic short-circuit rules for statements whose truth doesn't
//! depend on retrieved evidence.
//!
//! Falsehood rules run before truth rules. The first matching rule wins.

use regex::Regex;
use std::sync::LazyLock;

/// Upper bound on any plausible population figure.
const WORLD_POPULATION_CEILING: f64 = 8.2e9;

/// Exact counts at or above this many people are treated as implausibly precise.
const EXACT_COUNT_FLOOR: f64 = 1_000_000.0;

/// Which way an override points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// Obviously false; verdict pinned low and flagged
    Falsehood,
    /// Well-established fact; verdict pinned high
    EstablishedTruth,
}

/// The verdict substance supplied by a matching rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub kind: OverrideKind,
    /// Name of the rule that fired
    pub rule: &'static str,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub explanation: String,
}

struct OverrideRule {
    name: &'static str,
    kind: OverrideKind,
    regex: &'static LazyLock<Regex>,
    /// `{}` is replaced with the matched text
    issue: Option<&'static str>,
    suggestion: Option<&'static str>,
    explanation: &'static str,
}

static RE_ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b100\s?%|\b100 percent\b|\bone hundred percent\b)\s+of\b|\b(?:everyone|everybody|nobody|no one|all people|all humans|every single (?:person|human))\b",
    )
    .unwrap()
});

static RE_FLAT_EARTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:the\s+)?(?:earth|world)\s+is\s+(?:actually\s+)?flat\b").unwrap()
});

static RE_VACCINE_AUTISM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bvaccin(?:es?|ations?)\s+(?:cause|causes|lead to|leads to)\s+autism\b").unwrap()
});

static RE_MOON_HOAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bmoon\s+landings?\s+(?:was|were)\s+(?:faked|fake|staged|a hoax|hoaxes)\b",
    )
    .unwrap()
});

static RE_5G_COVID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b5g\b[^.!?]*\b(?:causes?|spreads?|caused|spread)\s+(?:covid|coronavirus)").unwrap()
});

static RE_TEN_PERCENT_BRAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:only\s+)?use\s+(?:only\s+)?10\s?(?:%|percent)\s+of\s+(?:our|their|your|the|his|her)\s+brains?\b").unwrap()
});

static RE_EARTH_ORBITS_SUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:the\s+)?earth\s+(?:orbits|revolves around|goes around|circles)\s+the\s+sun\b").unwrap()
});

static RE_EARTH_ROUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:the\s+)?earth\s+is\s+(?:round|spherical|a sphere|an oblate spheroid)\b").unwrap()
});

static RE_WATER_BOILS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwater\s+boils\s+at\s+100\s*(?:°\s*c\b|degrees(?:\s+(?:celsius|c\b))?|c\b)").unwrap()
});

static RE_WATER_FREEZES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwater\s+freezes\s+at\s+0\s*(?:°\s*c\b|degrees(?:\s+(?:celsius|c\b))?|c\b)").unwrap()
});

static RE_SCALED_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(billion|trillion)\b").unwrap());

static RE_PLAIN_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(exactly\s+)?(\d{1,3}(?:,\d{3})+|\d+)\s+(?:people|persons|humans|residents|inhabitants|citizens)\b",
    )
    .unwrap()
});

static RE_POPULATION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:people|persons|humans|population|residents|inhabitants|citizens)\b")
        .unwrap()
});

static RULES: &[OverrideRule] = &[
    OverrideRule {
        name: "absolute_universal",
        kind: OverrideKind::Falsehood,
        regex: &RE_ABSOLUTE,
        issue: Some("Absolute claim (\"{}\") is almost never literally true"),
        suggestion: Some("Qualify the statement with a measured figure and its source"),
        explanation: "The statement makes an absolute, universal claim about a population, a known falsehood pattern.",
    },
    OverrideRule {
        name: "flat_earth",
        kind: OverrideKind::Falsehood,
        regex: &RE_FLAT_EARTH,
        issue: Some("Known falsehood: the Earth is an oblate spheroid, not flat"),
        suggestion: Some("Remove or correct this claim"),
        explanation: "The shape of the Earth has been measured directly for centuries.",
    },
    OverrideRule {
        name: "vaccines_autism",
        kind: OverrideKind::Falsehood,
        regex: &RE_VACCINE_AUTISM,
        issue: Some("Known falsehood: large studies find no link between vaccines and autism"),
        suggestion: Some("Cite the scientific consensus instead"),
        explanation: "Repeated large-scale studies have found no causal link between vaccination and autism.",
    },
    OverrideRule {
        name: "moon_landing_hoax",
        kind: OverrideKind::Falsehood,
        regex: &RE_MOON_HOAX,
        issue: Some("Known falsehood: the Apollo moon landings are independently verified"),
        suggestion: Some("Remove or correct this claim"),
        explanation: "The Apollo landings are documented by independent tracking, samples and retroreflectors.",
    },
    OverrideRule {
        name: "5g_covid",
        kind: OverrideKind::Falsehood,
        regex: &RE_5G_COVID,
        issue: Some("Known falsehood: radio networks cannot cause or spread a virus"),
        suggestion: Some("Remove or correct this claim"),
        explanation: "COVID-19 is caused by a virus; radio waves cannot transmit it.",
    },
    OverrideRule {
        name: "ten_percent_brain",
        kind: OverrideKind::Falsehood,
        regex: &RE_TEN_PERCENT_BRAIN,
        issue: Some("Known falsehood: imaging shows activity throughout the brain"),
        suggestion: Some("Remove or correct this claim"),
        explanation: "The 10% of the brain claim is a long-debunked myth.",
    },
    OverrideRule {
        name: "earth_orbits_sun",
        kind: OverrideKind::EstablishedTruth,
        regex: &RE_EARTH_ORBITS_SUN,
        issue: None,
        suggestion: None,
        explanation: "Well-established scientific fact: the Earth orbits the Sun.",
    },
    OverrideRule {
        name: "earth_round",
        kind: OverrideKind::EstablishedTruth,
        regex: &RE_EARTH_ROUND,
        issue: None,
        suggestion: None,
        explanation: "Well-established scientific fact: the Earth is approximately spherical.",
    },
    OverrideRule {
        name: "water_boils",
        kind: OverrideKind::EstablishedTruth,
        regex: &RE_WATER_BOILS,
        issue: None,
        suggestion: None,
        explanation: "Well-established scientific fact: water boils at 100 °C at sea-level pressure.",
    },
    OverrideRule {
        name: "water_freezes",
        kind: OverrideKind::EstablishedTruth,
        regex: &RE_WATER_FREEZES,
        issue: None,
        suggestion: None,
        explanation: "Well-established scientific fact: water freezes at 0 °C at sea-level pressure.",
    },
];

/// Check a statement against the override rules.
pub fn check_overrides(statement: &str) -> Option<Override> {
    let (falsehoods, truths): (Vec<&OverrideRule>, Vec<&OverrideRule>) = RULES
        .iter()
        .partition(|rule| rule.kind == OverrideKind::Falsehood);

    falsehoods
        .into_iter()
        .find_map(|rule| apply_rule(rule, statement))
        .or_else(|| impossible_population(statement))
        .or_else(|| truths.into_iter().find_map(|rule| apply_rule(rule, statement)))
}

fn apply_rule(rule: &OverrideRule, statement: &str) -> Option<Override> {
    let found = rule.regex.find(statement)?;
    Some(Override {
        kind: rule.kind,
        rule: rule.name,
        issues: rule
            .issue
            .map(|issue| issue.replace("{}", found.as_str().trim()))
            .into_iter()
            .collect(),
        suggestions: rule.suggestion.map(str::to_string).into_iter().collect(),
        explanation: rule.explanation.to_string(),
    })
}

fn parse_count(digits: &str) -> Option<f64> {
    digits.replace(',', "").parse::<f64>().ok()
}

fn population_falsehood(issue: String) -> Override {
    Override {
        kind: OverrideKind::Falsehood,
        rule: "impossible_population",
        issues: vec![issue],
        suggestions: vec!["Check the figure against an official census or statistics source".to_string()],
        explanation: "The population figure is impossible, a known falsehood pattern.".to_string(),
    }
}

/// Population figures above the world population, or stated to the person.
fn impossible_population(statement: &str) -> Option<Override> {
    if !RE_POPULATION_WORD.is_match(statement) {
        return None;
    }

    for caps in RE_SCALED_COUNT.captures_iter(statement) {
        let scale = match caps[2].to_lowercase().as_str() {
            "trillion" => 1e12,
            _ => 1e9,
        };
        let value = parse_count(&caps[1])? * scale;
        if value > WORLD_POPULATION_CEILING {
            return Some(population_falsehood(format!(
                "Population figure \"{}\" exceeds the number of people alive",
                caps[0].trim()
            )));
        }
    }

    for caps in RE_PLAIN_COUNT.captures_iter(statement) {
        let value = parse_count(&caps[2])?;
        if value > WORLD_POPULATION_CEILING {
            return Some(population_falsehood(format!(
                "Population figure \"{}\" exceeds the number of people alive",
                caps[0].trim()
            )));
        }
        if caps.get(1).is_some() && value >= EXACT_COUNT_FLOOR {
            return Some(population_falsehood(format!(
                "Exact population count \"{}\" cannot be known to the person",
                caps[0].trim()
            )));
        }
    }

    None
}
