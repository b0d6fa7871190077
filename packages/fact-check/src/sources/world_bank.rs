//! World Bank development indicators.
//!
//! Picks an indicator from the claim's wording (population, GDP, inflation,
//! ...) and a country from the names it mentions, then fetches the most
//! recent non-empty observation. Claims that name no known indicator yield
//! no evidence.

use async_trait::async_trait;
use serde::Deserialize;

use super::{read_body, EvidenceSource, SourceKind};
use crate::error::{SourceError, SourceResult};
use crate::types::claim::Claim;
use crate::types::evidence::EvidenceResult;

const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

/// Aggregate code used when no country is named.
const WORLD: &str = "WLD";

/// Indicator codes keyed by trigger phrases, most specific first.
const INDICATORS: &[(&[&str], &str)] = &[
    (&["gdp per capita", "per capita", "income per person"], "NY.GDP.PCAP.CD"),
    (&["life expectancy", "lifespan"], "SP.DYN.LE00.IN"),
    (&["birth rate", "births per"], "SP.DYN.CBRT.IN"),
    (&["unemployment", "unemployed", "jobless"], "SL.UEM.TOTL.ZS"),
    (&["inflation", "consumer prices"], "FP.CPI.TOTL.ZG"),
    (&["gdp", "gross domestic product", "economy", "economic output"], "NY.GDP.MKTP.CD"),
    (&["population", "residents", "inhabitants", "people live", "citizens"], "SP.POP.TOTL"),
];

/// Country names and their ISO 3166-1 alpha-3 codes.
const COUNTRIES: &[(&str, &str)] = &[
    ("united states", "USA"),
    ("america", "USA"),
    ("usa", "USA"),
    ("united kingdom", "GBR"),
    ("britain", "GBR"),
    ("uk", "GBR"),
    ("south africa", "ZAF"),
    ("south korea", "KOR"),
    ("korea", "KOR"),
    ("china", "CHN"),
    ("india", "IND"),
    ("japan", "JPN"),
    ("germany", "DEU"),
    ("france", "FRA"),
    ("italy", "ITA"),
    ("spain", "ESP"),
    ("canada", "CAN"),
    ("mexico", "MEX"),
    ("brazil", "BRA"),
    ("argentina", "ARG"),
    ("russia", "RUS"),
    ("indonesia", "IDN"),
    ("pakistan", "PAK"),
    ("bangladesh", "BGD"),
    ("nigeria", "NGA"),
    ("egypt", "EGY"),
    ("kenya", "KEN"),
    ("ethiopia", "ETH"),
    ("australia", "AUS"),
    ("sweden", "SWE"),
    ("norway", "NOR"),
];

#[derive(Debug, Deserialize)]
struct Observation {
    indicator: Labeled,
    country: Labeled,
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Labeled {
    id: String,
    value: String,
}

/// Statistical evidence from the World Bank open data API.
pub struct WorldBankSource {
    client: reqwest::Client,
    base_url: String,
}

impl Default for WorldBankSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldBankSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl EvidenceSource for WorldBankSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Statistics
    }

    async fn query(&self, claim: &Claim) -> SourceResult<Vec<EvidenceResult>> {
        let Some(indicator) = indicator_for(&claim.text) else {
            return Ok(Vec::new());
        };
        let country = country_for(&claim.text);

        let response = self
            .client
            .get(format!(
                "{}/country/{}/indicator/{}",
                self.base_url, country, indicator
            ))
            .query(&[("format", "json"), ("mrnev", "1")])
            .send()
            .await?;

        parse_observations(&read_body(response).await?)
    }
}

/// Lowercased text padded with spaces, punctuation folded to spaces, so
/// phrases can be matched on word boundaries with `contains`.
fn padded_words(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    format!(" {} ", folded.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn mentions(haystack: &str, phrase: &str) -> bool {
    haystack.contains(&format!(" {} ", phrase))
}

/// The indicator code a claim talks about, if any.
pub(crate) fn indicator_for(text: &str) -> Option<&'static str> {
    let words = padded_words(text);
    INDICATORS
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| mentions(&words, p)))
        .map(|(_, code)| *code)
}

/// The country a claim names, or the world aggregate.
pub(crate) fn country_for(text: &str) -> &'static str {
    let words = padded_words(text);
    COUNTRIES
        .iter()
        .find(|(name, _)| mentions(&words, name))
        .map(|(_, code)| *code)
        .unwrap_or(WORLD)
}

/// Parse the API's `[meta, observations]` array.
pub(crate) fn parse_observations(body: &str) -> SourceResult<Vec<EvidenceResult>> {
    let mut parts: Vec<serde_json::Value> = serde_json::from_str(body)?;

    if parts.len() < 2 {
        // Errors come back as a one-element array holding a "message" list
        let message = parts
            .first()
            .and_then(|meta| meta.get("message"))
            .map(|m| m.to_string())
            .unwrap_or_else(|| "missing observations".to_string());
        return Err(SourceError::MalformedResponse(message));
    }

    let observations: Option<Vec<Observation>> = serde_json::from_value(parts.swap_remove(1))?;

    Ok(observations
        .unwrap_or_default()
        .into_iter()
        .filter_map(|obs| {
            let value = obs.value?;
            let content = format!(
                "{} for {} in {}: {}",
                obs.indicator.value,
                obs.country.value,
                obs.date,
                format_value(value)
            );
            let url = format!(
                "https://data.worldbank.org/indicator/{}?locations={}",
                obs.indicator.id, obs.country.id
            );
            let title = format!("{}: {}", obs.indicator.value, obs.country.value);
            Some(EvidenceResult::from_url(
                SourceKind::Statistics,
                title,
                url,
                content,
            ))
        })
        .collect())
}

/// Large values as grouped integers, small ones with two decimals.
fn format_value(value: f64) -> String {
    if value.abs() < 1_000.0 {
        return format!("{:.2}", value);
    }

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_selection() {
        assert_eq!(indicator_for("Japan's population is 125 million"), Some("SP.POP.TOTL"));
        assert_eq!(indicator_for("GDP per capita in Norway exceeds $80,000"), Some("NY.GDP.PCAP.CD"));
        assert_eq!(indicator_for("The US economy grew 2% last year"), Some("NY.GDP.MKTP.CD"));
        assert_eq!(indicator_for("Unemployment hit 10% in Spain"), Some("SL.UEM.TOTL.ZS"));
        assert_eq!(indicator_for("Stanford was founded in 1885"), None);
    }

    #[test]
    fn test_country_selection() {
        assert_eq!(country_for("Japan's population is 125 million"), "JPN");
        assert_eq!(country_for("The United Kingdom has 67 million residents"), "GBR");
        assert_eq!(country_for("World population passed 8 billion"), WORLD);
        // "uk" must be a whole word
        assert_eq!(country_for("Ukraine's population"), WORLD);
    }

    #[test]
    fn test_parse_observations() {
        let body = r#"[
            {"page":1,"pages":1,"per_page":50,"total":1,"sourceid":"2","lastupdated":"2024-06-28"},
            [{
                "indicator":{"id":"SP.POP.TOTL","value":"Population, total"},
                "country":{"id":"JP","value":"Japan"},
                "countryiso3code":"JPN",
                "date":"2023",
                "value":124516650,
                "unit":"","obs_status":"","decimal":0
            }]
        ]"#;
        let results = parse_observations(body).unwrap();
        assert_eq!(results.len(), 1);

        let ev = &results[0];
        assert_eq!(ev.title, "Population, total: Japan");
        assert_eq!(ev.content, "Population, total for Japan in 2023: 124,516,650");
        assert_eq!(
            ev.url.as_deref(),
            Some("https://data.worldbank.org/indicator/SP.POP.TOTL?locations=JP")
        );
        assert_eq!(ev.domain, "data.worldbank.org");
        assert!((ev.credibility_weight - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_null_observations_are_empty() {
        let body = r#"[{"page":0,"pages":0,"per_page":50,"total":0}, null]"#;
        assert!(parse_observations(body).unwrap().is_empty());
    }

    #[test]
    fn test_error_payload() {
        let body = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        assert!(matches!(
            parse_observations(body),
            Err(SourceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(124_516_650.0), "124,516,650");
        assert_eq!(format_value(1_000.0), "1,000");
        assert_eq!(format_value(84.56), "84.56");
        assert_eq!(format_value(-2_500.0), "-2,500");
    }
}
