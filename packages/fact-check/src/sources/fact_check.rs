//! Google Fact Check Tools search.
//!
//! Looks the claim up in the ClaimReview corpus that fact-checking
//! organizations publish. Each review becomes one evidence item whose
//! content carries the reviewed claim, the rating and the publisher.

use async_trait::async_trait;
use serde::Deserialize;

use super::{read_body, EvidenceSource, SourceKind};
use crate::error::SourceResult;
use crate::security::Credential;
use crate::types::claim::Claim;
use crate::types::evidence::EvidenceResult;

const DEFAULT_BASE_URL: &str = "https://factchecktools.googleapis.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    claims: Vec<ReviewedClaim>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewedClaim {
    #[serde(default)]
    text: String,
    claimant: Option<String>,
    #[serde(default)]
    claim_review: Vec<ClaimReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimReview {
    publisher: Option<Publisher>,
    url: Option<String>,
    title: Option<String>,
    textual_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Publisher {
    name: Option<String>,
    site: Option<String>,
}

/// Curated fact-check reviews from Google's Fact Check Tools API.
pub struct GoogleFactCheckSource {
    client: reqwest::Client,
    api_key: Credential,
    base_url: String,
    language_code: String,
    page_size: usize,
}

impl GoogleFactCheckSource {
    pub fn new(api_key: Credential) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            language_code: "en".to_string(),
            page_size: 5,
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

    /// Restrict reviews to one BCP-47 language (default: "en").
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }
}

#[async_trait]
impl EvidenceSource for GoogleFactCheckSource {
    fn kind(&self) -> SourceKind {
        SourceKind::FactCheck
    }

    async fn query(&self, claim: &Claim) -> SourceResult<Vec<EvidenceResult>> {
        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(format!("{}/v1alpha1/claims:search", self.base_url))
            .query(&[
                ("query", claim.text.as_str()),
                ("key", self.api_key.expose()),
                ("pageSize", page_size.as_str()),
                ("languageCode", self.language_code.as_str()),
            ])
            .send()
            .await?;

        parse_reviews(&read_body(response).await?)
    }
}

/// One evidence item per review; reviews without a link are dropped.
pub(crate) fn parse_reviews(body: &str) -> SourceResult<Vec<EvidenceResult>> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let mut results = Vec::new();
    for claim in response.claims {
        for review in claim.claim_review {
            let Some(url) = review.url else { continue };

            let publisher = review
                .publisher
                .and_then(|p| p.name.or(p.site))
                .unwrap_or_else(|| "Unknown publisher".to_string());
            let rating = review
                .textual_rating
                .unwrap_or_else(|| "Unrated".to_string());

            let mut content = format!("Claim: {}", claim.text.trim());
            if let Some(claimant) = claim.claimant.as_deref().filter(|c| !c.is_empty()) {
                content.push_str(&format!(" (claimed by {})", claimant));
            }
            content.push_str(&format!(". Rated \"{}\" by {}.", rating, publisher));

            let title = review
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("{}: {}", publisher, rating));

            results.push(EvidenceResult::from_url(
                SourceKind::FactCheck,
                title,
                url,
                content,
            ));
        }
    }
    Ok(results)
}
