//! Tavily-powered web search.
//!
//! Searches the open web for pages discussing the claim. Each hit becomes one
//! evidence item weighted by its domain.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{read_body, truncate_chars, EvidenceSource, SourceKind};
use crate::error::SourceResult;
use crate::security::Credential;
use crate::types::claim::Claim;
use crate::types::evidence::EvidenceResult;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
const MAX_CONTENT_CHARS: usize = 1_000;

/// Tavily search response.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// A single Tavily search result.
#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

/// Tavily search request.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

/// Web search evidence from Tavily.
pub struct TavilySource {
    client: reqwest::Client,
    api_key: Credential,
    base_url: String,
    search_depth: String,
    max_results: usize,
}

impl TavilySource {
    pub fn new(api_key: Credential) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            search_depth: "basic".to_string(),
            max_results: 5,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set a custom base URL (for proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set search depth ("basic" or "advanced").
    pub fn with_search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = depth.into();
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

#[async_trait]
impl EvidenceSource for TavilySource {
    fn kind(&self) -> SourceKind {
        SourceKind::WebSearch
    }

    async fn query(&self, claim: &Claim) -> SourceResult<Vec<EvidenceResult>> {
        let request = TavilyRequest {
            query: &claim.text,
            search_depth: &self.search_depth,
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await?;

        parse_results(&read_body(response).await?)
    }
}

pub(crate) fn parse_results(body: &str) -> SourceResult<Vec<EvidenceResult>> {
    let response: TavilyResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .filter(|r| !r.content.trim().is_empty())
        .map(|r| {
            let title = if r.title.trim().is_empty() {
                r.url.clone()
            } else {
                r.title
            };
            EvidenceResult::from_url(
                SourceKind::WebSearch,
                title,
                r.url,
                truncate_chars(&r.content, MAX_CONTENT_CHARS),
            )
        })
        .collect())
}
