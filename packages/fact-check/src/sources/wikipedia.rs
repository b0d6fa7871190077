//! Wikipedia-backed encyclopedic lookup.
//!
//! Searches with the MediaWiki API, then fetches the REST summary of the top
//! hits in parallel. Disambiguation pages are skipped.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{read_body, EvidenceSource, SourceKind};
use crate::error::{SourceError, SourceResult};
use crate::types::claim::Claim;
use crate::types::evidence::EvidenceResult;

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(rename = "type", default)]
    page_type: String,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrl>,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: String,
}

/// Encyclopedic evidence from Wikipedia.
pub struct WikipediaSource {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl Default for WikipediaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: 3,
        }
    }

    /// Use a shared HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point at another wiki (other languages, mirrors).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set how many search hits are summarized.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    async fn search_titles(&self, text: &str) -> SourceResult<Vec<String>> {
        let limit = self.max_results.to_string();
        let response = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", text),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("utf8", "1"),
            ])
            .send()
            .await?;

        parse_search(&read_body(response).await?)
    }

    async fn fetch_summary(&self, title: &str) -> SourceResult<Option<EvidenceResult>> {
        let url = self.summary_url(title)?;
        let response = self.client.get(url).send().await?;
        parse_summary(&read_body(response).await?)
    }

    fn summary_url(&self, title: &str) -> SourceResult<Url> {
        let invalid = || SourceError::InvalidUrl {
            url: self.base_url.clone(),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["api", "rest_v1", "page", "summary", &title.replace(' ', "_")]);
        Ok(url)
    }
}

#[async_trait]
impl EvidenceSource for WikipediaSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Encyclopedia
    }

    async fn query(&self, claim: &Claim) -> SourceResult<Vec<EvidenceResult>> {
        let titles = self.search_titles(&claim.text).await?;
        debug!(count = titles.len(), "wikipedia search hits");

        let summaries = join_all(titles.iter().map(|title| self.fetch_summary(title))).await;

        // One bad summary shouldn't lose the others
        let mut results = Vec::with_capacity(summaries.len());
        for (title, summary) in titles.iter().zip(summaries) {
            match summary {
                Ok(Some(evidence)) => results.push(evidence),
                Ok(None) => debug!(title = %title, "skipping non-article page"),
                Err(e) => debug!(title = %title, error = %e, "summary fetch failed"),
            }
        }
        Ok(results)
    }
}

/// Titles from a MediaWiki `list=search` response.
pub(crate) fn parse_search(body: &str) -> SourceResult<Vec<String>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .query
        .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default())
}

/// Evidence from a REST page summary, `None` for disambiguation or empty pages.
pub(crate) fn parse_summary(body: &str) -> SourceResult<Option<EvidenceResult>> {
    let summary: PageSummary = serde_json::from_str(body)?;
    if summary.page_type == "disambiguation" || summary.extract.trim().is_empty() {
        return Ok(None);
    }

    let url = summary
        .content_urls
        .and_then(|urls| urls.desktop)
        .map(|desktop| desktop.page)
        .unwrap_or_else(|| {
            format!(
                "{}/wiki/{}",
                DEFAULT_BASE_URL,
                summary.title.replace(' ', "_")
            )
        });

    Ok(Some(EvidenceResult::from_url(
        SourceKind::Encyclopedia,
        summary.title,
        url,
        summary.extract,
    )))
}
