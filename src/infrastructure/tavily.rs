use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::WebSearchConfig;
use crate::domain::web_search::{WebSearchHit, WebSearchProvider};
use crate::error::{SupportError, SupportResult};

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

/// Tavily search API client.
pub struct TavilyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TavilyClient {
    pub fn new(config: &WebSearchConfig) -> SupportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SupportError::Config(format!("failed to build web-search HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl WebSearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> SupportResult<Vec<WebSearchHit>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SupportError::Provider("web search is not configured".to_string()))?;

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(api_key)
            .json(&SearchRequest { query, max_results })
            .send()
            .await
            .map_err(|e| SupportError::Provider(format!("web search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SupportError::Provider(format!("web search {}: {}", status, body)));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SupportError::Provider(format!("malformed web search response: {}", e)))?;
        Ok(parsed
            .results
            .into_iter()
            .map(|r| WebSearchHit {
                url: r.url,
                title: r.title,
                content: r.content,
            })
            .collect())
    }
}
