use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SupportResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchHit {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// External web search used when company documents do not cover a question.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> SupportResult<Vec<WebSearchHit>>;
}
