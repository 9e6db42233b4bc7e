use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SupportError, SupportResult};

/// Maximum title length, mirroring the `VARCHAR(255)` column.
pub const MAX_TITLE_CHARS: usize = 255;

/// A curated reference document the support agent can cite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Present once the content has been vectorized. Kept out of API payloads.
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a create. Construct through [`NewCompanyInfo::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompanyInfo {
    title: String,
    content: String,
}

impl NewCompanyInfo {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> SupportResult<Self> {
        let title = title.into();
        let content = content.into();
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(SupportError::validation("Title and content are required"));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(SupportError::validation(format!(
                "Title must be at most {} characters",
                MAX_TITLE_CHARS
            )));
        }
        Ok(Self { title, content })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One ranked hit returned by the hybrid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Relevance in `[0, 1]`, higher is better.
    pub similarity: f64,
}

/// Row matched by the substring search; scored later by the fusion step.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMatch {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Results of a search plus a human-readable summary for the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<RetrievalResult>,
    pub message: String,
}

impl SearchOutcome {
    pub fn new(results: Vec<RetrievalResult>) -> Self {
        let message = if results.is_empty() {
            "No relevant company information found for your query.".to_string()
        } else {
            format!(
                "Found {} relevant company information entries.",
                results.len()
            )
        };
        Self { results, message }
    }
}

/// Reference document store and hybrid retrieval, as seen by the API and tools.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyInfoService: Send + Sync {
    /// Embeds `content` and stores the document. Nothing is written when
    /// validation or embedding fails.
    async fn create(&self, title: String, content: String) -> SupportResult<CompanyInfo>;

    /// All documents, newest first.
    async fn list(&self) -> SupportResult<Vec<CompanyInfo>>;

    /// Hard delete. Deleting an unknown id is not an error.
    async fn delete_by_id(&self, id: i64) -> SupportResult<()>;

    /// Hybrid vector + substring search, at most `limit` results.
    async fn search(&self, query: String, limit: usize) -> SupportResult<SearchOutcome>;

    /// Connectivity check against the backing store.
    async fn ping(&self) -> SupportResult<()>;
}
