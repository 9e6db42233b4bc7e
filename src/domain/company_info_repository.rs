use async_trait::async_trait;

use crate::domain::company_info::{CompanyInfo, NewCompanyInfo, RetrievalResult, TextMatch};
use crate::error::SupportResult;

/// Persistence seam for `company_info`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyInfoRepository: Send + Sync {
    /// Inserts title, content and embedding in one statement and returns the stored row.
    async fn insert(&self, doc: &NewCompanyInfo, embedding: Vec<f32>) -> SupportResult<CompanyInfo>;

    /// Every row, newest first.
    async fn list_all(&self) -> SupportResult<Vec<CompanyInfo>>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete(&self, id: i64) -> SupportResult<u64>;

    /// Up to `limit` rows with an embedding, nearest first by cosine distance.
    /// `similarity` is `1 - cosine_distance`.
    async fn vector_search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> SupportResult<Vec<RetrievalResult>>;

    /// Up to `limit` rows whose title or content contains `query`,
    /// case-insensitively and literally.
    async fn text_search(&self, query: &str, limit: usize) -> SupportResult<Vec<TextMatch>>;

    async fn ping(&self) -> SupportResult<()>;
}
