use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};

use crate::application::hybrid::{clamp_limit, fuse};
use crate::domain::company_info::{CompanyInfo, CompanyInfoService, NewCompanyInfo, SearchOutcome};
use crate::domain::company_info_repository::CompanyInfoRepository;
use crate::domain::embedder::Embedder;
use crate::error::{SupportError, SupportResult};

/// Reference document store and hybrid retrieval engine over injected
/// embedding and persistence components.
pub struct CompanyInfoServiceImpl {
    embedder: Arc<dyn Embedder>,
    repository: Arc<dyn CompanyInfoRepository>,
}

impl CompanyInfoServiceImpl {
    pub fn new(embedder: Arc<dyn Embedder>, repository: Arc<dyn CompanyInfoRepository>) -> Self {
        Self { embedder, repository }
    }
}

#[async_trait]
impl CompanyInfoService for CompanyInfoServiceImpl {
    async fn create(&self, title: String, content: String) -> SupportResult<CompanyInfo> {
        let doc = NewCompanyInfo::new(title, content)?;

        // The insert only happens once the embedding is in hand.
        let embedding = self.embedder.embed(doc.content()).await.map_err(|e| {
            error!("Failed to embed company info '{}': {}", doc.title(), e);
            e
        })?;

        let stored = self.repository.insert(&doc, embedding).await?;
        info!("Stored company info id={} title='{}'", stored.id, stored.title);
        Ok(stored)
    }

    async fn list(&self) -> SupportResult<Vec<CompanyInfo>> {
        let docs = self.repository.list_all().await?;
        debug!("Listed {} company info documents", docs.len());
        Ok(docs)
    }

    async fn delete_by_id(&self, id: i64) -> SupportResult<()> {
        let removed = self.repository.delete(id).await?;
        if removed == 0 {
            debug!("Delete for company info id={} matched no rows", id);
        } else {
            info!("Deleted company info id={}", id);
        }
        Ok(())
    }

    async fn search(&self, query: String, limit: usize) -> SupportResult<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SupportError::validation("Search query must not be empty"));
        }
        let limit = clamp_limit(limit);
        info!("Performing hybrid search for query: '{}', limit: {}", query, limit);

        let query_vector = self.embedder.embed(query).await?;

        let (vector_hits, text_hits) = futures::try_join!(
            self.repository.vector_search(query_vector, limit),
            self.repository.text_search(query, limit),
        )?;
        debug!(
            "Hybrid search candidates: {} vector, {} lexical",
            vector_hits.len(),
            text_hits.len()
        );

        let outcome = SearchOutcome::new(fuse(vector_hits, text_hits, limit));
        info!("Search returned {} results.", outcome.results.len());
        Ok(outcome)
    }

    async fn ping(&self) -> SupportResult<()> {
        self.repository.ping().await
    }
}
