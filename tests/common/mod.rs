//! In-memory stand-ins for the Postgres store and the embedding API.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use support_desk::domain::company_info::{CompanyInfo, NewCompanyInfo, RetrievalResult, TextMatch};
use support_desk::domain::company_info_repository::CompanyInfoRepository;
use support_desk::domain::embedder::Embedder;
use support_desk::SupportResult;

pub const TEST_DIMENSION: usize = 256;

/// Bag-of-characters embedding: each char bumps the bucket `code point % dimension`.
pub struct CharBucketEmbedder {
    pub calls: AtomicUsize,
}

impl CharBucketEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

pub fn char_buckets(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; TEST_DIMENSION];
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        vector[(c as usize) % TEST_DIMENSION] += 1.0;
    }
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

#[async_trait]
impl Embedder for CharBucketEmbedder {
    async fn embed(&self, text: &str) -> SupportResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(char_buckets(text))
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        f64::from(dot / (na * nb))
    }
}

#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<Vec<CompanyInfo>>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl CompanyInfoRepository for InMemoryRepository {
    async fn insert(&self, doc: &NewCompanyInfo, embedding: Vec<f32>) -> SupportResult<CompanyInfo> {
        let now = Utc::now();
        let row = CompanyInfo {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: doc.title().to_string(),
            content: doc.content().to_string(),
            embedding: Some(embedding),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_all(&self) -> SupportResult<Vec<CompanyInfo>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn delete(&self, id: i64) -> SupportResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn vector_search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> SupportResult<Vec<RetrievalResult>> {
        let rows = self.rows.lock().unwrap();
        let mut scored: Vec<RetrievalResult> = rows
            .iter()
            .filter_map(|row| {
                row.embedding.as_ref().map(|embedding| RetrievalResult {
                    id: row.id,
                    title: row.title.clone(),
                    content: row.content.clone(),
                    similarity: cosine(&query_vector, embedding),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity).then(a.id.cmp(&b.id)));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn text_search(&self, query: &str, limit: usize) -> SupportResult<Vec<TextMatch>> {
        let needle = query.to_lowercase();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|row| {
                row.title.to_lowercase().contains(&needle) || row.content.to_lowercase().contains(&needle)
            })
            .take(limit)
            .map(|row| TextMatch {
                id: row.id,
                title: row.title.clone(),
                content: row.content.clone(),
            })
            .collect())
    }

    async fn ping(&self) -> SupportResult<()> {
        Ok(())
    }
}
