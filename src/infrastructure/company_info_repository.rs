use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pgvector::Vector;
use sqlx::postgres::PgPool;
use sqlx::FromRow;

use crate::application::hybrid::like_pattern;
use crate::domain::company_info::{CompanyInfo, NewCompanyInfo, RetrievalResult, TextMatch};
use crate::domain::company_info_repository::CompanyInfoRepository;
use crate::error::SupportResult;

/// Projections cast `id` to int8 and timestamps to timestamptz so tables
/// created with `SERIAL` and `TIMESTAMP` columns decode the same way.
#[derive(FromRow)]
struct CompanyInfoRow {
    id: i64,
    title: String,
    content: String,
    embedding: Option<Vector>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyInfoRow> for CompanyInfo {
    fn from(row: CompanyInfoRow) -> Self {
        CompanyInfo {
            id: row.id,
            title: row.title,
            content: row.content,
            embedding: row.embedding.map(Vec::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ScoredRow {
    id: i64,
    title: String,
    content: String,
    similarity: Option<f64>,
}

#[derive(FromRow)]
struct MatchRow {
    id: i64,
    title: String,
    content: String,
}

/// `company_info` backed by Postgres with the pgvector extension.
pub struct PgCompanyInfoRepository {
    pool: PgPool,
}

impl PgCompanyInfoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl CompanyInfoRepository for PgCompanyInfoRepository {
    async fn insert(&self, doc: &NewCompanyInfo, embedding: Vec<f32>) -> SupportResult<CompanyInfo> {
        let row: CompanyInfoRow = sqlx::query_as(
            "INSERT INTO company_info (title, content, embedding)
             VALUES ($1, $2, $3)
             RETURNING id::int8 AS id, title, content, embedding,
                       created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at",
        )
        .bind(doc.title())
        .bind(doc.content())
        .bind(Vector::from(embedding))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_all(&self) -> SupportResult<Vec<CompanyInfo>> {
        let rows: Vec<CompanyInfoRow> = sqlx::query_as(
            "SELECT id::int8 AS id, title, content, embedding,
                       created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at
             FROM company_info
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CompanyInfo::from).collect())
    }

    async fn delete(&self, id: i64) -> SupportResult<u64> {
        let result = sqlx::query("DELETE FROM company_info WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn vector_search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> SupportResult<Vec<RetrievalResult>> {
        let rows: Vec<ScoredRow> = sqlx::query_as(
            "SELECT id::int8 AS id, title, content, (1 - (embedding <=> $1))::float8 AS similarity
             FROM company_info
             WHERE embedding IS NOT NULL
             ORDER BY embedding <=> $1, id
             LIMIT $2",
        )
        .bind(Vector::from(query_vector))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RetrievalResult {
                id: row.id,
                title: row.title,
                content: row.content,
                similarity: row.similarity.unwrap_or(0.0),
            })
            .collect())
    }

    async fn text_search(&self, query: &str, limit: usize) -> SupportResult<Vec<TextMatch>> {
        let rows: Vec<MatchRow> = sqlx::query_as(
            r"SELECT id::int8 AS id, title, content
              FROM company_info
              WHERE title ILIKE $1 ESCAPE '\' OR content ILIKE $1 ESCAPE '\'
              ORDER BY created_at DESC, id DESC
              LIMIT $2",
        )
        .bind(like_pattern(query))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TextMatch {
                id: row.id,
                title: row.title,
                content: row.content,
            })
            .collect())
    }

    async fn ping(&self) -> SupportResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
