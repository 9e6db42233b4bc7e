use async_trait::async_trait;

use crate::error::SupportResult;

/// Turns text into a fixed-length vector.
///
/// Implementations must fail rather than return a placeholder vector, and
/// must reject vectors whose length differs from the configured dimension.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> SupportResult<Vec<f32>>;
}
