//! Fusion of vector and substring search results.
//!
//! Lexical hits carry a fixed score. When both paths return the same id the
//! vector score is kept, whatever its magnitude, so the top of the list stays
//! ordered by actual semantic distance.

use std::collections::HashMap;

use crate::domain::company_info::{RetrievalResult, TextMatch};

/// Score given to every substring match.
pub const LEXICAL_SIMILARITY: f64 = 0.8;

pub const DEFAULT_SEARCH_LIMIT: usize = 3;
pub const MAX_SEARCH_LIMIT: usize = 20;

/// Clamps a requested result count into `[1, MAX_SEARCH_LIMIT]`.
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_SEARCH_LIMIT)
}

/// Merges both result sets by id, sorts by similarity (desc, ties by id asc)
/// and keeps the first `limit`.
pub fn fuse(
    vector_hits: Vec<RetrievalResult>,
    text_hits: Vec<TextMatch>,
    limit: usize,
) -> Vec<RetrievalResult> {
    let mut by_id: HashMap<i64, RetrievalResult> =
        HashMap::with_capacity(vector_hits.len() + text_hits.len());

    for mut hit in vector_hits {
        hit.similarity = normalize_similarity(hit.similarity);
        // Nearest first, so the first occurrence of an id is the best one.
        by_id.entry(hit.id).or_insert(hit);
    }

    for text in text_hits {
        by_id.entry(text.id).or_insert_with(|| RetrievalResult {
            id: text.id,
            title: text.title,
            content: text.content,
            similarity: LEXICAL_SIMILARITY,
        });
    }

    let mut merged: Vec<RetrievalResult> = by_id.into_values().collect();
    merged.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.id.cmp(&b.id))
    });
    merged.truncate(limit);
    merged
}

/// Cosine similarity can dip below zero for opposed vectors; NaN comes from
/// zero-norm rows.
fn normalize_similarity(similarity: f64) -> f64 {
    if similarity.is_nan() {
        0.0
    } else {
        similarity.clamp(0.0, 1.0)
    }
}

/// Escapes LIKE metacharacters so the query is matched literally.
/// The result is wrapped in `%…%` for a substring match with `ESCAPE '\'`.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
