use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::hybrid::DEFAULT_SEARCH_LIMIT;
use crate::domain::company_info::{CompanyInfoService, RetrievalResult};
use crate::tools::Tool;

pub const COMPANY_INFO_SEARCH_TOOL: &str = "company-info-search";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompanyInfoSearchArgs {
    #[schemars(description = "会社情報検索クエリ")]
    pub query: String,
    /// Any JSON number; rounded, then clamped by the search engine.
    #[serde(default)]
    #[schemars(description = "最大検索結果数（デフォルト: 3）")]
    pub limit: Option<f64>,
}

impl CompanyInfoSearchArgs {
    pub fn limit(&self) -> usize {
        match self.limit {
            Some(limit) if limit.is_finite() => limit.round().max(0.0) as usize,
            _ => DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfoSearchOutput {
    pub results: Vec<RetrievalResult>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Exposes the hybrid retrieval engine to the agent.
pub struct CompanyInfoSearchTool {
    service: Arc<dyn CompanyInfoService>,
}

impl CompanyInfoSearchTool {
    pub fn new(service: Arc<dyn CompanyInfoService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for CompanyInfoSearchTool {
    type Input = CompanyInfoSearchArgs;
    type Output = CompanyInfoSearchOutput;

    fn name(&self) -> &'static str {
        COMPANY_INFO_SEARCH_TOOL
    }

    fn description(&self) -> &'static str {
        "会社情報検索ツール"
    }

    async fn call(&self, input: CompanyInfoSearchArgs) -> CompanyInfoSearchOutput {
        log::info!("company-info-search query: '{}'", input.query);
        let limit = input.limit();
        match self.service.search(input.query, limit).await {
            Ok(outcome) => CompanyInfoSearchOutput {
                results: outcome.results,
                message: outcome.message,
                error: None,
            },
            Err(e) => {
                log::error!("Error searching company info: {}", e);
                CompanyInfoSearchOutput {
                    results: Vec::new(),
                    message: "An error occurred while searching company information.".to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
