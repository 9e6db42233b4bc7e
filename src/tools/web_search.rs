use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::web_search::{WebSearchHit, WebSearchProvider};
use crate::tools::Tool;

pub const WEB_SEARCH_TOOL: &str = "web-search";
const MAX_WEB_RESULTS: usize = 10;

fn default_max_results() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchArgs {
    #[schemars(description = "検索クエリ")]
    pub query: String,
    #[serde(default = "default_max_results")]
    #[schemars(description = "取得する検索結果の最大数")]
    pub max_results: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchOutput {
    pub results: Vec<WebSearchHit>,
}

pub struct WebSearchTool {
    provider: Arc<dyn WebSearchProvider>,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn WebSearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    type Input = WebSearchArgs;
    type Output = WebSearchOutput;

    fn name(&self) -> &'static str {
        WEB_SEARCH_TOOL
    }

    fn description(&self) -> &'static str {
        "ウェブ検索を実行して最新情報を取得します。"
    }

    async fn call(&self, input: WebSearchArgs) -> WebSearchOutput {
        let max_results = input.max_results.clamp(1, MAX_WEB_RESULTS);
        match self.provider.search(&input.query, max_results).await {
            Ok(results) => WebSearchOutput { results },
            Err(e) => {
                log::error!("Web search failed for '{}': {}", input.query, e);
                WebSearchOutput { results: Vec::new() }
            }
        }
    }
}
