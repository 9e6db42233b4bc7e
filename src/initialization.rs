use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::application::agent::SupportAgent;
use crate::application::company_info_service::CompanyInfoServiceImpl;
use crate::config::AppConfig;
use crate::domain::company_info::CompanyInfoService;
use crate::domain::company_info_repository::CompanyInfoRepository;
use crate::domain::embedder::Embedder;
use crate::domain::web_search::WebSearchProvider;
use crate::infrastructure::{OpenAiChatModel, OpenAiEmbeddingClient, PgCompanyInfoRepository, TavilyClient};
use crate::server::AppState;
use crate::tools::{CompanyInfoSearchTool, ToolRegistry, WebSearchTool};

/// Tools the support agent may call, in registry order.
pub fn support_tools(
    company_info: Arc<dyn CompanyInfoService>,
    web_search: Arc<dyn WebSearchProvider>,
) -> ToolRegistry {
    let tools = ToolRegistry::new()
        .with(CompanyInfoSearchTool::new(company_info))
        .with(WebSearchTool::new(web_search));
    let names: Vec<String> = tools.definitions().into_iter().map(|d| d.name).collect();
    log::info!("Registered agent tools: {}", names.join(", "));
    tools
}

/// Wires clients, repository, service, tools and agent around the injected pool.
pub fn initialize_services(config: &AppConfig, pool: PgPool) -> Result<AppState> {
    let embedder: Arc<dyn Embedder> = Arc::new(
        OpenAiEmbeddingClient::new(&config.embedding).context("Failed to create embedding client")?,
    );
    let repository: Arc<dyn CompanyInfoRepository> = Arc::new(PgCompanyInfoRepository::new(pool));
    let company_info: Arc<dyn CompanyInfoService> =
        Arc::new(CompanyInfoServiceImpl::new(embedder, repository));

    let web_search: Arc<dyn WebSearchProvider> = Arc::new(
        TavilyClient::new(&config.web_search).context("Failed to create web-search client")?,
    );
    let tools = support_tools(company_info.clone(), web_search);

    let model = OpenAiChatModel::new(&config.agent).context("Failed to create chat model client")?;
    let agent = SupportAgent::new(
        Arc::new(model),
        tools,
        config.agent.max_tokens,
        config.agent.max_tool_rounds,
    );

    Ok(AppState::new(company_info, Arc::new(agent)))
}
