pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod initialization;
pub mod server;
pub mod tools;

pub use application::agent::{ChatRequest, SupportAgent};
pub use application::company_info_service::CompanyInfoServiceImpl;
pub use config::{load_config, AppConfig};
pub use domain::company_info::{CompanyInfo, CompanyInfoService, RetrievalResult, SearchOutcome};
pub use error::{SupportError, SupportResult};
pub use server::{build_router, AppState};
pub use tools::ToolRegistry;
