use std::sync::Arc;

use crate::application::agent::SupportAgent;
use crate::domain::company_info::CompanyInfoService;

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub company_info: Arc<dyn CompanyInfoService>,
    pub agent: Arc<SupportAgent>,
}

impl AppState {
    pub fn new(company_info: Arc<dyn CompanyInfoService>, agent: Arc<SupportAgent>) -> Self {
        Self { company_info, agent }
    }
}
