pub mod agent;
pub mod company_info_service;
pub mod hybrid;
