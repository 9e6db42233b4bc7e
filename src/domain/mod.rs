pub mod chat;
pub mod company_info;
pub mod company_info_repository;
pub mod embedder;
pub mod web_search;
