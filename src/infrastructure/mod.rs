pub mod company_info_repository;
pub mod embedding;
pub mod openai_chat;
pub mod postgres;
pub mod tavily;

pub use company_info_repository::PgCompanyInfoRepository;
pub use embedding::OpenAiEmbeddingClient;
pub use openai_chat::OpenAiChatModel;
pub use tavily::TavilyClient;
