//! HTTP API: chat, company-info administration and health.

pub mod error;
pub mod handler;
pub mod state;

use std::net::SocketAddr;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::middleware::{from_fn, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

pub use error::ApiError;
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handler::chat))
        .route(
            "/api/company-info",
            post(handler::create_company_info)
                .get(handler::list_company_info)
                .delete(handler::delete_company_info),
        )
        .route("/api/health", get(handler::health))
        .layer(from_fn(log_requests))
        .with_state(state)
}

/// Logs method, path, status and latency of every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();
    if status.is_server_error() {
        log::warn!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed_ms);
    } else {
        log::info!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed_ms);
    }
    response
}

/// Binds `bind_addr` and serves until Ctrl-C or SIGTERM.
pub async fn serve(bind_addr: &str, state: AppState) -> Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind_addr))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("support-desk listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    log::info!("support-desk stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("Shutdown signal received, draining in-flight requests");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::agent::SupportAgent;
    use crate::domain::chat::{AssistantTurn, ChatMessage, ChatModel, ToolDefinition};
    use crate::domain::company_info::{CompanyInfo, MockCompanyInfoService};
    use crate::error::{SupportError, SupportResult};
    use crate::tools::ToolRegistry;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedModel(SupportResult<String>);

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDefinition],
            _max_tokens: u32,
        ) -> SupportResult<AssistantTurn> {
            match &self.0 {
                Ok(text) => Ok(AssistantTurn {
                    content: Some(text.clone()),
                    tool_calls: vec![],
                }),
                Err(_) => Err(SupportError::Provider("quota exceeded".into())),
            }
        }
    }

    fn router(service: MockCompanyInfoService, reply: SupportResult<String>) -> Router {
        let agent = SupportAgent::new(Arc::new(FixedModel(reply)), ToolRegistry::new(), 100, 2);
        build_router(AppState::new(Arc::new(service), Arc::new(agent)))
    }

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn stored(id: i64, title: &str) -> CompanyInfo {
        CompanyInfo {
            id,
            title: title.to_string(),
            content: "内容".to_string(),
            embedding: Some(vec![0.1; 4]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_title_and_content() {
        let mut service = MockCompanyInfoService::new();
        service.expect_create().never();
        let app = router(service, Ok(String::new()));

        let (status, body) = call(app, Method::POST, "/api/company-info", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Title and content are required" }));
    }

    #[tokio::test]
    async fn test_create_returns_row_without_embedding() {
        let mut service = MockCompanyInfoService::new();
        service
            .expect_create()
            .withf(|title, content| title == "営業時間" && content == "平日9時〜18時")
            .returning(|_, _| Ok(stored(7, "営業時間")));
        let app = router(service, Ok(String::new()));

        let (status, body) = call(
            app,
            Method::POST,
            "/api/company-info",
            Some(json!({ "title": "営業時間", "content": "平日9時〜18時" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 7);
        assert!(body["data"].get("embedding").is_none());
        assert!(body["data"].get("created_at").is_some());
    }

    #[tokio::test]
    async fn test_create_store_failure_is_generic_500() {
        let mut service = MockCompanyInfoService::new();
        service
            .expect_create()
            .returning(|_, _| Err(SupportError::Embedding("401 Unauthorized".into())));
        let app = router(service, Ok(String::new()));

        let (status, body) = call(
            app,
            Method::POST,
            "/api/company-info",
            Some(json!({ "title": "a", "content": "b" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to save company info" }));
    }

    #[tokio::test]
    async fn test_list_failure() {
        let mut service = MockCompanyInfoService::new();
        service
            .expect_list()
            .returning(|| Err(SupportError::Store("connection refused".into())));
        let app = router(service, Ok(String::new()));

        let (status, body) = call(app, Method::GET, "/api/company-info", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch company info" }));
    }

    #[tokio::test]
    async fn test_delete_validates_id() {
        let app = router(MockCompanyInfoService::new(), Ok(String::new()));
        let (status, body) = call(app, Method::DELETE, "/api/company-info", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "ID is required" }));

        let app = router(MockCompanyInfoService::new(), Ok(String::new()));
        let (status, _) = call(app, Method::DELETE, "/api/company-info?id=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_success() {
        let mut service = MockCompanyInfoService::new();
        service
            .expect_delete_by_id()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|_| Ok(()));
        let app = router(service, Ok(String::new()));

        let (status, body) = call(app, Method::DELETE, "/api/company-info?id=42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "message": "Company info deleted successfully" })
        );
    }

    #[tokio::test]
    async fn test_chat_success_and_failure() {
        let app = router(MockCompanyInfoService::new(), Ok("承知しました".to_string()));
        let (status, body) = call(app, Method::POST, "/api/chat", Some(json!({ "message": "こんにちは" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "承知しました", "success": true }));

        let app = router(MockCompanyInfoService::new(), Err(SupportError::Provider(String::new())));
        let (status, body) = call(app, Method::POST, "/api/chat", Some(json!({ "message": "こんにちは" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], handler::CHAT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_without_message_or_image() {
        let app = router(MockCompanyInfoService::new(), Ok("unused".to_string()));
        let (status, body) = call(app, Method::POST, "/api/chat", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_health_reports_database_state() {
        let mut service = MockCompanyInfoService::new();
        service.expect_ping().returning(|| Ok(()));
        let (status, body) = call(router(service, Ok(String::new())), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "database": true }));

        let mut service = MockCompanyInfoService::new();
        service
            .expect_ping()
            .returning(|| Err(SupportError::Store("down".into())));
        let (status, body) = call(router(service, Ok(String::new())), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["database"], false);
    }
}
