use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::application::agent::ChatRequest;
use crate::server::error::ApiError;
use crate::server::state::AppState;

pub const CHAT_FAILURE_MESSAGE: &str =
    "申し訳ございません。一時的な問題が発生しました。しばらくしてからもう一度お試しください。";
pub const CHAT_EMPTY_MESSAGE: &str = "メッセージを入力するか、画像を添付してください。";

const TITLE_AND_CONTENT_REQUIRED: &str = "Title and content are required";

#[derive(Debug, Default, Deserialize)]
pub struct CreateCompanyInfoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub id: Option<String>,
}

fn chat_reply(status: StatusCode, message: &str, success: bool) -> Response {
    (status, Json(json!({ "message": message, "success": success }))).into_response()
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected chat request body: {}", rejection);
            return chat_reply(StatusCode::BAD_REQUEST, CHAT_EMPTY_MESSAGE, false);
        }
    };

    let messages = match request.into_messages() {
        Ok(messages) => messages,
        Err(_) => return chat_reply(StatusCode::BAD_REQUEST, CHAT_EMPTY_MESSAGE, false),
    };

    match state.agent.generate(messages).await {
        Ok(reply) => chat_reply(StatusCode::OK, &reply, true),
        Err(e) => {
            log::error!("Chat generation failed: {}", e);
            chat_reply(StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILURE_MESSAGE, false)
        }
    }
}

/// `POST /api/company-info`
pub async fn create_company_info(
    State(state): State<AppState>,
    payload: Result<Json<CreateCompanyInfoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        log::warn!("Rejected company info body: {}", rejection);
        ApiError::bad_request(TITLE_AND_CONTENT_REQUIRED)
    })?;
    let (Some(title), Some(content)) = (body.title, body.content) else {
        return Err(ApiError::bad_request(TITLE_AND_CONTENT_REQUIRED));
    };

    let created = state
        .company_info
        .create(title, content)
        .await
        .map_err(|e| ApiError::from_support(e, "Failed to save company info"))?;
    Ok(Json(json!({ "success": true, "data": created })).into_response())
}

/// `GET /api/company-info`
pub async fn list_company_info(State(state): State<AppState>) -> Result<Response, ApiError> {
    let docs = state
        .company_info
        .list()
        .await
        .map_err(|e| ApiError::from_support(e, "Failed to fetch company info"))?;
    Ok(Json(json!({ "success": true, "data": docs })).into_response())
}

/// `DELETE /api/company-info?id=<id>`
pub async fn delete_company_info(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Response, ApiError> {
    let raw = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("ID is required"))?;
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("ID must be an integer"))?;

    state
        .company_info
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::from_support(e, "Failed to delete company info"))?;
    Ok(Json(json!({
        "success": true,
        "message": "Company info deleted successfully"
    }))
    .into_response())
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Response {
    match state.company_info.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": true })),
        )
            .into_response(),
        Err(e) => {
            log::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": false })),
            )
                .into_response()
        }
    }
}
