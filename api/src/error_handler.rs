use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chat_core::ChatError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Convert `ChatError` to `AppError::Http` with precise HTTP status & code.
impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        let (status, code) = match &err {
            ChatError::Completion(_) | ChatError::Embedding(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            ChatError::Index(_) => (StatusCode::BAD_GATEWAY, "INDEX_ERROR"),
            ChatError::InvalidRequest(msg) => return AppError::BadRequest(msg.clone()),
            ChatError::SearchUnavailable => (StatusCode::NOT_FOUND, "SEARCH_UNAVAILABLE"),
            ChatError::Config(_) | ChatError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        AppError::Http {
            status,
            code,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::error_handler::ProviderError;
    use rag_base::RagBaseError;

    #[test]
    fn chat_errors_map_to_statuses() {
        let upstream = AppError::from(ChatError::Completion(ProviderError::MissingApiKey.into()));
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.error_code(), "UPSTREAM_ERROR");

        let index = AppError::from(ChatError::from(RagBaseError::Qdrant("down".into())));
        assert_eq!(index.error_code(), "INDEX_ERROR");

        let emb = AppError::from(ChatError::from(RagBaseError::Embedding("401".into())));
        assert_eq!(emb.error_code(), "UPSTREAM_ERROR");

        let bad = AppError::from(ChatError::InvalidRequest("limit".into()));
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        let off = AppError::from(ChatError::SearchUnavailable);
        assert_eq!(off.status_code(), StatusCode::NOT_FOUND);
    }
}
