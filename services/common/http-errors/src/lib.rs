use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

/// Header carrying a stable, low-cardinality error code for metrics middleware.
pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub trace_id: Option<Uuid>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Rendered as a bare 404: status and error-code header, no body.
    NotFound { code: &'static str },
    Internal { trace_id: Option<Uuid> },
}

impl ApiError {
    pub fn not_found(code: &'static str) -> Self { Self::NotFound { code } }

    /// Logs the underlying cause under a fresh trace id; the response only carries the id.
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        let trace_id = Uuid::new_v4();
        error!(%trace_id, error = %e, "request failed with internal error");
        Self::Internal { trace_id: Some(trace_id) }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { code } => *code,
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_code = self.code();
        let mut resp = match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal { trace_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { code: error_code.into(), trace_id }),
            ).into_response(),
        };
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
