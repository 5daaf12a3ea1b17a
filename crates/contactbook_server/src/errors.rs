use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use contactbook_core::service::contact_service::error_code;
use contactbook_core::RepoError;
use log::error;
use serde::Serialize;

pub const CONTACT_NOT_FOUND: &str = "Contact not found";
const STORAGE_FAILURE: &str = "internal storage error";

/// HTTP error rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    /// Logs `cause` and hides it behind a generic message.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!("event=request_failed module=http status=error error={cause}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            detail: self.detail,
        };
        (self.status, axum::Json(body)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(err) => Self::unprocessable(err.to_string()),
            RepoError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, CONTACT_NOT_FOUND),
            other => {
                error!(
                    "event=storage_error module=http status=error error_code={} error={other}",
                    error_code(&other)
                );
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}
