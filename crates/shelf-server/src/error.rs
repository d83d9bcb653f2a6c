use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Script name conflicts with system command: {0}")]
    ReservedName(String),
    /// The body stays exactly `Unauthorized`; the rejection reason is
    /// logged, never sent.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Script not found: {0}")]
    NotFound(String),
    #[error("Script with this name already exists: {0}")]
    Duplicate(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Wire shape of error responses: `{"error": ..., "warning": true?}`.
/// The warning flag marks requests worth reconsidering rather than
/// malformed ones.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<bool>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    const fn is_warning(&self) -> bool {
        matches!(self, Self::ReservedName(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) | Self::ReservedName(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            warning: self.is_warning().then_some(true),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<shelf_core::Error> for AppError {
    fn from(error: shelf_core::Error) -> Self {
        match error {
            shelf_core::Error::InvalidInput(message) => Self::BadRequest(message),
            shelf_core::Error::NotFound(name) => Self::NotFound(name),
            shelf_core::Error::Duplicate(name) => Self::Duplicate(name),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_name_carries_warning_flag() {
        let body = ErrorBody {
            error: AppError::ReservedName("git".to_string()).to_string(),
            warning: AppError::ReservedName("git".to_string())
                .is_warning()
                .then_some(true),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["warning"], true);
        assert!(json["error"].as_str().unwrap().contains("git"));
    }

    #[test]
    fn unauthorized_body_is_bare() {
        let body = ErrorBody {
            error: AppError::Unauthorized.to_string(),
            warning: AppError::Unauthorized.is_warning().then_some(true),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Unauthorized"}));
    }

    #[test]
    fn plain_errors_omit_warning_field() {
        let body = ErrorBody {
            error: "nope".to_string(),
            warning: AppError::BadRequest("nope".to_string())
                .is_warning()
                .then_some(true),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("warning").is_none());
    }
}
