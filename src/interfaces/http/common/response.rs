//! Response envelope and error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::BookingRejection;
use crate::domain::catalog::CriteriaError;
use crate::domain::{DomainError, WindowError};

/// Standard API response wrapper.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "...", "code": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable reason, failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Ids of the reservations blocking a booking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_ids: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            conflicting_ids: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
            conflicting_ids: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Handler error carrying its HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub conflicting_ids: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            conflicting_ids: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = ApiResponse::<()>::error(self.message).with_code(self.code);
        if !self.conflicting_ids.is_empty() {
            body.conflicting_ids = Some(self.conflicting_ids);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<BookingRejection> for ApiError {
    fn from(rejection: BookingRejection) -> Self {
        let status = match &rejection {
            BookingRejection::InvalidWindow { .. } | BookingRejection::PastDate { .. } => {
                StatusCode::BAD_REQUEST
            }
            BookingRejection::UnknownResource { .. } => StatusCode::NOT_FOUND,
            BookingRejection::SlotConflict { .. } => StatusCode::CONFLICT,
            BookingRejection::InvalidRate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookingRejection::SourceFailure { .. } | BookingRejection::PersistenceFailure { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        Self {
            status,
            code: rejection.code(),
            message: rejection.to_string(),
            conflicting_ids: rejection.conflicting_ids().to_vec(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let (status, code) = match &err {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            DomainError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
            DomainError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage"),
        };
        Self::new(status, code, err.to_string())
    }
}

impl From<CriteriaError> for ApiError {
    fn from(err: CriteriaError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_criteria", err.to_string())
    }
}

impl From<WindowError> for ApiError {
    fn from(err: WindowError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_window", err.to_string())
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_statuses() {
        let conflict: ApiError = BookingRejection::SlotConflict {
            resource_id: "b1".into(),
            conflicting_ids: vec!["r1".into()],
        }
        .into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.conflicting_ids, vec!["r1".to_string()]);

        let unknown: ApiError = BookingRejection::UnknownResource {
            resource_id: "b9".into(),
        }
        .into();
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);

        let down: ApiError = BookingRejection::PersistenceFailure {
            message: "timeout".into(),
        }
        .into();
        assert_eq!(down.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(down.code, "persistence_failure");
    }

    #[test]
    fn error_envelope_skips_empty_fields() {
        let json = serde_json::to_value(ApiResponse::<()>::error("boom").with_code("x")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["code"], "x");
        assert!(json.get("conflicting_ids").is_none());
    }
}
