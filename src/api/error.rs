use crate::errors::{DomainError, ServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Error half of every handler result; renders as `{ "error", "message" }`.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// The request itself could not be read (malformed JSON, bad query string)
    BadRequest(String),
}

impl ApiError {
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::Service(err) => match err {
                ServiceError::Authentication(_) | ServiceError::SessionExpired => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized")
                }
                ServiceError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "Forbidden"),
                ServiceError::Domain(DomainError::Validation(_) | DomainError::InvalidUuid(_)) => {
                    (StatusCode::BAD_REQUEST, "ValidationError")
                }
                ServiceError::Domain(e) if e.is_not_found() => (StatusCode::NOT_FOUND, "NotFound"),
                ServiceError::Domain(e) if e.is_conflict() => (StatusCode::CONFLICT, "Conflict"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Service(ServiceError::Domain(DomainError::Validation(e))) => e.to_string(),
            ApiError::Service(ServiceError::Domain(DomainError::Conflict(message))) => message.clone(),
            ApiError::Service(ServiceError::PermissionDenied(message)) => message.clone(),
            ApiError::Service(ServiceError::Authentication(message)) => message.clone(),
            ApiError::Service(err) => err.to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Service(ServiceError::Domain(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_kind();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {:?}", self);
            "An internal error occurred".to_string()
        } else {
            log::debug!("Request rejected with {}: {}", status, self.message());
            self.message()
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DbError, ValidationError};
    use uuid::Uuid;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let status = |err: ServiceError| ApiError::from(err).status_and_kind().0;

        assert_eq!(status(ValidationError::required("text").into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::SessionExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::PermissionDenied("no".into())), StatusCode::FORBIDDEN);
        assert_eq!(
            status(DomainError::EntityNotFound("Donation".into(), Uuid::new_v4()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(DomainError::Conflict("dup".into()).into()), StatusCode::CONFLICT);
        assert_eq!(status(DbError::Conflict("UNIQUE".into()).into()), StatusCode::CONFLICT);
        assert_eq!(status(DbError::Other("disk".into()).into()), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
