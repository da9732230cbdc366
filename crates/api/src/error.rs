//! API error types and HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use persistence::repositories::ClaimLifecycleError;
use serde_json::json;
use shared::jwt::JwtError;
use shared::password::PasswordError;
use thiserror::Error;

/// Errors that can occur in API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Too many requests")]
    RateLimited { retry_after_secs: u64 },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Validation(msg)
            | ApiError::ServiceUnavailable(msg) => msg.clone(),
            ApiError::RateLimited { .. } => {
                "Too many requests, please try again later".to_string()
            }
            // Internal details stay in the logs.
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(json!({
            "success": false,
            "error": error_code,
            "message": self.public_message(),
        }));

        let mut response = (status, body).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = retry_after_secs.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }
        response
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".to_string()),
                Some("23503") => ApiError::NotFound("Referenced resource not found".to_string()),
                _ => ApiError::Internal(format!("Database error: {}", err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let details: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        ApiError::Validation(details.join("; "))
    }
}

impl From<ClaimLifecycleError> for ApiError {
    fn from(err: ClaimLifecycleError) -> Self {
        match err {
            ClaimLifecycleError::ItemNotFound | ClaimLifecycleError::ClaimNotFound => {
                ApiError::NotFound(err.to_string())
            }
            ClaimLifecycleError::OwnItem => ApiError::Validation(err.to_string()),
            ClaimLifecycleError::ItemAlreadyClaimed | ClaimLifecycleError::DuplicateClaim => {
                ApiError::Conflict(err.to_string())
            }
            ClaimLifecycleError::NotPending | ClaimLifecycleError::AlreadyRejected => {
                ApiError::Conflict(err.to_string())
            }
            ClaimLifecycleError::Database(db_err) => ApiError::from(db_err),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
            JwtError::InvalidToken | JwtError::DecodingError(_) => {
                ApiError::Unauthorized("Invalid token".to_string())
            }
            JwtError::EncodingError(e) => {
                ApiError::Internal(format!("Failed to issue token: {}", e))
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        // Password hashing failures are never the caller's fault.
        ApiError::Internal(format!("Password processing failed: {}", err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_and_code().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation("x".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::RateLimited { retry_after_secs: 1 }.status_and_code().0,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::Internal("connection pool exhausted".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_claim_lifecycle_mapping() {
        assert!(matches!(
            ApiError::from(ClaimLifecycleError::ItemNotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(ClaimLifecycleError::OwnItem),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(ClaimLifecycleError::DuplicateClaim),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(ClaimLifecycleError::NotPending),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let err = ApiError::from(JwtError::TokenExpired);
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
