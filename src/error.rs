//! HTTP-facing error type and its JSON representation.
//!
//! Domain errors ([`LinkError`]) are translated here and nowhere else. Response body:
//!
//! ```json
//! { "error": { "code": "slug_not_in_use", "message": "Slug 'x' is not in use", "details": {} } }
//! ```

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::errors::{LinkError, StoreError};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description embedded in error responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Request-scoped error returned by handlers and middleware.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input rejected before reaching the registry (422).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Well-formed request the registry refused (422).
    #[error("{message}")]
    Unprocessable {
        code: &'static str,
        message: String,
        details: Value,
    },

    #[error("{message}")]
    NotFound {
        code: &'static str,
        message: String,
        details: Value,
    },

    /// Credentials were presented but are wrong (401).
    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    /// No usable credentials were presented (403).
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            code: "not_found",
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Maps any registry error to 422, as link creation requires.
    ///
    /// Storage failures still map to 500.
    pub fn unprocessable(err: LinkError) -> Self {
        match err {
            LinkError::Storage(e) => e.into(),
            other => Self::Unprocessable {
                code: other.code(),
                details: link_error_details(&other),
                message: other.to_string(),
            },
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::Unprocessable { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable description.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::Unprocessable {
                code,
                message,
                details,
            }
            | AppError::NotFound {
                code,
                message,
                details,
            } => (*code, message, details),
            AppError::Unauthorized { message, details } => ("unauthorized", message, details),
            AppError::Forbidden { message, details } => ("forbidden", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

fn link_error_details(err: &LinkError) -> Value {
    match err {
        LinkError::InvalidSlug { slug } | LinkError::SlugNotInUse { slug } => {
            json!({ "slug": slug })
        }
        LinkError::SlugAlreadyInUse { slug, target_url } => {
            json!({ "slug": slug, "target_url": target_url })
        }
        LinkError::TargetUrlAlreadyExists { target_url, slug } => {
            json!({ "target_url": target_url, "existing_slug": slug })
        }
        LinkError::NoAvailableSlugs | LinkError::Storage(_) => json!({}),
    }
}

impl From<LinkError> for AppError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::InvalidSlug { .. } | LinkError::SlugNotInUse { .. } => Self::NotFound {
                code: err.code(),
                details: link_error_details(&err),
                message: err.to_string(),
            },
            LinkError::Storage(e) => e.into(),
            other => Self::unprocessable(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        Self::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).unwrap_or_else(|_| json!({}));
        Self::bad_request("Request validation failed", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_map_to_not_found() {
        let err = AppError::from(LinkError::InvalidSlug {
            slug: "nope".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_error_info().code, "invalid_slug");

        let err = AppError::from(LinkError::SlugNotInUse {
            slug: "bored-bulbasaur".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_error_info().details["slug"], "bored-bulbasaur");
    }

    #[test]
    fn test_conflicts_map_to_unprocessable() {
        let err = AppError::from(LinkError::TargetUrlAlreadyExists {
            target_url: "https://x.com".to_string(),
            slug: "a".to_string(),
        });

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let info = err.to_error_info();
        assert_eq!(info.code, "target_url_already_exists");
        assert_eq!(info.details["existing_slug"], "a");
    }

    #[test]
    fn test_unprocessable_covers_lookup_errors() {
        let err = AppError::unprocessable(LinkError::InvalidSlug {
            slug: "nope".to_string(),
        });

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_error_info().code, "invalid_slug");
    }

    #[test]
    fn test_storage_errors_do_not_leak() {
        let err = AppError::from(LinkError::from(sqlx::Error::RowNotFound));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let info = err.to_error_info();
        assert_eq!(info.code, "internal_error");
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = AppError::unauthorized("Invalid token", json!({})).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_forbidden_status() {
        let err = AppError::forbidden("Not authenticated", json!({}));

        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_error_info().code, "forbidden");
    }
}
