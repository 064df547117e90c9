//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Handlers return `Result<_, AppError>` and rely on the `From` implementations below
//! so that `?` works on `sqlx`, `bcrypt`, `jsonwebtoken`, export and generation
//! errors alike.
//!
//! `AppError` implements `actix_web::error::ResponseError`, which turns every variant
//! into a JSON body of the form `{"error": "..."}` with the matching status code.
//! Server-side failures are logged here and reported to the client with a generic message.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use std::fmt;

use crate::export::ExportError;
use crate::generation::GenerationError;

/// Message returned for every authentication failure. Callers never learn which check failed.
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    /// Always carries [`UNAUTHENTICATED_MESSAGE`]; build it with [`AppError::unauthenticated`].
    Unauthorized(String),
    /// Malformed request or a conflict such as a duplicate email (HTTP 400).
    BadRequest(String),
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure talking to the database (HTTP 500).
    DatabaseError(String),
    /// The external text-generation service failed (HTTP 502).
    UpstreamError(String),
}

impl AppError {
    /// The single opaque authentication failure.
    pub fn unauthenticated() -> Self {
        AppError::Unauthorized(UNAUTHENTICATED_MESSAGE.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::UpstreamError(msg) => write!(f, "Upstream Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(_) => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({ "error": UNAUTHENTICATED_MESSAGE })),
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            // The driver message may leak schema details, so it stays in the log.
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Database error"
                }))
            }
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::UpstreamError(msg) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": msg }))
            }
        }
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Any JWT failure collapses into the generic authentication error.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::unauthenticated()
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<ExportError> for AppError {
    fn from(error: ExportError) -> AppError {
        AppError::InternalServerError(format!("Export failed: {}", error))
    }
}

impl From<GenerationError> for AppError {
    fn from(error: GenerationError) -> AppError {
        AppError::UpstreamError(error.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let response = AppError::unauthenticated().error_response();
        assert_eq!(response.status(), 401);

        let response = AppError::BadRequest("Email already registered".into()).error_response();
        assert_eq!(response.status(), 400);

        let response = AppError::NotFound("Project not found".into()).error_response();
        assert_eq!(response.status(), 404);

        let response = AppError::InternalServerError("boom".into()).error_response();
        assert_eq!(response.status(), 500);

        let response = AppError::DatabaseError("relation missing".into()).error_response();
        assert_eq!(response.status(), 500);

        let response = AppError::UpstreamError("quota".into()).error_response();
        assert_eq!(response.status(), 502);
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let response = AppError::Unauthorized("token expired".into()).error_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[actix_rt::test]
    async fn test_unauthorized_body_is_generic() {
        let response = AppError::Unauthorized("ExpiredSignature".into()).error_response();
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], UNAUTHENTICATED_MESSAGE);
    }

    #[actix_rt::test]
    async fn test_database_error_hides_driver_message() {
        let response = AppError::DatabaseError("column \"secret\" missing".into()).error_response();
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Database error");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }
}
