//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every fallible operation, from repository calls to token verification, returns
//! `Result<_, AppError>`, so handlers never have to inspect untyped errors.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application errors
//! into HTTP responses shaped as `{ "message": ..., "errors": [...] }`.
//! Server-side failures are logged and answered with a generic message only.

use actix_web::{error::ResponseError, http::StatusCode, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// A single field-level validation failure, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field, in its wire (camelCase) form.
    pub field: String,
    /// Short rule identifier, e.g. `length`, `email`, `range`.
    pub rule: String,
    /// Human readable message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, rule: &str, message: impl Into<String>) -> Self {
        Self {
            field: to_camel_case(field),
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    Unauthorized(String),
    /// The request is well-formed but cannot be honoured, e.g. an email
    /// already held by another user (HTTP 400).
    BadRequest(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Input failed validation (HTTP 400), with one entry per failing rule.
    ValidationError(Vec<FieldError>),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Error originating from the storage backend (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// Builds a single-field validation error.
    pub fn invalid_field(field: &str, rule: &str, message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![FieldError::new(field, rule, message)])
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(errors) => {
                write!(f, "Validation Error: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", e.field, e.message)?;
                }
                Ok(())
            }
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                ErrorBody {
                    message: msg.clone(),
                    errors: None,
                }
            }
            AppError::ValidationError(errors) => ErrorBody {
                message: "Validation failed".to_string(),
                errors: Some(errors.clone()),
            },
            // Detail stays in the logs.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                ErrorBody {
                    message: INTERNAL_ERROR_MESSAGE.to_string(),
                    errors: None,
                }
            }
        };
        HttpResponse::build(self.status()).json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`, a unique-constraint violation becomes
/// `BadRequest` (the only unique column is `users.email`), everything else is a
/// `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::BadRequest("Email already in use".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`,
/// one `FieldError` per failed rule, sorted by field name.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(field, &e.code));
                    FieldError::new(field, &e.code, message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.rule.cmp(&b.rule)));
        AppError::ValidationError(fields)
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {:?}", error.kind()))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

fn default_message(field: &str, code: &str) -> String {
    let field = to_camel_case(field);
    match code {
        "email" => format!("{} must be a valid email address", field),
        "length" => format!("{} has an invalid length", field),
        "range" => format!("{} is out of range", field),
        "regex" => format!("{} has an invalid format", field),
        _ => format!("{} is invalid", field),
    }
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Error handler for `web::JsonConfig`: malformed or incomplete bodies are
/// validation failures, not actix's plain-text 400.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::invalid_field("body", "json", err.to_string()).into()
}

/// Error handler for `web::QueryConfig`.
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::invalid_field("query", "format", err.to_string()).into()
}

/// Error handler for `web::PathConfig`.
pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::invalid_field("id", "format", err.to_string()).into()
}
