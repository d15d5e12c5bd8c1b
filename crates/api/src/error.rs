//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": <message>, "code": <CODE>}`.
//! Domain errors keep their message; storage and internal failures are
//! logged in full and reported to the caller as a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paper_core::error::CoreError;
use serde_json::json;

/// Error returned by handlers and [`crate::auth::service::AuthService`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Not found, validation, conflict or unauthorized, from `paper_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Anything raised by sqlx. Named `uq_*` violations become 409.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure the caller cannot act on, e.g. password hashing.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Validator failures name the offending fields, sorted, in one message.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort_unstable();
        AppError::Core(CoreError::Validation(format!(
            "Invalid fields: {}",
            fields.join(", ")
        )))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) | AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Database(err) => classify_sqlx_error(err),
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

/// Whether `err` is a PostgreSQL unique violation (SQLSTATE 23505) on the
/// named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Map a sqlx error to status, code and caller-facing message.
///
/// `RowNotFound` is 404 and a unique violation on a `uq_*` constraint is
/// 409. Everything else, including foreign-key and trigger rejections, is
/// a 500 whose details stay in the log.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or_default();
            if db_err.code().as_deref() == Some("23505") && constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
