use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the service layer and the JSON API.
///
/// The API renders these as `{"error": ...}` bodies with the matching status
/// code; the HTML surface turns the user-facing variants into flash messages
/// instead (see `controllers::web`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("You are not allowed to perform this action")]
    Forbidden,
    #[error("Authentication required")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Hash(_) | AppError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True for errors that carry a message meant for the end user rather
    /// than the operator.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            AppError::Database(_) | AppError::Hash(_) | AppError::Template(_)
        )
    }

    /// Maps a unique-constraint violation from the users table to a
    /// user-facing conflict, leaving other errors untouched.
    pub fn from_registration(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                if db.message().contains("username") {
                    AppError::Conflict("Username already taken.".to_string())
                } else {
                    AppError::Conflict("Email already registered.".to_string())
                }
            }
            other => AppError::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {:?}", self);
            return (status, Json(json!({"error": "Internal server error"}))).into_response();
        }
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
