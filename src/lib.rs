use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
pub mod api;
mod app;
pub mod auth;
pub mod draw_key;
pub mod eligibility;
pub mod prize;
pub mod sampler;
mod service;
pub mod setting;
pub mod source;
pub mod winner;

pub use {app::*, service::*};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Auth(#[from] auth::AuthError),
    /// The prize draw configuration is contradictory.
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    NotFound(String),
    /// Retry is safe once the underlying condition changes.
    #[error("{0}")]
    Conflict(String),
    /// Caller must fetch a fresh draw key and retry.
    #[error("{0}")]
    Validation(String),
    #[error("Access denied")]
    Forbidden,
    #[error("{0}")]
    Message(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Validation(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Creates full response for error.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // don't leak storage details
        let message = if status.is_server_error() {
            tracing::error!(error = self.to_string(), "internal error");
            "internal error".to_owned()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({
            "error": message,
            "status_code": status.as_u16(),
        }))
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
