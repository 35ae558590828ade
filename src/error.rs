use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Hashing error: {0}")]
    HashError(#[from] HashError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Unknown message pattern: {0}")]
    UnknownPattern(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Transport-level faults still answer with the envelope shape.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::UnknownPattern(_) | AppError::MalformedMessage(_) => self.to_string(),
            _ => "Internal Server Error".to_string(),
        };
        HttpResponse::build(status).json(json!({
            "status": status.as_u16(),
            "message": message
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownPattern(_) => StatusCode::NOT_FOUND,
            AppError::MalformedMessage(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Query(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Hashing task aborted: {0}")]
    Aborted(String),
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Business outcomes of the authentication pipeline that end a request early.
///
/// Each variant carries a fixed caller-visible message; causes of
/// `Unexpected` are logged where they occur and never reach the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Email already exists")]
    DuplicateAccount,

    #[error("Email not found")]
    NotFound,

    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Token generation failed")]
    TokenIssuance,

    #[error("{0}")]
    Unexpected(&'static str),
}

impl AuthFailure {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthFailure::Validation(_) => 400,
            AuthFailure::DuplicateAccount => 409,
            AuthFailure::NotFound => 404,
            AuthFailure::InvalidCredentials => 401,
            AuthFailure::TokenIssuance => 500,
            AuthFailure::Unexpected(_) => 500,
        }
    }
}
