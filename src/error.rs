use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid request body: {}", .0.join(", "))]
    ShapeValidation(Vec<String>),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("token signing failed: {0}")]
    TokenIssue(String),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Message {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(rename = "statusCode")]
    status_code: u16,
    message: Message,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ShapeValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AuthError::ShapeValidation(violations) => Message::Many(violations.clone()),
            AuthError::TokenIssue(detail) => {
                tracing::error!("Token issue failed: {}", detail);
                Message::One("Internal server error".to_string())
            }
            other => Message::One(other.to_string()),
        };
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if matches!(self, AuthError::Unauthorized) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(ErrorBody {
            status_code: status.as_u16(),
            message,
        })
    }
}

/// Startup failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("failed to read users file {path}: {source}")]
    UsersFileIo {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse users file {path}: {source}")]
    UsersFileParse {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate username {0:?} in credential store")]
    DuplicateUsername(String),
}
