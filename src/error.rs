use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::dotenv::Error as DotError;
use crate::response::Envelope;
use crate::thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid {name}: received {received:?}")]
    InvalidIdentifier { name: &'static str, received: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("dotenv error: {0}")]
    DotEnvError(#[from] DotError),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_identifier(name: &'static str, received: &str) -> Self {
        Error::InvalidIdentifier {
            name,
            received: received.to_owned(),
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            Error::InvalidIdentifier { name, received } => Some(format!("expected {} to be a UUID, got {:?}", name, received)),
            _ => None,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Error::InvalidIdentifier { .. } => "invalid identifier",
            Error::Validation(_) => "validation failed",
            Error::NotFound(_) => "resource not found",
            Error::Conflict(_) => "request conflicts with current state",
            _ => "internal server error",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidIdentifier { .. } | Error::Validation(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {}", self);
        }
        HttpResponse::build(status).json(Envelope::failure(self.message(), self.to_string(), self.hint()))
    }
}
