// In crates/web-server/src/error.rs

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] engine::Error),

    #[error("Malformed request body: {}", .rejection.body_text())]
    InvalidBody {
        message: &'static str,
        #[source]
        rejection: JsonRejection,
    },

    #[error("Failed to bind or serve: {0}")]
    ServerBindError(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Body of every failed API call.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        use api_client::Error as Upstream;
        use engine::Error as E;

        match self {
            Error::InvalidBody { message, .. } => (StatusCode::BAD_REQUEST, *message),
            Error::Engine(E::InvalidAddress(core_types::Error::MissingAddress)) => {
                (StatusCode::BAD_REQUEST, "Wallet address is required")
            }
            Error::Engine(E::InvalidAddress(_)) => (StatusCode::BAD_REQUEST, "Invalid wallet address"),
            Error::Engine(E::NoData(_)) => (StatusCode::NOT_FOUND, "No data available for this wallet"),
            Error::Engine(E::Timeout(_)) => (StatusCode::GATEWAY_TIMEOUT, "Request timed out"),
            Error::Engine(E::Upstream(Upstream::RateLimited(_))) => {
                (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded, please try again later")
            }
            Error::Engine(E::Upstream(Upstream::MissingApiKey(_))) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Service is not configured")
            }
            Error::Engine(E::Upstream(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "Upstream request failed"),
            Error::Engine(E::Rules(_)) | Error::ServerBindError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: message.to_string(),
            details: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
