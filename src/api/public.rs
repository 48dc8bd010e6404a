//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::scheduling::{BookingError, DateParseError};

// Errors

/// Request was missing something the caller has to supply.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BadRequest(pub String);

pub struct ApiError(anyhow::Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequest>().is_some()
            || self.0.downcast_ref::<DateParseError>().is_some()
        {
            return StatusCode::BAD_REQUEST;
        }
        match self.0.downcast_ref::<BookingError>() {
            Some(BookingError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(BookingError::Duplicate) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        let known = self.0.downcast_ref::<BadRequest>().is_some()
            || self.0.downcast_ref::<DateParseError>().is_some()
            || self.0.downcast_ref::<BookingError>().is_some();
        if known {
            self.0.to_string()
        } else {
            format!("Something went wrong: {}", self.0)
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Always log the error, with the full source chain for server
        // side failures
        if status.is_server_error() {
            tracing::error!("{:#}", self.0);
        } else {
            tracing::info!("Rejected request: {}", self.0);
        }

        (status, Json(ErrorResponse { error: self.message() })).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// Re-export public types from each route

pub mod availability {
    pub use crate::api::routes::availability::public::*;
}

pub mod booking {
    pub use crate::api::routes::booking::public::*;
}

pub mod contact {
    pub use crate::api::routes::contact::public::*;
}

pub mod health {
    pub use crate::api::routes::health::public::*;
}

pub mod testimonial {
    pub use crate::api::routes::testimonial::public::*;
}
