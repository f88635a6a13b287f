//! Request-time errors.
//!
//! Routing itself never fails for well-formed configuration; these cover the
//! collaborators around it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The locale normalizer could not produce an outcome.
    #[error("locale normalization failed: {0}")]
    Locale(String),

    /// A redirect target could not be encoded as a `Location` header.
    #[error("invalid redirect location: {0}")]
    InvalidRedirect(String),

    /// Forwarding to the frontend failed.
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::Locale(_) | GateError::InvalidRedirect(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GateError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = match self {
            GateError::Upstream(_) => "Upstream request failed",
            _ => "Internal routing error",
        };
        (self.status(), body).into_response()
    }
}
