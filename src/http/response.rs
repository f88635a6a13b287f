//! Response construction.
//!
//! # Responsibilities
//! - Turn redirect decisions into `307 Temporary Redirect` responses
//!
//! # Design Decisions
//! - `Location` is relative; clients resolve it against the request URL
//! - 307 keeps the request method, matching the frontend framework's redirects

use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

use crate::error::GateError;

/// Build a temporary redirect to `location`.
///
/// Only same-origin paths are accepted. `//host` and `/\host` are resolved
/// by browsers as another origin.
pub fn redirect(location: &str) -> Result<Response<Body>, GateError> {
    let on_site = location.starts_with('/') && !location.starts_with("//") && !location.starts_with("/\\");
    if !on_site {
        return Err(GateError::InvalidRedirect(location.to_string()));
    }

    let value = HeaderValue::from_str(location)
        .map_err(|_| GateError::InvalidRedirect(location.to_string()))?;

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
    response.headers_mut().insert(header::LOCATION, value);
    Ok(response)
}
