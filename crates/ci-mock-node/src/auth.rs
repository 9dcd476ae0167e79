//! Token check for endpoints that require a signed-in user.
//!
//! The header must read exactly `token <value>`; no trimming or alternate
//! schemes.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::api::ApiError;

/// Require `Authorization: token <expected>` on the request.
pub fn require_token(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let presented = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Forbidden("missing authorization header".into()))?;

    if presented.as_bytes() == format!("token {}", expected).as_bytes() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("token mismatch".into()))
    }
}
