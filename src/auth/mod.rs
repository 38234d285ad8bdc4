//! Authentication module.
//!
//! Two layers: a pre-shared key guarding the whole API (compared in constant
//! time), and the identity headers forwarded by the identity provider that
//! name the user a request acts for.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, AppError, AppErrorWithRevision, ErrorDetails, ErrorResponse};
use crate::models::CurrentUser;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Identity headers set by the identity provider.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_PHOTO_HEADER: &str = "x-user-photo";

/// Reject requests whose API key does not match `expected_psk`.
///
/// The key may arrive in `x-api-key` or as a bearer token. Without a
/// configured key every request passes (dev mode).
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    let matches =
        provided_key(request.headers()).map(|key| constant_time_compare(key, &expected));

    match matches {
        Some(true) => next.run(request).await,
        Some(false) => unauthorized_response("Invalid API key"),
        None => unauthorized_response("Missing API key"),
    }
}

fn provided_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .or_else(|| headers.get(header::AUTHORIZATION))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_headers(&parts.headers).ok_or_else(|| AppErrorWithRevision {
            error: AppError::Unauthorized("Sign in required".to_string()),
            revision_id: 0,
        })
    }
}

/// Build the current user from identity headers. `None` without a user id.
fn user_from_headers(headers: &HeaderMap) -> Option<CurrentUser> {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some(CurrentUser {
        id: value(USER_ID_HEADER)?,
        display_name: value(USER_NAME_HEADER),
        email: value(USER_EMAIL_HEADER),
        photo_url: value(USER_PHOTO_HEADER),
    })
}
