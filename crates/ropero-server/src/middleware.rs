use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use ropero_core::UserProfile;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{AuthState, AUTH_COOKIE};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The signed-in user, inserted by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for MiddlewareErrorBody {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware requiring a valid `auth-token` session cookie.
pub async fn require_session(
    State(auth): State<AuthState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(AUTH_COOKIE) else {
        return unauthorized("missing session cookie");
    };

    match auth.verify_token(cookie.value()) {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %req.uri().path(), "rejected session token");
            unauthorized("invalid or expired session")
        }
    }
}

fn unauthorized(message: &'static str) -> Response {
    MiddlewareErrorBody {
        error: MiddlewareError {
            code: "unauthorized",
            message,
        },
    }
    .into_response()
}
