//! Session auth against the static allow-list: HS256 tokens carried in the
//! `auth-token` cookie.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ropero_core::{AllowedUser, AppConfig, Role, UserProfile};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::api::ApiError;
use crate::middleware::RequestId;

pub const AUTH_COOKIE: &str = "auth-token";

const TOKEN_TTL_SECS: i64 = 31 * 24 * 60 * 60;
const COOKIE_MAX_AGE_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionClaims {
    username: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar_filename: Option<String>,
    iat: i64,
    exp: i64,
}

struct AuthInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    users: Vec<AllowedUser>,
    secure_cookie: bool,
}

/// Signing keys and the allow-list, shared by the auth handlers and the
/// session middleware.
#[derive(Clone)]
pub struct AuthState {
    inner: Arc<AuthInner>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("users", &self.inner.users.len())
            .field("secure_cookie", &self.inner.secure_cookie)
            .finish_non_exhaustive()
    }
}

impl AuthState {
    #[must_use]
    pub fn new(jwt_secret: &str, users: Vec<AllowedUser>, secure_cookie: bool) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
                decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
                users,
                secure_cookie,
            }),
        }
    }

    /// Cookies are marked `Secure` only in production.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.allowed_users.clone(),
            config.is_production(),
        )
    }

    /// Checks a username/password pair against the allow-list.
    ///
    /// Every entry is compared so the time taken does not depend on which
    /// entry matched.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when no entry matches.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        let mut found = None;
        for user in &self.inner.users {
            let matches = user.username.as_bytes().ct_eq(username.as_bytes())
                & user.password.as_bytes().ct_eq(password.as_bytes());
            if bool::from(matches) && found.is_none() {
                found = Some(user);
            }
        }
        found
            .map(AllowedUser::profile)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Token`] if encoding fails.
    pub fn issue_token(&self, user: &UserProfile) -> Result<String, AuthError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            username: user.username.clone(),
            role: user.role,
            avatar_filename: user.avatar_filename.clone(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.inner.encoding,
        )?)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Token`] for a bad signature, an expired token or
    /// malformed claims.
    pub fn verify_token(&self, token: &str) -> Result<UserProfile, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.inner.decoding, &validation)?;
        Ok(UserProfile {
            username: data.claims.username,
            role: data.claims.role,
            avatar_filename: data.claims.avatar_filename,
        })
    }

    fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((AUTH_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
            .secure(self.inner.secure_cookie)
            .build()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    success: bool,
    user: UserProfile,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct MeResponse {
    user: UserProfile,
}

pub(crate) async fn login(
    State(auth): State<AuthState>,
    Extension(req_id): Extension<RequestId>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let (Some(username), Some(password)) = (
        body.username.filter(|u| !u.is_empty()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "username and password are required",
        ));
    };

    let user = auth.authenticate(&username, &password).map_err(|e| {
        tracing::warn!(username = %username, "login rejected");
        ApiError::new(req_id.0.clone(), "unauthorized", e.to_string())
    })?;

    let token = auth.issue_token(&user).map_err(|e| {
        tracing::error!(error = %e, "failed to sign session token");
        ApiError::new(req_id.0.clone(), "internal_error", "failed to create session")
    })?;

    tracing::info!(username = %user.username, role = %user.role, "user logged in");
    Ok((
        jar.add(auth.session_cookie(token)),
        Json(LoginResponse {
            success: true,
            user,
        }),
    ))
}

/// Always emits a removal cookie, whether or not the request carried one.
pub(crate) async fn logout(jar: CookieJar) -> impl IntoResponse {
    let mut removal = Cookie::build((AUTH_COOKIE, "")).path("/").build();
    removal.make_removal();
    (
        StatusCode::OK,
        jar.add(removal),
        [(header::LOCATION, "/login")],
        Json(LogoutResponse { success: true }),
    )
}

pub(crate) async fn me(
    State(auth): State<AuthState>,
    Extension(req_id): Extension<RequestId>,
    jar: CookieJar,
) -> Result<Json<MeResponse>, ApiError> {
    let unauthorized = || ApiError::new(req_id.0.clone(), "unauthorized", "not authenticated");
    let cookie = jar.get(AUTH_COOKIE).ok_or_else(unauthorized)?;
    let user = auth.verify_token(cookie.value()).map_err(|e| {
        tracing::warn!(error = %e, "rejected session token");
        unauthorized()
    })?;
    Ok(Json(MeResponse { user }))
}
