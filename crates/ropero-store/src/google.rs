//! [`SheetStore`] over the Google Sheets v4 `values` REST API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, StatusCode};
use ropero_core::SheetsConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::sheet::{Rows, SheetStore};

const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for a service account assertion (Google's maximum).
const ASSERTION_TTL_SECS: i64 = 3600;

/// Cached tokens are refreshed this long before they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Characters left unescaped in a range path segment.
const RANGE_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// How requests are authorized.
#[derive(Clone)]
pub enum Credentials {
    /// Signs an RS256 assertion and exchanges it at `token_url`.
    ServiceAccount {
        client_email: String,
        private_key: String,
        token_url: String,
    },
    /// A pre-issued bearer token, used as-is.
    StaticToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ServiceAccount {
                client_email,
                token_url,
                ..
            } => f
                .debug_struct("ServiceAccount")
                .field("client_email", client_email)
                .field("private_key", &"[redacted]")
                .field("token_url", token_url)
                .finish(),
            Credentials::StaticToken(_) => f.write_str("StaticToken([redacted])"),
        }
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct ValuesBody<'a> {
    values: &'a Rows,
}

/// Client for one spreadsheet.
///
/// Build it once per process and share it; the access token is cached inside.
/// Non-2xx responses surface as typed errors and nothing is retried.
pub struct GoogleSheetsClient {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    credentials: Credentials,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl GoogleSheetsClient {
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_base: &str,
        spreadsheet_id: &str,
        credentials: Credentials,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("ropero/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Builds a service-account client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &SheetsConfig) -> Result<Self, StoreError> {
        Self::new(
            &config.api_base,
            &config.spreadsheet_id,
            Credentials::ServiceAccount {
                client_email: config.client_email.clone(),
                private_key: config.private_key.clone(),
                token_url: config.token_url.clone(),
            },
            config.request_timeout_secs,
        )
    }

    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}{suffix}` with the range
    /// percent-encoded as one path segment.
    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{base}/v4/spreadsheets/{id}/values/{range}{suffix}",
            base = self.api_base,
            id = utf8_percent_encode(&self.spreadsheet_id, RANGE_SEGMENT),
            range = utf8_percent_encode(range, RANGE_SEGMENT),
        )
    }

    async fn access_token(&self) -> Result<String, StoreError> {
        let (client_email, private_key, token_url) = match &self.credentials {
            Credentials::StaticToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount {
                client_email,
                private_key,
                token_url,
            } => (client_email, private_key, token_url),
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: token_url,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let key = EncodingKey::from_rsa_pem(private_key.as_bytes())?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?;

        tracing::debug!(token_url = %token_url, "exchanging service account assertion");
        let response = self
            .client
            .post(token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::TokenExchange {
                token_url: token_url.clone(),
                reason: format!("HTTP {}: {body}", status.as_u16()),
            });
        }
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
                context: format!("token response from {token_url}"),
                source: e,
            })?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// Sends an authorized request and maps non-2xx statuses to errors.
    /// Returns the response body.
    async fn send(&self, request: RequestBuilder, url: String) -> Result<String, StoreError> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { url });
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "sheets request failed");
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(true) => "TRUE".to_string(),
        serde_json::Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn get(&self, range: &str) -> Result<Rows, StoreError> {
        let url = self.values_url(range, "");
        let body = self.send(self.client.get(&url), url.clone()).await?;
        let parsed: ValueRange =
            serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
                context: format!("values of {range}"),
                source: e,
            })?;
        Ok(parsed
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        let url = self.values_url(range, ":append");
        let request = self
            .client
            .post(&url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValuesBody { values: &rows });
        self.send(request, url).await?;
        tracing::debug!(range, rows = rows.len(), "appended rows");
        Ok(())
    }

    async fn update(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        let url = self.values_url(range, "");
        let request = self
            .client
            .put(&url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValuesBody { values: &rows });
        self.send(request, url).await?;
        tracing::debug!(range, rows = rows.len(), "updated rows");
        Ok(())
    }

    async fn clear(&self, range: &str) -> Result<(), StoreError> {
        let url = self.values_url(range, ":clear");
        let request = self.client.post(&url).json(&serde_json::json!({}));
        self.send(request, url).await?;
        tracing::debug!(range, "cleared range");
        Ok(())
    }
}
