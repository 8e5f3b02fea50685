//! Authenticated transport for the Trello REST API.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::Credentials,
    error::{Result, TrelloError},
};

/// Trello API base URL. Request paths carry the `/1` version prefix.
pub const TRELLO_API_BASE: &str = "https://api.trello.com";

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Num(i64),
}

impl QueryValue {
    fn render(&self) -> String {
        match self {
            QueryValue::Str(s) => s.clone(),
            QueryValue::Num(n) => n.to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Str(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Num(n)
    }
}

/// Builds a query parameter list from `key => value` pairs.
#[macro_export]
macro_rules! query {
    ($($key:expr => $value:expr),* $(,)?) => {
        vec![$(($key, $crate::client::QueryValue::from($value))),*]
    };
}

/// HTTP client bound to one Trello base URL.
///
/// A freshly built client holds no credentials and refuses every call with
/// [`TrelloError::NotInitialized`] until [`TrelloClient::authenticate`]
/// succeeds.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl TrelloClient {
    /// Creates an unauthenticated client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            credentials: None,
        })
    }

    /// Whether credentials have been validated.
    pub fn is_initialized(&self) -> bool {
        self.credentials.is_some()
    }

    /// Validates the pair with `GET /1/tokens/{token}` and keeps it on success.
    ///
    /// On failure the client stays uninitialized and the remote error is
    /// returned.
    pub async fn authenticate(&mut self, credentials: Credentials) -> Result<()> {
        let path = format!("/1/tokens/{}", credentials.token);
        self.request(&credentials, Method::GET, &path, &[]).await?;
        debug!("credentials validated");
        self.credentials = Some(credentials);
        Ok(())
    }

    /// Sends an authenticated request and returns the parsed JSON body.
    ///
    /// The key and token are merged into the query string. Any status other
    /// than 200 becomes [`TrelloError::Remote`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, QueryValue)],
    ) -> Result<Value> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(TrelloError::NotInitialized)?;
        self.request(credentials, method, path, params).await
    }

    /// [`send`](Self::send) followed by deserialization into `T`.
    pub async fn send_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, QueryValue)],
    ) -> Result<T> {
        let value = self.send(method, path, params).await?;
        serde_json::from_value(value).map_err(|e| TrelloError::InvalidResponse(e.to_string()))
    }

    async fn request(
        &self,
        credentials: &Credentials,
        method: Method,
        path: &str,
        params: &[(&str, QueryValue)],
    ) -> Result<Value> {
        let mut query: Vec<(&str, String)> = params.iter().map(|(k, v)| (*k, v.render())).collect();
        query.push(("key", credentials.key.clone()));
        query.push(("token", credentials.token.clone()));

        let url = format!("{}{path}", self.base_url);
        debug!(%method, path, "sending Trello request");

        let response = self
            .http
            .request(method, &url)
            .query(&query)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            debug!(status = status.as_u16(), path, "Trello request failed");
            return Err(remote_error(status, &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| TrelloError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

fn remote_error(status: StatusCode, body: &str) -> TrelloError {
    let body = body.trim();
    let body = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    };
    TrelloError::Remote {
        status: status.as_u16(),
        body,
    }
}

/// Trims whitespace and trailing slashes from a base URL.
fn normalize_base_url(endpoint: &str) -> Result<String> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(TrelloError::InvalidEntity(
            "base URL must not be empty".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
