//! HTTP client for the storefront admin REST API.
//!
//! Wraps `reqwest` with envelope decoding, bearer-token injection and retry of
//! idempotent reads. Every endpoint answers with `{success, data?, message?}`;
//! the body is checked once here and handed back as an [`Envelope`].

use std::time::Duration;

use kaushalya_core::AppConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::session::Session;

/// Characters escaped when an id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const DEFAULT_USER_AGENT: &str = "kaushalya-admin/0.1";

/// Client for the storefront backend.
///
/// Use [`ApiClient::from_config`] in the CLI or [`ApiClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl ApiClient {
    /// Builds a client from application config, attaching the session token
    /// to every request when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the configured base URL does
    /// not parse, or [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// built.
    pub fn from_config(config: &AppConfig, session: Option<&Session>) -> Result<Self, ClientError> {
        let client = Self::build(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            session,
        )?;
        Ok(client.with_retries(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Creates an anonymous client with a custom base URL and no retries.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::from_config`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, DEFAULT_USER_AGENT, None)
    }

    /// Creates a client that sends `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::from_config`].
    pub fn with_session(
        base_url: &str,
        timeout_secs: u64,
        session: &Session,
    ) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, DEFAULT_USER_AGENT, Some(session))
    }

    /// Overrides the retry policy for GET requests.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_base_ms = backoff_base_ms;
        self
    }

    fn build(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        session: Option<&Session>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(session) = session {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", session.token()))
                .map_err(|e| ClientError::InvalidBaseUrl {
                    url: base_url.to_owned(),
                    reason: format!("session token is not a valid header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // A trailing slash makes `Url::join` append to the path instead of
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: 0,
            retry_backoff_base_ms: 0,
        })
    }

    /// `GET {path}`, retried on transient failures.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Api`] if the backend reports `success: false`.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status without an envelope.
    pub async fn get(&self, path: &str) -> Result<Envelope, ClientError> {
        let url = self.endpoint(path)?;
        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            Self::send(self.client.request(Method::GET, url.clone()), &url)
        })
        .await
    }

    /// `POST {path}` with a JSON body. Sent exactly once.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Envelope, ClientError> {
        let url = self.endpoint(path)?;
        Self::send(self.client.post(url.clone()).json(body), &url).await
    }

    /// `POST {path}` with a multipart form. Sent exactly once.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Envelope, ClientError> {
        let url = self.endpoint(path)?;
        Self::send(self.client.post(url.clone()).multipart(form), &url).await
    }

    /// `DELETE {path}/{id}` with `id` escaped as one path segment.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn delete(&self, path: &str, id: &str) -> Result<Envelope, ClientError> {
        let item = format!(
            "{}/{}",
            path.trim_end_matches('/'),
            utf8_percent_encode(id, PATH_SEGMENT)
        );
        let url = self.endpoint(&item)?;
        Self::send(self.client.delete(url.clone()), &url).await
    }

    /// Resolves `path` (with or without a leading slash) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn send(request: RequestBuilder, url: &Url) -> Result<Envelope, ClientError> {
        tracing::debug!(%url, "sending backend request");
        let response = request.send().await?;
        Self::read_envelope(response, url).await
    }

    /// Reads the body once. Error statuses surface the envelope `message`
    /// when the body has one, otherwise the bare status.
    async fn read_envelope(response: Response, url: &Url) -> Result<Envelope, ClientError> {
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text);

        if !status.is_success() {
            if let Some(message) = body.as_ref().ok().and_then(Envelope::error_message) {
                return Err(ClientError::Api(message));
            }
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = body.map_err(|source| ClientError::Deserialize {
            context: url.to_string(),
            source,
        })?;
        Envelope::from_body(body)
    }
}
