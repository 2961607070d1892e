//! Mailosaur async client implementation.

use crate::{Error, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Async client for the Mailosaur email and SMS testing service.
///
/// Use [`Client::new`] with an API key, [`Client::from_env`] to read the
/// `MAILOSAUR_*` environment variables, or [`Client::builder`] for custom
/// settings like the base URL, a proxy or request timeouts.
///
/// The client is cheap to clone and all operations take `&self`, so
/// independent searches may run concurrently.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    smtp_host: String,
    user_agent: String,
    proxy: Option<String>,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for the public Mailosaur API with the given key.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailosaur_client::Client;
    /// # fn main() -> Result<(), mailosaur_client::Error> {
    /// let client = Client::new("your-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Create a client configured from `MAILOSAUR_API_KEY`,
    /// `MAILOSAUR_BASE_URL` and `MAILOSAUR_SMTP_HOST`.
    ///
    /// Fails with [`Error::Configuration`] when no API key is set.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_env().build()
    }

    /// Return a client with the same settings authenticating with another key.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(missing_api_key());
        }

        Ok(Self {
            api_key,
            ..self.clone()
        })
    }

    /// Base URL every API path is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host used when generating email addresses.
    pub fn smtp_host(&self) -> &str {
        &self.smtp_host
    }

    /// Get the proxy URL if one was configured.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Start a request to an API path, with credentials and common headers set.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!(%method, %url, "mailosaur request");

        self.http
            .request(method, url)
            .headers(self.headers())
            .basic_auth(&self.api_key, None::<&str>)
    }

    /// Send a request and turn non-success statuses into errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        check_status(response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::PUT, path).json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Build headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers
    }
}

/// Validation failure reported by the API for a 400 response.
#[derive(Debug, Deserialize)]
struct ValidationErrors {
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize)]
struct FieldError {
    field: String,
    detail: Vec<FieldErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct FieldErrorDetail {
    description: String,
}

/// Map a response to an [`Error::Api`] unless its status is a success.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match status.as_u16() {
        400 => {
            let body = response.text().await.unwrap_or_default();
            invalid_parameters_message(&body)
        }
        401 => "Authentication failed, check your API key.".to_string(),
        403 => "Insufficient permission to perform that task.".to_string(),
        404 => "Not found, check input parameters.".to_string(),
        _ => "An API error occurred, see httpResponse for further information.".to_string(),
    };

    tracing::debug!(status = status.as_u16(), %message, "mailosaur request rejected");
    Err(Error::api(status.as_u16(), message))
}

/// Describe each invalid field as `(field) description` on its own line.
fn invalid_parameters_message(body: &str) -> String {
    let fallback = "Request had one or more invalid parameters.";
    let Ok(parsed) = serde_json::from_str::<ValidationErrors>(body) else {
        return fallback.to_string();
    };

    // An entry without a description makes the whole body unusable.
    let message: Option<String> = parsed
        .errors
        .iter()
        .map(|err| {
            err.detail
                .first()
                .map(|detail| format!("({}) {}\r\n", err.field, detail.description))
        })
        .collect();

    match message {
        Some(message) if !message.is_empty() => message,
        _ => fallback.to_string(),
    }
}

fn missing_api_key() -> Error {
    Error::Configuration(
        "You must set the MAILOSAUR_API_KEY environment variable to use the Mailosaur client."
            .to_string(),
    )
}

const BASE_URL: &str = "https://mailosaur.com/";
const SMTP_HOST: &str = "mailosaur.net";
const USER_AGENT_VALUE: &str = concat!("mailosaur-client/", env!("CARGO_PKG_VERSION"));

const API_KEY_VAR: &str = "MAILOSAUR_API_KEY";
const BASE_URL_VAR: &str = "MAILOSAUR_BASE_URL";
const SMTP_HOST_VAR: &str = "MAILOSAUR_SMTP_HOST";

/// Builder for configuring a Mailosaur client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    smtp_host: String,
    user_agent: String,
    proxy: Option<String>,
    request_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No API key (required before [`build`](Self::build))
    /// - Base URL `https://mailosaur.com/`
    /// - SMTP host `mailosaur.net`
    /// - No proxy and no client-wide request timeout
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: BASE_URL.to_string(),
            smtp_host: SMTP_HOST.to_string(),
            user_agent: USER_AGENT_VALUE.to_string(),
            proxy: None,
            request_timeout: None,
        }
    }

    /// Create a builder seeded from the `MAILOSAUR_*` environment variables.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let mut builder = Self::new();

        if let Some(api_key) = var(API_KEY_VAR) {
            builder = builder.api_key(api_key);
        }
        if let Some(base_url) = var(BASE_URL_VAR) {
            builder = builder.base_url(base_url);
        }
        if let Some(smtp_host) = var(SMTP_HOST_VAR) {
            builder = builder.smtp_host(smtp_host);
        }

        builder
    }

    /// Set the API key used for every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the host used by [`Client::generate_email_address`].
    pub fn smtp_host(mut self, smtp_host: impl Into<String>) -> Self {
        self.smtp_host = smtp_host.into();
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set an HTTP(S) proxy URL (e.g., "http://127.0.0.1:8080").
    ///
    /// Every request goes through it. SOCKS proxies are not supported and
    /// make [`build`](Self::build) fail.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Apply a timeout to every request made by the client.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// Fails with [`Error::Configuration`] when no API key was provided; no
    /// request is made.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailosaur_client::Client;
    /// # fn main() -> Result<(), mailosaur_client::Error> {
    /// let client = Client::builder()
    ///     .api_key("your-api-key")
    ///     .user_agent("my-tests/1.0")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(missing_api_key)?;

        let mut builder = reqwest::Client::builder();

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build()?;

        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Client {
            http,
            api_key,
            base_url,
            smtp_host: self.smtp_host,
            user_agent: self.user_agent,
            proxy: self.proxy,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
