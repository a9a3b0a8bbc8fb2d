//! SteamLite API client
//!
//! Every call goes through one pipeline: attach the stored bearer
//! credential, attach the anti-forgery token on state-mutating requests
//! (fetching one first when none is cached), send, and classify the
//! response. A rejected anti-forgery token is refreshed and the request
//! re-sent exactly once. A rejected bearer credential ends the session.

pub mod admin;
pub mod anti_forgery;
pub mod auth;
pub mod categories;
pub mod error;
pub mod games;
pub mod library;
pub mod pages;
pub mod request;
pub mod reviews;
pub mod session;
pub mod storage;
pub mod users;

use anti_forgery::{AntiForgeryPolicy, AntiForgeryTokenResponse};
use error::ApiError;
use request::ApiRequest;
use reqwest::{Client, ClientBuilder, Method, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use session::Session;
use std::sync::Arc;
use std::time::Duration;
use steamlite_core::{AntiForgeryConfig, ClientConfig};
use storage::CredentialStorage;
use tracing::{debug, warn};

/// Called after a 401 has cleared the session, e.g. to show a sign-in screen
pub type AuthExpiredHook = Arc<dyn Fn() + Send + Sync>;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// SteamLite API client
///
/// Cloning is cheap and clones share one [`Session`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    anti_forgery: Arc<AntiForgeryPolicy>,
    on_auth_expired: Option<AuthExpiredHook>,
}

/// Which send this is. The retry carries the token it was refreshed with.
#[derive(Debug)]
enum Attempt {
    Initial,
    Retry { token: String },
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Send `request` and decode the JSON response. An empty body decodes as
    /// `null` and a body that is not JSON decodes as a string.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let body = self.execute(&request).await?;
        decode(&body)
    }

    /// Untyped convenience form of [`request`](Self::request)
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.request(request).await
    }

    /// Fetch a new anti-forgery token and cache it.
    ///
    /// The token endpoint is called without credentials and its failures
    /// are reported as-is, never as an expired session.
    pub async fn fetch_anti_forgery_token(&self) -> Result<String, ApiError> {
        debug!(endpoint = self.anti_forgery.endpoint(), "fetching anti-forgery token");

        let response = self
            .client
            .get(self.url(self.anti_forgery.endpoint()))
            .send()
            .await
            .map_err(ApiError::Network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            let message = String::from_utf8_lossy(&body).trim().to_string();
            warn!(status = status.as_u16(), "anti-forgery token fetch failed");
            return Err(ApiError::UnknownServer {
                status: status.as_u16(),
                message,
            });
        }

        let payload: AntiForgeryTokenResponse = serde_json::from_slice(&body)?;
        self.session.set_anti_forgery_token(payload.csrf_token.clone());
        Ok(payload.csrf_token)
    }

    async fn execute(&self, request: &ApiRequest) -> Result<Vec<u8>, ApiError> {
        match self.dispatch(request, Attempt::Initial).await {
            Err(ApiError::AntiForgeryRejected { message }) if request.is_state_mutating() => {
                warn!(
                    method = %request.method(),
                    path = request.path(),
                    %message,
                    "anti-forgery token rejected, refreshing and retrying once"
                );
                let token = self.fetch_anti_forgery_token().await?;
                self.dispatch(request, Attempt::Retry { token }).await
            }
            outcome => outcome,
        }
    }

    async fn dispatch(&self, request: &ApiRequest, attempt: Attempt) -> Result<Vec<u8>, ApiError> {
        let mut builder = self
            .client
            .request(request.method().clone(), self.url(request.path()));

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }

        if let Some(token) = self.session.bearer_token().await? {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        if request.is_state_mutating() {
            let token = match attempt {
                Attempt::Retry { token } => token,
                Attempt::Initial => self.cached_or_fetched_token().await?,
            };
            builder = builder.header(self.anti_forgery.header().clone(), token);
        }

        let builder = request.apply_body(builder)?;

        debug!(method = %request.method(), path = request.path(), "sending request");
        let response = builder.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::Network)?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let error = ApiError::from_response(status, &body, &self.anti_forgery);
        debug!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            error = %error,
            "request failed"
        );

        if error.is_auth_expired() {
            self.expire_session().await;
        }

        Err(error)
    }

    async fn cached_or_fetched_token(&self) -> Result<String, ApiError> {
        match self.session.anti_forgery_token() {
            Some(token) => Ok(token),
            None => self.fetch_anti_forgery_token().await,
        }
    }

    async fn expire_session(&self) {
        if let Err(err) = self.session.terminate().await {
            warn!(error = %err, "failed to clear stored credentials");
        }
        warn!("bearer credential rejected, session cleared");

        if let Some(hook) = &self.on_auth_expired {
            hook();
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    match serde_json::from_slice(body) {
        Ok(value) => Ok(value),
        // Plain-text success bodies decode as a JSON string
        Err(err) => {
            let text = Value::String(String::from_utf8_lossy(body).into_owned());
            serde_json::from_value(text).map_err(|_| ApiError::Serialization(err))
        }
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    anti_forgery: Option<AntiForgeryConfig>,
    storage: Option<Arc<dyn CredentialStorage>>,
    session: Option<Arc<Session>>,
    on_auth_expired: Option<AuthExpiredHook>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn anti_forgery(mut self, config: AntiForgeryConfig) -> Self {
        self.anti_forgery = Some(config);
        self
    }

    /// Durable storage for a new session; ignored when [`session`](Self::session) is set
    pub fn storage(mut self, storage: Arc<dyn CredentialStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Share an existing session
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn on_auth_expired<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_auth_expired = Some(Arc::new(hook));
        self
    }

    /// Apply base URL, timeout, user agent and anti-forgery settings
    pub fn config(self, config: &ClientConfig) -> Self {
        self.base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .anti_forgery(config.anti_forgery.clone())
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Configuration("base_url is required".into()))?;

        let parsed = url::Url::parse(&base_url)
            .map_err(|err| ApiError::Configuration(format!("invalid base_url '{base_url}': {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Configuration(format!(
                "base_url must use http or https: {base_url}"
            )));
        }

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let anti_forgery = AntiForgeryPolicy::try_from(&self.anti_forgery.unwrap_or_default())?;

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .cookie_store(true);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| format!("steamlite-client/{}", env!("CARGO_PKG_VERSION"))),
        );

        let client = client_builder
            .build()
            .map_err(|err| ApiError::Configuration(format!("failed to build HTTP client: {err}")))?;

        let session = self.session.unwrap_or_else(|| {
            Arc::new(
                self.storage
                    .map_or_else(Session::in_memory, Session::new),
            )
        });

        Ok(ApiClient {
            client,
            base_url,
            session,
            anti_forgery: Arc::new(anti_forgery),
            on_auth_expired: self.on_auth_expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_body_as_null() {
        decode::<()>(b"").unwrap();
        let value: Value = decode(b"  \n").unwrap();
        assert_eq!(value, Value::Null);
        let missing: Option<u32> = decode(b"").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_decode_plain_text_as_string() {
        let value: Value = decode(b"Category deleted").unwrap();
        assert_eq!(value, Value::String("Category deleted".to_string()));
        let text: String = decode(b"ok").unwrap();
        assert_eq!(text, "ok");
        decode::<serde::de::IgnoredAny>(b"Game deleted").unwrap();
    }

    #[test]
    fn test_decode_reports_bad_json() {
        let result: Result<Vec<u32>, _> = decode(b"{not json");
        assert!(matches!(result, Err(ApiError::Serialization(_))));
    }
}
