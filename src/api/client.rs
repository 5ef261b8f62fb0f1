//! HTTP client core shared by every endpoint group.
//!
//! # Responsibilities
//! - Build endpoint URLs under the configured base URL
//! - Attach request ID and bearer token headers
//! - Enforce the request deadline and honour cancellation
//! - Retry idempotent GETs with backoff
//! - Decode bodies into JSON or a typed [`ApiError`]

use arc_swap::ArcSwapOption;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::api::error::{decode_body, ApiError, ApiResult};
use crate::config::{ApiConfig, ClientConfig, RetryConfig};
use crate::lifecycle::Shutdown;
use crate::resilience::timeouts::with_timeout;
use crate::resilience::RetryPolicy;

/// Whether a request carries the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Anonymous,
    Bearer,
}

/// A request ready to go out, plus what we log about it.
struct Prepared {
    builder: RequestBuilder,
    request_id: Uuid,
    method: Method,
    path: String,
}

/// Typed client for the registry backend.
///
/// Cheap to clone; clones share the connection pool and the token.
#[derive(Clone)]
pub struct RegistryClient {
    http: Client,
    base_url: Url,
    timeout_secs: u64,
    retry: RetryPolicy,
    token: Arc<ArcSwapOption<String>>,
    shutdown: Option<Shutdown>,
}

impl RegistryClient {
    /// Create a client for `api.base_url`.
    pub fn new(api: &ApiConfig, retries: &RetryConfig) -> ApiResult<Self> {
        let mut base_url = Url::parse(api.base_url.trim()).map_err(|e| {
            ApiError::InvalidRequest(format!("Invalid base URL '{}': {}", api.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "Base URL '{}' cannot take a path",
                api.base_url
            )));
        }
        let trimmed = base_url.path().trim_end_matches('/').to_string();
        base_url.set_path(&trimmed);

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .user_agent(api.user_agent.clone())
            .build()?;

        tracing::debug!(base_url = %base_url, timeout_secs = api.timeout_secs, "Registry client created");

        Ok(Self {
            http,
            base_url,
            timeout_secs: api.timeout_secs,
            retry: RetryPolicy::from_config(retries),
            token: Arc::new(ArcSwapOption::empty()),
            shutdown: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::new(&config.api, &config.retries)
    }

    /// Start with `token` already set.
    pub fn with_token(self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Cancel in-flight requests when `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Replace the bearer token. Empty strings clear it.
    pub fn set_token(&self, token: Option<String>) {
        self.token
            .store(token.filter(|t| !t.trim().is_empty()).map(Arc::new));
    }

    pub fn token(&self) -> Option<String> {
        self.token.load_full().map(|t| t.as_ref().clone())
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint URL for `segments` under the base URL. Segments are percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidRequest(format!("Base URL '{}' cannot take a path", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn prepare(&self, method: Method, url: Url, auth: Auth) -> ApiResult<Prepared> {
        let request_id = Uuid::new_v4();
        let path = url.path().to_string();
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header("x-request-id", request_id.to_string())
            .header(ACCEPT, "application/json");

        if auth == Auth::Bearer {
            let token = self.token.load_full().ok_or_else(|| {
                tracing::warn!(%method, %path, "Refusing authenticated request without a token");
                ApiError::MissingToken
            })?;
            builder = builder.bearer_auth(token.as_str());
        }

        Ok(Prepared {
            builder,
            request_id,
            method,
            path,
        })
    }

    /// Send one attempt and decode the body.
    async fn dispatch(&self, prepared: Prepared) -> ApiResult<Value> {
        let Prepared {
            builder,
            request_id,
            method,
            path,
        } = prepared;

        tracing::debug!(request_id = %request_id, method = %method, path = %path, "Sending request");

        let exchange = with_timeout(self.timeout_secs, async {
            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, ApiError>((status, text))
        });

        let (status, text) = match &self.shutdown {
            Some(shutdown) => tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::warn!(request_id = %request_id, path = %path, "Request cancelled");
                    return Err(ApiError::Cancelled);
                }
                result = exchange => result?,
            },
            None => exchange.await?,
        };

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            "Response received"
        );

        decode_body(status, &text)
    }

    /// Sleep between attempts, waking early on cancellation.
    async fn pause(&self, delay: Duration) -> ApiResult<()> {
        match &self.shutdown {
            Some(shutdown) => tokio::select! {
                biased;
                _ = shutdown.cancelled() => Err(ApiError::Cancelled),
                _ = tokio::time::sleep(delay) => Ok(()),
            },
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    /// GET with bounded retries.
    pub(crate) async fn get_json(&self, url: Url, auth: Auth) -> ApiResult<Value> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let prepared = self.prepare(Method::GET, url.clone(), auth)?;
            let request_id = prepared.request_id;

            match self.dispatch(prepared).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() => match self.retry.next_delay(&Method::GET, attempt) {
                    Some(delay) => {
                        tracing::info!(
                            request_id = %request_id,
                            path = %url.path(),
                            attempt,
                            delay = ?delay,
                            error = %e,
                            "Retrying request"
                        );
                        self.pause(delay).await?;
                    }
                    None => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
    }

    /// Single-attempt request with an optional JSON body.
    pub(crate) async fn send_json<B>(
        &self,
        method: Method,
        url: Url,
        auth: Auth,
        body: Option<&B>,
    ) -> ApiResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let mut prepared = self.prepare(method, url, auth)?;
        if let Some(body) = body {
            prepared.builder = prepared.builder.json(body);
        }
        self.dispatch(prepared).await
    }

    /// Single-attempt multipart POST.
    pub(crate) async fn send_multipart(&self, url: Url, auth: Auth, form: Form) -> ApiResult<Value> {
        let mut prepared = self.prepare(Method::POST, url, auth)?;
        prepared.builder = prepared.builder.multipart(form);
        self.dispatch(prepared).await
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .field("has_token", &self.has_token())
            .finish()
    }
}
