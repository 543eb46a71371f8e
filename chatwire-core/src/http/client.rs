//! HTTP transport implementation using reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;

use super::error::map_http_error;
use super::sse::SseCompletionStream;
use super::{ChatTransport, CompletionStream};
use crate::config::{redact_by_field_name, BackendOptions, ConfigError, SecretString};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::openai::types::{OpenAIRequest, OpenAIResponse};

/// Default user agent
const USER_AGENT: &str = concat!("chatwire/", env!("CARGO_PKG_VERSION"));

/// Transport for OpenAI-compatible HTTP backends
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    completions_url: String,
    api_key: SecretString,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Build a transport from backend options, falling back to `default_base_url`
    pub fn from_options(
        default_base_url: &str,
        api_key: SecretString,
        options: &BackendOptions,
    ) -> Result<Self, ConfigError> {
        let base_url = options.base_url.as_deref().unwrap_or(default_base_url);
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in &options.extra_headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            debug!(header = %name, value = %redact_by_field_name(name, value), "Adding extra header");
            headers.insert(header_name, header_value);
        }
        if options.disable_cache {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }

        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        debug!(base_url = %parsed, api_key = %api_key.partial_redact(), "Built HTTP transport");
        Ok(Self {
            client,
            completions_url: format!("{}/chat/completions", parsed.as_str().trim_end_matches('/')),
            api_key,
            headers,
        })
    }

    /// Endpoint requests are posted to
    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    fn build_request(&self, request: &OpenAIRequest, request_id: Uuid) -> RequestBuilder {
        let mut builder = self
            .client
            .post(&self.completions_url)
            .headers(self.headers.clone())
            .header("X-Request-ID", request_id.to_string())
            .json(request);

        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(self.api_key.expose_secret());
        }
        builder
    }

    /// Send and turn non-success statuses into API errors
    async fn dispatch(&self, request: &OpenAIRequest, request_id: Uuid) -> ProviderResult<Response> {
        info!(
            url = %self.completions_url,
            model = %request.model,
            stream = request.stream.unwrap_or(false),
            request_id = %request_id,
            "Executing chat completion request"
        );

        let response = self
            .build_request(request, request_id)
            .send()
            .await
            .map_err(|e| {
                error!(request_id = %request_id, error = %e, "Request failed");
                ProviderError::from(e)
            })?;

        let status = response.status();
        debug!(status = %status, request_id = %request_id, "Response status");

        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.ok();
            warn!(status = %status, request_id = %request_id, "Request failed with non-success status");
            return Err(map_http_error(status, &headers, body, request_id));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn create_completion(&self, request: &OpenAIRequest) -> ProviderResult<OpenAIResponse> {
        let request_id = Uuid::new_v4();
        let response = self.dispatch(request, request_id).await?;

        let text = response.text().await.map_err(|e| {
            ProviderError::Transport(format!(
                "Failed to read response body: {} [request_id: {}]",
                e, request_id
            ))
        })?;

        serde_json::from_str(&text).map_err(|e| {
            error!(request_id = %request_id, error = %e, "Failed to parse response");
            ProviderError::Serialization(format!(
                "Invalid response format: {} [request_id: {}]",
                e, request_id
            ))
        })
    }

    async fn create_completion_stream(
        &self,
        request: &OpenAIRequest,
    ) -> ProviderResult<Box<dyn CompletionStream>> {
        let request_id = Uuid::new_v4();
        let response = self.dispatch(request, request_id).await?;
        Ok(Box::new(SseCompletionStream::new(response, request_id)))
    }
}
