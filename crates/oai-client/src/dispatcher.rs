//! HTTP request dispatch.
//!
//! Every endpoint of the client goes through one of four operations
//! ([`Dispatcher::get`], [`Dispatcher::post`], [`Dispatcher::multipart_post`],
//! [`Dispatcher::delete`]). Each builds `uri_base + api_version + path`,
//! attaches the auth headers, and decodes the body. Status codes are not
//! interpreted: an error payload from the API comes back as a value.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use oai_core::{defaults, logging, ClientConfig, Error, Result};

use crate::decode::decode_body;
use crate::multipart::MultipartParams;
use crate::params::{Parameters, PostParams};
use crate::streaming::{deliver, fragment_stream, FragmentStream};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Issues HTTP calls against the configured API and normalizes bodies.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    config: Arc<ClientConfig>,
}

impl Dispatcher {
    /// Create a dispatcher with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        if config.access_token.is_empty() {
            warn!("No access token configured; requests will be sent without credentials");
        }

        info!(
            uri_base = %config.uri_base,
            api_version = %config.api_version,
            timeout_secs = config.request_timeout.as_secs(),
            organization = config.organization_id.is_some(),
            "Initializing API dispatcher"
        );

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request with authentication and organization headers.
    fn build_request(&self, method: Method, path: &str, json: bool) -> RequestBuilder {
        let uri = self.config.uri(path);
        debug!(
            { logging::METHOD } = %method,
            { logging::PATH } = path,
            { logging::URI } = %uri,
            "Dispatching request"
        );

        let mut req = self
            .client
            .request(method, &uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.access_token));

        if let Some(ref organization) = self.config.organization_id {
            req = req.header(defaults::ORGANIZATION_HEADER, organization);
        }

        // Multipart bodies set their own boundary content type.
        if json {
            req = req.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        }

        req
    }

    /// HTTP GET. Never sends a body.
    pub async fn get(&self, path: &str) -> Result<Option<Value>> {
        let started = Instant::now();
        let response = self.build_request(Method::GET, path, true).send().await?;
        read_body(response, path, started).await
    }

    /// HTTP POST with a JSON body.
    ///
    /// With [`PostParams::Streaming`], the body goes out with
    /// `"stream": true`, each decoded chunk is handed to the handler as it
    /// arrives, and the call resolves to `Ok(None)` when the stream ends.
    pub async fn post<'a>(
        &self,
        path: &str,
        parameters: impl Into<PostParams<'a>>,
    ) -> Result<Option<Value>> {
        let (body, handler) = parameters.into().into_parts();
        debug!(
            { logging::PATH } = path,
            { logging::STREAMING } = handler.is_some(),
            "Posting JSON body"
        );
        let started = Instant::now();

        let response = self
            .build_request(Method::POST, path, true)
            .json(&body)
            .send()
            .await?;

        match handler {
            None => read_body(response, path, started).await,
            Some(mut handler) => {
                log_status(&response, path, started);
                deliver(fragment_stream(response.bytes_stream()), &mut handler).await?;
                debug!(
                    { logging::PATH } = path,
                    { logging::DURATION_MS } = started.elapsed().as_millis() as u64,
                    "Stream complete"
                );
                Ok(None)
            }
        }
    }

    /// HTTP POST with `"stream": true`, returning the decoded fragments as a
    /// pull-based stream instead of pushing them to a handler.
    pub async fn post_stream(&self, path: &str, parameters: Parameters) -> Result<FragmentStream> {
        debug!({ logging::PATH } = path, { logging::STREAMING } = true, "Posting JSON body");
        let started = Instant::now();
        let response = self
            .build_request(Method::POST, path, true)
            .json(&parameters.with_stream_flag())
            .send()
            .await?;

        log_status(&response, path, started);
        Ok(fragment_stream(response.bytes_stream()))
    }

    /// HTTP POST with a `multipart/form-data` body.
    ///
    /// File values are streamed from disk as parts named after their path,
    /// with no declared content type.
    pub async fn multipart_post(
        &self,
        path: &str,
        parameters: MultipartParams,
    ) -> Result<Option<Value>> {
        let field_count = parameters.len();
        let form = parameters.into_form().await?;
        debug!(
            { logging::PATH } = path,
            { logging::FIELD_COUNT } = field_count,
            "Built multipart form"
        );

        let started = Instant::now();
        let response = self
            .build_request(Method::POST, path, false)
            .multipart(form)
            .send()
            .await?;
        read_body(response, path, started).await
    }

    /// HTTP DELETE. Never sends a body.
    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        let started = Instant::now();
        let response = self.build_request(Method::DELETE, path, true).send().await?;
        read_body(response, path, started).await
    }
}

fn log_status(response: &Response, path: &str, started: Instant) {
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_success() {
        debug!(
            { logging::PATH } = path,
            { logging::STATUS } = status.as_u16(),
            { logging::DURATION_MS } = elapsed_ms,
            "Response received"
        );
    } else {
        warn!(
            { logging::PATH } = path,
            { logging::STATUS } = status.as_u16(),
            { logging::DURATION_MS } = elapsed_ms,
            "API returned non-success status"
        );
    }
}

/// Read the whole body and decode it. A zero-length body is "no result".
async fn read_body(response: Response, path: &str, started: Instant) -> Result<Option<Value>> {
    log_status(&response, path, started);

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        debug!({ logging::PATH } = path, "Empty response body");
        return Ok(None);
    }

    let text = String::from_utf8_lossy(&bytes);
    let value = decode_body(Some(&text)).inspect_err(|e: &Error| {
        warn!({ logging::PATH } = path, { logging::ERROR_MSG } = %e, "Failed to decode body");
    })?;

    debug!(
        { logging::PATH } = path,
        { logging::BYTES } = bytes.len(),
        "Decoded response body"
    );
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_dispatcher_creation() {
        let dispatcher = Dispatcher::new(ClientConfig::new("sk-test")).unwrap();
        assert_eq!(dispatcher.config().access_token, "sk-test");
        assert_eq!(dispatcher.config().uri_base, defaults::URI_BASE);
    }

    #[test]
    fn test_dispatcher_rejects_invalid_config() {
        let config = ClientConfig::new("sk").with_uri_base("ftp://example.com/");
        assert!(matches!(Dispatcher::new(config), Err(Error::Config(_))));

        let config = ClientConfig::new("sk").with_request_timeout(Duration::ZERO);
        assert!(Dispatcher::new(config).is_err());
    }

    #[test]
    fn test_build_request_headers() {
        let dispatcher =
            Dispatcher::new(ClientConfig::new("sk-test").with_organization_id("org-9")).unwrap();
        let request = dispatcher
            .build_request(Method::GET, "/models", true)
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "https://api.openai.com/v1/models");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(request.headers()["OpenAI-Organization"], "org-9");
        assert_eq!(request.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_build_request_without_organization() {
        let dispatcher = Dispatcher::new(ClientConfig::new("sk-test")).unwrap();
        let request = dispatcher
            .build_request(Method::DELETE, "/files/file-1", true)
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::DELETE);
        assert!(request.headers().get("OpenAI-Organization").is_none());
    }

    #[test]
    fn test_build_request_multipart_leaves_content_type_unset() {
        let dispatcher = Dispatcher::new(ClientConfig::new("sk-test")).unwrap();
        let request = dispatcher
            .build_request(Method::POST, "/files", false)
            .build()
            .unwrap();
        assert!(request.headers().get(CONTENT_TYPE).is_none());
    }
}
