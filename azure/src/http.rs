//! HTTP client implementation for the Azure speech API.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT},
    Client as ReqwestClient, Response,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    error::{Error, Result},
    types::OutputFormat,
};

const SUBSCRIPTION_KEY: HeaderName = HeaderName::from_static("ocp-apim-subscription-key");
const OUTPUT_FORMAT: HeaderName = HeaderName::from_static("x-microsoft-outputformat");
const SSML_CONTENT_TYPE: &str = "application/ssml+xml";
const AGENT: &str = "narrasync-azure-rust/1.0";

/// HTTP client for the Azure speech API.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    subscription_key: HeaderValue,
    max_retries: u32,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(base_url: String, subscription_key: &str, max_retries: u32, timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        let mut subscription_key = HeaderValue::from_str(subscription_key)
            .map_err(|e| Error::Config(format!("invalid subscription key: {}", e)))?;
        subscription_key.set_sensitive(true);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            subscription_key,
            max_retries,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends SSML and returns the synthesized audio.
    pub async fn post_ssml(&self, path: &str, ssml: &str, format: OutputFormat) -> Result<Bytes> {
        self.with_retry(move || async move {
            let mut headers = self.default_headers();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(SSML_CONTENT_TYPE));
            headers.insert(OUTPUT_FORMAT, HeaderValue::from_static(format.as_str()));

            let response = self
                .client
                .post(self.url(path))
                .headers(headers)
                .body(ssml.to_string())
                .send()
                .await?;

            let response = check_status(response).await?;
            Ok::<_, Error>(response.bytes().await?)
        })
        .await
    }

    /// Performs a GET request and decodes the JSON body.
    pub async fn get_json<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.with_retry(move || async move {
            let response = self
                .client
                .get(self.url(path))
                .headers(self.default_headers())
                .send()
                .await?;

            let body = check_status(response).await?.bytes().await?;
            serde_json::from_slice(&body).map_err(Error::from)
        })
        .await
    }

    /// Runs `op`, retrying transient errors with exponential backoff.
    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let backoff = Duration::from_secs(1 << (attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            match op().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() => {
                    debug!(attempt, error = %e, "azure: retrying");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Other("max retries exceeded".to_string())))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SUBSCRIPTION_KEY, self.subscription_key.clone());
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));
        headers
    }
}

/// Converts a non-success response into an API error.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = String::from_utf8_lossy(&body).trim().to_string();
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        message
    };

    Err(Error::api(status.as_u16(), message))
}
