//! Azure speech API client.

use std::sync::Arc;
use std::time::Duration;

use super::{
    error::{Error, Result},
    http::HttpClient,
    speech::SpeechService,
    types::OutputFormat,
    voice::VoiceService,
};

/// Default Azure region.
pub const DEFAULT_REGION: &str = "eastus";

/// Default maximum number of retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Returns the text-to-speech endpoint for a region.
pub fn endpoint_for_region(region: &str) -> String {
    format!("https://{}.tts.speech.microsoft.com", region.trim())
}

/// Azure speech API client.
///
/// # Example
///
/// ```rust,no_run
/// use narrasync_azure::{Client, SpeechRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::builder("your-subscription-key")
///     .region("koreacentral")
///     .build()?;
///
/// let request = SpeechRequest::new("안녕하세요", "ko-KR-SunHiNeural");
/// let response = client.speech().synthesize(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone)]
struct ClientConfig {
    region: String,
    output_format: OutputFormat,
}

impl Client {
    /// Creates a client for the default region.
    pub fn new(subscription_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(subscription_key).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(subscription_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(subscription_key)
    }

    /// Returns the configured region.
    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Returns the audio format requested from the service.
    pub fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    /// Returns the speech synthesis service.
    pub fn speech(&self) -> SpeechService {
        SpeechService::new(self.http.clone(), self.config.output_format)
    }

    /// Returns the voice list service.
    pub fn voice(&self) -> VoiceService {
        VoiceService::new(self.http.clone())
    }
}

/// Builder for creating an Azure speech client.
pub struct ClientBuilder {
    subscription_key: String,
    region: String,
    endpoint: Option<String>,
    max_retries: u32,
    timeout: Duration,
    output_format: OutputFormat,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            output_format: OutputFormat::default(),
        }
    }

    /// Sets the Azure region, e.g. `koreacentral`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Overrides the endpoint derived from the region.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the maximum number of retries for transient errors.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the audio format requested from the service.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.subscription_key.trim().is_empty() {
            return Err(Error::Config("subscription key must be non-empty".to_string()));
        }

        let base_url = match self.endpoint {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                if self.region.trim().is_empty() {
                    return Err(Error::Config("region must be non-empty".to_string()));
                }
                endpoint_for_region(&self.region)
            }
        };

        let http = HttpClient::new(base_url, &self.subscription_key, self.max_retries, self.timeout)?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                region: self.region,
                output_format: self.output_format,
            },
        })
    }
}
