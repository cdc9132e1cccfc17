//! Voice list service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{error::Result, http::HttpClient};

const VOICES_PATH: &str = "/cognitiveservices/voices/list";

/// Voice list service.
pub struct VoiceService {
    http: Arc<HttpClient>,
}

impl VoiceService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the voices available in the client's region.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use narrasync_azure::Client;
    /// # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let voices = client.voice().list().await?;
    ///
    /// for voice in voices.iter().filter(|v| v.locale.starts_with("ko-")) {
    ///     println!("{}: {} ({})", voice.short_name, voice.local_name, voice.gender);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self) -> Result<Vec<VoiceInfo>> {
        self.http.get_json(VOICES_PATH).await
    }
}

/// Voice entry returned by the voice list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceInfo {
    /// Full service name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    /// Name in the voice's own language.
    #[serde(default)]
    pub local_name: String,

    /// Identifier used in SSML, e.g. `ko-KR-SunHiNeural`.
    #[serde(default)]
    pub short_name: String,

    #[serde(default)]
    pub gender: String,

    #[serde(default)]
    pub locale: String,

    #[serde(default)]
    pub locale_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_list: Vec<String>,

    /// Sample rate as reported by the service (a decimal string).
    #[serde(default)]
    pub sample_rate_hertz: String,

    #[serde(default)]
    pub voice_type: String,

    /// Lifecycle status, e.g. `GA` or `Preview`.
    #[serde(default)]
    pub status: String,
}
