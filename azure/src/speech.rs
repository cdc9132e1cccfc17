//! Speech synthesis service.

use std::sync::Arc;

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use super::{
    error::{Error, Result},
    http::HttpClient,
    types::OutputFormat,
};

/// Synthesis endpoint path.
const SYNTHESIS_PATH: &str = "/cognitiveservices/v1";

/// Locale used when a voice name does not carry one.
const FALLBACK_LOCALE: &str = "en-US";

/// Maximum text length accepted per request.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Speech synthesis service.
pub struct SpeechService {
    http: Arc<HttpClient>,
    output_format: OutputFormat,
}

impl SpeechService {
    pub(crate) fn new(http: Arc<HttpClient>, output_format: OutputFormat) -> Self {
        Self {
            http,
            output_format,
        }
    }

    /// Performs speech synthesis.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use narrasync_azure::{Client, SpeechRequest};
    /// # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let request = SpeechRequest::new("안녕하세요", "ko-KR-SunHiNeural");
    /// let response = client.speech().synthesize(&request).await?;
    /// std::fs::write("hello.mp3", &response.audio)?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        request.validate()?;

        let ssml = build_ssml(request);
        let audio = self
            .http
            .post_ssml(SYNTHESIS_PATH, &ssml, self.output_format)
            .await?;

        Ok(SpeechResponse {
            audio: audio.to_vec(),
            format: self.output_format,
        })
    }
}

// ==================== Request/Response Types ====================

/// Request for speech synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Plain text to speak.
    pub text: String,

    /// Voice short name, e.g. `ko-KR-SunHiNeural`.
    pub voice: String,

    /// Language of the text; derived from the voice when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Speaking rate, e.g. `+10%` or `slow`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,

    /// Pitch, e.g. `-2st` or `high`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::InvalidRequest("text must be non-empty".to_string()));
        }
        if self.voice.is_empty() {
            return Err(Error::InvalidRequest("voice must be non-empty".to_string()));
        }
        let chars = self.text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(Error::InvalidRequest(format!(
                "text is {} characters, limit is {}",
                chars, MAX_TEXT_CHARS
            )));
        }
        Ok(())
    }
}

/// Response from speech synthesis.
#[derive(Debug, Clone, Default)]
pub struct SpeechResponse {
    /// Encoded audio data.
    pub audio: Vec<u8>,

    /// Encoding of `audio`.
    pub format: OutputFormat,
}

/// Returns the locale part of a voice short name, e.g. `ko-KR` for
/// `ko-KR-SunHiNeural`.
pub fn locale_of(voice: &str) -> Option<&str> {
    let mut parts = voice.splitn(3, '-');
    let language = parts.next()?;
    let region = parts.next()?;
    parts.next()?;
    Some(&voice[..language.len() + 1 + region.len()])
}

/// Builds the SSML document for a request.
pub fn build_ssml(request: &SpeechRequest) -> String {
    let locale = request
        .locale
        .as_deref()
        .or_else(|| locale_of(&request.voice))
        .unwrap_or(FALLBACK_LOCALE);

    let mut body = escape(request.text.trim()).into_owned();
    if request.rate.is_some() || request.pitch.is_some() {
        let mut prosody = String::from("<prosody");
        if let Some(rate) = &request.rate {
            prosody.push_str(&format!(" rate=\"{}\"", escape(rate.as_str())));
        }
        if let Some(pitch) = &request.pitch {
            prosody.push_str(&format!(" pitch=\"{}\"", escape(pitch.as_str())));
        }
        body = format!("{}>{}</prosody>", prosody, body);
    }

    format!(
        "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{}\"><voice name=\"{}\">{}</voice></speak>",
        escape(locale),
        escape(request.voice.as_str()),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_of() {
        assert_eq!(locale_of("ko-KR-SunHiNeural"), Some("ko-KR"));
        assert_eq!(locale_of("en-US-AvaMultilingualNeural"), Some("en-US"));
        assert_eq!(locale_of("zh-CN-henan-YundengNeural"), Some("zh-CN"));
        assert_eq!(locale_of("ko-KR"), None);
        assert_eq!(locale_of("custom"), None);
    }

    #[test]
    fn test_build_ssml() {
        let request = SpeechRequest::new("  안녕하세요  ", "ko-KR-SunHiNeural");
        assert_eq!(
            build_ssml(&request),
            "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"ko-KR\">\
             <voice name=\"ko-KR-SunHiNeural\">안녕하세요</voice></speak>"
        );
    }

    #[test]
    fn test_build_ssml_escapes_text() {
        let request = SpeechRequest::new("Array<string> & \"quotes\"", "en-US-AriaNeural");
        let ssml = build_ssml(&request);
        assert!(ssml.contains("Array&lt;string&gt; &amp; &quot;quotes&quot;"));
        assert!(!ssml.contains("<string>"));
    }

    #[test]
    fn test_build_ssml_prosody_and_locale() {
        let request = SpeechRequest {
            locale: Some("ja-JP".to_string()),
            rate: Some("+10%".to_string()),
            pitch: Some("-2st".to_string()),
            ..SpeechRequest::new("テスト", "my-custom-voice")
        };
        let ssml = build_ssml(&request);
        assert!(ssml.contains("xml:lang=\"ja-JP\""));
        assert!(ssml.contains("<prosody rate=\"+10%\" pitch=\"-2st\">テスト</prosody>"));

        let fallback = build_ssml(&SpeechRequest::new("hi", "custom"));
        assert!(fallback.contains("xml:lang=\"en-US\""));
    }

    #[test]
    fn test_validate() {
        assert!(SpeechRequest::new("hi", "ko-KR-SunHiNeural").validate().is_ok());
        assert!(matches!(
            SpeechRequest::new("   ", "ko-KR-SunHiNeural").validate(),
            Err(Error::InvalidRequest(_))
        ));
        assert!(SpeechRequest::new("hi", "").validate().is_err());
        let long = "가".repeat(MAX_TEXT_CHARS + 1);
        assert!(SpeechRequest::new(long, "ko-KR-SunHiNeural").validate().is_err());
    }
}
