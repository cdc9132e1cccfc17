//! Azure-backed implementations of the core synthesis traits.

use async_trait::async_trait;
use narrasync_azure::{Client, SpeechRequest, VoiceInfo};
use narrasync_core::{SynthesisError, Synthesizer, Voice, VoiceCatalog};

/// Synthesizer and voice catalog backed by the Azure speech service.
pub struct AzureSynthesizer {
    client: Client,
}

impl AzureSynthesizer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Synthesizer for AzureSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError> {
        let request = SpeechRequest::new(text, voice);
        let response = self
            .client
            .speech()
            .synthesize(&request)
            .await
            .map_err(provider_error)?;
        Ok(response.audio)
    }
}

#[async_trait]
impl VoiceCatalog for AzureSynthesizer {
    async fn list_voices(&self) -> Result<Vec<Voice>, SynthesisError> {
        let voices = self.client.voice().list().await.map_err(provider_error)?;
        Ok(voices.into_iter().map(to_voice).collect())
    }
}

fn provider_error(err: narrasync_azure::Error) -> SynthesisError {
    SynthesisError::Provider(err.to_string())
}

fn to_voice(info: VoiceInfo) -> Voice {
    let display_name = if info.local_name.is_empty() {
        info.display_name
    } else {
        info.local_name
    };
    Voice {
        id: info.short_name,
        locale: info.locale,
        gender: info.gender,
        display_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_voice() {
        let voice = to_voice(VoiceInfo {
            short_name: "ko-KR-InJoonNeural".to_string(),
            display_name: "InJoon".to_string(),
            local_name: "인준".to_string(),
            gender: "Male".to_string(),
            locale: "ko-KR".to_string(),
            ..Default::default()
        });
        assert_eq!(voice.id, "ko-KR-InJoonNeural");
        assert_eq!(voice.locale, "ko-KR");
        assert_eq!(voice.gender, "Male");
        assert_eq!(voice.display_name, "인준");

        let voice = to_voice(VoiceInfo {
            short_name: "en-US-GuyNeural".to_string(),
            display_name: "Guy".to_string(),
            ..Default::default()
        });
        assert_eq!(voice.display_name, "Guy");
    }

    #[test]
    fn test_provider_error() {
        let err = provider_error(narrasync_azure::Error::api(401, "Unauthorized"));
        assert_eq!(
            err.to_string(),
            "provider error: azure speech: Unauthorized (http=401)"
        );
    }
}
