//! Speech synthesis collaborator interfaces.

use async_trait::async_trait;
use serde::Serialize;

/// Error type for synthesis providers.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("provider returned no audio")]
    EmptyAudio,
}

/// Interface for a text-to-speech provider.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes `text` with `voice` and returns the encoded audio.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SynthesisError>;
}

/// Interface for listing the voices a provider offers.
#[async_trait]
pub trait VoiceCatalog: Send + Sync {
    async fn list_voices(&self) -> Result<Vec<Voice>, SynthesisError>;
}

/// A provider voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Voice {
    /// Identifier passed to [`Synthesizer::synthesize`], e.g. `ko-KR-SunHiNeural`.
    pub id: String,

    /// Locale tag, e.g. `ko-KR`.
    pub locale: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub gender: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
}

/// Keeps the voices whose locale starts with `prefix`. An empty prefix keeps
/// everything.
pub fn filter_by_locale(voices: Vec<Voice>, prefix: &str) -> Vec<Voice> {
    voices
        .into_iter()
        .filter(|v| v.locale.starts_with(prefix))
        .collect()
}
