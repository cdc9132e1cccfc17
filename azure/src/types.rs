//! Common types for the Azure speech API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ==================== Output Format ====================

/// Audio encoding requested through `X-Microsoft-OutputFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// 16kHz, 32kbps mono MP3.
    #[serde(rename = "audio-16khz-32kbitrate-mono-mp3")]
    Mp3Khz16,
    /// 24kHz, 48kbps mono MP3.
    #[default]
    #[serde(rename = "audio-24khz-48kbitrate-mono-mp3")]
    Mp3Khz24,
    /// 48kHz, 192kbps mono MP3.
    #[serde(rename = "audio-48khz-192kbitrate-mono-mp3")]
    Mp3Khz48,
    /// 24kHz Opus in an Ogg container.
    #[serde(rename = "ogg-24khz-16bit-mono-opus")]
    OggOpusKhz24,
    /// 24kHz 16-bit PCM in a RIFF (WAV) container.
    #[serde(rename = "riff-24khz-16bit-mono-pcm")]
    WavKhz24,
}

impl OutputFormat {
    /// All supported formats.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Mp3Khz16,
        OutputFormat::Mp3Khz24,
        OutputFormat::Mp3Khz48,
        OutputFormat::OggOpusKhz24,
        OutputFormat::WavKhz24,
    ];

    /// Returns the header value of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Mp3Khz16 => "audio-16khz-32kbitrate-mono-mp3",
            OutputFormat::Mp3Khz24 => "audio-24khz-48kbitrate-mono-mp3",
            OutputFormat::Mp3Khz48 => "audio-48khz-192kbitrate-mono-mp3",
            OutputFormat::OggOpusKhz24 => "ogg-24khz-16bit-mono-opus",
            OutputFormat::WavKhz24 => "riff-24khz-16bit-mono-pcm",
        }
    }

    /// Returns the file extension for audio in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3Khz16 | OutputFormat::Mp3Khz24 | OutputFormat::Mp3Khz48 => "mp3",
            OutputFormat::OggOpusKhz24 => "ogg",
            OutputFormat::WavKhz24 => "wav",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unsupported output format: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_strings() {
        assert_eq!(OutputFormat::default().as_str(), "audio-24khz-48kbitrate-mono-mp3");
        assert_eq!(OutputFormat::default().extension(), "mp3");
        assert_eq!(OutputFormat::WavKhz24.extension(), "wav");

        for format in OutputFormat::ALL {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }

        assert!("audio-8khz-mulaw".parse::<OutputFormat>().is_err());
    }
}
