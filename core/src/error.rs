//! Error types for narration synchronization.

use std::path::PathBuf;

use thiserror::Error;

use crate::synth::SynthesisError;

/// Result type alias for narrasync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for narrasync operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The persisted manifest exists but could not be decoded.
    #[error("manifest {path}: malformed: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The persisted manifest could not be read or written.
    #[error("manifest {path}: {source}")]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slides directory could not be listed.
    #[error("slides directory {path}: {source}")]
    Library {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Speech synthesis error.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parse_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::ManifestParse {
            path: PathBuf::from("audio/manifest.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("audio/manifest.json"));
        assert!(msg.contains("malformed"));
    }

    #[test]
    fn test_synthesis_is_transparent() {
        let err = Error::from(SynthesisError::Provider("429".to_string()));
        assert!(matches!(err, Error::Synthesis(_)));
        assert_eq!(err.to_string(), "provider error: 429");

        let err = Error::from(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "io error: disk full");
    }
}
