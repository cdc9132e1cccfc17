//! Azure Cognitive Services text-to-speech SDK for Rust.
//!
//! This crate provides a client for the Azure speech REST API: synthesis
//! from SSML and the regional voice list.

mod client;
mod error;
pub mod http;
mod speech;
mod types;
mod voice;

pub use client::{endpoint_for_region, Client, ClientBuilder, DEFAULT_MAX_RETRIES, DEFAULT_REGION, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use speech::{build_ssml, locale_of, SpeechRequest, SpeechResponse, SpeechService};
pub use types::OutputFormat;
pub use voice::{VoiceInfo, VoiceService};
