//! Slide narration synchronization.
//!
//! This crate keeps narration audio in step with the narration text embedded
//! in HTML slide decks:
//! - [`extract`]: ordered narration units from a deck
//! - [`Fingerprint`] and [`ManifestStore`]: change detection across runs
//! - [`Reconciler`]: skip or regenerate each unit
//! - [`sync`]: the whole pass over a slides directory
//!
//! # Example
//!
//! ```rust,ignore
//! use narrasync_core::{sync, SyncOptions};
//!
//! let options = SyncOptions::new("slides", "slides/audio").voice("ko-KR-SunHiNeural");
//! let report = sync(&options, &synthesizer).await?;
//! println!("{:?}", report.summary());
//! ```

mod error;
mod extract;
mod fingerprint;
mod layout;
mod library;
mod manifest;
mod pipeline;
mod reconcile;
mod synth;
mod types;

pub use error::{Error, Result};
pub use extract::{boundaries, extract, extract_all, Boundaries, ExtractError, Extractor};
pub use fingerprint::{Fingerprint, FINGERPRINT_LEN};
pub use layout::{AudioLayout, DEFAULT_EXTENSION, DEFAULT_STEM};
pub use library::{normalize_group_id, Library, DOCUMENT_EXTENSION};
pub use manifest::{GroupEntries, Manifest, ManifestStore};
pub use pipeline::{sync, GroupOutcome, GroupRun, RunReport, SyncOptions, DEFAULT_VOICE, MANIFEST_FILE};
pub use reconcile::{GroupReport, Reconciler, Summary, UnitOutcome, UnitResult};
pub use synth::{filter_by_locale, SynthesisError, Synthesizer, Voice, VoiceCatalog};
pub use types::{unit_key, Boundary, NarrationUnit};
