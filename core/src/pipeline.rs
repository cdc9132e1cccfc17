//! A full synchronization pass over a slides directory.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::extract::extract_all;
use crate::layout::{AudioLayout, DEFAULT_EXTENSION};
use crate::library::{normalize_group_id, Library};
use crate::manifest::{Manifest, ManifestStore};
use crate::reconcile::{GroupReport, Reconciler, Summary};
use crate::synth::Synthesizer;

/// Default synthesis voice.
pub const DEFAULT_VOICE: &str = "ko-KR-SunHiNeural";

/// Manifest file name inside the audio directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Options for [`sync`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub slides_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub voice: String,
    pub extension: String,
    pub force: bool,
    /// Groups to process; all groups with a document when `None`.
    pub groups: Option<Vec<String>>,
}

impl SyncOptions {
    /// Creates options with the manifest inside `audio_dir`.
    pub fn new(slides_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        let audio_dir = audio_dir.into();
        Self {
            slides_dir: slides_dir.into(),
            manifest_path: audio_dir.join(MANIFEST_FILE),
            audio_dir,
            voice: DEFAULT_VOICE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            force: false,
            groups: None,
        }
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Restricts the run to `group`; may be called repeatedly.
    pub fn group(mut self, group: &str) -> Self {
        self.groups
            .get_or_insert_with(Vec::new)
            .push(normalize_group_id(group));
        self
    }
}

/// What happened to a group during a run.
#[derive(Debug, Clone)]
pub enum GroupOutcome {
    /// No `<group>-*.html` document exists.
    DocumentNotFound,
    /// The document could not be read or parsed.
    Malformed { document: PathBuf, error: String },
    /// The document has no narrated slides.
    NoNarration { document: PathBuf },
    /// Units were reconciled.
    Processed { document: PathBuf, report: GroupReport },
}

/// A group and its outcome.
#[derive(Debug, Clone)]
pub struct GroupRun {
    pub group_id: String,
    pub outcome: GroupOutcome,
}

/// Result of a [`sync`] run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub groups: Vec<GroupRun>,
    pub manifest_path: PathBuf,
}

impl RunReport {
    /// Unit counts over all processed groups.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for group in &self.groups {
            if let GroupOutcome::Processed { report, .. } = &group.outcome {
                summary += report.summary();
            }
        }
        summary
    }
}

/// Runs a synchronization pass.
///
/// The manifest is loaded once, and saved after every processed group and at
/// the end. Only manifest and slides directory errors abort the run; group
/// and unit problems are reported in the returned [`RunReport`].
pub async fn sync(options: &SyncOptions, synthesizer: &dyn Synthesizer) -> Result<RunReport> {
    let store = ManifestStore::new(&options.manifest_path);
    let mut manifest = store.load()?;

    let library = Library::new(&options.slides_dir);
    let layout = AudioLayout::new(&options.audio_dir).with_extension(&options.extension);
    let reconciler = Reconciler::new(synthesizer, &options.voice, &layout).force(options.force);

    let groups = match &options.groups {
        Some(groups) => groups.iter().map(|g| normalize_group_id(g)).collect(),
        None => library.groups()?,
    };

    info!(
        voice = %options.voice,
        slides = %options.slides_dir.display(),
        audio = %options.audio_dir.display(),
        groups = groups.len(),
        "sync: starting"
    );

    let mut report = RunReport {
        groups: Vec::with_capacity(groups.len()),
        manifest_path: options.manifest_path.clone(),
    };

    for group_id in groups {
        let outcome = sync_group(&library, &reconciler, &group_id, &mut manifest).await?;
        if matches!(outcome, GroupOutcome::Processed { .. }) {
            store.save(&manifest)?;
        }
        report.groups.push(GroupRun { group_id, outcome });
    }

    store.save(&manifest)?;

    let summary = report.summary();
    info!(
        skipped = summary.skipped,
        generated = summary.generated,
        failed = summary.failed,
        "sync: done"
    );
    Ok(report)
}

async fn sync_group(
    library: &Library,
    reconciler: &Reconciler<'_>,
    group_id: &str,
    manifest: &mut Manifest,
) -> Result<GroupOutcome> {
    let Some(document) = library.find_document(group_id)? else {
        warn!(group = %group_id, "no document found");
        return Ok(GroupOutcome::DocumentNotFound);
    };

    let html = match tokio::fs::read_to_string(&document).await {
        Ok(html) => html,
        Err(e) => {
            warn!(group = %group_id, document = %document.display(), error = %e, "unreadable document");
            return Ok(GroupOutcome::Malformed {
                document,
                error: e.to_string(),
            });
        }
    };

    let units = match extract_all(group_id, &html) {
        Ok(units) => units,
        Err(e) => {
            warn!(group = %group_id, document = %document.display(), error = %e, "malformed document");
            return Ok(GroupOutcome::Malformed {
                document,
                error: e.to_string(),
            });
        }
    };

    if units.is_empty() {
        info!(group = %group_id, document = %document.display(), "no narration");
        return Ok(GroupOutcome::NoNarration { document });
    }

    info!(group = %group_id, document = %document.display(), units = units.len(), "processing");

    let entries = manifest.group_or_default(group_id);
    let (entries, report) = reconciler.reconcile(group_id, &units, entries).await;
    manifest.replace_group(group_id, entries);

    Ok(GroupOutcome::Processed { document, report })
}
