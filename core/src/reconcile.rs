//! Skip-or-regenerate decisions per narration unit.

use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::layout::AudioLayout;
use crate::manifest::GroupEntries;
use crate::synth::{SynthesisError, Synthesizer};
use crate::types::NarrationUnit;

/// Terminal state of a unit after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Recorded fingerprint matches and the audio file exists.
    Skipped,
    /// Audio was synthesized and the fingerprint recorded.
    Generated,
    /// Synthesis or writing failed; the recorded fingerprint is untouched.
    Failed(String),
}

/// Outcome of one unit.
#[derive(Debug, Clone)]
pub struct UnitResult {
    pub index: u32,
    pub key: String,
    pub path: PathBuf,
    pub outcome: UnitOutcome,
}

/// Per-outcome unit counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub skipped: usize,
    pub generated: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.skipped + self.generated + self.failed
    }
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Self) {
        self.skipped += other.skipped;
        self.generated += other.generated;
        self.failed += other.failed;
    }
}

/// Outcomes of all units of a group, in document order.
#[derive(Debug, Clone, Default)]
pub struct GroupReport {
    pub group_id: String,
    pub units: Vec<UnitResult>,
}

impl GroupReport {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for unit in &self.units {
            match unit.outcome {
                UnitOutcome::Skipped => summary.skipped += 1,
                UnitOutcome::Generated => summary.generated += 1,
                UnitOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Returns the failed units.
    pub fn failures(&self) -> impl Iterator<Item = &UnitResult> {
        self.units
            .iter()
            .filter(|u| matches!(u.outcome, UnitOutcome::Failed(_)))
    }
}

/// Decides per unit whether audio must be regenerated, and regenerates it.
///
/// Units are processed one at a time, in order. A failing unit does not stop
/// the rest of the group.
pub struct Reconciler<'a> {
    synthesizer: &'a dyn Synthesizer,
    voice: &'a str,
    layout: &'a AudioLayout,
    force: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(synthesizer: &'a dyn Synthesizer, voice: &'a str, layout: &'a AudioLayout) -> Self {
        Self {
            synthesizer,
            voice,
            layout,
            force: false,
        }
    }

    /// Regenerates every unit regardless of recorded fingerprints.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Reconciles the units of one group against its recorded entries.
    ///
    /// Returns the updated entries. Entries of units no longer in the
    /// document are kept.
    pub async fn reconcile(
        &self,
        group_id: &str,
        units: &[NarrationUnit],
        mut entries: GroupEntries,
    ) -> (GroupEntries, GroupReport) {
        let mut report = GroupReport {
            group_id: group_id.to_string(),
            units: Vec::with_capacity(units.len()),
        };

        for unit in units {
            let result = self.reconcile_unit(unit, &mut entries).await;
            report.units.push(result);
        }

        (entries, report)
    }

    async fn reconcile_unit(&self, unit: &NarrationUnit, entries: &mut GroupEntries) -> UnitResult {
        let key = unit.key();
        let path = self.layout.asset_path(&unit.group_id, unit.index);
        let fingerprint = Fingerprint::of(&unit.text);

        let outcome = if !self.force
            && entries.get(&key) == Some(&fingerprint)
            && asset_exists(&path).await
        {
            info!(group = %unit.group_id, key = %key, "unchanged");
            UnitOutcome::Skipped
        } else {
            info!(group = %unit.group_id, key = %key, path = %path.display(), "generating");
            match self.generate(unit, &path).await {
                Ok(size) => {
                    entries.insert(key.clone(), fingerprint);
                    info!(group = %unit.group_id, key = %key, bytes = size, "generated");
                    UnitOutcome::Generated
                }
                Err(e) => {
                    warn!(group = %unit.group_id, key = %key, error = %e, "generation failed");
                    UnitOutcome::Failed(e.to_string())
                }
            }
        };

        UnitResult {
            index: unit.index,
            key,
            path,
            outcome,
        }
    }

    /// Synthesizes a unit and writes its audio file. Returns the audio size.
    async fn generate(&self, unit: &NarrationUnit, path: &Path) -> Result<usize> {
        let audio = self.synthesizer.synthesize(&unit.text, self.voice).await?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio.into());
        }

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        // Never leave a truncated file under the final name.
        let partial = path.with_extension(format!("{}.part", self.layout.extension()));
        if let Err(e) = write_then_rename(&partial, path, &audio).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                debug!(path = %partial.display(), error = %cleanup, "partial file not removed");
            }
            return Err(e.into());
        }

        Ok(audio.len())
    }
}

async fn write_then_rename(partial: &Path, path: &Path, audio: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(partial, audio).await?;
    tokio::fs::rename(partial, path).await
}

async fn asset_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
