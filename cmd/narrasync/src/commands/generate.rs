//! Narration generation command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use narrasync_core::{sync, GroupOutcome, RunReport, SyncOptions, UnitOutcome, DEFAULT_VOICE};

use super::{
    create_client, get_context, output_result, print_error, print_success, print_verbose,
    print_warning,
};
use crate::provider::AzureSynthesizer;
use crate::Cli;

/// Generate narration audio for changed slides.
///
/// Every `NN-*.html` deck in the slides directory is scanned for slides with
/// a `data-narration` attribute. Audio is only synthesized when the narration
/// text changed since the last run or the audio file is missing.
#[derive(Args)]
pub struct GenerateCommand {
    /// Voice to narrate with (default: context default_voice, then ko-KR-SunHiNeural)
    #[arg(long)]
    voice: Option<String>,

    /// Process only this chapter, e.g. 01 or 1 (repeatable)
    #[arg(long)]
    chapter: Vec<String>,

    /// Regenerate every narrated slide
    #[arg(long)]
    force: bool,

    /// Directory holding the NN-*.html decks
    #[arg(long, default_value = "slides")]
    slides_dir: PathBuf,

    /// Audio output directory (default: <slides-dir>/audio)
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// Manifest file (default: <audio-dir>/manifest.json)
    #[arg(long)]
    manifest: Option<PathBuf>,
}

/// Machine-readable run summary.
#[derive(Serialize)]
struct GenerateResult {
    voice: String,
    manifest: String,
    skipped: usize,
    generated: usize,
    failed: usize,
    groups: Vec<GroupResult>,
}

#[derive(Serialize)]
struct GroupResult {
    group: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<String>,
}

impl GenerateCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;
        let extension = client.output_format().extension();

        let voice = match (&self.voice, ctx.default_voice.as_str()) {
            (Some(v), _) => v.clone(),
            (None, "") => DEFAULT_VOICE.to_string(),
            (None, v) => v.to_string(),
        };

        let audio_dir = self
            .audio_dir
            .clone()
            .unwrap_or_else(|| self.slides_dir.join("audio"));

        let mut options = SyncOptions::new(&self.slides_dir, audio_dir)
            .voice(&voice)
            .extension(extension)
            .force(self.force);
        if let Some(manifest) = &self.manifest {
            options = options.manifest_path(manifest);
        }
        for chapter in &self.chapter {
            options = options.group(chapter);
        }

        print_verbose(cli, &format!("Using context: {}", ctx.name));
        print_verbose(cli, &format!("Voice: {}", options.voice));
        print_verbose(cli, &format!("Slides dir: {}", options.slides_dir.display()));
        print_verbose(cli, &format!("Audio dir: {}", options.audio_dir.display()));

        let synthesizer = AzureSynthesizer::new(client);
        let report = sync(&options, &synthesizer).await?;

        print_groups(&report);

        let summary = report.summary();
        if summary.failed > 0 {
            print_warning(&format!(
                "{} slide(s) failed; they will be retried on the next run",
                summary.failed
            ));
        }
        print_success(&format!(
            "Generated {} audio file(s), skipped {}, failed {}",
            summary.generated, summary.skipped, summary.failed
        ));

        output_result(&to_result(&report, voice), cli.json)
    }
}

fn print_groups(report: &RunReport) {
    for run in &report.groups {
        match &run.outcome {
            GroupOutcome::DocumentNotFound => {
                print_warning(&format!("Chapter {}: no document found", run.group_id));
            }
            GroupOutcome::Malformed { document, error } => {
                print_error(&format!(
                    "Chapter {}: cannot read {}: {}",
                    run.group_id,
                    document.display(),
                    error
                ));
            }
            GroupOutcome::NoNarration { document } => {
                eprintln!(
                    "Chapter {}: no narration in {}",
                    run.group_id,
                    document.display()
                );
            }
            GroupOutcome::Processed { report, .. } => {
                let summary = report.summary();
                eprintln!(
                    "Chapter {}: {} generated, {} skipped, {} failed",
                    run.group_id, summary.generated, summary.skipped, summary.failed
                );
                for unit in report.failures() {
                    if let UnitOutcome::Failed(message) = &unit.outcome {
                        print_error(&format!("  {}: {}", unit.key, message));
                    }
                }
            }
        }
    }
}

fn to_result(report: &RunReport, voice: String) -> GenerateResult {
    let summary = report.summary();
    let groups = report
        .groups
        .iter()
        .map(|run| {
            let (status, document, failures) = match &run.outcome {
                GroupOutcome::DocumentNotFound => ("not_found", None, Vec::new()),
                GroupOutcome::Malformed { document, error } => (
                    "malformed",
                    Some(document.display().to_string()),
                    vec![error.clone()],
                ),
                GroupOutcome::NoNarration { document } => {
                    ("no_narration", Some(document.display().to_string()), Vec::new())
                }
                GroupOutcome::Processed { document, report } => (
                    "processed",
                    Some(document.display().to_string()),
                    report
                        .failures()
                        .map(|unit| match &unit.outcome {
                            UnitOutcome::Failed(message) => format!("{}: {}", unit.key, message),
                            _ => unit.key.clone(),
                        })
                        .collect(),
                ),
            };
            GroupResult {
                group: run.group_id.clone(),
                status,
                document,
                failures,
            }
        })
        .collect();

    GenerateResult {
        voice,
        manifest: report.manifest_path.display().to_string(),
        skipped: summary.skipped,
        generated: summary.generated,
        failed: summary.failed,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrasync_core::{GroupReport, GroupRun, UnitResult};

    #[test]
    fn test_to_result() {
        let report = RunReport {
            groups: vec![
                GroupRun {
                    group_id: "01".to_string(),
                    outcome: GroupOutcome::Processed {
                        document: PathBuf::from("slides/01-intro.html"),
                        report: GroupReport {
                            group_id: "01".to_string(),
                            units: vec![
                                UnitResult {
                                    index: 1,
                                    key: "unit-01".to_string(),
                                    path: PathBuf::from("audio/01/slide-01.mp3"),
                                    outcome: UnitOutcome::Generated,
                                },
                                UnitResult {
                                    index: 2,
                                    key: "unit-02".to_string(),
                                    path: PathBuf::from("audio/01/slide-02.mp3"),
                                    outcome: UnitOutcome::Failed("timeout".to_string()),
                                },
                            ],
                        },
                    },
                },
                GroupRun {
                    group_id: "07".to_string(),
                    outcome: GroupOutcome::DocumentNotFound,
                },
            ],
            manifest_path: PathBuf::from("audio/manifest.json"),
        };

        let result = to_result(&report, "ko-KR-SunHiNeural".to_string());
        assert_eq!(result.generated, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.groups[0].status, "processed");
        assert_eq!(result.groups[0].failures, vec!["unit-02: timeout"]);
        assert_eq!(result.groups[1].status, "not_found");
        assert!(result.groups[1].document.is_none());
    }
}
