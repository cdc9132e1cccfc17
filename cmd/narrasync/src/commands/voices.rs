//! Voice listing command.

use clap::Args;

use narrasync_core::{filter_by_locale, VoiceCatalog};

use super::{create_client, get_context, output_result, print_success, print_verbose};
use crate::provider::AzureSynthesizer;
use crate::Cli;

/// List provider voices.
#[derive(Args)]
pub struct VoicesCommand {
    /// Locale prefix to filter by, e.g. ko- or en-US (empty lists all)
    #[arg(long, default_value = "ko-")]
    locale: String,
}

impl VoicesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;

        print_verbose(cli, &format!("Using context: {}", ctx.name));
        print_verbose(cli, &format!("Locale prefix: {:?}", self.locale));

        let catalog = AzureSynthesizer::new(create_client(&ctx)?);
        let voices = filter_by_locale(catalog.list_voices().await?, &self.locale);

        print_success(&format!("Found {} voice(s)", voices.len()));

        if cli.json {
            return output_result(&voices, true);
        }

        for voice in &voices {
            println!("  {:<30} {:<8} {}", voice.id, voice.gender, voice.display_name);
        }
        Ok(())
    }
}
