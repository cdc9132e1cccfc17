//! Utility functions for CLI commands.

use std::time::Duration;

use narrasync_azure::{Client, OutputFormat as AudioFormat};
use narrasync_cli::config::{load_config, Config, Context};
use narrasync_cli::{Output, OutputFormat};

use crate::Cli;

pub const APP_NAME: &str = "narrasync";

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Gets the context configuration to use.
///
/// An explicit `-c` must name an existing context. Without one, the current
/// context is used, then the `AZURE_SPEECH_KEY` environment fallback.
pub fn get_context(cli: &Cli) -> anyhow::Result<Context> {
    let cfg = get_config(cli)?;

    if let Some(ctx) = cfg.resolve_context(cli.context.as_deref()) {
        return Ok(ctx.clone());
    }

    match cli.context.as_deref() {
        Some(name) if !name.is_empty() => anyhow::bail!("context '{}' not found", name),
        _ => Context::from_env().ok_or_else(|| {
            anyhow::anyhow!(
                "no credentials found. Use -c flag, set a default context with 'narrasync config use-context', or set AZURE_SPEECH_KEY"
            )
        }),
    }
}

/// Creates an Azure speech client from context configuration.
pub fn create_client(ctx: &Context) -> anyhow::Result<Client> {
    let mut builder = Client::builder(&ctx.api_key);

    if !ctx.region.is_empty() {
        builder = builder.region(&ctx.region);
    }
    if !ctx.base_url.is_empty() {
        builder = builder.endpoint(&ctx.base_url);
    }
    if ctx.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(u64::from(ctx.timeout)));
    }
    if ctx.max_retries > 0 {
        builder = builder.max_retries(ctx.max_retries);
    }
    if let Some(format) = ctx.get_extra("output_format") {
        if !format.is_empty() {
            builder = builder.output_format(format.parse::<AudioFormat>()?);
        }
    }

    Ok(builder.build()?)
}

/// Outputs result as JSON or YAML on stdout.
pub fn output_result<T: serde::Serialize>(result: &T, as_json: bool) -> anyhow::Result<()> {
    Output::new(OutputFormat::from_json_flag(as_json), None).write(result)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    narrasync_cli::print_verbose(cli.verbose, msg);
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}
