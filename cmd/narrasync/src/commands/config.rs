//! Configuration management commands.

use clap::{Args, Subcommand};

use narrasync_cli::config::{mask_api_key, Context as CliContext};

use super::{get_config, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts allow you to manage multiple provider configurations,
/// similar to kubectl's context management.
///
/// Configuration is stored in ~/.narrasync/narrasync/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// Subscription key (required)
        #[arg(long)]
        api_key: String,
        /// Service region, e.g. koreacentral
        #[arg(long)]
        region: Option<String>,
        /// Endpoint override
        #[arg(long)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u32>,
        /// Maximum retries
        #[arg(long)]
        max_retries: Option<u32>,
        /// Default narration voice
        #[arg(long)]
        default_voice: Option<String>,
        /// Audio output format, e.g. audio-24khz-48kbitrate-mono-mp3
        #[arg(long)]
        output_format: Option<String>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                api_key,
                region,
                base_url,
                timeout,
                max_retries,
                default_voice,
                output_format,
            } => {
                let mut cfg = get_config(cli)?;

                let mut ctx = CliContext {
                    api_key: api_key.clone(),
                    region: region.clone().unwrap_or_default(),
                    base_url: base_url.clone().unwrap_or_default(),
                    timeout: timeout.unwrap_or(0),
                    max_retries: max_retries.unwrap_or(0),
                    default_voice: default_voice.clone().unwrap_or_default(),
                    ..Default::default()
                };

                if let Some(format) = output_format {
                    format.parse::<narrasync_azure::OutputFormat>()?;
                    ctx.set_extra("output_format", format);
                }

                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<16} {}", "CURRENT", "NAME", "REGION", "DEFAULT_VOICE");

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    let region = if ctx.region.is_empty() {
                        "(default)"
                    } else {
                        &ctx.region
                    };
                    println!(
                        "{:<8} {:<20} {:<16} {}",
                        current, name, region, ctx.default_voice
                    );
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                if !cfg.contexts.is_empty() {
                    println!("\nContext details:");

                    for name in cfg.list_contexts() {
                        let Some(ctx) = cfg.get_context(name) else {
                            continue;
                        };
                        println!("\n  {}:", name);
                        println!("    API Key: {}", mask_api_key(&ctx.api_key));
                        if !ctx.region.is_empty() {
                            println!("    Region: {}", ctx.region);
                        }
                        if !ctx.base_url.is_empty() {
                            println!("    Base URL: {}", ctx.base_url);
                        }
                        if ctx.timeout > 0 {
                            println!("    Timeout: {}s", ctx.timeout);
                        }
                        if ctx.max_retries > 0 {
                            println!("    Max Retries: {}", ctx.max_retries);
                        }
                        if !ctx.default_voice.is_empty() {
                            println!("    Default Voice: {}", ctx.default_voice);
                        }
                        if let Some(format) = ctx.get_extra("output_format") {
                            println!("    Output Format: {}", format);
                        }
                    }
                }

                Ok(())
            }
        }
    }
}
