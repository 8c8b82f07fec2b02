//! ALB autoscale CLI
//!
//! A command-line tool for editing auto-scale manager debug filters
//! and migrating load balancer service annotations.

mod commands;
mod config;
mod output;

use alb_lib::{FilterField, KubeServiceStore};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use commands::{filter, services};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ALB autoscale CLI
#[derive(Parser)]
#[command(name = "albctl")]
#[command(author, version, about = "CLI for ALB autoscale debug filters and service migration", long_about = None)]
pub struct Cli {
    /// Kubeconfig file or path list (uses ~/.kube/config if not specified)
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<String>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and edit auto-scale manager debug filters
    #[command(subcommand)]
    Filter(FilterCommands),

    /// Kubernetes service commands
    #[command(subcommand)]
    Services(ServicesCommands),
}

#[derive(Subcommand)]
pub enum FilterCommands {
    /// Show a debug filter document
    Show {
        /// JSON file to read, or '-' for stdin
        file: String,
    },

    /// Build or edit a debug filter document
    Set {
        /// Existing JSON file to start from (starts empty if not specified)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Enable AWS autoscale integration (alpha)
        #[arg(long, action = ArgAction::Set)]
        enable_aws_autoscale_integration: Option<bool>,

        /// Period of the intelligent autoscale check, in seconds
        #[arg(long, allow_negative_numbers = true)]
        intelligent_autoscale_period: Option<i32>,

        /// Reference to a Pool object
        #[arg(long)]
        pool_ref: Option<String>,

        /// Unset a field by wire key (repeatable)
        #[arg(long)]
        clear: Vec<FilterField>,

        /// Output file path (prints to stdout if not specified)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ServicesCommands {
    /// List services in all namespaces
    List,

    /// Copy LoadBalancer ingress IPs into the service annotation
    Migrate {
        /// Show what would change without patching services
        #[arg(long)]
        dry_run: bool,

        /// Annotation key to write
        #[arg(long)]
        annotation_key: Option<String>,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let settings = config::CliConfig::load()?;
    let format = cli.format.or(settings.default_format).unwrap_or_default();

    match cli.command {
        Commands::Filter(filter_cmd) => match filter_cmd {
            FilterCommands::Show { file } => {
                filter::show_filter(&file, format)?;
            }
            FilterCommands::Set {
                input,
                enable_aws_autoscale_integration,
                intelligent_autoscale_period,
                pool_ref,
                clear,
                output,
            } => {
                let edit = filter::FilterEdit {
                    enable_aws_autoscale_integration,
                    intelligent_autoscale_period,
                    pool_ref,
                    clear,
                };
                filter::set_filter(input.as_deref(), &edit, output.as_deref())?;
            }
        },
        Commands::Services(services_cmd) => {
            let candidates = config::kubeconfig_paths(
                cli.kubeconfig
                    .as_deref()
                    .filter(|value| !value.is_empty())
                    .or(settings.kubeconfig.as_deref()),
            )?;
            let kubeconfigs: Vec<PathBuf> = candidates
                .iter()
                .filter(|path| path.is_file())
                .cloned()
                .collect();
            if kubeconfigs.is_empty() {
                let listed: Vec<String> =
                    candidates.iter().map(|p| p.display().to_string()).collect();
                anyhow::bail!("Kubeconfig file not found: {}", listed.join(", "));
            }
            debug!(kubeconfigs = ?kubeconfigs, "Using kubeconfig");

            let store = KubeServiceStore::from_kubeconfigs(&kubeconfigs)
                .await
                .context("Failed to connect to Kubernetes")?;

            match services_cmd {
                ServicesCommands::List => {
                    services::list_services(&store, format).await?;
                }
                ServicesCommands::Migrate {
                    dry_run,
                    annotation_key,
                } => {
                    let key = annotation_key
                        .or(settings.annotation_key)
                        .unwrap_or_else(|| alb_lib::DEFAULT_ANNOTATION_KEY.to_string());
                    services::migrate_services(&store, &key, dry_run, format).await?;
                }
            }
        }
    }

    Ok(())
}
