mod commands;
mod inputs;

use clap::{Parser, Subcommand};
use commands::compose::Hook;
use deployflow_config::ComposerConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deployflow")]
#[command(about = "Compose the stages that run around a deployment", long_about = None)]
struct Cli {
    /// Composer config file (skips config discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the steps and stages composed around a deploy stage
    Compose {
        /// Stage configuration (JSON or YAML)
        #[arg(short, long)]
        stage: PathBuf,
        /// Existing server groups (JSON or YAML list); none when omitted
        #[arg(short, long)]
        inventory: Option<PathBuf>,
        /// Hook to print
        #[arg(long, value_enum, default_value = "all")]
        hook: Hook,
    },
    /// Check whether a deploy stage is handled by a configured provider
    Supports {
        /// Stage configuration (JSON or YAML)
        #[arg(short, long)]
        stage: PathBuf,
    },
    /// Find the newest image for a package
    Image {
        /// Image catalog (JSON or YAML list of image records)
        #[arg(short, long)]
        catalog: PathBuf,
        /// Package name the image must contain
        #[arg(short, long)]
        package: String,
        /// Tag filter, repeatable
        #[arg(short, long = "tag", value_parser = inputs::parse_tag)]
        tags: Vec<(String, String)>,
    },
    /// Show version
    Version,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries JSON output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ComposerConfig> {
    let config = match path {
        Some(path) => deployflow_config::load_config_from(path)?,
        None => deployflow_config::load_config()?,
    };
    tracing::debug!(provider = %config.provider, "Loaded composer config");
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Compose {
            stage,
            inventory,
            hook,
        } => {
            let config = load_config(cli.config.as_deref())?;
            commands::compose::handle(&config, stage, inventory.as_deref(), *hook).await?;
        }
        Commands::Supports { stage } => {
            let config = load_config(cli.config.as_deref())?;
            commands::supports::handle(&config, stage)?;
        }
        Commands::Image {
            catalog,
            package,
            tags,
        } => commands::image::handle(catalog, package, tags).await?,
        Commands::Version => {
            println!("deployflow {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
