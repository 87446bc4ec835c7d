use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrollreel_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "scrollreel")]
#[command(author, version, about = "Scroll-driven chapter presentation in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this configuration file instead of ~/.config/scrollreel/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the presentation
    Run,
    /// Drive the presentation headlessly and print a JSON-lines trace
    Simulate {
        /// Script of commands, one per line (built-in tour when omitted)
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Frame clock step in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
        /// Include a full scene snapshot after every wait
        #[arg(long)]
        scenes: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.general.log_level))
}

/// Log to stderr
fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Log to `<data_dir>/scrollreel.log`; the terminal belongs to the presentation
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::load().context("loading configuration")?,
    };
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);

    // Config subcommands must work even when the file is broken
    if let Some(Commands::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Init { force } => commands::config::init(&config_path, *force),
            ConfigAction::Path => commands::config::path(&config_path),
            ConfigAction::Show => commands::config::show(&load_config(Some(&config_path))?),
        };
    }

    let config = Arc::new(load_config(cli.config.as_deref())?);

    match cli.command {
        Some(Commands::Run) | None => {
            init_file_logging(&config)?;
            commands::run::run(config).await
        }
        Some(Commands::Simulate {
            script,
            frame_ms,
            scenes,
        }) => {
            init_stderr_logging(&config);
            commands::simulate::run(config, script.as_deref(), frame_ms, scenes)
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}
