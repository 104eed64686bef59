//! osc-render - render Ubuntu OperatingSystemConfig artifacts
//!
//! Loads an extension config and an OperatingSystemConfig manifest and
//! prints what the actuator produces for it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use os_ubuntu_rs::config::{load_extension_config, load_manifest};
use os_ubuntu_rs::{Actuator, OperatingSystemConfig, Purpose, UbuntuActuator};

#[derive(Parser)]
#[command(name = "osc-render")]
#[command(author, version, about = "Render Ubuntu OperatingSystemConfig artifacts", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Extension config file (YAML or JSON)
    #[arg(short, long, global = true, env = "OS_UBUNTU_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the artifacts for an OperatingSystemConfig
    Render {
        /// OperatingSystemConfig manifest (YAML or JSON)
        #[arg(long)]
        osc: PathBuf,

        /// Output format for reconcile artifacts
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Print the resolved extension config
    Config {
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // stdout carries the rendered artifacts, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn to_text<T: serde::Serialize>(value: &T, format: Format) -> Result<String> {
    Ok(match format {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)? + "\n",
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let extension_config = load_extension_config(cli.config.as_ref())
        .await
        .context("Failed to load extension config")?;
    let actuator = UbuntuActuator::new(&extension_config).context("Invalid extension config")?;

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Render { osc, format } => {
            let manifest: OperatingSystemConfig = load_manifest(&osc)
                .await
                .with_context(|| format!("Failed to load {}", osc.display()))?;
            info!("Rendering {} for purpose {}", osc.display(), manifest.spec.purpose);

            let output = actuator.reconcile(&manifest)?;
            match manifest.spec.purpose {
                Purpose::Provision => stdout.write_all(&output.user_data)?,
                Purpose::Reconcile => stdout.write_all(to_text(&output, format)?.as_bytes())?,
            }
        }
        Commands::Config { format } => {
            stdout.write_all(to_text(actuator.config(), format)?.as_bytes())?;
        }
    }

    Ok(())
}
