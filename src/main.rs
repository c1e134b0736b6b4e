//! droidspec command-line entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use droidspec::commands::{CheckCommand, MergeCommand, ShowCommand};
use droidspec::core::{DroidSpecError, LoaderSettings, APP_NAME, VERSION};
use droidspec::descriptor::{DescriptorFormat, DescriptorLoader};

/// Load, check and merge Android build descriptors
#[derive(Parser)]
#[command(name = "droidspec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Treat lenient findings as errors
    #[arg(long, global = true)]
    strict: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate descriptor files independently
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Merge descriptors in order (later files win) and print the result
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: toml or json
        #[arg(short, long)]
        format: Option<String>,

        /// Also write the merged descriptor to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a summary of one descriptor
    Show { file: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<DroidSpecError>() {
                Some(err) => error!("{}", err.user_message()),
                None => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    info!("{} v{} starting", APP_NAME, VERSION);

    let settings = match cli.config {
        Some(ref path) => LoaderSettings::load_from(path).await,
        None => LoaderSettings::load().await,
    }
    .context("Failed to load settings")?;

    let mut options = settings.loader_options();
    options.strict |= cli.strict;
    let loader = DescriptorLoader::with_options(options);

    match cli.command {
        Commands::Check { files } => {
            let reports = CheckCommand { files }.execute(&loader).await?;
            let mut failed = 0;
            for report in &reports {
                match report.error {
                    None => println!("ok      {}", report.path.display()),
                    Some(ref e) => {
                        failed += 1;
                        println!("invalid {}: {}", report.path.display(), e);
                    }
                }
            }
            Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Merge { files, format, output } => {
            let format = match format {
                Some(name) => DescriptorFormat::parse(&name)
                    .with_context(|| format!("Unknown format '{}'", name))?,
                None => settings.output_format().unwrap_or_default(),
            };
            let text = MergeCommand { files, format, output }.execute(&loader).await?;
            print!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { file } => {
            let summary = ShowCommand { file }.execute(&loader).await?;
            print!("{}", summary);
            Ok(ExitCode::SUCCESS)
        }
    }
}
