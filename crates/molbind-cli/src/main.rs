mod cli;
mod commands;
mod error;
mod job;
mod logging;
mod settings;
mod utils;
mod viewer;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🚀 molbind CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Colour(args) => {
            info!("Dispatching to 'colour' command.");
            commands::colour::run(args).await
        }
        Commands::Superpose(args) => {
            info!("Dispatching to 'superpose' command.");
            commands::superpose::run(args).await
        }
        Commands::Attributes(args) => {
            info!("Dispatching to 'attributes' command.");
            commands::attributes::run(args).await
        }
        Commands::Viewer(args) => {
            info!("Dispatching to 'viewer' command.");
            commands::viewer::run(args).await
        }
    };

    if let Some(summary) = success_summary(&command_result) {
        info!("{}", summary);
        eprintln!("{}", summary);
    }

    command_result
}

/// Failures are reported once, by `main`.
fn success_summary(result: &Result<()>) -> Option<&'static str> {
    result.as_ref().ok().map(|_| "✅ Command completed successfully.")
}
