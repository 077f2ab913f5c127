mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "songguard=info,songguard_core=info,songguard_classifier=info",
        1 => "songguard=debug,songguard_core=debug,songguard_classifier=debug,tower_http=debug",
        2 => "songguard=trace,songguard_core=trace,songguard_classifier=trace,tower_http=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Some(Commands::Serve { bind }) => commands::serve::run(bind, config_path).await,
        Some(Commands::Backend { bind }) => commands::backend::run(bind, config_path).await,
        Some(Commands::Check { url, details }) => {
            commands::check::run(&url, details, config_path).await
        }
        Some(Commands::Batch { input, parallel }) => {
            commands::batch::run(&input, parallel, config_path).await
        }
        Some(Commands::Doctor) => commands::doctor::run(config_path).await,
        Some(Commands::Config) => commands::config::run(config_path).await,
        None => {
            // If URL provided directly, treat as check command
            if let Some(url) = cli.url {
                commands::check::run(&url, false, config_path).await
            } else {
                use clap::CommandFactory;
                Cli::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
