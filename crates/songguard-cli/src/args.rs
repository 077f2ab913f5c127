use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "songguard")]
#[command(author, version, about = "Lyrics moderation for music-video song requests")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Video URL to check (shorthand for `check <URL>`)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the moderation API
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Run a classifier backend instance
    Backend {
        /// Listen address (overrides server.backend_bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Moderate a single video URL
    Check {
        /// Video URL
        url: String,

        /// Print the full sentiment verdict as JSON
        #[arg(long)]
        details: bool,
    },

    /// Moderate many URLs from a file
    Batch {
        /// File containing URLs (one per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum concurrent checks
        #[arg(short, long, default_value = "4")]
        parallel: usize,
    },

    /// Check word lists and service configuration
    Doctor,

    /// Show configuration
    Config,
}
