//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Handler for `jms://` connection URLs
#[derive(Parser)]
#[command(name = "jms-handler")]
#[command(author, version, about = "Opens jms:// connection URLs from a JumpServer console")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode a URL and launch the connection
    #[command(about = "Decode a jms:// URL and launch the connection")]
    Open {
        /// The `jms://` URL
        url: String,

        /// Quality profile to use instead of the configured one
        /// (performance, balanced, quality, custom)
        #[arg(short, long)]
        profile: Option<String>,

        /// Print the generated artifact without launching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show what a URL contains
    #[command(about = "Show the envelope and connection info in a jms:// URL")]
    Inspect {
        /// The `jms://` URL
        url: String,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// List quality profiles
    #[command(about = "List RDP quality profiles")]
    Profiles,

    /// Configuration file commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `config` subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format for `inspect`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
}
