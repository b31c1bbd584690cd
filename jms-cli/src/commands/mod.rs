//! Command handler modules for the CLI.

mod completions;
mod config;
mod inspect;
mod open;
mod profiles;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub async fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Open {
            url,
            profile,
            dry_run,
        } => open::cmd_open(config_path, &url, profile.as_deref(), dry_run).await,
        Commands::Inspect { url, format } => inspect::cmd_inspect(&url, format),
        Commands::Profiles => profiles::cmd_profiles(config_path),
        Commands::Config(subcmd) => config::cmd_config(config_path, subcmd),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
