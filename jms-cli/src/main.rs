//! `jms-handler` - opens `jms://` connection URLs
//!
//! Registered as the system handler for the `jms` scheme. Decodes the URL,
//! writes an `.rdp` file or builds an SSH command, and hands it to the
//! matching local application.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use jms_core::tracing::{TracingConfig, TracingLevel, TracingOutput, init_tracing};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(util::normalize_args(std::env::args_os().collect()));
    let config_path = cli.config.as_deref();

    init_logging(&cli);

    let result = commands::dispatch(config_path, cli.command).await;

    if let Err(e) = result {
        tracing::debug!(exit_code = e.exit_code(), "Command failed");
        if !cli.quiet {
            eprintln!("Error: {e}");
            if let Some(hint) = e.suggestion() {
                eprintln!("Hint: {hint}");
            }
        }
        std::process::exit(e.exit_code());
    }
}

fn init_logging(cli: &Cli) {
    // a broken settings file is reported by the command itself
    let logging = util::load_settings(cli.config.as_deref())
        .map(|settings| settings.logging)
        .unwrap_or_default();

    let level = if cli.quiet {
        TracingLevel::Error
    } else {
        TracingLevel::from_verbosity(logging.level, cli.verbose)
    };
    let output = cli
        .log_file
        .clone()
        .or(logging.file)
        .map_or(TracingOutput::Stderr, TracingOutput::File);

    let config = TracingConfig::new().with_level(level).with_output(output);
    if let Err(e) = init_tracing(&config)
        && !cli.quiet
    {
        eprintln!("Warning: logging disabled: {e}");
    }
}
