//! Open command: decode a URL and launch it.

use std::path::Path;

use jms_core::config::HandlerSettings;
use jms_core::detection::{TerminalCapabilities, detect_rdp_client};
use jms_core::launch::{Launcher, SystemLauncher};
use jms_core::models::StaticDisplayProvider;
use jms_core::pipeline::{LaunchArtifact, ProtocolHandler};
use jms_core::ssh::SshRenderOptions;

use crate::error::CliError;
use crate::util::{load_settings, resolve_profile};

/// Open command handler
pub async fn cmd_open(
    config_path: Option<&Path>,
    url: &str,
    profile: Option<&str>,
    dry_run: bool,
) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let profile = resolve_profile(&settings, profile)?;

    if dry_run {
        // never print credentials
        let handler = ProtocolHandler::new(StaticDisplayProvider::new(settings.display))
            .with_profile(profile)
            .with_ssh_options(SshRenderOptions::plain());
        print_artifact(&handler.handle_url(url)?);
        return Ok(());
    }

    let capabilities = detect_capabilities(&settings).await?;
    let ssh_options = if settings.ssh.allow_password_automation && capabilities.has_expect() {
        SshRenderOptions::automated(settings.ssh.automation_timeout)
    } else {
        SshRenderOptions::plain()
    };

    let handler = ProtocolHandler::new(StaticDisplayProvider::new(settings.display))
        .with_profile(profile)
        .with_ssh_options(ssh_options);
    let artifact = handler.handle_url(url)?;

    if matches!(artifact, LaunchArtifact::Rdp { .. }) {
        warn_if_no_rdp_client().await;
    }

    let launcher = SystemLauncher::from_settings(&settings, capabilities.terminal);
    let outcome = launcher.launch(&artifact).await?;
    println!("{}", outcome.description);

    if outcome.has_pending_cleanup() {
        tracing::debug!(
            delay_secs = settings.rdp.cleanup_delay,
            "Waiting to remove launch file"
        );
    }
    outcome.wait_for_cleanup().await;
    Ok(())
}

async fn detect_capabilities(settings: &HandlerSettings) -> Result<TerminalCapabilities, CliError> {
    let preferred = settings.ssh.terminal;
    tokio::task::spawn_blocking(move || TerminalCapabilities::detect(preferred))
        .await
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

async fn warn_if_no_rdp_client() {
    if let Ok(client) = tokio::task::spawn_blocking(detect_rdp_client).await
        && !client.installed
    {
        tracing::warn!(
            hint = client.install_hint.as_deref().unwrap_or_default(),
            "No RDP client found, the opener may not handle .rdp files"
        );
    }
}

fn print_artifact(artifact: &LaunchArtifact) {
    match artifact {
        LaunchArtifact::Rdp { filename, content } => {
            println!("# {filename}.rdp");
            println!("{content}");
        }
        LaunchArtifact::Ssh { command } => println!("{command}"),
    }
}
