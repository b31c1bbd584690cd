//! Inspect command: show what a URL carries without launching it.

use std::collections::BTreeMap;

use jms_core::models::ConnectionInfo;
use jms_core::pipeline::{ProtocolHandler, ResolvedUrl};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::mask;

/// Envelope and connection summary with secrets masked
#[derive(Debug, Serialize)]
struct InspectReport {
    filename: String,
    protocol: String,
    username: String,
    token: String,
    connection: ConnectionReport,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ConnectionReport {
    Rdp {
        full_address: String,
        hostname: String,
        port: u16,
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_bpp: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        audio_mode: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        smart_sizing: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        screen_mode_id: Option<i32>,
        additional_config: BTreeMap<String, String>,
    },
    Ssh {
        ip: String,
        port: String,
        username: String,
        password: String,
    },
}

impl From<&ResolvedUrl> for InspectReport {
    fn from(resolved: &ResolvedUrl) -> Self {
        let connection = match &resolved.info {
            ConnectionInfo::Rdp(info) => ConnectionReport::Rdp {
                full_address: info.full_address.clone(),
                hostname: info.hostname().to_string(),
                port: info.port(),
                username: info.username.clone(),
                session_bpp: info.session_bpp,
                audio_mode: info.audio_mode,
                smart_sizing: info.smart_sizing,
                screen_mode_id: info.screen_mode_id,
                additional_config: info.additional_config.clone(),
            },
            ConnectionInfo::Ssh(info) => ConnectionReport::Ssh {
                ip: info.ip.clone(),
                port: info.port.clone(),
                username: info.username.clone(),
                password: mask(info.password.expose_secret()),
            },
        };

        Self {
            filename: resolved.config.filename.clone(),
            protocol: resolved.info.protocol().to_string(),
            username: resolved.config.username.clone(),
            token: mask(&resolved.config.token),
            connection,
        }
    }
}

/// Inspect command handler
pub fn cmd_inspect(url: &str, format: OutputFormat) -> Result<(), CliError> {
    let resolved = ProtocolHandler::default().resolve(url)?;
    let report = InspectReport::from(&resolved);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::Output(format!("Failed to serialize report: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &InspectReport) {
    println!("Envelope:");
    println!("  Filename: {}", report.filename);
    println!("  Protocol: {}", report.protocol);
    println!("  Username: {}", report.username);
    println!("  Token:    {}", report.token);

    println!("Connection:");
    match &report.connection {
        ConnectionReport::Rdp {
            full_address,
            hostname,
            port,
            username,
            session_bpp,
            audio_mode,
            smart_sizing,
            screen_mode_id,
            additional_config,
        } => {
            println!("  Address:  {full_address}");
            println!("  Host:     {hostname}");
            println!("  Port:     {port}");
            println!("  Username: {username}");
            if let Some(bpp) = session_bpp {
                println!("  Color depth: {bpp}");
            }
            if let Some(mode) = audio_mode {
                println!("  Audio mode:  {mode}");
            }
            if let Some(sizing) = smart_sizing {
                println!("  Smart sizing: {}", if *sizing { "yes" } else { "no" });
            }
            if let Some(mode) = screen_mode_id {
                println!("  Screen mode: {mode}");
            }
            if !additional_config.is_empty() {
                println!("  Additional settings:");
                for (key, value) in additional_config {
                    println!("    {key} = {value}");
                }
            }
        }
        ConnectionReport::Ssh {
            ip,
            port,
            username,
            password,
        } => {
            println!("  Host:     {ip}");
            println!("  Port:     {port}");
            println!("  Username: {username}");
            println!("  Password: {password}");
        }
    }
}
