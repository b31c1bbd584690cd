//! End-to-end URL handling

use jms_core::extract::extract_connection_info;
use jms_core::models::{DisplayConfiguration, StaticDisplayProvider};
use jms_core::payload::encode_base64;
use jms_core::ssh::{SshRenderOptions, tcl_escape};
use jms_core::{
    ConnectionInfo, JmsErrorKind, LaunchArtifact, Protocol, ProtocolHandler, QualityProfile,
    parse_config_string,
};
use serde_json::json;

fn jms_url(envelope: &serde_json::Value) -> String {
    format!("jms://{}", encode_base64(envelope.to_string().as_bytes()))
}

fn rdp_envelope(config: &str) -> serde_json::Value {
    json!({
        "filename": "f",
        "protocol": "rdp",
        "username": "u",
        "token": "t",
        "config": config,
    })
}

fn ssh_envelope(token: &serde_json::Value) -> serde_json::Value {
    json!({
        "filename": "jumpserver-ssh",
        "protocol": "ssh",
        "username": "u",
        "token": token.to_string(),
        "config": "ssh",
    })
}

const RDP_CONFIG: &str = "full address:s:h.example.com:3389\nusername:s:alice\nsession bpp:i:32";

#[test]
fn rdp_url_extracts_connection_info() {
    let handler = ProtocolHandler::default();
    let resolved = handler.resolve(&jms_url(&rdp_envelope(RDP_CONFIG))).unwrap();

    let ConnectionInfo::Rdp(info) = resolved.info else {
        panic!("expected RDP connection info");
    };
    assert_eq!(info.full_address, "h.example.com:3389");
    assert_eq!(info.username, "alice");
    assert_eq!(info.session_bpp, Some(32));
    assert_eq!(info.audio_mode, None);
    assert!(info.additional_config.is_empty());
}

#[test]
fn rdp_artifact_round_trips_through_parser() {
    let config = format!("{RDP_CONFIG}\ndrivestoredirect:s:*\nredirectclipboard:i:1");
    let handler = ProtocolHandler::new(StaticDisplayProvider::new(
        DisplayConfiguration::new(2560, 1440),
    ));
    let artifact = handler.handle_url(&jms_url(&rdp_envelope(&config))).unwrap();
    let LaunchArtifact::Rdp { filename, content } = artifact else {
        panic!("expected RDP artifact");
    };
    assert_eq!(filename, "f");

    let map = parse_config_string(&content).unwrap();
    assert_eq!(map["full address"], "h.example.com:3389");
    assert_eq!(map["username"], "alice");
    assert_eq!(map["desktopwidth"], "2560");
    assert_eq!(map["desktopheight"], "1440");
    assert_eq!(map["drivestoredirect"], "*");
    assert_eq!(map["redirectclipboard"], "1");
    assert!(content.contains("drivestoredirect:s:*"));
    assert!(content.contains("redirectclipboard:i:1"));
    assert!(!content.ends_with('\n'));
}

#[test]
fn rdp_profile_changes_output() {
    let url = jms_url(&rdp_envelope(RDP_CONFIG));
    let render = |profile: QualityProfile| {
        let LaunchArtifact::Rdp { content, .. } = ProtocolHandler::default()
            .with_profile(profile)
            .handle_url(&url)
            .unwrap()
        else {
            panic!("expected RDP artifact");
        };
        content
    };

    let performance = render(QualityProfile::Performance);
    let quality = render(QualityProfile::Quality);
    assert_ne!(performance, quality);
    assert!(performance.contains("disable wallpaper:i:1"));
    assert!(quality.contains("disable wallpaper:i:0"));
}

#[test]
fn ssh_password_with_quote_is_escaped() {
    let token = json!({
        "ip": "10.0.0.5",
        "port": "22",
        "username": "bob",
        "password": "p@ss\"",
    });
    let handler =
        ProtocolHandler::default().with_ssh_options(SshRenderOptions::automated(30));
    let LaunchArtifact::Ssh { command } = handler.handle_url(&jms_url(&ssh_envelope(&token))).unwrap()
    else {
        panic!("expected SSH artifact");
    };

    assert!(command.contains("-p 22"));
    assert!(command.contains("bob@10.0.0.5"));
    assert!(command.contains(&tcl_escape("p@ss\"")));
    assert!(!command.contains("\"p@ss\"\\r\""));
}

#[test]
fn ssh_numeric_port_is_accepted() {
    let token = json!({
        "ip": "10.0.0.5",
        "port": 2222,
        "username": "bob",
        "password": "pw",
    });
    let artifact = ProtocolHandler::default()
        .handle_url(&jms_url(&ssh_envelope(&token)))
        .unwrap();
    assert_eq!(
        artifact,
        LaunchArtifact::Ssh {
            command: "ssh -p 2222 -- bob@10.0.0.5".into()
        }
    );
}

#[test]
fn ssh_incomplete_token_is_missing_info() {
    let token = json!({ "ip": "10.0.0.5", "port": "22", "username": "bob" });
    let err = ProtocolHandler::default()
        .handle_url(&jms_url(&ssh_envelope(&token)))
        .unwrap_err();
    assert_eq!(err.kind(), JmsErrorKind::MissingConnectionInfo);
}

#[test]
fn invalid_base64_is_invalid_url() {
    let err = ProtocolHandler::default()
        .handle_url("jms://not-base64!!")
        .unwrap_err();
    assert_eq!(err.kind(), JmsErrorKind::InvalidUrl);
}

#[test]
fn wrong_scheme_is_invalid_url() {
    let err = ProtocolHandler::default()
        .handle_url("rdp://eyJhIjoxfQ==")
        .unwrap_err();
    assert_eq!(err.kind(), JmsErrorKind::InvalidUrl);
}

#[test]
fn missing_type_tag_is_config_error() {
    let url = jms_url(&rdp_envelope("full address:h.example.com:3389\nusername:s:alice"));
    let err = ProtocolHandler::default().handle_url(&url).unwrap_err();
    assert_eq!(err.kind(), JmsErrorKind::ConfigParsingFailed);
}

#[test]
fn missing_rdp_username_is_missing_info() {
    let url = jms_url(&rdp_envelope("full address:s:h.example.com:3389"));
    let err = ProtocolHandler::default().handle_url(&url).unwrap_err();
    assert_eq!(err.kind(), JmsErrorKind::MissingConnectionInfo);
}

#[test]
fn unknown_protocol_is_rejected() {
    let mut envelope = rdp_envelope(RDP_CONFIG);
    envelope["protocol"] = json!("vnc");
    let err = ProtocolHandler::default()
        .handle_url(&jms_url(&envelope))
        .unwrap_err();
    assert_eq!(err.kind(), JmsErrorKind::UnsupportedProtocol);
}

#[test]
fn missing_envelope_field_is_named() {
    let mut envelope = rdp_envelope(RDP_CONFIG);
    envelope.as_object_mut().unwrap().remove("username");
    let err = ProtocolHandler::default()
        .handle_url(&jms_url(&envelope))
        .unwrap_err();
    assert_eq!(err.kind(), JmsErrorKind::MissingRequiredField);
    assert!(err.to_string().contains("username"));
}

#[test]
fn protocol_is_case_insensitive() {
    let mut envelope = rdp_envelope(RDP_CONFIG);
    envelope["protocol"] = json!("RDP");
    let resolved = ProtocolHandler::default()
        .resolve(&jms_url(&envelope))
        .unwrap();
    assert_eq!(resolved.info.protocol(), Protocol::Rdp);
    let ConnectionInfo::Rdp(info) = extract_connection_info(&resolved.config).unwrap() else {
        panic!("expected RDP connection info");
    };
    assert_eq!(info.full_address, "h.example.com:3389");
}

#[test]
fn handler_is_reusable() {
    let handler = ProtocolHandler::default();
    let url = jms_url(&rdp_envelope(RDP_CONFIG));
    let first = handler.handle_url(&url).unwrap();
    assert!(handler.handle_url("jms://").is_err());
    assert_eq!(handler.handle_url(&url).unwrap(), first);
}
