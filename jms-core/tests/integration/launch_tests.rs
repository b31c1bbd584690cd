//! Launchers driven by pipeline output

use std::time::Duration;

use jms_core::config::HandlerSettings;
use jms_core::payload::encode_base64;
use jms_core::{LaunchArtifact, Launcher, ProtocolHandler, RecordingLauncher, SystemLauncher};

fn rdp_url() -> String {
    let envelope = serde_json::json!({
        "filename": "prod/web-01",
        "protocol": "rdp",
        "username": "u",
        "token": "t",
        "config": "full address:s:h:3389\nusername:s:alice",
    });
    format!("jms://{}", encode_base64(envelope.to_string().as_bytes()))
}

#[tokio::test]
async fn recording_launcher_keeps_order() {
    let launcher = RecordingLauncher::new();
    let artifact = ProtocolHandler::default().handle_url(&rdp_url()).unwrap();
    let ssh = LaunchArtifact::Ssh {
        command: "ssh -p 22 -- bob@10.0.0.5".into(),
    };

    launcher.launch(&artifact).await.unwrap();
    launcher.launch(&ssh).await.unwrap();

    let records = launcher.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].artifact, artifact);
    assert_eq!(records[1].artifact, ssh);
    assert!(records[0].at <= records[1].at);
}

#[cfg(unix)]
#[tokio::test]
async fn system_launcher_opens_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = HandlerSettings::default();
    settings.rdp.opener = "true".into();
    settings.rdp.output_dir = Some(dir.path().to_path_buf());

    let launcher = SystemLauncher::from_settings(&settings, None)
        .with_cleanup_delay(Duration::from_millis(20));
    let artifact = ProtocolHandler::default().handle_url(&rdp_url()).unwrap();
    let outcome = launcher.launch(&artifact).await.unwrap();

    let path = outcome.file.clone().unwrap();
    assert_eq!(path, dir.path().join("prod_web-01.rdp"));
    assert!(path.exists());
    assert!(outcome.has_pending_cleanup());

    outcome.wait_for_cleanup().await;
    assert!(!path.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn failing_opener_reports_status() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = SystemLauncher::new(dir.path().to_path_buf()).with_opener("false", Vec::new());
    let artifact = ProtocolHandler::default().handle_url(&rdp_url()).unwrap();
    let err = launcher.launch(&artifact).await.unwrap_err();
    assert!(matches!(err, jms_core::LaunchError::ProgramFailed { .. }));
    assert!(!dir.path().join("prod_web-01.rdp").exists());
}
