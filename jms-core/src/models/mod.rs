//! Data records that flow through the handler

mod connection;
mod display;
mod quality;

pub use connection::{
    ConnectionInfo, DEFAULT_RDP_PORT, JmsConfig, Protocol, RdpConnectionInfo, SshConnectionInfo,
};
pub use display::{
    DisplayConfiguration, DisplayProvider, MAX_SESSION_HEIGHT, MAX_SESSION_WIDTH,
    StaticDisplayProvider,
};
pub use quality::{AudioQuality, QualityProfile, RdpQualitySettings};
