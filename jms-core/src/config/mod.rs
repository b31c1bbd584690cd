//! Handler configuration
//!
//! [`ConfigManager`] loads [`HandlerSettings`] from a TOML file. The file is
//! optional; every section falls back to defaults.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_ENV, ConfigManager};
pub use settings::{
    DEFAULT_CLEANUP_DELAY_SECS, HandlerSettings, LoggingSettings, RdpSettings, SshSettings,
};
