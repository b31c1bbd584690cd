//! Property test modules

mod display_settings_tests;
mod rdp_config_tests;
mod ssh_escape_tests;
mod tracing_tests;
