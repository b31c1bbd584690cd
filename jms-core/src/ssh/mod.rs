//! SSH command generation

mod command;

pub use command::{
    DEFAULT_AUTOMATION_TIMEOUT_SECS, SshRenderOptions, expect_command, expect_script,
    plain_command, render_ssh, shell_quote_if_needed, shell_single_quote, tcl_escape,
};
