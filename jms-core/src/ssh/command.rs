//! SSH command rendering
//!
//! Produces either a bare `ssh` invocation or an `expect -c` one-liner that
//! answers the password prompt. Every piece of connection data passes
//! through the escaping helpers below before it is interpolated.

use secrecy::ExposeSecret;

use crate::models::SshConnectionInfo;

/// Default seconds `expect` waits for a prompt
pub const DEFAULT_AUTOMATION_TIMEOUT_SECS: u32 = 30;

/// How the SSH command should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SshRenderOptions {
    /// Wrap the command in an `expect` script that types the password
    pub automate_password: bool,
    /// Prompt timeout for the `expect` script
    pub timeout_secs: u32,
}

impl Default for SshRenderOptions {
    fn default() -> Self {
        Self {
            automate_password: false,
            timeout_secs: DEFAULT_AUTOMATION_TIMEOUT_SECS,
        }
    }
}

impl SshRenderOptions {
    /// Options for a bare command
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    /// Options for password automation with the given timeout
    #[must_use]
    pub const fn automated(timeout_secs: u32) -> Self {
        Self {
            automate_password: true,
            timeout_secs,
        }
    }
}

/// Renders the command for `info`.
#[must_use]
pub fn render_ssh(info: &SshConnectionInfo, options: &SshRenderOptions) -> String {
    let command = if options.automate_password {
        expect_command(info, options.timeout_secs)
    } else {
        plain_command(info)
    };
    tracing::debug!(
        automated = options.automate_password,
        port = %info.port,
        "Rendered SSH command"
    );
    command
}

/// `ssh -p <port> -- <user@ip>`, quoting the destination when needed.
///
/// The `--` keeps a destination that starts with `-` from being read as an
/// ssh option.
#[must_use]
pub fn plain_command(info: &SshConnectionInfo) -> String {
    format!(
        "ssh -p {} -- {}",
        shell_quote_if_needed(&info.port),
        shell_quote_if_needed(&info.destination())
    )
}

/// The Tcl script run by `expect`
#[must_use]
pub fn expect_script(info: &SshConnectionInfo, timeout_secs: u32) -> String {
    // extracted ports are digits only, so the port stays unquoted
    let port = tcl_escape(&info.port);
    let destination = tcl_escape(&info.destination());
    let password = tcl_escape(info.password.expose_secret());
    format!(
        "set timeout {timeout_secs}\n\
         spawn ssh -p {port} -- \"{destination}\"\n\
         expect {{\n\
         \x20   \"(yes/no\" {{send \"yes\\r\"; exp_continue}}\n\
         \x20   -nocase \"password:\" {{send -- \"{password}\\r\"}}\n\
         \x20   timeout {{exit 1}}\n\
         \x20   eof {{exit 0}}\n\
         }}\n\
         interact"
    )
}

/// `expect -c '<script>'`
#[must_use]
pub fn expect_command(info: &SshConnectionInfo, timeout_secs: u32) -> String {
    format!("expect -c {}", shell_single_quote(&expect_script(info, timeout_secs)))
}

/// Escapes text for a double-quoted Tcl string: `\ " $ [ ] { }`.
///
/// Braces are escaped because the password action sits inside brace-quoted
/// words, where Tcl skips backslash-escaped braces when matching.
#[must_use]
pub fn tcl_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | '$' | '[' | ']' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wraps text in POSIX single quotes, writing `'` as `'\''`
#[must_use]
pub fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Leaves shell-safe words untouched and single-quotes anything else
#[must_use]
pub fn shell_quote_if_needed(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | ':' | '-'));
    if safe {
        value.to_string()
    } else {
        shell_single_quote(value)
    }
}
