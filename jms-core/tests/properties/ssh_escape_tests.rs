//! Property tests for SSH command quoting
//!
//! The helpers below follow POSIX single-quote rules and Tcl word grouping
//! closely enough to check that nothing in a credential can break out of its
//! quoting.

use jms_core::models::SshConnectionInfo;
use jms_core::ssh::{
    SshRenderOptions, expect_script, render_ssh, shell_quote_if_needed, shell_single_quote,
    tcl_escape,
};
use proptest::prelude::*;
use secrecy::SecretString;

/// Reverses `shell_single_quote`, or `None` if the text would not survive a
/// POSIX shell as a single word
fn shell_unquote(quoted: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = quoted.chars().peekable();
    let mut words = 0;
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                words += 1;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        inner => out.push(inner),
                    }
                }
            }
            '\\' => out.push(chars.next()?),
            _ => return None,
        }
    }
    (words > 0).then_some(out)
}

/// Splits Tcl source into words the way the Tcl parser groups them: braces
/// nest and skip backslash-escaped braces, double quotes end at an unescaped
/// quote. Word contents are returned raw. `None` means the text would not
/// parse, e.g. unbalanced braces or characters after a closing brace.
fn tcl_words(text: &str) -> Option<Vec<String>> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut i = 0;
    loop {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i == chars.len() {
            return Some(words);
        }

        let mut word = String::new();
        match chars[i] {
            '{' => {
                let mut depth = 1;
                i += 1;
                loop {
                    let c = *chars.get(i)?;
                    i += 1;
                    match c {
                        '\\' => {
                            word.push(c);
                            word.push(*chars.get(i)?);
                            i += 1;
                            continue;
                        }
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    word.push(c);
                }
            }
            '"' => {
                i += 1;
                loop {
                    let c = *chars.get(i)?;
                    i += 1;
                    match c {
                        '\\' => {
                            word.push(c);
                            word.push(*chars.get(i)?);
                            i += 1;
                        }
                        '"' => break,
                        _ => word.push(c),
                    }
                }
            }
            _ => {
                while i < chars.len() && !chars[i].is_whitespace() {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        word.push(chars[i]);
                        i += 1;
                    }
                    word.push(chars[i]);
                    i += 1;
                }
            }
        }

        if i < chars.len() && !chars[i].is_whitespace() {
            return None;
        }
        words.push(word);
    }
}

fn info(username: &str, password: &str) -> SshConnectionInfo {
    SshConnectionInfo {
        ip: "10.0.0.5".into(),
        port: "22".into(),
        username: username.into(),
        password: SecretString::from(password.to_string()),
        filename: "f".into(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Single-quoting survives any printable input
    #[test]
    fn single_quote_roundtrips(value in "[ -~]{0,40}") {
        let quoted = shell_single_quote(&value);
        prop_assert_eq!(shell_unquote(&quoted), Some(value));
    }

    /// Quoting only happens when needed, and then it is reversible
    #[test]
    fn quote_if_needed_is_minimal(value in "[ -~]{1,40}") {
        let quoted = shell_quote_if_needed(&value);
        if quoted == value {
            prop_assert!(value.chars().all(|c| c.is_ascii_alphanumeric() || "@._:-".contains(c)));
        } else {
            prop_assert_eq!(shell_unquote(&quoted), Some(value));
        }
    }

    /// Escaped text has no special character without a backslash before it
    #[test]
    fn tcl_escape_leaves_no_bare_specials(value in "[ -~]{0,40}") {
        let escaped = tcl_escape(&value);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                prop_assert!(chars.next().is_some());
            } else {
                prop_assert!(!"\"$[]{}".contains(c), "bare {:?} in {:?}", c, escaped);
            }
        }
    }

    /// No credential changes the shape of the expect script: the same
    /// commands, the same four pattern/action pairs, and a three-word send
    #[test]
    fn expect_script_keeps_its_structure(username in "[ -~]{1,20}", password in "[ -~]{1,30}") {
        let info = info(&username, &password);
        let script = expect_script(&info, 30);

        let words = tcl_words(&script).unwrap();
        prop_assert_eq!(words.len(), 12, "{:?}", words);
        prop_assert_eq!(&words[..8], &["set", "timeout", "30", "spawn", "ssh", "-p", "22", "--"]);
        prop_assert_eq!(&words[8], &tcl_escape(&info.destination()));
        prop_assert_eq!(&words[9], "expect");
        prop_assert_eq!(&words[11], "interact");

        let body = tcl_words(&words[10]).unwrap();
        prop_assert_eq!(body.len(), 9, "{:?}", body);
        prop_assert_eq!(&body[0], "(yes/no");
        prop_assert_eq!(&body[2], "-nocase");
        prop_assert_eq!(&body[3], "password:");
        prop_assert_eq!(&body[4], &format!("send -- \"{}\\r\"", tcl_escape(&password)));
        prop_assert_eq!(&body[5..], &["timeout", "exit 1", "eof", "exit 0"]);

        let send = tcl_words(&body[4]).unwrap();
        prop_assert_eq!(send.len(), 3);
    }

    /// The automated command is one shell word after `expect -c`
    #[test]
    fn automated_command_is_single_word(username in "[ -~]{1,20}", password in "[ -~]{1,20}") {
        let command = render_ssh(&info(&username, &password), &SshRenderOptions::automated(15));
        let script = command.strip_prefix("expect -c ").unwrap();
        let unquoted = shell_unquote(script).unwrap();
        prop_assert_eq!(unquoted, expect_script(&info(&username, &password), 15));
    }

    /// The bare command never contains the password
    #[test]
    fn plain_command_omits_password(password in "[a-zA-Z0-9]{12,20}") {
        let command = render_ssh(&info("bob", &password), &SshRenderOptions::plain());
        prop_assert!(!command.contains(&password));
        prop_assert_eq!(command, "ssh -p 22 -- bob@10.0.0.5");
    }

    /// Whatever the username, the destination follows the option terminator
    #[test]
    fn destination_follows_option_terminator(username in "-[ -~]{0,20}") {
        let command = render_ssh(&info(&username, "pw"), &SshRenderOptions::plain());
        let destination = command.strip_prefix("ssh -p 22 -- ").unwrap();
        let unquoted = shell_unquote(destination).unwrap_or_else(|| destination.to_string());
        prop_assert_eq!(unquoted, format!("{username}@10.0.0.5"));
    }
}
