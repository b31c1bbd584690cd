//! `jms://` URL validation
//!
//! Checks the scheme and pulls the base64 payload out of the authority
//! segment. The payload is syntax-checked here so that obviously malformed
//! input fails with [`JmsError::InvalidUrl`] before any decoding is attempted.

use url::Url;

use crate::error::{JmsError, JmsResult};

/// The only scheme this handler accepts
pub const JMS_SCHEME: &str = "jms";

/// A validated `jms://` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JmsUrlComponents {
    /// Lower-cased scheme, always `jms`
    pub scheme: String,
    /// Syntactically valid standard base64 payload
    pub encoded_payload: String,
}

impl JmsUrlComponents {
    /// Length of the encoded payload in bytes
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.encoded_payload.len()
    }
}

/// Parses and validates a `jms://<base64>` URL.
///
/// The payload is read from the host segment. Standard base64 may contain
/// `/`, which a URL parser treats as the start of the path, so any path that
/// follows the host is appended back onto the payload. A lone trailing `/`
/// is ignored.
///
/// # Errors
///
/// Returns [`JmsError::InvalidUrl`] if the string is not a URL, the scheme is
/// not `jms` (case-insensitive), the host segment is empty, or the payload is
/// not syntactically valid base64.
pub fn parse_url(raw: &str) -> JmsResult<JmsUrlComponents> {
    let url = Url::parse(raw.trim()).map_err(|e| JmsError::InvalidUrl(format!("{e}")))?;

    // Url lower-cases the scheme while parsing
    if url.scheme() != JMS_SCHEME {
        return Err(JmsError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    let host = url.host_str().unwrap_or_default();
    if host.is_empty() {
        return Err(JmsError::InvalidUrl("missing encoded payload".to_string()));
    }

    let mut payload = host.to_string();
    let path = url.path();
    if !path.is_empty() && path != "/" {
        payload.push_str(path);
    }

    if !is_valid_base64(&payload) {
        tracing::debug!(payload_len = payload.len(), "Payload failed base64 syntax check");
        return Err(JmsError::InvalidUrl(
            "payload is not valid base64".to_string(),
        ));
    }

    Ok(JmsUrlComponents {
        scheme: url.scheme().to_string(),
        encoded_payload: payload,
    })
}

/// Returns `true` if `url` is a `jms://` URL carrying a well-formed payload
#[must_use]
pub fn is_jms_url(url: &str) -> bool {
    parse_url(url).is_ok()
}

/// Syntactic check for standard (RFC 4648 §4) base64.
///
/// Accepts only `A-Z a-z 0-9 + /`, requires a non-empty length that is a
/// multiple of four, and allows at most two `=` which must all sit at the end.
/// This does not check that the final symbol's unused bits are zero; that is
/// left to the decoder.
#[must_use]
pub fn is_valid_base64(s: &str) -> bool {
    if s.is_empty() || s.len() % 4 != 0 {
        return false;
    }

    let bytes = s.as_bytes();
    let padding = bytes.iter().rev().take_while(|&&b| b == b'=').count();
    if padding > 2 {
        return false;
    }

    bytes[..bytes.len() - padding]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}
