//! Response body decoding.
//!
//! The portal serves windows-1251 from some hosts regardless of what the
//! headers say, so the encoding is chosen once per response from the request
//! host and the declared content type, and the whole body is decoded with it.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use reqwest::Url;

use crate::error::{HarvesterError, Result};

/// Extract the `charset` parameter from a `Content-Type` value.
///
/// # Examples
/// ```
/// use ruslaw_harvester::encoding::charset_label;
///
/// assert_eq!(charset_label("text/html; charset=windows-1251"), Some("windows-1251"));
/// assert_eq!(charset_label("text/plain"), None);
/// ```
pub fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"').trim();
            (!value.is_empty()).then_some(value)
        } else {
            None
        }
    })
}

/// Whether the URL's host is one of (or a subdomain of) the legacy hosts.
pub fn is_legacy_host(url: &str, legacy_hosts: &[String]) -> bool {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };

    legacy_hosts.iter().any(|legacy| {
        let legacy = legacy.to_ascii_lowercase();
        host == legacy || host.ends_with(&format!(".{legacy}"))
    })
}

/// Choose the encoding for a response body.
///
/// windows-1251 wins when the host is a known legacy host or the declared
/// charset names it; otherwise the declared charset is used if recognized,
/// falling back to UTF-8.
pub fn select_encoding(
    url: &str,
    content_type: Option<&str>,
    legacy_hosts: &[String],
) -> &'static Encoding {
    let declared = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    if declared == Some(WINDOWS_1251) || is_legacy_host(url, legacy_hosts) {
        return WINDOWS_1251;
    }

    declared.unwrap_or(UTF_8)
}

/// Decode a whole body with the given encoding.
///
/// Malformed input is an error; nothing is replaced or partially decoded.
pub fn decode_body(bytes: &[u8], encoding: &'static Encoding, url: &str) -> Result<String> {
    let bytes = if encoding == UTF_8 {
        bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
    } else {
        bytes
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| HarvesterError::Encoding {
            url: url.to_string(),
            encoding: encoding.name(),
        })
}
