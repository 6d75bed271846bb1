//! Text normalization for decoded portal documents.

use std::sync::LazyLock;

use html2text::render::TrivialDecorator;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{HarvesterError, Result};

/// Opening cross-reference tag the portal wraps around citations.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REF_OPEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<ref\s+nd="[^"]*">\s*"#).expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REF_CLOSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*</ref>").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HTML_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SPACE_RUN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BLANK_RUN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Line width handed to the markup renderer. Wide enough that statute
/// paragraphs are never wrapped into lines that look like article markers.
const MARKUP_RENDER_WIDTH: usize = 100_000;

/// Collapse runs of three or more newlines into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_PATTERN.replace_all(text, "\n\n").into_owned()
}

/// Normalize decoded document text before parsing.
///
/// Removes cross-reference and other markup tags, folds non-breaking, em and
/// en spaces into plain spaces, collapses space runs and blank-line runs,
/// converts CRLF to LF and applies Unicode NFC.
///
/// # Examples
/// ```
/// use ruslaw_harvester::text::clean_text;
///
/// let raw = "Статья\u{00A0}1.  <ref nd=\"102\">Основы</ref>\r\n\r\n\r\n\r\nТекст";
/// assert_eq!(clean_text(raw), "Статья 1. Основы\n\nТекст");
/// ```
pub fn clean_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = REF_OPEN_PATTERN.replace_all(&text, "");
    let text = REF_CLOSE_PATTERN.replace_all(&text, "");
    let text = HTML_TAG_PATTERN.replace_all(&text, "");
    let text = text.replace(['\u{00A0}', '\u{2003}', '\u{2002}'], " ");
    let text = SPACE_RUN_PATTERN.replace_all(&text, " ");
    let text = collapse_blank_lines(&text);

    text.trim().nfc().collect()
}

/// Convert a rendered HTML document into plain text lines.
///
/// Block elements become separate lines and entities are decoded by the
/// HTML parser; script and style content is dropped. The result still needs
/// [`clean_text`]; only structure is recovered here.
pub fn strip_markup(html: &str) -> Result<String> {
    html2text::from_read_with_decorator(html.as_bytes(), MARKUP_RENDER_WIDTH, TrivialDecorator::new())
        .map_err(|e| HarvesterError::Markup(e.to_string()))
}
