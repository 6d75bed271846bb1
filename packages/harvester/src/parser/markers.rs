//! Line markers used by Russian federal statutes.

use std::sync::LazyLock;

use regex::Regex;

use super::types::LineKind;

/// `Статья 5.`, `Статья 12.1. Заголовок`, `Статья 6` (period missing).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Статья\s+(\d+(?:\.\d+)?)\b[.\s]*(.*)$").expect("valid regex")
});

/// Structural headings above article level, with Arabic or Roman numbering.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Глава|Раздел|Часть|Подраздел)\s+[\dIVXLCDM]+").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static APPENDIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Приложение\b").expect("valid regex"));

/// Classify a single line. The line is expected to be trimmed already.
///
/// # Examples
/// ```
/// use ruslaw_harvester::parser::{classify_line, LineKind};
///
/// assert_eq!(
///     classify_line("Статья 12.1. Право на жизнь"),
///     LineKind::ArticleStart { number: "12.1", rest: "Право на жизнь" }
/// );
/// assert_eq!(classify_line("Глава 2"), LineKind::Heading);
/// ```
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }

    if APPENDIX_PATTERN.is_match(line) {
        return LineKind::Appendix;
    }

    if let Some(caps) = ARTICLE_PATTERN.captures(line) {
        if let Some(number) = caps.get(1) {
            let rest = caps.get(2).map_or("", |m| m.as_str().trim());
            return LineKind::ArticleStart {
                number: number.as_str(),
                rest,
            };
        }
    }

    if HEADING_PATTERN.is_match(line) {
        return LineKind::Heading;
    }

    LineKind::Text(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start<'a>(number: &'a str, rest: &'a str) -> LineKind<'a> {
        LineKind::ArticleStart { number, rest }
    }

    #[test]
    fn test_article_start_variants() {
        assert_eq!(classify_line("Статья 5. Right to privacy"), start("5", "Right to privacy"));
        assert_eq!(classify_line("Статья 6."), start("6", ""));
        assert_eq!(classify_line("Статья 7"), start("7", ""));
        assert_eq!(classify_line("Статья 12.1. Заголовок"), start("12.1", "Заголовок"));
        assert_eq!(classify_line("Статья 12.1 Заголовок"), start("12.1", "Заголовок"));
        assert_eq!(classify_line("Статья  3.Текст"), start("3", "Текст"));
    }

    #[test]
    fn test_not_article_start() {
        assert_eq!(classify_line("Статьями 5 и 6"), LineKind::Text("Статьями 5 и 6"));
        assert_eq!(classify_line("Статья пятая"), LineKind::Text("Статья пятая"));
        assert_eq!(classify_line("См. Статья 5."), LineKind::Text("См. Статья 5."));
    }

    #[test]
    fn test_headings() {
        assert_eq!(classify_line("Глава 1. Основы конституционного строя"), LineKind::Heading);
        assert_eq!(classify_line("РАЗДЕЛ II"), LineKind::Heading);
        assert_eq!(classify_line("Часть 3"), LineKind::Heading);
        assert_eq!(classify_line("Подраздел 1. Общие положения"), LineKind::Heading);
        assert_eq!(classify_line("Глава первая"), LineKind::Text("Глава первая"));
    }

    #[test]
    fn test_appendix_and_blank() {
        assert_eq!(classify_line("Приложение N 1"), LineKind::Appendix);
        assert_eq!(classify_line("ПРИЛОЖЕНИЕ"), LineKind::Appendix);
        assert_eq!(classify_line("Приложения к закону"), LineKind::Text("Приложения к закону"));
        assert_eq!(classify_line(""), LineKind::Blank);
    }
}
