//! Title detection strategies.

use std::sync::LazyLock;

use regex::Regex;

/// Default upper bound (exclusive) on title length, in characters.
pub const DEFAULT_MAX_TITLE_CHARS: usize = 200;

/// Enumerated sub-items: `1. `, `1) `, `а) `.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ENUMERATED_ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+[.)]|[а-яё]\))\s").expect("valid regex"));

/// Trait for deciding whether the text after an article number is a heading.
///
/// When it is not, the parser treats it as the first body line.
pub trait TitleStrategy {
    fn is_title(&self, rest: &str) -> bool;
}

/// Length and punctuation heuristic.
///
/// Short, non-enumerated text that does not end like a sentence is a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicTitleStrategy {
    max_chars: usize,
}

impl HeuristicTitleStrategy {
    #[must_use]
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for HeuristicTitleStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TITLE_CHARS)
    }
}

impl TitleStrategy for HeuristicTitleStrategy {
    fn is_title(&self, rest: &str) -> bool {
        let rest = rest.trim();
        !rest.is_empty()
            && rest.chars().count() < self.max_chars
            && !ENUMERATED_ITEM_PATTERN.is_match(rest)
            && !rest.ends_with(['.', '!', '?', '…', ';'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_heading_is_title() {
        let strategy = HeuristicTitleStrategy::default();
        assert!(strategy.is_title("Right to privacy"));
        assert!(strategy.is_title("Основы конституционного строя"));
        assert!(strategy.is_title("Сфера действия настоящего Федерального закона"));
    }

    #[test]
    fn test_sentence_is_body() {
        let strategy = HeuristicTitleStrategy::default();
        assert!(!strategy.is_title("Каждый имеет право на жизнь."));
        assert!(!strategy.is_title("Разве это заголовок?"));
        assert!(!strategy.is_title("Исключена;"));
        assert!(!strategy.is_title("и так далее…"));
    }

    #[test]
    fn test_enumerated_item_is_body() {
        let strategy = HeuristicTitleStrategy::default();
        assert!(!strategy.is_title("1. Персональные данные"));
        assert!(!strategy.is_title("2) оператор"));
        assert!(!strategy.is_title("а) обработка"));
        // A number without a following space is not an enumeration marker.
        assert!(strategy.is_title("1.1 Общие понятия"));
    }

    #[test]
    fn test_length_limit_counts_characters() {
        let strategy = HeuristicTitleStrategy::new(10);
        // 9 Cyrillic characters = 18 bytes, still under the limit
        assert!(strategy.is_title("Заголовок"));
        assert!(!strategy.is_title("Заголовок!!"));
        assert!(!strategy.is_title("Длинный заголовок"));
        assert!(!strategy.is_title(""));
    }
}
