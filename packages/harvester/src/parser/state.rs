//! Parser state machine.

use super::strategy::TitleStrategy;
use super::types::LineKind;
use crate::text::collapse_blank_lines;
use crate::types::Provision;

/// Lines collected for the article currently being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleAccumulator {
    number: String,
    title: String,
    lines: Vec<String>,
}

impl ArticleAccumulator {
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: String::new(),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Paragraph separator; ignored until the body has at least one line.
    pub fn push_blank(&mut self) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    /// Turn the accumulated lines into a provision.
    ///
    /// Returns `None` when the body is empty after trimming. The position is
    /// left at 0; the engine assigns positions after merging duplicates.
    #[must_use]
    pub fn finish(self) -> Option<Provision> {
        let body = collapse_blank_lines(self.lines.join("\n").trim());
        if body.is_empty() {
            return None;
        }
        Some(Provision::new(self.number, self.title, body, 0))
    }
}

/// Where the parser is within the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Before the first article, or after an article whose start was suppressed.
    #[default]
    Idle,

    /// Reading an article.
    InArticle(ArticleAccumulator),

    /// Inside an appendix; everything is dropped until the next article start.
    InAppendix,
}

impl ParserState {
    /// Consume one classified line.
    ///
    /// Returns the next state and the provision completed by this line, if any.
    pub fn step<S: TitleStrategy + ?Sized>(
        self,
        line: LineKind<'_>,
        titles: &S,
    ) -> (Self, Option<Provision>) {
        match (self, line) {
            (Self::InArticle(mut acc), LineKind::Blank) => {
                acc.push_blank();
                (Self::InArticle(acc), None)
            }
            (state, LineKind::Blank) => (state, None),

            (state, LineKind::Appendix) => (Self::InAppendix, state.finish()),

            (state, LineKind::ArticleStart { number, rest }) => {
                let completed = state.finish();
                let mut acc = ArticleAccumulator::new(number);
                if !rest.is_empty() {
                    if titles.is_title(rest) {
                        acc.set_title(rest);
                    } else {
                        acc.push_line(rest);
                    }
                }
                (Self::InArticle(acc), completed)
            }

            (state, LineKind::Heading) => (state, None),

            (Self::InArticle(mut acc), LineKind::Text(text)) => {
                acc.push_line(text);
                (Self::InArticle(acc), None)
            }
            (state, LineKind::Text(_)) => (state, None),
        }
    }

    /// Flush whatever article is in progress.
    #[must_use]
    pub fn finish(self) -> Option<Provision> {
        match self {
            Self::InArticle(acc) => acc.finish(),
            Self::Idle | Self::InAppendix => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::strategy::HeuristicTitleStrategy;

    fn feed(state: ParserState, lines: &[LineKind<'_>]) -> (ParserState, Vec<Provision>) {
        let titles = HeuristicTitleStrategy::default();
        let mut done = Vec::new();
        let mut state = state;
        for line in lines {
            let (next, completed) = state.step(*line, &titles);
            state = next;
            done.extend(completed);
        }
        (state, done)
    }

    #[test]
    fn test_idle_ignores_text_and_headings() {
        let (state, done) = feed(
            ParserState::Idle,
            &[LineKind::Text("Преамбула"), LineKind::Heading, LineKind::Blank],
        );
        assert_eq!(state, ParserState::Idle);
        assert!(done.is_empty());
    }

    #[test]
    fn test_article_start_sets_title() {
        let (state, done) = feed(
            ParserState::Idle,
            &[LineKind::ArticleStart {
                number: "1",
                rest: "Основы",
            }],
        );
        assert!(done.is_empty());
        let ParserState::InArticle(acc) = state else {
            panic!("expected InArticle");
        };
        assert_eq!(acc.number(), "1");
        assert_eq!(acc.title, "Основы");
    }

    #[test]
    fn test_article_start_sentence_becomes_body() {
        let (state, _) = feed(
            ParserState::Idle,
            &[LineKind::ArticleStart {
                number: "2",
                rest: "Человек является высшей ценностью.",
            }],
        );
        let provision = state.finish().unwrap();
        assert_eq!(provision.title, "");
        assert_eq!(provision.body, "Человек является высшей ценностью.");
    }

    #[test]
    fn test_next_article_flushes_previous() {
        let (_, done) = feed(
            ParserState::Idle,
            &[
                LineKind::ArticleStart { number: "1", rest: "" },
                LineKind::Text("Первый"),
                LineKind::ArticleStart { number: "2", rest: "" },
            ],
        );
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].number, "1");
        assert_eq!(done[0].body, "Первый");
    }

    #[test]
    fn test_appendix_flushes_and_suppresses() {
        let (state, done) = feed(
            ParserState::Idle,
            &[
                LineKind::ArticleStart { number: "1", rest: "" },
                LineKind::Text("Текст"),
                LineKind::Appendix,
                LineKind::Text("Форма заявления"),
            ],
        );
        assert_eq!(state, ParserState::InAppendix);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].body, "Текст");
    }

    #[test]
    fn test_blank_lines_are_paragraph_separators() {
        let (state, _) = feed(
            ParserState::Idle,
            &[
                LineKind::ArticleStart { number: "1", rest: "" },
                LineKind::Blank,
                LineKind::Text("a"),
                LineKind::Blank,
                LineKind::Blank,
                LineKind::Blank,
                LineKind::Text("b"),
                LineKind::Blank,
            ],
        );
        assert_eq!(state.finish().unwrap().body, "a\n\nb");
    }

    #[test]
    fn test_empty_article_is_discarded() {
        let acc = ArticleAccumulator::new("3");
        assert!(acc.finish().is_none());
    }
}
