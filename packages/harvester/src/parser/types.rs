//! Types for the structural parser.

/// Classification of one trimmed input line.
///
/// Variants are listed in the priority order the classifier applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty line.
    Blank,

    /// Start of an appendix (`Приложение ...`); suppresses text until the next article.
    Appendix,

    /// `Статья <n>[.<m>][.] [rest]`.
    ArticleStart {
        /// Article number, e.g. "5" or "12.1".
        number: &'a str,

        /// Trailing text on the same line, possibly empty.
        rest: &'a str,
    },

    /// Chapter, section, part or subsection heading. Discarded.
    Heading,

    /// Anything else.
    Text(&'a str),
}
