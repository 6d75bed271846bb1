//! Structural parser for Russian statute text.
//!
//! Cleaned document text is classified line by line (article starts,
//! structural headings, appendix markers, body text) and fed through an
//! explicit state machine that accumulates one article at a time. Repeated
//! article numbers are merged and positions renumbered at the end.

mod engine;
mod markers;
mod state;
mod strategy;
mod types;

pub use engine::{parse, ProvisionParser};
pub use markers::classify_line;
pub use state::{ArticleAccumulator, ParserState};
pub use strategy::{HeuristicTitleStrategy, TitleStrategy, DEFAULT_MAX_TITLE_CHARS};
pub use types::LineKind;
