//! Parser engine that drives the state machine over a document.

use std::collections::HashMap;

use super::markers::classify_line;
use super::state::ParserState;
use super::strategy::{HeuristicTitleStrategy, TitleStrategy};
use crate::types::Provision;

/// Splits cleaned statute text into article-level provisions.
#[derive(Debug, Clone, Default)]
pub struct ProvisionParser<S: TitleStrategy = HeuristicTitleStrategy> {
    titles: S,
}

impl ProvisionParser<HeuristicTitleStrategy> {
    /// Parser with the default title heuristic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: TitleStrategy> ProvisionParser<S> {
    #[must_use]
    pub fn with_strategy(titles: S) -> Self {
        Self { titles }
    }

    /// Parse a document.
    ///
    /// Never fails: text without article markers yields an empty list.
    /// Provisions sharing an article number are merged into the first
    /// occurrence, and positions run from 0 without gaps.
    pub fn parse(&self, text: &str) -> Vec<Provision> {
        let mut state = ParserState::Idle;
        let mut provisions = Vec::new();

        for line in text.lines() {
            let (next, completed) = state.step(classify_line(line.trim()), &self.titles);
            state = next;
            provisions.extend(completed);
        }
        provisions.extend(state.finish());

        let provisions = merge_duplicates(provisions);
        tracing::debug!(provisions = provisions.len(), "Parsed document");
        provisions
    }
}

/// Parse with the default title heuristic.
///
/// # Examples
/// ```
/// use ruslaw_harvester::parser::parse;
///
/// let provisions = parse("Статья 1. Общие положения\nНастоящий закон регулирует отношения.");
/// assert_eq!(provisions.len(), 1);
/// assert_eq!(provisions[0].title, "Общие положения");
/// ```
pub fn parse(text: &str) -> Vec<Provision> {
    ProvisionParser::new().parse(text)
}

/// Merge provisions with the same number into the first one, then renumber.
fn merge_duplicates(provisions: Vec<Provision>) -> Vec<Provision> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Provision> = Vec::with_capacity(provisions.len());

    for provision in provisions {
        if let Some(&index) = seen.get(&provision.number) {
            let first = &mut merged[index];
            first.body.push_str("\n\n");
            first.body.push_str(&provision.body);
        } else {
            seen.insert(provision.number.clone(), merged.len());
            merged.push(provision);
        }
    }

    for (position, provision) in merged.iter_mut().enumerate() {
        provision.position = position;
    }
    merged
}
