//! Document text retrieval.
//!
//! The portal offers each document in two shapes: a save-as-text form that
//! can be parsed directly, and the rendered markup page. The text form is
//! preferred; the markup page is only requested when the text form fails or
//! comes back empty.

use crate::config::{markup_url, text_url};
use crate::error::Result;
use crate::http::Fetcher;
use crate::text::strip_markup;
use crate::types::CatalogEntry;

/// Where document text comes from.
///
/// The orchestrator only talks to this trait, so runs can be driven by a
/// fake source in tests.
pub trait DocumentSource {
    /// Retrieve the plain text of a document. The text is not yet cleaned.
    fn fetch_document(&self, entry: &CatalogEntry) -> Result<String>;

    /// Public URL recorded in the seed record for this document.
    fn source_url(&self, entry: &CatalogEntry) -> String;
}

/// Document source backed by pravo.gov.ru.
#[derive(Debug, Clone)]
pub struct PravoSource {
    fetcher: Fetcher,
    base_url: String,
}

impl PravoSource {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl DocumentSource for PravoSource {
    fn fetch_document(&self, entry: &CatalogEntry) -> Result<String> {
        let url = text_url(&self.base_url, &entry.nd);
        match self.fetcher.fetch(&url) {
            Ok(outcome) if !outcome.body.trim().is_empty() => {
                tracing::debug!(law_id = %entry.id, url = %url, encoding = outcome.encoding, "Fetched text form");
                return Ok(outcome.body);
            }
            Ok(_) => {
                tracing::debug!(law_id = %entry.id, url = %url, "Text form is empty, falling back to markup");
            }
            Err(e) => {
                tracing::warn!(law_id = %entry.id, url = %url, error = %e, "Text form failed, falling back to markup");
            }
        }

        let url = markup_url(&self.base_url, &entry.nd);
        let outcome = self.fetcher.fetch(&url)?;
        tracing::debug!(law_id = %entry.id, url = %url, encoding = outcome.encoding, "Fetched markup form");
        strip_markup(&outcome.body)
    }

    fn source_url(&self, entry: &CatalogEntry) -> String {
        markup_url(&self.base_url, &entry.nd)
    }
}
