//! Ingestion orchestrator that ties all components together.
//!
//! Each catalog entry goes through: check for an existing seed record,
//! classification gate, fetch, clean, parse, persist. Entries are processed
//! sequentially in catalog order and independently of each other; a failure
//! in one entry becomes a placeholder record and a line in the report.

use crate::catalog::Catalog;
use crate::config::{DEFAULT_MIN_CONTENT_BYTES, REQUIRED_LAW_IDS};
use crate::content::DocumentSource;
use crate::error::Result;
use crate::parser::ProvisionParser;
use crate::report::{EntryOutcome, RunReport};
use crate::store::SeedStore;
use crate::text::clean_text;
use crate::types::{CatalogEntry, Provision, SeedDocument};

/// Options for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum number of entries that may reach the fetch step.
    pub limit: Option<usize>,

    /// Use only curated text embedded in the catalog; never touch the network.
    pub offline: bool,

    /// Re-attempt entries whose seed record holds only the placeholder.
    pub retry_placeholders: bool,
}

impl RunOptions {
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    #[must_use]
    pub fn retry_placeholders(mut self, retry: bool) -> Self {
        self.retry_placeholders = retry;
        self
    }
}

/// Drives catalog entries through fetch, parse and persist.
pub struct Harvester<S: DocumentSource> {
    source: S,
    store: SeedStore,
    parser: ProvisionParser,
    min_content_bytes: usize,
}

impl<S: DocumentSource> Harvester<S> {
    pub fn new(source: S, store: SeedStore) -> Self {
        Self {
            source,
            store,
            parser: ProvisionParser::new(),
            min_content_bytes: DEFAULT_MIN_CONTENT_BYTES,
        }
    }

    /// Cleaned text shorter than this many bytes is not treated as content.
    #[must_use]
    pub fn with_min_content_bytes(mut self, min_content_bytes: usize) -> Self {
        self.min_content_bytes = min_content_bytes;
        self
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn store(&self) -> &SeedStore {
        &self.store
    }

    /// Run the whole catalog.
    ///
    /// Fails only when the catalog lacks a required law; per-entry failures
    /// are recorded in the report.
    pub fn run(&self, catalog: &Catalog, options: &RunOptions) -> Result<RunReport> {
        self.run_with_progress(catalog, options, |_, _| {})
    }

    /// Like [`Harvester::run`], calling `on_entry` after every entry.
    pub fn run_with_progress<F>(
        &self,
        catalog: &Catalog,
        options: &RunOptions,
        mut on_entry: F,
    ) -> Result<RunReport>
    where
        F: FnMut(&CatalogEntry, &EntryOutcome),
    {
        catalog.validate_required(REQUIRED_LAW_IDS)?;

        let mut report = RunReport::new();

        for entry in catalog.entries() {
            let outcome = match self.precheck(entry, options) {
                Some(outcome) => outcome,
                None => {
                    if options.limit.is_some_and(|limit| report.processed >= limit) {
                        tracing::info!(limit = ?options.limit, "Entry limit reached, stopping");
                        break;
                    }
                    self.process(entry, options)
                }
            };

            report.record(&entry.id, &outcome);
            on_entry(entry, &outcome);
        }

        tracing::info!(
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped(),
            provisions = report.provisions_written,
            "Run complete"
        );
        Ok(report)
    }

    /// Decide whether an entry can be settled without fetching.
    fn precheck(&self, entry: &CatalogEntry, options: &RunOptions) -> Option<EntryOutcome> {
        match self.store.load(&entry.id) {
            Ok(Some(doc)) if !doc.provisions.is_empty() => {
                let placeholder_only = doc.is_placeholder_only();
                if placeholder_only && options.retry_placeholders {
                    tracing::debug!(law_id = %entry.id, "Retrying placeholder record");
                } else {
                    tracing::debug!(law_id = %entry.id, provisions = doc.provisions.len(), "Already ingested, skipping");
                    return Some(EntryOutcome::Resumed { placeholder_only });
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(law_id = %entry.id, error = %e, "Unreadable seed record, treating as absent");
            }
        }

        if !entry.is_processable() {
            tracing::debug!(
                law_id = %entry.id,
                classification = entry.classification.as_str(),
                "Not processable, skipping"
            );
            return Some(EntryOutcome::SkippedClassification(entry.classification));
        }

        if options.offline && entry.curated_text.is_none() {
            tracing::debug!(law_id = %entry.id, "No curated text, skipping offline");
            return Some(EntryOutcome::SkippedOffline);
        }

        None
    }

    /// Fetch (or take the curated text), parse and persist one entry.
    fn process(&self, entry: &CatalogEntry, options: &RunOptions) -> EntryOutcome {
        let source_url = self.source.source_url(entry);

        let raw = match (&entry.curated_text, options.offline) {
            (Some(text), true) => text.clone(),
            _ => match self.source.fetch_document(entry) {
                Ok(raw) => raw,
                Err(e) => return self.persist_placeholder(entry, &source_url, e.to_string()),
            },
        };

        let text = clean_text(&raw);
        if text.len() < self.min_content_bytes {
            let reason = format!(
                "content too short ({} bytes, minimum {})",
                text.len(),
                self.min_content_bytes
            );
            return self.persist_placeholder(entry, &source_url, reason);
        }

        let provisions = self.parser.parse(&text);
        if provisions.is_empty() {
            return self.persist_placeholder(entry, &source_url, "no provisions extracted".to_string());
        }

        let count = provisions.len();
        let doc = SeedDocument::new(entry, source_url, provisions);
        match self.store.save(&doc) {
            Ok(_) => {
                tracing::info!(law_id = %entry.id, provisions = count, "Ingested");
                EntryOutcome::Ingested { provisions: count }
            }
            Err(e) => {
                tracing::warn!(law_id = %entry.id, error = %e, "Failed to persist seed record");
                EntryOutcome::PersistFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Persist the single placeholder provision for an entry.
    fn persist_placeholder(&self, entry: &CatalogEntry, source_url: &str, reason: String) -> EntryOutcome {
        tracing::warn!(law_id = %entry.id, reason = %reason, "Extraction failed, writing placeholder");

        let doc = SeedDocument::new(
            entry,
            source_url,
            vec![Provision::placeholder(&entry.title, source_url)],
        );
        match self.store.save(&doc) {
            Ok(_) => EntryOutcome::Placeholder { reason },
            Err(e) => EntryOutcome::PersistFailed {
                reason: format!("{reason}; {e}"),
            },
        }
    }
}
