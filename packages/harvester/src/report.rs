//! Per-run statistics.

use serde::Serialize;

use crate::types::Classification;

/// What happened to one catalog entry during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Real provisions were extracted and persisted.
    Ingested { provisions: usize },

    /// Extraction failed; a placeholder record was persisted instead.
    Placeholder { reason: String },

    /// A seed record already existed and was left alone.
    Resumed { placeholder_only: bool },

    /// The entry is not classified as processable.
    SkippedClassification(Classification),

    /// Network access was disabled and no curated text was available.
    SkippedOffline,

    /// Writing the seed record failed.
    PersistFailed { reason: String },
}

/// An entry that did not yield real content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    pub law_id: String,
    pub reason: String,
}

/// Aggregate result of one orchestrator run.
///
/// `processed` counts entries that reached the fetch step in this run.
/// `succeeded` and `failed` describe the resulting corpus: an entry resumed
/// from an earlier run counts as succeeded when its seed holds real
/// provisions and as failed when it holds only the placeholder, so that
/// repeating a run reports the same coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_existing: usize,
    pub skipped_classification: usize,
    pub skipped_offline: usize,
    /// Provisions written in this run, placeholders included.
    pub provisions_written: usize,
    pub failures: Vec<EntryFailure>,
}

impl RunReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, law_id: &str, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Ingested { provisions } => {
                self.processed += 1;
                self.succeeded += 1;
                self.provisions_written += provisions;
            }
            EntryOutcome::Placeholder { reason } => {
                self.processed += 1;
                self.provisions_written += 1;
                self.fail(law_id, reason.clone());
            }
            EntryOutcome::PersistFailed { reason } => {
                self.processed += 1;
                self.fail(law_id, reason.clone());
            }
            EntryOutcome::Resumed { placeholder_only } => {
                self.skipped_existing += 1;
                if *placeholder_only {
                    self.fail(law_id, "placeholder record from an earlier run".to_string());
                } else {
                    self.succeeded += 1;
                }
            }
            EntryOutcome::SkippedClassification(_) => self.skipped_classification += 1,
            EntryOutcome::SkippedOffline => self.skipped_offline += 1,
        }
    }

    fn fail(&mut self, law_id: &str, reason: String) {
        self.failed += 1;
        self.failures.push(EntryFailure {
            law_id: law_id.to_string(),
            reason,
        });
    }

    /// All skipped entries, whatever the reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped_existing + self.skipped_classification + self.skipped_offline
    }

    /// Entries for which real content was sought: succeeded plus failed.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Share of attempted entries with real content, in percent.
    #[must_use]
    pub fn coverage_pct(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / attempted as f64) * 100.0
    }
}
