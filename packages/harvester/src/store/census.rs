//! Census snapshot: a point-in-time summary of the catalog, optionally
//! extended with the statistics of an ingestion run.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::write_atomic;
use crate::catalog::{Catalog, CatalogStats};
use crate::error::Result;
use crate::report::RunReport;
use crate::types::{Classification, DocumentKind, LawStatus};

pub const CENSUS_SOURCE: &str = "pravo.gov.ru";

pub const CENSUS_DESCRIPTION: &str =
    "Federal legislation of the Russian Federation: catalog census and ingestion coverage";

/// One catalog row in the census.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusLaw {
    pub id: String,
    pub nd: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub law_type: DocumentKind,
    pub status: LawStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
    pub classification: Classification,
}

/// Statistics of the ingestion run that produced the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub completed_at: DateTime<Utc>,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_provisions: usize,
    pub coverage_pct: f64,
}

impl From<&RunReport> for IngestionSummary {
    fn from(report: &RunReport) -> Self {
        Self {
            completed_at: Utc::now(),
            processed: report.processed,
            succeeded: report.succeeded,
            failed: report.failed,
            skipped: report.skipped(),
            total_provisions: report.provisions_written,
            // Two decimals are enough for a report
            coverage_pct: (report.coverage_pct() * 100.0).round() / 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusSnapshot {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub description: String,
    pub stats: CatalogStats,
    pub laws: Vec<CensusLaw>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion: Option<IngestionSummary>,
}

impl CensusSnapshot {
    /// Summarize a catalog. No network access is involved.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let laws = catalog
            .entries()
            .iter()
            .map(|entry| CensusLaw {
                id: entry.id.clone(),
                nd: entry.nd.clone(),
                title: entry.title.clone(),
                identifier: entry.identifier.clone(),
                law_type: entry.kind,
                status: entry.status,
                effective_date: entry.effective_date,
                classification: entry.classification,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            source: CENSUS_SOURCE.to_string(),
            description: CENSUS_DESCRIPTION.to_string(),
            stats: catalog.stats(),
            laws,
            ingestion: None,
        }
    }

    #[must_use]
    pub fn with_ingestion(mut self, report: &RunReport) -> Self {
        self.ingestion = Some(IngestionSummary::from(report));
        self
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        write_atomic(path, json.as_bytes())?;
        tracing::info!(path = %path.display(), laws = self.laws.len(), "Wrote census snapshot");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
