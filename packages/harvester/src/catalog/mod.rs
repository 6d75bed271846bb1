//! Catalog of known federal documents.
//!
//! The catalog is a YAML list of entries. A curated catalog is embedded in
//! the binary; another one can be loaded from disk. Entries may omit `id`,
//! in which case one is derived from the document kind, number, title and
//! date (see [`derive_law_id`]).

mod ids;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::validate_law_id;
use crate::error::{HarvesterError, Result};
use crate::types::{CatalogEntry, Classification, DocumentKind, LawStatus};

pub use ids::{code_slug, collision_suffix, derive_law_id, parse_portal_date};

/// The embedded catalog.
const BUILTIN_CATALOG: &str = include_str!("../../data/federal.yaml");

/// A catalog entry as written in the YAML file.
///
/// Kind and status are given either directly or in the portal's own
/// vocabulary (`doc_type`, `status_note`); the direct form wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nd: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Omitted when `doc_type` carries the portal's wording instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
    /// Portal document type, e.g. `Кодекс` or `Федеральный закон`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LawStatus>,
    /// Portal status note, e.g. `Утратил силу`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_note: Option<String>,
    /// `YYYY-MM-DD` or the portal's `DD.MM.YYYY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default = "default_classification")]
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curated_text: Option<String>,
}

fn default_classification() -> Classification {
    Classification::Processable
}

/// Loaded, validated catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    id_collisions: usize,
}

/// Summary counts over a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub by_kind: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_classification: BTreeMap<String, usize>,
    pub id_collisions: usize,
}

impl CatalogRecord {
    fn resolved_kind(&self) -> DocumentKind {
        self.kind.unwrap_or_else(|| {
            DocumentKind::from_portal(
                self.doc_type.as_deref().unwrap_or_default(),
                self.identifier.as_deref().unwrap_or_default(),
                &self.title,
            )
        })
    }

    fn resolved_status(&self) -> LawStatus {
        self.status.unwrap_or_else(|| {
            self.status_note
                .as_deref()
                .map_or(LawStatus::InForce, LawStatus::from_portal)
        })
    }
}

impl Catalog {
    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), entries = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let records: Vec<CatalogRecord> = serde_yaml_ng::from_str(yaml)?;
        Self::from_records(records)
    }

    /// Build a catalog, assigning IDs to records that have none.
    ///
    /// Explicit IDs must be unique and well-formed. A derived ID that is
    /// already taken by a different document gets the tail of its retrieval
    /// key appended and is counted as a collision. A record whose derived ID
    /// and retrieval key both repeat an earlier one is a duplicate listing
    /// and is dropped.
    pub fn from_records(records: Vec<CatalogRecord>) -> Result<Self> {
        let mut explicit: HashSet<String> = HashSet::new();
        for id in records.iter().filter_map(|r| r.id.as_deref()) {
            validate_law_id(id)?;
            if !explicit.insert(id.to_string()) {
                return Err(HarvesterError::DuplicateLawId(id.to_string()));
            }
        }

        let mut taken: HashMap<String, String> = HashMap::new();
        let mut entries = Vec::with_capacity(records.len());
        let mut id_collisions = 0;

        for record in records {
            let effective_date = record
                .effective_date
                .as_deref()
                .map(|raw| {
                    parse_portal_date(raw).map_err(|_| HarvesterError::InvalidCatalogDate {
                        nd: record.nd.clone(),
                        value: raw.to_string(),
                    })
                })
                .transpose()?;
            let kind = record.resolved_kind();
            let status = record.resolved_status();

            let id = match record.id {
                Some(id) => id,
                None => {
                    let derived =
                        derive_law_id(kind, record.identifier.as_deref(), &record.title, effective_date);
                    if taken.get(&derived) == Some(&record.nd) {
                        tracing::warn!(law_id = %derived, nd = %record.nd, "Duplicate catalog listing, dropping");
                        continue;
                    }
                    let is_free = |id: &str| !taken.contains_key(id) && !explicit.contains(id);
                    if is_free(&derived) {
                        derived
                    } else {
                        id_collisions += 1;
                        let base = format!("{derived}-{}", collision_suffix(&record.nd));
                        let mut suffixed = base.clone();
                        let mut counter = 2;
                        while !is_free(&suffixed) {
                            suffixed = format!("{base}-{counter}");
                            counter += 1;
                        }
                        tracing::debug!(derived = %derived, law_id = %suffixed, "Derived ID collision");
                        suffixed
                    }
                }
            };

            validate_law_id(&id)?;
            if taken.insert(id.clone(), record.nd.clone()).is_some() {
                return Err(HarvesterError::DuplicateLawId(id));
            }

            entries.push(CatalogEntry {
                id,
                nd: record.nd,
                title: record.title,
                title_en: record.title_en,
                identifier: record.identifier,
                kind,
                status,
                effective_date,
                classification: record.classification,
                references: record.references,
                curated_text: record.curated_text,
            });
        }

        Ok(Self {
            entries,
            id_collisions,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of derived IDs that had to be suffixed.
    #[must_use]
    pub fn id_collisions(&self) -> usize {
        self.id_collisions
    }

    /// Fail unless every required ID is present.
    pub fn validate_required(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|id| self.get(id).is_none())
            .map(|id| (*id).to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(HarvesterError::MissingRequiredLaws { missing })
        }
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.entries.len(),
            by_kind: BTreeMap::new(),
            by_status: BTreeMap::new(),
            by_classification: BTreeMap::new(),
            id_collisions: self.id_collisions,
        };
        for entry in &self.entries {
            *stats.by_kind.entry(entry.kind.as_str().to_string()).or_default() += 1;
            *stats.by_status.entry(entry.status.as_str().to_string()).or_default() += 1;
            *stats
                .by_classification
                .entry(entry.classification.as_str().to_string())
                .or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REQUIRED_LAW_IDS;

    const SMALL_CATALOG: &str = r#"
- id: constitution-rf
  nd: "102027595"
  title: Конституция Российской Федерации
  kind: constitution
  effective_date: 1993-12-25
- nd: "102108261"
  title: О персональных данных
  identifier: 152-ФЗ
  kind: federal_law
  status: amended
  effective_date: 27.07.2006
- nd: "102041891"
  title: Уголовный кодекс Российской Федерации
  kind: code
  status: amended
  classification: needs_manual_review
"#;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        catalog.validate_required(REQUIRED_LAW_IDS).unwrap();
    }

    #[test]
    fn test_from_yaml_derives_ids() {
        let catalog = Catalog::from_yaml_str(SMALL_CATALOG).unwrap();

        assert_eq!(catalog.len(), 3);
        let pd = catalog.get("fz-152-2006").unwrap();
        assert_eq!(pd.effective_date, chrono::NaiveDate::from_ymd_opt(2006, 7, 27));
        assert_eq!(pd.classification, Classification::Processable);
        assert!(catalog.get("uk-rf").is_some());
        assert_eq!(catalog.get("constitution-rf").unwrap().status, LawStatus::InForce);
    }

    #[test]
    fn test_validate_required_lists_missing() {
        let catalog = Catalog::from_yaml_str(SMALL_CATALOG).unwrap();
        let err = catalog.validate_required(REQUIRED_LAW_IDS).unwrap_err();

        match err {
            HarvesterError::MissingRequiredLaws { missing } => assert_eq!(missing, vec!["gk-rf-1"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_explicit_duplicate_is_error() {
        let yaml = r#"
- id: uk-rf
  nd: "1"
  title: A
  kind: code
- id: uk-rf
  nd: "2"
  title: B
  kind: code
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, HarvesterError::DuplicateLawId(ref id) if id == "uk-rf"));
        assert!(err.is_catalog_validation());
    }

    #[test]
    fn test_invalid_explicit_id_is_error() {
        let yaml = r#"
- id: "../escape"
  nd: "1"
  title: A
  kind: federal_law
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, HarvesterError::InvalidLawId(_)));
    }

    #[test]
    fn test_derived_collision_gets_suffix() {
        let yaml = r#"
- nd: "102000111"
  title: Уголовный кодекс РСФСР
  kind: code
  status: repealed
- nd: "102041891"
  title: Уголовный кодекс Российской Федерации
  kind: code
- id: gk-rf-1
  nd: "102033239"
  title: Гражданский кодекс Российской Федерации (часть первая)
  kind: code
- nd: "999999"
  title: Гражданский кодекс Российской Федерации (часть первая)
  kind: code
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();

        let ids: Vec<&str> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["uk-rf", "uk-rf-041891", "gk-rf-1", "gk-rf-1-999999"]);
        assert_eq!(catalog.id_collisions(), 2);
        assert_eq!(catalog.stats().id_collisions, 2);
    }

    #[test]
    fn test_repeated_listing_is_dropped() {
        let yaml = r#"
- nd: "102041891"
  title: Уголовный кодекс Российской Федерации
  kind: code
- nd: "102041891"
  title: Уголовный кодекс Российской Федерации
  kind: code
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.id_collisions(), 0);
    }

    #[test]
    fn test_stats_counts() {
        let catalog = Catalog::from_yaml_str(SMALL_CATALOG).unwrap();
        let stats = catalog.stats();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_kind["code"], 1);
        assert_eq!(stats.by_kind["federal_law"], 1);
        assert_eq!(stats.by_status["amended"], 2);
        assert_eq!(stats.by_classification["processable"], 2);
        assert_eq!(stats.by_classification["needs_manual_review"], 1);
    }

    #[test]
    fn test_invalid_date_is_error() {
        let yaml = r#"
- nd: "1"
  title: A
  kind: federal_law
  effective_date: 31.02.2006
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(
            matches!(err, HarvesterError::InvalidCatalogDate { ref nd, ref value } if nd == "1" && value == "31.02.2006")
        );
        assert!(err.is_catalog_validation());
    }

    #[test]
    fn test_portal_vocabulary_is_mapped() {
        let yaml = r#"
- nd: "102041891"
  title: Уголовный кодекс Российской Федерации
  doc_type: Кодекс
  status_note: с изменениями
- nd: "102000505"
  title: О Конституционном Суде Российской Федерации
  identifier: 1-ФКЗ
  effective_date: 21.07.1994
- nd: "102005000"
  title: О порядке опубликования
  doc_type: Федеральный закон
  identifier: 5-ФЗ
  status_note: Утратил силу
  effective_date: 14.06.1994
- nd: "102108261"
  title: О персональных данных
  doc_type: Кодекс
  kind: federal_law
  identifier: 152-ФЗ
  status: in_force
  status_note: Утратил силу
  effective_date: 27.07.2006
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();

        let uk = catalog.get("uk-rf").unwrap();
        assert_eq!(uk.kind, DocumentKind::Code);
        assert_eq!(uk.status, LawStatus::Amended);

        let fkz = catalog.get("fkz-1-1994").unwrap();
        assert_eq!(fkz.kind, DocumentKind::FederalConstitutionalLaw);
        assert_eq!(fkz.status, LawStatus::InForce);

        let repealed = catalog.get("fz-5-1994").unwrap();
        assert_eq!(repealed.kind, DocumentKind::FederalLaw);
        assert_eq!(repealed.status, LawStatus::Repealed);

        // Direct values win over the portal wording
        let pd = catalog.get("fz-152-2006").unwrap();
        assert_eq!(pd.kind, DocumentKind::FederalLaw);
        assert_eq!(pd.status, LawStatus::InForce);
    }

    #[test]
    fn test_repeated_collision_gets_counter() {
        let yaml = r#"
- nd: "102041891"
  title: Уголовный кодекс Российской Федерации
  kind: code
- id: uk-rf-000111
  nd: "7"
  title: Уголовный кодекс (редакция)
  kind: code
- nd: "900000111"
  title: Уголовный кодекс Российской Федерации
  kind: code
- nd: "800000111"
  title: Уголовный кодекс Российской Федерации
  kind: code
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();

        let ids: Vec<&str> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["uk-rf", "uk-rf-000111", "uk-rf-000111-2", "uk-rf-000111-3"]);
        assert_eq!(catalog.id_collisions(), 2);
    }
}
