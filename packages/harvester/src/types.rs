//! Core data types for the harvester.
//!
//! These types represent catalog entries, the provisions extracted from a
//! document, and the seed records handed to the storage build stage.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reference key of the synthesized placeholder provision.
pub const PLACEHOLDER_REF: &str = "0";

/// Kind of federal legal document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// The Constitution of the Russian Federation.
    Constitution,

    /// Codified statute (Кодекс).
    Code,

    /// Federal constitutional law (ФКЗ).
    FederalConstitutionalLaw,

    /// Ordinary federal law (ФЗ).
    FederalLaw,
}

impl DocumentKind {
    /// Get the string value used in seed records and census statistics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constitution => "constitution",
            Self::Code => "code",
            Self::FederalConstitutionalLaw => "federal_constitutional_law",
            Self::FederalLaw => "federal_law",
        }
    }

    /// Map the portal's document type and number to a kind.
    ///
    /// Unknown combinations fall back to an ordinary federal law.
    #[must_use]
    pub fn from_portal(doc_type: &str, doc_number: &str, heading: &str) -> Self {
        let doc_type = doc_type.trim();
        let doc_number = doc_number.trim();

        if heading.to_lowercase().contains("конституция российской федерации")
            || doc_type == "Конституция"
        {
            Self::Constitution
        } else if doc_type == "Кодекс" {
            Self::Code
        } else if doc_number.contains("ФКЗ") || doc_type == "Федеральный конституционный закон"
        {
            Self::FederalConstitutionalLaw
        } else {
            Self::FederalLaw
        }
    }
}

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawStatus {
    /// Currently effective without recorded amendments.
    InForce,

    /// Effective, with amendments.
    Amended,

    /// Superseded or repealed.
    Repealed,
}

impl LawStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InForce => "in_force",
            Self::Amended => "amended",
            Self::Repealed => "repealed",
        }
    }

    /// Map the portal's free-text status note.
    ///
    /// Both the Cyrillic and the Latin "c" spelling of "с изменениями" occur
    /// in portal metadata.
    #[must_use]
    pub fn from_portal(status: &str) -> Self {
        let status = status.trim().to_lowercase();
        if status.contains("утратил силу") {
            Self::Repealed
        } else if status.contains("с изменениями") || status.contains("c изменениями") {
            Self::Amended
        } else {
            Self::InForce
        }
    }
}

/// Whether a catalog entry may be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Fetch, parse and persist.
    Processable,

    /// Known to need a human to extract the text.
    NeedsManualReview,

    /// Not available from the portal.
    Unreachable,

    /// Deliberately left out of the corpus.
    Excluded,
}

impl Classification {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processable => "processable",
            Self::NeedsManualReview => "needs_manual_review",
            Self::Unreachable => "unreachable",
            Self::Excluded => "excluded",
        }
    }
}

/// A single known document in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier, unique across the catalog (e.g., "fz-152-2006").
    pub id: String,

    /// Portal retrieval key (the `nd` query parameter).
    pub nd: String,

    /// Canonical (Russian) title.
    pub title: String,

    /// Optional English title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,

    /// Official number as printed (e.g., "152-ФЗ").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    pub kind: DocumentKind,

    pub status: LawStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,

    pub classification: Classification,

    /// Related external instruments (e.g., "GDPR", "Convention 108").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,

    /// Curated text used when the network is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curated_text: Option<String>,
}

impl CatalogEntry {
    #[must_use]
    pub fn is_processable(&self) -> bool {
        self.classification == Classification::Processable
    }
}

/// Result of one successful HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// HTTP status code.
    pub status: u16,

    /// Body decoded to UTF-8.
    pub body: String,

    /// Declared `Content-Type`, if any.
    pub content_type: Option<String>,

    /// Name of the encoding the body was decoded from.
    pub encoding: &'static str,
}

/// One article-level unit of legal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    /// Article number (e.g., "5", "12.1").
    #[serde(rename = "article")]
    pub number: String,

    /// Article heading, empty when the article has none.
    #[serde(default)]
    pub title: String,

    /// Article text.
    #[serde(rename = "content")]
    pub body: String,

    /// Citation key, normally equal to the article number.
    #[serde(rename = "provision_ref")]
    pub reference: String,

    /// Position within the document, contiguous from 0.
    #[serde(rename = "order_index")]
    pub position: usize,
}

impl Provision {
    /// Create a provision whose reference key equals its number.
    #[must_use]
    pub fn new(
        number: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        position: usize,
    ) -> Self {
        let number = number.into();
        Self {
            reference: number.clone(),
            number,
            title: title.into(),
            body: body.into(),
            position,
        }
    }

    /// Synthesize the fallback provision for a document whose text could not be extracted.
    ///
    /// It keeps the document visible in the corpus and points at the source
    /// for manual follow-up.
    #[must_use]
    pub fn placeholder(title: &str, source_url: &str) -> Self {
        let body = format!(
            "{title}\n\nФедеральное законодательство Российской Федерации.\nИсточник: {source_url}"
        );
        Self::new(PLACEHOLDER_REF, title, body, 0)
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.reference == PLACEHOLDER_REF
    }
}

/// Descriptive part of a seed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedLaw {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub law_type: DocumentKind,
    pub status: LawStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

/// The persisted output for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDocument {
    pub law: SeedLaw,
    pub provisions: Vec<Provision>,
}

impl SeedDocument {
    /// Build a seed record for `entry`, stamped with the current time.
    #[must_use]
    pub fn new(entry: &CatalogEntry, source_url: impl Into<String>, provisions: Vec<Provision>) -> Self {
        Self {
            law: SeedLaw {
                id: entry.id.clone(),
                title: entry.title.clone(),
                title_en: entry.title_en.clone(),
                identifier: entry.identifier.clone(),
                law_type: entry.kind,
                status: entry.status,
                effective_date: entry.effective_date,
                source_url: source_url.into(),
                references: entry.references.clone(),
                last_updated: Utc::now(),
            },
            provisions,
        }
    }

    /// True when the record holds nothing but the placeholder provision.
    #[must_use]
    pub fn is_placeholder_only(&self) -> bool {
        matches!(self.provisions.as_slice(), [only] if only.is_placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> CatalogEntry {
        CatalogEntry {
            id: "fz-152-2006".to_string(),
            nd: "102108261".to_string(),
            title: "О персональных данных".to_string(),
            title_en: Some("On Personal Data".to_string()),
            identifier: Some("152-ФЗ".to_string()),
            kind: DocumentKind::FederalLaw,
            status: LawStatus::Amended,
            effective_date: NaiveDate::from_ymd_opt(2006, 7, 27),
            classification: Classification::Processable,
            references: vec!["GDPR".to_string()],
            curated_text: None,
        }
    }

    #[test]
    fn test_document_kind_from_portal() {
        assert_eq!(
            DocumentKind::from_portal("Конституция", "", "Конституция Российской Федерации"),
            DocumentKind::Constitution
        );
        assert_eq!(
            DocumentKind::from_portal("Кодекс", "63-ФЗ", "Уголовный кодекс Российской Федерации"),
            DocumentKind::Code
        );
        assert_eq!(
            DocumentKind::from_portal("", "1-ФКЗ", "О Конституционном Суде"),
            DocumentKind::FederalConstitutionalLaw
        );
        assert_eq!(
            DocumentKind::from_portal("Федеральный закон", "152-ФЗ", "О персональных данных"),
            DocumentKind::FederalLaw
        );
        assert_eq!(DocumentKind::from_portal("", "", ""), DocumentKind::FederalLaw);
    }

    #[test]
    fn test_law_status_from_portal() {
        assert_eq!(LawStatus::from_portal("Утратил силу"), LawStatus::Repealed);
        assert_eq!(LawStatus::from_portal("с изменениями"), LawStatus::Amended);
        // Latin "c" as found in some portal records
        assert_eq!(LawStatus::from_portal("c изменениями"), LawStatus::Amended);
        assert_eq!(LawStatus::from_portal(""), LawStatus::InForce);
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(
            serde_json::to_string(&DocumentKind::FederalConstitutionalLaw).unwrap(),
            "\"federal_constitutional_law\""
        );
        assert_eq!(
            serde_json::to_string(&Classification::NeedsManualReview).unwrap(),
            "\"needs_manual_review\""
        );
        assert_eq!(DocumentKind::Code.as_str(), "code");
        assert_eq!(LawStatus::Repealed.as_str(), "repealed");
        assert_eq!(Classification::Excluded.as_str(), "excluded");
    }

    #[test]
    fn test_provision_serializes_seed_field_names() {
        let provision = Provision::new("12.1", "Title", "Body", 3);
        let json = serde_json::to_value(&provision).unwrap();

        assert_eq!(json["article"], "12.1");
        assert_eq!(json["title"], "Title");
        assert_eq!(json["content"], "Body");
        assert_eq!(json["provision_ref"], "12.1");
        assert_eq!(json["order_index"], 3);
    }

    #[test]
    fn test_placeholder_provision() {
        let provision = Provision::placeholder("О персональных данных", "http://pravo.gov.ru/x");

        assert_eq!(provision.number, "0");
        assert_eq!(provision.reference, "0");
        assert_eq!(provision.position, 0);
        assert!(provision.is_placeholder());
        assert!(provision.body.starts_with("О персональных данных\n\n"));
        assert!(provision.body.contains("Источник: http://pravo.gov.ru/x"));
    }

    #[test]
    fn test_seed_document_placeholder_only() {
        let entry = sample_entry();
        let placeholder = SeedDocument::new(
            &entry,
            "http://pravo.gov.ru/x",
            vec![Provision::placeholder(&entry.title, "http://pravo.gov.ru/x")],
        );
        assert!(placeholder.is_placeholder_only());

        let real = SeedDocument::new(&entry, "u", vec![Provision::new("1", "", "Text", 0)]);
        assert!(!real.is_placeholder_only());

        let empty = SeedDocument::new(&entry, "u", Vec::new());
        assert!(!empty.is_placeholder_only());
    }

    #[test]
    fn test_seed_document_json_layout() {
        let entry = sample_entry();
        let doc = SeedDocument::new(&entry, "http://pravo.gov.ru/x", vec![Provision::new("1", "", "Text", 0)]);
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["law"]["id"], "fz-152-2006");
        assert_eq!(json["law"]["law_type"], "federal_law");
        assert_eq!(json["law"]["status"], "amended");
        assert_eq!(json["law"]["effective_date"], "2006-07-27");
        assert_eq!(json["law"]["references"][0], "GDPR");
        assert_eq!(json["provisions"][0]["article"], "1");

        let back: SeedDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_catalog_entry_optional_fields_default() {
        let yaml = r#"
id: uk-rf
nd: "102041891"
title: Уголовный кодекс Российской Федерации
kind: code
status: amended
classification: processable
"#;
        let entry: CatalogEntry = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(entry.id, "uk-rf");
        assert!(entry.title_en.is_none());
        assert!(entry.references.is_empty());
        assert!(entry.is_processable());
    }
}
