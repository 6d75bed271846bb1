//! Ruslaw Harvester - Ingest Russian federal legislation from pravo.gov.ru.
//!
//! This crate fetches documents from the official legal information portal,
//! splits them into article-level provisions and writes one JSON seed
//! record per law for downstream indexing.
//!
//! # Example
//!
//! ```
//! use ruslaw_harvester::parser::parse;
//!
//! let provisions = parse("Статья 5. Right to privacy\nEveryone has the right...");
//! assert_eq!(provisions[0].number, "5");
//! assert_eq!(provisions[0].title, "Right to privacy");
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Configuration constants, settings and validation
//! - [`types`]: Core data types (catalog entries, provisions, seed records)
//! - [`error`]: Error types and Result alias
//! - [`rate_limit`]: Global request spacing
//! - [`encoding`]: Response charset selection and strict decoding
//! - [`http`]: Rate-limited, retrying HTTP fetcher
//! - [`content`]: Document sources (text form with markup fallback)
//! - [`text`]: Text cleaning and markup stripping
//! - [`parser`]: Article-level structural parser
//! - [`catalog`]: Catalog loading, ID derivation and validation
//! - [`store`]: Seed records and census snapshot
//! - [`report`]: Run statistics
//! - [`harvester`]: Ingestion orchestrator
//! - [`cli`]: Command-line interface

pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod encoding;
pub mod error;
pub mod harvester;
pub mod http;
pub mod parser;
pub mod rate_limit;
pub mod report;
pub mod store;
pub mod text;
pub mod types;

// Re-export commonly used items
pub use catalog::Catalog;
pub use config::{validate_date, validate_law_id, FetchConfig, HarvestConfig};
pub use content::{DocumentSource, PravoSource};
pub use error::{HarvesterError, Result};
pub use harvester::{Harvester, RunOptions};
pub use http::Fetcher;
pub use report::{EntryOutcome, RunReport};
pub use store::{CensusSnapshot, SeedStore};
pub use types::{CatalogEntry, Provision, SeedDocument};
