//! Command-line interface for the harvester.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use encoding_rs::{Encoding, UTF_8};
use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::Catalog;
use crate::config::{FetchConfig, HarvestConfig, REQUIRED_LAW_IDS};
use crate::content::PravoSource;
use crate::encoding::decode_body;
use crate::error::{HarvesterError, Result};
use crate::harvester::{Harvester, RunOptions};
use crate::http::Fetcher;
use crate::parser::parse;
use crate::report::{EntryOutcome, RunReport};
use crate::store::{CensusSnapshot, SeedStore};
use crate::text::clean_text;

/// Russian federal law harvester - ingest legislation from pravo.gov.ru.
#[derive(Parser)]
#[command(name = "ruslaw-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the catalog and write a census snapshot (no network access).
    Census {
        /// Catalog YAML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Census output path (default: data/census.json)
        #[arg(long)]
        census: Option<PathBuf>,
    },

    /// Fetch, parse and persist every processable catalog entry.
    Ingest {
        /// Maximum number of entries to fetch
        #[arg(short, long)]
        limit: Option<usize>,

        /// Use only curated text from the catalog; no network access
        #[arg(long)]
        offline: bool,

        /// Re-attempt entries whose seed record is only a placeholder
        #[arg(long)]
        retry_placeholders: bool,

        /// Catalog YAML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Seed record directory (default: data/seed)
        #[arg(long)]
        seed_dir: Option<PathBuf>,

        /// Census output path (default: data/census.json)
        #[arg(long)]
        census: Option<PathBuf>,

        /// Portal base URL (default: http://pravo.gov.ru)
        #[arg(long)]
        base_url: Option<String>,

        /// Minimum cleaned text size in bytes for a document to count as content
        #[arg(long)]
        min_content_bytes: Option<usize>,
    },

    /// Parse a local text file and print the provisions as JSON.
    Parse {
        /// Text file to parse
        file: PathBuf,

        /// Encoding of the file (e.g., windows-1251; default: UTF-8)
        #[arg(short, long)]
        encoding: Option<String>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Census { catalog, census } => census_command(catalog.as_deref(), census),
        Commands::Ingest {
            limit,
            offline,
            retry_placeholders,
            catalog,
            seed_dir,
            census,
            base_url,
            min_content_bytes,
        } => {
            let mut config = HarvestConfig::from_env()?;
            if let Some(dir) = seed_dir {
                config = config.with_seed_dir(dir);
            }
            if let Some(path) = census {
                config = config.with_census_path(path);
            }
            if let Some(url) = base_url {
                config = config.with_base_url(url);
            }
            if let Some(bytes) = min_content_bytes {
                config = config.with_min_content_bytes(bytes);
            }

            let options = RunOptions {
                limit,
                offline,
                retry_placeholders,
            };
            ingest_command(catalog.as_deref(), &config, &options)
        }
        Commands::Parse { file, encoding } => parse_command(&file, encoding.as_deref()),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    catalog.validate_required(REQUIRED_LAW_IDS)?;
    Ok(catalog)
}

/// Execute the census command.
fn census_command(catalog_path: Option<&Path>, census_path: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let census_path = match census_path {
        Some(path) => path,
        None => HarvestConfig::from_env()?.census_path,
    };

    let census = CensusSnapshot::build(&catalog);
    census.save(&census_path)?;

    println!("{} {} laws", style("Catalog:").bold(), census.stats.total);
    for (kind, count) in &census.stats.by_kind {
        println!("  {kind}: {count}");
    }
    println!("{}", style("By classification:").bold());
    for (classification, count) in &census.stats.by_classification {
        println!("  {classification}: {count}");
    }
    if census.stats.id_collisions > 0 {
        println!(
            "  ID collisions: {}",
            style(census.stats.id_collisions).yellow().bold()
        );
    }
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        census_path.display()
    );

    Ok(())
}

/// Execute the ingest command.
fn ingest_command(catalog_path: Option<&Path>, config: &HarvestConfig, options: &RunOptions) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;

    let fetcher = Fetcher::new(FetchConfig::from_env()?)?;
    let source = PravoSource::new(fetcher, config.base_url.as_str());
    let store = SeedStore::new(&config.seed_dir);
    let harvester = Harvester::new(source, store).with_min_content_bytes(config.min_content_bytes);

    println!(
        "{} {} catalog entries{}",
        style("Ingesting").bold(),
        style(catalog.len()).cyan(),
        if options.offline { " (offline)" } else { "" }
    );
    println!();

    let pb = ProgressBar::new(catalog.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let report = harvester.run_with_progress(&catalog, options, |entry, outcome| {
        pb.set_message(format!("{} ({})", entry.id, outcome_label(outcome)));
        pb.inc(1);
    });
    pb.finish_and_clear();
    let report = report?;

    let census = CensusSnapshot::build(&catalog).with_ingestion(&report);
    census.save(&config.census_path)?;

    print_report(&report);
    println!(
        "  Seed files: {}",
        harvester.store().count_seed_files()?
    );
    println!();
    println!(
        "{} {}",
        style("Census:").green().bold(),
        config.census_path.display()
    );

    Ok(())
}

fn outcome_label(outcome: &EntryOutcome) -> &'static str {
    match outcome {
        EntryOutcome::Ingested { .. } => "ingested",
        EntryOutcome::Placeholder { .. } => "placeholder",
        EntryOutcome::Resumed { .. } => "already ingested",
        EntryOutcome::SkippedClassification(_) => "not processable",
        EntryOutcome::SkippedOffline => "offline",
        EntryOutcome::PersistFailed { .. } => "persist failed",
    }
}

fn print_report(report: &RunReport) {
    println!("  Processed: {}", report.processed);
    println!("  Succeeded: {}", style(report.succeeded).green());
    if report.failed > 0 {
        println!("  Failed: {}", style(report.failed).red().bold());
    } else {
        println!("  Failed: 0");
    }
    println!(
        "  Skipped: {} (existing {}, classification {}, offline {})",
        report.skipped(),
        report.skipped_existing,
        report.skipped_classification,
        report.skipped_offline
    );
    println!("  Provisions written: {}", report.provisions_written);
    println!("  Coverage: {:.1}%", report.coverage_pct());

    for failure in &report.failures {
        println!(
            "    {} {}: {}",
            style("-").red(),
            failure.law_id,
            failure.reason
        );
    }
}

/// Execute the parse command.
fn parse_command(file: &Path, encoding: Option<&str>) -> Result<()> {
    let encoding = match encoding {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| HarvesterError::Config(format!("Unknown encoding '{label}'")))?,
        None => UTF_8,
    };

    let bytes = fs::read(file)?;
    let text = decode_body(&bytes, encoding, &file.display().to_string())?;
    let provisions = parse(&clean_text(&text));

    println!("{}", serde_json::to_string_pretty(&provisions)?);
    eprintln!(
        "{} {} provisions",
        style("Parsed").bold(),
        style(provisions.len()).cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_ingest_flags() {
        let cli = Cli::parse_from([
            "ruslaw-harvester",
            "ingest",
            "--limit",
            "5",
            "--offline",
            "--retry-placeholders",
            "--seed-dir",
            "/tmp/seed",
            "--min-content-bytes",
            "10",
        ]);

        let Commands::Ingest {
            limit,
            offline,
            retry_placeholders,
            seed_dir,
            min_content_bytes,
            catalog,
            ..
        } = cli.command
        else {
            panic!("expected ingest command");
        };
        assert_eq!(limit, Some(5));
        assert!(offline);
        assert!(retry_placeholders);
        assert_eq!(seed_dir, Some(PathBuf::from("/tmp/seed")));
        assert_eq!(min_content_bytes, Some(10));
        assert!(catalog.is_none());
    }

    #[test]
    fn test_cli_parse_census_defaults() {
        let cli = Cli::parse_from(["ruslaw-harvester", "census"]);
        let Commands::Census { catalog, census } = cli.command else {
            panic!("expected census command");
        };
        assert!(catalog.is_none());
        assert!(census.is_none());
    }

    #[test]
    fn test_cli_parse_parse_with_encoding() {
        let cli = Cli::parse_from(["ruslaw-harvester", "parse", "law.txt", "--encoding", "cp1251"]);
        let Commands::Parse { file, encoding } = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(file, PathBuf::from("law.txt"));
        assert_eq!(encoding.as_deref(), Some("cp1251"));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(&EntryOutcome::SkippedOffline), "offline");
        assert_eq!(outcome_label(&EntryOutcome::Ingested { provisions: 1 }), "ingested");
    }
}
