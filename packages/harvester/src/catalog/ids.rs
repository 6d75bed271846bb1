//! Law identifier derivation for catalog entries without an explicit `id`.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{HarvesterError, Result};
use crate::types::DocumentKind;

/// Keyword → slug table for the codified statutes.
///
/// Checked in order; the first keyword contained in the lowercased title wins.
const CODE_SLUGS: &[(&str, &str)] = &[
    ("гражданский кодекс", "gk-rf"),
    ("уголовный кодекс", "uk-rf"),
    ("трудовой кодекс", "tk-rf"),
    ("налоговый кодекс", "nk-rf"),
    ("кодекс об административных правонарушениях", "koap-rf"),
    ("административных правонарушениях", "koap-rf"),
    ("арбитражный процессуальный", "apk-rf"),
    ("гражданский процессуальный", "gpk-rf"),
    ("уголовно-процессуальный", "upk-rf"),
    ("уголовно-исполнительный", "uik-rf"),
    ("бюджетный кодекс", "bk-rf"),
    ("земельный кодекс", "zk-rf"),
    ("водный кодекс", "vk-rf"),
    ("лесной кодекс", "lk-rf"),
    ("воздушный кодекс", "vozk-rf"),
    ("жилищный кодекс", "zhk-rf"),
    ("семейный кодекс", "sk-rf"),
    ("таможенный кодекс", "tamk-rf"),
    ("градостроительный кодекс", "grk-rf"),
    ("кодекс торгового мореплавания", "ktm-rf"),
    ("кодекс внутреннего водного транспорта", "kvvt-rf"),
    ("кодекс административного судопроизводства", "kas-rf"),
];

/// `часть первая`, `часть 2`, ... in the title of a multi-part code.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CODE_PART_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"часть\s+(перв|втор|трет|четв[её]рт|[1-4])").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FKZ_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)-?ФКЗ$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FZ_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)-?ФЗ$").expect("valid regex"));

/// Derive a stable law ID from the descriptive fields of an entry.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use ruslaw_harvester::catalog::derive_law_id;
/// use ruslaw_harvester::types::DocumentKind;
///
/// let date = NaiveDate::from_ymd_opt(2006, 7, 27);
/// assert_eq!(
///     derive_law_id(DocumentKind::FederalLaw, Some("152-ФЗ"), "О персональных данных", date),
///     "fz-152-2006"
/// );
/// ```
pub fn derive_law_id(
    kind: DocumentKind,
    identifier: Option<&str>,
    title: &str,
    effective_date: Option<NaiveDate>,
) -> String {
    if kind == DocumentKind::Constitution {
        return "constitution-rf".to_string();
    }

    let number = identifier.map(str::trim).unwrap_or_default();
    let year = effective_date.map(|d| d.year());

    if let Some(caps) = FKZ_NUMBER_PATTERN.captures(number) {
        return numbered_id("fkz", &caps[1], year);
    }
    if let Some(caps) = FZ_NUMBER_PATTERN.captures(number) {
        return numbered_id("fz", &caps[1], year);
    }

    if kind == DocumentKind::Code {
        if let Some(slug) = code_slug(title) {
            return slug;
        }
    }

    fallback_id(number, effective_date, title)
}

fn numbered_id(prefix: &str, number: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{prefix}-{number}-{year}"),
        None => format!("{prefix}-{number}"),
    }
}

/// Slug for a codified statute, with a `-<part>` suffix for multi-part codes.
///
/// # Examples
/// ```
/// use ruslaw_harvester::catalog::code_slug;
///
/// assert_eq!(
///     code_slug("Гражданский кодекс Российской Федерации (часть первая)").as_deref(),
///     Some("gk-rf-1")
/// );
/// assert_eq!(code_slug("Устав"), None);
/// ```
pub fn code_slug(title: &str) -> Option<String> {
    let lower = title.to_lowercase();
    let (_, slug) = CODE_SLUGS.iter().find(|(keyword, _)| lower.contains(keyword))?;

    let part = CODE_PART_PATTERN
        .captures(&lower)
        .and_then(|caps| match caps.get(1).map(|m| m.as_str()) {
            Some("перв" | "1") => Some(1),
            Some("втор" | "2") => Some(2),
            Some("трет" | "3") => Some(3),
            Some("четверт" | "четвёрт" | "4") => Some(4),
            _ => None,
        });

    Some(match part {
        Some(part) => format!("{slug}-{part}"),
        None => (*slug).to_string(),
    })
}

/// `law-<8 hex>` from the number, date and the start of the title.
fn fallback_id(number: &str, effective_date: Option<NaiveDate>, title: &str) -> String {
    let date = effective_date.map(|d| d.to_string()).unwrap_or_default();
    let title_prefix: String = title.chars().take(50).collect();

    let mut hasher = Sha256::new();
    hasher.update(format!("{number}_{date}_{title_prefix}").as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("law-{}", &digest[..8])
}

/// Suffix appended to a derived ID that collides with another document.
pub fn collision_suffix(nd: &str) -> String {
    let chars: Vec<char> = nd.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(6)..].iter().collect();
    tail.to_lowercase()
}

/// Parse a date as written by the portal (`DD.MM.YYYY`) or in ISO form.
///
/// # Examples
/// ```
/// use ruslaw_harvester::catalog::parse_portal_date;
///
/// let date = parse_portal_date("25.12.1993").unwrap();
/// assert_eq!(date.to_string(), "1993-12-25");
/// assert!(parse_portal_date("1993-12-25").is_ok());
/// ```
pub fn parse_portal_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Some((day, rest)) = raw.split_once('.') {
        if let Some((month, year)) = rest.split_once('.') {
            let parsed = day
                .parse::<u32>()
                .ok()
                .zip(month.parse::<u32>().ok())
                .zip(year.parse::<i32>().ok())
                .and_then(|((d, m), y)| NaiveDate::from_ymd_opt(y, m, d));
            return parsed.ok_or_else(|| HarvesterError::InvalidDate(raw.to_string()));
        }
    }

    crate::config::validate_date(raw)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| HarvesterError::InvalidDate(raw.to_string()))
}
