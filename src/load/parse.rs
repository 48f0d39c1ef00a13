//! Cell coercions shared by the HHS and quality records.
//!
//! Every cell reaches these helpers already trimmed by the CSV reader. An
//! empty cell is a missing value and becomes `None`.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};

/// HHS marks suppressed small counts with this value.
pub const SUPPRESSED: f64 = -999_999.0;

/// Literal CMS writes for a rating it did not compute.
pub const NOT_AVAILABLE: &str = "Not Available";

/// Trim whitespace and strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// `Facility ID` → `facility_id`
pub fn normalize_header(raw: &str) -> String {
    clean_str(raw).to_lowercase().replace(' ', "_")
}

/// Parse a calendar date written as `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYYMMDD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    match s.len() {
        8 if s.bytes().all(|b| b.is_ascii_digit()) => {
            let year: i32 = s[0..4].parse().ok()?;
            let month: u32 = s[4..6].parse().ok()?;
            let day: u32 = s[6..8].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
            .ok(),
        _ => None,
    }
}

fn cell<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

/// Optional text column.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    cell(d)
}

/// Required text column; an empty cell is an error.
pub fn required_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    cell(d)?.ok_or_else(|| de::Error::custom("value is required"))
}

/// Required date column.
pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = required_text(d)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date {raw:?}")))
}

fn float(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>().map_err(|_| format!("invalid number {raw:?}"))
}

/// Numeric HHS metric; the suppression sentinel is stored as NULL.
pub fn metric<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match cell(d)? {
        None => Ok(None),
        Some(raw) => match float(&raw) {
            Ok(v) => Ok((v != SUPPRESSED).then_some(v)),
            Err(msg) => Err(de::Error::custom(msg)),
        },
    }
}

/// CMS star rating; `Not Available` loads as 0.
pub fn rating<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match cell(d)? {
        None => Ok(None),
        Some(raw) if raw == NOT_AVAILABLE => Ok(Some(0.0)),
        Some(raw) => float(&raw).map(Some).map_err(de::Error::custom),
    }
}

/// `Yes`/`No` flag.
pub fn yes_no<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    match cell(d)?.as_deref() {
        None | Some(NOT_AVAILABLE) => Ok(None),
        Some("Yes") => Ok(Some(true)),
        Some("No") => Ok(Some(false)),
        Some(other) => Err(de::Error::custom(format!("expected Yes or No, got {other:?}"))),
    }
}
