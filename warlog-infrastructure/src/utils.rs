use anyhow::{anyhow, Result};
use chrono::NaiveDate;

const DAY_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

/// Report day as `DD.MM.YYYY` or `YYYY-MM-DD`.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    DAY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| anyhow!("invalid day '{}', expected DD.MM.YYYY or YYYY-MM-DD", trimmed))
}
