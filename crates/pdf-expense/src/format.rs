//! Locale formatting (fr-FR) for amounts, dates, sizes and file names

use crate::constants::FALLBACK_FILENAME;
use crate::types::ReportMetadata;
use chrono::{DateTime, NaiveDate};

/// Thousands separator used by fr-FR number formatting (narrow no-break space)
const GROUP_SEPARATOR: char = '\u{202f}';

/// Format an amount with two decimals, a decimal comma and grouped thousands:
/// `1234.5` becomes `"1 234,50"`. Non-finite values format as zero.
pub fn format_eur(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02}")
}

/// Human readable byte count: `1536` becomes `"1.5 KB"`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Reformat a mission date as `dd/mm/yyyy`.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps. Anything else is returned
/// trimmed but otherwise untouched.
pub fn format_mission_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return format_date(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return format_date(stamp.date_naive());
    }
    log::debug!("Mission date '{}' not recognised, printing it as entered", raw);
    raw.to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Replace every run of characters outside `[A-Za-z0-9_-]` with one `_`
pub fn sanitize_filename(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// `<name>_<mission date>_complet.pdf`, sanitized, with empty parts dropped
pub fn output_filename(metadata: &ReportMetadata) -> String {
    let parts: Vec<&str> = [metadata.name.trim(), metadata.mission_date.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    let base = if parts.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        parts.join("_")
    };
    format!("{}_complet.pdf", sanitize_filename(&base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(48.0), "48,00");
        assert_eq!(format_eur(0.0), "0,00");
        assert_eq!(format_eur(0.3), "0,30");
        assert_eq!(format_eur(1234.5), "1\u{202f}234,50");
        assert_eq!(format_eur(1_000_000.0), "1\u{202f}000\u{202f}000,00");
        assert_eq!(format_eur(f64::NAN), "0,00");
        assert_eq!(format_eur(-12.5), "-12,50");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_mission_date() {
        assert_eq!(format_mission_date("2024-05-17"), "17/05/2024");
        assert_eq!(format_mission_date("2024-05-17T09:30:00+02:00"), "17/05/2024");
        assert_eq!(format_mission_date(" mi-mai "), "mi-mai");
        assert_eq!(format_mission_date(""), "");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Jean Dupont_2024-05-17"), "Jean_Dupont_2024-05-17");
        assert_eq!(sanitize_filename("Léa  O'Brien"), "L_a_O_Brien");
    }
}
