//! Per-type cell formatting.
//!
//! All rendering follows one fixed locale convention: comma thousands
//! separators, `.` decimal point, `$` currency prefix and `M/D/YYYY` dates.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::data::model::{CellValue, ColumnKind};

/// Rendered in place of a null or absent value, whatever the column type.
pub const NOT_AVAILABLE: &str = "N/A";

pub const CURRENCY_SYMBOL: &str = "$";

/// Fraction digits shown for plain numbers before rounding kicks in.
const NUMBER_MAX_FRACTION_DIGITS: usize = 3;

/// Format a cell for display according to its column type.
///
/// Values that do not fit the declared type fall back to their raw string so
/// one bad cell never affects the rest of the row.
pub fn format_cell(value: &CellValue, kind: ColumnKind) -> String {
    if value.is_null() {
        return NOT_AVAILABLE.to_string();
    }

    match kind {
        ColumnKind::Currency => match value.as_f64() {
            Some(v) => format_currency(v),
            None => format!("{CURRENCY_SYMBOL}{value}"),
        },
        ColumnKind::Number => match value {
            CellValue::Integer(i) => group_integer(*i),
            CellValue::Float(v) => format_number(*v),
            other => other.to_string(),
        },
        ColumnKind::Date => match value {
            CellValue::Text(s) if s.contains('T') || s.contains('-') => {
                format_date(s).unwrap_or_else(|| s.clone())
            }
            other => other.to_string(),
        },
        ColumnKind::Boolean => match value {
            CellValue::Bool(b) => yes_no(*b).to_string(),
            other => yes_no(other.to_string().eq_ignore_ascii_case("true")).to_string(),
        },
        ColumnKind::String => value.to_string(),
    }
}

pub fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

/// `$` followed by the grouped amount with exactly two fraction digits.
pub fn format_currency(v: f64) -> String {
    format!("{CURRENCY_SYMBOL}{}", format_decimal(v, 2, 2))
}

/// Grouped number with up to three fraction digits, trailing zeros dropped.
pub fn format_number(v: f64) -> String {
    format_decimal(v, 0, NUMBER_MAX_FRACTION_DIGITS)
}

/// Parse a date or ISO datetime string and render it as `M/D/YYYY`.
pub fn format_date(s: &str) -> Option<String> {
    parse_calendar_date(s).map(|d| d.format("%-m/%-d/%Y").to_string())
}

/// Calendar date of a `YYYY-MM-DD` or ISO-8601 datetime string. Partial
/// dates (`YYYY-MM`, `YYYY`) mean the first day of the period.
///
/// Datetimes carrying an offset are converted to UTC first so the result
/// does not depend on the machine's timezone.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some((date_part, _)) = s.split_once('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
                return Some(dt.date());
            }
        }
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    // `1996-07-04 00:00:00.000`
    if let Some((date_part, _)) = s.split_once(' ') {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(dt.date());
        }
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| partial_date(s))
}

/// `YYYY-MM` or `YYYY`, read as the first day of that month or year.
fn partial_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.splitn(2, '-');
    let year = parts.next().filter(|y| y.len() == 4)?.parse().ok()?;
    let month = match parts.next() {
        Some(m) if m.len() == 2 => m.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn format_decimal(v: f64, min_fraction: usize, max_fraction: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let fixed = round_half_away(v.abs(), max_fraction);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.to_string();
    while frac.len() > min_fraction && frac.ends_with('0') {
        frac.pop();
    }

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');
    let sign = if v < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{sign}{}", group_digits(int_part))
    } else {
        format!("{sign}{}.{frac}", group_digits(int_part))
    }
}

/// Fixed-point text of `v` with `digits` fraction digits, ties rounded away
/// from zero on the shortest decimal form of `v` (`0.125` → `0.13`).
fn round_half_away(v: f64, digits: usize) -> String {
    match Decimal::from_str(&v.to_string()) {
        Ok(d) => {
            let rounded =
                d.round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.digits$}")
        }
        // Beyond Decimal's range; plain formatting is close enough there.
        Err(_) => format!("{v:.digits$}"),
    }
}

fn group_integer(i: i64) -> String {
    let digits = i.unsigned_abs().to_string();
    let sign = if i < 0 { "-" } else { "" };
    format!("{sign}{}", group_digits(&digits))
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ColumnKind; 5] = [
        ColumnKind::String,
        ColumnKind::Number,
        ColumnKind::Currency,
        ColumnKind::Date,
        ColumnKind::Boolean,
    ];

    #[test]
    fn test_null_is_not_available_for_every_kind() {
        for kind in ALL_KINDS {
            assert_eq!(format_cell(&CellValue::Null, kind), NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_cell(&CellValue::Float(1234.5), ColumnKind::Currency), "$1,234.50");
        assert_eq!(format_cell(&CellValue::Integer(18), ColumnKind::Currency), "$18.00");
        assert_eq!(format_cell(&CellValue::Float(0.005), ColumnKind::Currency), "$0.01");
        assert_eq!(format_cell(&CellValue::from("12 EUR"), ColumnKind::Currency), "$12 EUR");
        assert_eq!(format_cell(&CellValue::Float(-3.5), ColumnKind::Currency), "$-3.50");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_cell(&CellValue::Float(0.125), ColumnKind::Currency), "$0.13");
        assert_eq!(format_cell(&CellValue::Float(-0.125), ColumnKind::Currency), "$-0.13");
        assert_eq!(format_cell(&CellValue::Float(2.0625), ColumnKind::Number), "2.063");
        assert_eq!(format_cell(&CellValue::Float(1.0005), ColumnKind::Number), "1.001");
        assert_eq!(format_cell(&CellValue::Float(999.995), ColumnKind::Currency), "$1,000.00");
    }

    #[test]
    fn test_number() {
        assert_eq!(format_cell(&CellValue::Integer(1234567), ColumnKind::Number), "1,234,567");
        assert_eq!(format_cell(&CellValue::Integer(-1000), ColumnKind::Number), "-1,000");
        assert_eq!(format_cell(&CellValue::Float(1234.5678), ColumnKind::Number), "1,234.568");
        assert_eq!(format_cell(&CellValue::Float(2.50), ColumnKind::Number), "2.5");
        assert_eq!(format_cell(&CellValue::from("12-A"), ColumnKind::Number), "12-A");
    }

    #[test]
    fn test_date() {
        assert_eq!(format_cell(&CellValue::from("1996-07-04"), ColumnKind::Date), "7/4/1996");
        assert_eq!(
            format_cell(&CellValue::from("1996-07-04T00:00:00.000Z"), ColumnKind::Date),
            "7/4/1996"
        );
        assert_eq!(
            format_cell(&CellValue::from("1996-07-04T23:30:00-02:00"), ColumnKind::Date),
            "7/5/1996"
        );
        assert_eq!(
            format_cell(&CellValue::from("1996-07-04T10:15:00"), ColumnKind::Date),
            "7/4/1996"
        );
        assert_eq!(
            format_cell(&CellValue::from("1996-07-04 00:00:00.000"), ColumnKind::Date),
            "7/4/1996"
        );
    }

    #[test]
    fn test_partial_dates_start_the_period() {
        assert_eq!(format_cell(&CellValue::from("1996-07"), ColumnKind::Date), "7/1/1996");
        assert_eq!(format_date("1996").as_deref(), Some("1/1/1996"));
        assert_eq!(format_cell(&CellValue::from("1996-13"), ColumnKind::Date), "1996-13");
        assert_eq!(format_cell(&CellValue::from("96-07"), ColumnKind::Date), "96-07");
    }

    #[test]
    fn test_unparseable_date_degrades_to_raw() {
        assert_eq!(format_cell(&CellValue::from("not-a-date"), ColumnKind::Date), "not-a-date");
        assert_eq!(format_cell(&CellValue::from("July 4"), ColumnKind::Date), "July 4");
        assert_eq!(format_cell(&CellValue::Integer(19960704), ColumnKind::Date), "19960704");
    }

    #[test]
    fn test_boolean() {
        assert_eq!(format_cell(&CellValue::Bool(true), ColumnKind::Boolean), "Yes");
        assert_eq!(format_cell(&CellValue::Bool(false), ColumnKind::Boolean), "No");
        assert_eq!(format_cell(&CellValue::from("TRUE"), ColumnKind::Boolean), "Yes");
        assert_eq!(format_cell(&CellValue::from("yes"), ColumnKind::Boolean), "No");
        assert_eq!(format_cell(&CellValue::Integer(1), ColumnKind::Boolean), "No");
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(format_cell(&CellValue::from("  ALFKI "), ColumnKind::String), "  ALFKI ");
        assert_eq!(format_cell(&CellValue::Float(1.5), ColumnKind::String), "1.5");
    }

    #[test]
    fn test_formatting_is_repeatable() {
        let values = [
            CellValue::Float(98765.4321),
            CellValue::from("2020-02-29"),
            CellValue::Bool(true),
            CellValue::from("text"),
        ];
        for value in &values {
            for kind in ALL_KINDS {
                assert_eq!(format_cell(value, kind), format_cell(value, kind));
            }
        }
    }
}
