//! Stock movement models

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_positive;

/// A stock-in or stock-out movement. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub material_id: String,
    pub material_name: Option<String>,
    #[serde(rename = "type")]
    pub direction: StockDirection,
    pub quantity: Decimal,
    pub reference_number: String,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub notes: Option<String>,
    /// Timestamp exactly as received
    pub created_at_raw: String,
    /// Parsed timestamp, `None` when the raw value is not a recognised format
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl Transaction {
    /// Calendar date of the movement, if its timestamp parsed
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.date_naive())
    }
}

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    In,
    Out,
}

impl StockDirection {
    pub fn code(&self) -> &'static str {
        match self {
            StockDirection::In => "in",
            StockDirection::Out => "out",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "in" | "stock_in" => Some(StockDirection::In),
            "out" | "stock_out" => Some(StockDirection::Out),
            _ => None,
        }
    }
}

impl std::fmt::Display for StockDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockDirection::In => write!(f, "Stock In"),
            StockDirection::Out => write!(f, "Stock Out"),
        }
    }
}

/// Parse a timestamp in any of the shapes the upstream service emits.
///
/// Accepts RFC 3339, naive ISO date-times (treated as UTC, with `T` or a
/// space separator, optional fractional seconds) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Payload for recording a stock movement upstream
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransactionInput {
    #[validate(length(min = 1, message = "Material is required"))]
    pub material_id: String,
    pub material_name: String,
    #[serde(rename = "type")]
    pub direction: StockDirection,
    #[validate(custom = "validate_positive")]
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Reference number is required"))]
    pub reference_number: String,
    pub supplier_name: Option<String>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "Recorded-by user is required"))]
    pub created_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2024-03-05T10:15:00+05:30").unwrap();
        assert_eq!(ts.hour(), 4);
        assert_eq!(ts.minute(), 45);
    }

    #[test]
    fn test_parse_naive_iso_with_fraction() {
        let ts = parse_timestamp("2024-03-05T10:15:00.123456").unwrap();
        assert_eq!(ts.day(), 5);
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_space_separated_and_bare_date() {
        assert!(parse_timestamp("2024-03-05 10:15:00").is_some());
        let ts = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(StockDirection::parse("IN"), Some(StockDirection::In));
        assert_eq!(StockDirection::parse(" out "), Some(StockDirection::Out));
        assert_eq!(StockDirection::parse("transfer"), None);
        assert_eq!(StockDirection::Out.to_string(), "Stock Out");
    }
}
