//! Text encodings used by the SQLite columns.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::domain::validation::PRICE_DECIMAL_PLACES;
use crate::domain::DomainError;

/// Canonical two-decimal form, e.g. `19.9` -> `"19.90"`.
pub fn encode_price(value: Decimal) -> String {
    let mut value = value;
    value.rescale(PRICE_DECIMAL_PLACES);
    value.to_string()
}

pub fn decode_price(raw: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(raw)
        .map_err(|e| DomainError::Internal(format!("Corrupt price '{}': {}", raw, e)))
}

pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("Corrupt timestamp '{}': {}", raw, e)))
}

pub fn encode_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub fn decode_date(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| DomainError::Internal(format!("Corrupt date '{}': {}", raw, e)))
}
