//! Column decoding shared by the `*Row::into_entity` conversions.
//!
//! Ids are stored as hyphenated UUID text and timestamps as RFC3339 text.

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

pub fn parse_uuid(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| DomainError::InvalidUuid(raw.to_string()))
}

pub fn parse_optional_uuid(raw: &Option<String>) -> DomainResult<Option<Uuid>> {
    raw.as_deref().map(parse_uuid).transpose()
}

pub fn parse_datetime(raw: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::Internal(format!("Invalid date format: {}", raw)))
}

pub fn parse_optional_datetime(raw: &Option<String>) -> DomainResult<Option<DateTime<Utc>>> {
    raw.as_deref().map(parse_datetime).transpose()
}

pub fn parse_decimal(raw: &str) -> DomainResult<Decimal> {
    Decimal::from_str(raw).map_err(|_| DomainError::Internal(format!("Invalid decimal value: {}", raw)))
}

/// Canonical text form for timestamps; fixed width so that TEXT ordering in
/// SQLite matches chronological ordering.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
