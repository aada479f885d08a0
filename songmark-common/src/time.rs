//! Timestamp utilities

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};

use crate::{Error, Result};

/// Current UTC time at storage precision (milliseconds)
///
/// Values from here survive a round trip through [`to_storage_string`] unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Render a timestamp the way it is persisted (RFC 3339, millisecond precision, `Z` suffix)
pub fn to_storage_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted RFC 3339 timestamp back to UTC
pub fn parse_storage_string(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp '{}': {}", value, e)))
}

/// True when `created_at` lies within `days` days before `reference`
pub fn is_within_days(created_at: &DateTime<Utc>, reference: &DateTime<Utc>, days: i64) -> bool {
    reference.signed_duration_since(*created_at) <= Duration::days(days)
}
