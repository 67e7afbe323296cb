//! Expiry arithmetic for tokens, sessions, and verification codes.
//!
//! Lifetimes arrive from configuration as compact strings (`"15m"`, `"1h"`,
//! `"30d"`); everything here is a pure function of the current clock.

use chrono::{DateTime, Duration, Utc};

use crate::error::AuthServiceError;

/// Seconds in one day; the refresh-rotation threshold.
pub const ONE_DAY_SECS: i64 = 24 * 60 * 60;

/// Parse a `<value><unit>` lifetime string where unit is `m` (minutes),
/// `h` (hours), or `d` (days).
pub fn parse_expires_in(spec: &str) -> Result<Duration, AuthServiceError> {
    let invalid = || {
        AuthServiceError::Validation(format!(
            "invalid lifetime {spec:?}, use forms like \"15m\", \"1h\", \"30d\""
        ))
    };

    if spec.len() < 2 {
        return Err(invalid());
    }
    let (value, unit) = spec.split_at(spec.len() - 1);
    let value: i64 = value.parse().map_err(|_| invalid())?;
    if value <= 0 {
        return Err(invalid());
    }
    match unit {
        "m" => Ok(Duration::minutes(value)),
        "h" => Ok(Duration::hours(value)),
        "d" => Ok(Duration::days(value)),
        _ => Err(invalid()),
    }
}

/// Email-verification codes live 45 minutes from their creation instant.
pub fn forty_five_minutes_after(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::minutes(45)
}

/// Password-reset codes live one hour from their creation instant.
pub fn an_hour_after(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::hours(1)
}
