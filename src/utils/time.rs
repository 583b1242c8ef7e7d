use crate::error::{validation_error, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format used by local form submissions (no seconds)
const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format used by form-submitted recurrence end dates
const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a datetime in the local form-submitted format (YYYY-MM-DDTHH:MM)
pub fn parse_form_datetime(value: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, FORM_DATETIME_FORMAT)
        .map_err(|e| validation_error(&format!("Failed to parse datetime '{}': {}", value, e)))
}

/// Parse a date in the form-submitted format (YYYY-MM-DD)
pub fn parse_form_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, FORM_DATE_FORMAT)
        .map_err(|e| validation_error(&format!("Failed to parse date '{}': {}", value, e)))
}

/// Parse a timestamp in either boundary format: full ISO-8601 (API-submitted,
/// with or without an offset) or the local form format without seconds.
///
/// Timezone handling is out of scope; an explicit offset is accepted but the
/// clock-face value is kept as-is.
pub fn parse_timestamp(value: &str) -> AppResult<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, FORM_DATETIME_FORMAT) {
        return Ok(dt);
    }
    // A bare date is accepted as midnight, matching recurrence end submissions
    if let Ok(date) = parse_form_date(value) {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(validation_error(&format!(
        "Unrecognized timestamp format: '{}'",
        value
    )))
}
