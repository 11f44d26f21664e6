//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialize into loosely typed DTOs (`Option<String>` and
//! friends) so that missing or malformed values surface as `invalid_request`
//! errors carrying `{field, code}` details instead of framework rejections.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{DayOfWeek, Error, IdValidationError, WallTime};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidTime,
    InvalidDayOfWeek,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTime => "invalid_time",
            ErrorCode::InvalidDayOfWeek => "invalid_day_of_week",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    ValidationError::new(field, format!("missing required field: {}", field.as_str()))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, message: &str) -> Error {
    ValidationError::new(field, format!("{}: {message}", field.as_str()))
        .with_value(ErrorCode::InvalidValue, value)
}

/// Unwrap a required DTO field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Unwrap a required string field, treating blank input as missing.
pub(crate) fn require_present(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}

/// Parse a typed UUID identifier.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<String, Error = IdValidationError>,
{
    T::try_from(value.to_owned()).map_err(|_| {
        ValidationError::new(field, format!("{} must be a valid UUID", field.as_str()))
            .with_value(ErrorCode::InvalidUuid, value)
    })
}

/// Parse an optional typed UUID identifier.
pub(crate) fn parse_optional_id<T>(value: Option<&str>, field: FieldName) -> Result<Option<T>, Error>
where
    T: TryFrom<String, Error = IdValidationError>,
{
    value.map(|raw| parse_id(raw, field)).transpose()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ValidationError::new(field, format!("{} must be formatted as YYYY-MM-DD", field.as_str()))
            .with_value(ErrorCode::InvalidDate, value)
    })
}

/// Parse an optional `YYYY-MM-DD` calendar date.
pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_date(raw, field)).transpose()
}

/// Parse a zero-padded `HH:MM` or `HH:MM:SS` wall-clock time.
pub(crate) fn parse_wall_time(value: &str, field: FieldName) -> Result<WallTime, Error> {
    WallTime::parse(value).map_err(|err| {
        ValidationError::new(field, format!("{}: {err}", field.as_str()))
            .with_value(ErrorCode::InvalidTime, value)
    })
}

/// Validate a day-of-week integer (`0 = Sunday`).
pub(crate) fn parse_day_of_week(value: i64, field: FieldName) -> Result<DayOfWeek, Error> {
    DayOfWeek::new(value).map_err(|err| {
        ValidationError::new(field, err.to_string())
            .with_value(ErrorCode::InvalidDayOfWeek, value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, TaskId};
    use rstest::rstest;
    use serde_json::Value;

    const FIELD: FieldName = FieldName::new("startTime");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<String>(None, FIELD).expect_err("missing");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(&Value::from("startTime")));
        assert_eq!(detail(&err, "code"), Some(&Value::from("missing_field")));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn blank_strings_count_as_missing(#[case] raw: Option<&str>) {
        let err = require_present(raw.map(str::to_owned), FIELD).expect_err("blank");
        assert_eq!(detail(&err, "code"), Some(&Value::from("missing_field")));
    }

    #[rstest]
    #[case("8:00")]
    #[case("24:00")]
    #[case("08-00")]
    fn malformed_times_are_rejected(#[case] raw: &str) {
        let err = parse_wall_time(raw, FIELD).expect_err("invalid time");
        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_time")));
        assert_eq!(detail(&err, "value"), Some(&Value::from(raw)));
    }

    #[rstest]
    fn times_keep_their_original_form() {
        let time = parse_wall_time("07:05:30", FIELD).expect("valid time");
        assert_eq!(time.as_str(), "07:05:30");
    }

    #[rstest]
    #[case("2024-02-30")]
    #[case("05/06/2024")]
    fn malformed_dates_are_rejected(#[case] raw: &str) {
        let err = parse_date(raw, FieldName::new("date")).expect_err("invalid date");
        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_date")));
    }

    #[rstest]
    #[case(-1)]
    #[case(7)]
    fn out_of_range_days_are_rejected(#[case] raw: i64) {
        let err = parse_day_of_week(raw, FieldName::new("dayOfWeek")).expect_err("invalid day");
        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_day_of_week")));
    }

    #[rstest]
    fn ids_must_be_uuids() {
        let err = parse_id::<TaskId>("task-1", FieldName::new("taskId")).expect_err("invalid id");
        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_uuid")));
        let parsed: Option<TaskId> =
            parse_optional_id(None, FieldName::new("taskId")).expect("absent id is fine");
        assert!(parsed.is_none());
    }
}
