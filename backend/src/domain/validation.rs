//! Field checks shared by the administrative services.

use serde_json::json;

use crate::domain::Error;

/// Trimmed value of a required text field.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(
            Error::invalid_request(format!("missing required field: {field}")).with_details(
                json!({
                    "field": field,
                    "code": "missing_field",
                }),
            ),
        );
    }
    Ok(trimmed.to_owned())
}

/// Trimmed optional text, with blanks treated as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
