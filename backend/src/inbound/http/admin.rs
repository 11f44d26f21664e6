//! Admin-only endpoints for the care team, care plans and appointments.
//!
//! Every handler extracts [`AdminActor`], so anonymous callers get `401` and
//! signed-in caregivers or guests get `403`. Writes touch a single row except
//! multi-day schedule creation, which reports each day separately.
//!
//! [`AdminActor`]: crate::inbound::http::guards::AdminActor

mod appointments;
mod care_plan;
mod care_team;

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::validation::{FieldName, require};

pub use appointments::*;
pub use care_plan::*;
pub use care_team::*;

/// Body of the `PATCH` endpoints that toggle an active flag.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveFlagRequest {
    /// New value of the flag.
    pub is_active: Option<bool>,
}

impl ActiveFlagRequest {
    fn into_flag(self) -> Result<bool, Error> {
        require(self.is_active, FieldName::new("isActive"))
    }
}

/// Trim optional free text, dropping it when blank.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
