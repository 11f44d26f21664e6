//! People receiving care.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::CareRecipientId;

/// A person receiving care.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareRecipient {
    /// Recipient identifier.
    pub id: CareRecipientId,
    /// Display name.
    pub name: String,
    /// Date of birth, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// Free-text notes for caregivers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
