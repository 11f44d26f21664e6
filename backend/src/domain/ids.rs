//! Strongly typed UUID identifiers for every persisted entity.
//!
//! Each identifier is a distinct type so a task id can never be passed where a
//! caregiver id is expected. All of them serialise as hyphenated UUID strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The input was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The input was not a UUID, or carried surrounding whitespace.
    #[error("identifier must be a valid UUID")]
    Invalid,
}

fn parse_uuid(raw: &str) -> Result<Uuid, IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdValidationError::Invalid);
    }
    Uuid::parse_str(raw).map_err(|_| IdValidationError::Invalid)
}

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdValidationError> {
                parse_uuid(raw.as_ref()).map(Self)
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_uuid_id!(
    /// Identifier of an authenticated account profile.
    ProfileId
);
define_uuid_id!(
    /// Identifier of a caregiver record (linked or guest).
    CaregiverId
);
define_uuid_id!(
    /// Identifier of a care recipient.
    CareRecipientId
);
define_uuid_id!(
    /// Identifier of a weekly schedule slot.
    ScheduleId
);
define_uuid_id!(
    /// Identifier of a task attached to a schedule.
    TaskId
);
define_uuid_id!(
    /// Identifier of a medication.
    MedicationId
);
define_uuid_id!(
    /// Identifier of a medication dosing time.
    MedicationScheduleId
);
define_uuid_id!(
    /// Identifier of an appointment.
    AppointmentId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case("not-a-uuid", IdValidationError::Invalid)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdValidationError::Invalid)]
    fn rejects_invalid_input(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(TaskId::new(raw), Err(expected));
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = CaregiverId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let value = serde_json::to_value(id).expect("serialise");
        assert_eq!(value, serde_json::json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        let back: CaregiverId = serde_json::from_value(value).expect("deserialise");
        assert_eq!(back, id);
    }
}
