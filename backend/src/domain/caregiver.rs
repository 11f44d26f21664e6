//! Caregivers and guest access codes.
//!
//! A caregiver is either *linked* to an account profile, in which case the
//! profile is the source of the display name and contact details, or a
//! *guest* carrying its own contact fields and, optionally, an access code.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ids::{CaregiverId, ProfileId};

/// Smallest value an access code may take.
pub const ACCESS_CODE_MIN: u32 = 100_000;
/// Largest value an access code may take.
pub const ACCESS_CODE_MAX: u32 = 999_999;

/// Validation errors for [`AccessCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessCodeError {
    /// The input was not exactly six characters long.
    #[error("access code must be exactly 6 digits")]
    WrongLength,
    /// The input contained a non-digit character.
    #[error("access code must contain only digits")]
    NotNumeric,
}

/// Six-digit numeric shared secret used for guest sessions.
///
/// # Examples
/// ```
/// use carelink::domain::AccessCode;
///
/// let code = AccessCode::parse(" 123456 ").unwrap();
/// assert_eq!(code.as_str(), "123456");
/// assert!(AccessCode::parse("12a456").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessCode(String);

impl AccessCode {
    /// Validate a user-supplied code. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, AccessCodeError> {
        let trimmed = raw.trim();
        if trimmed.len() != 6 {
            return Err(AccessCodeError::WrongLength);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccessCodeError::NotNumeric);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Draw a uniformly random code in `[100000, 999999]`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value = rng.gen_range(ACCESS_CODE_MIN..=ACCESS_CODE_MAX);
        Self(value.to_string())
    }

    /// Code digits.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Access codes are credentials; keep them out of logs.
impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessCode(******)")
    }
}

impl From<AccessCode> for String {
    fn from(value: AccessCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccessCode {
    type Error = AccessCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Authoritative source of a caregiver's name and contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CaregiverContact {
    /// Details come from the linked profile.
    Linked {
        /// Linked account.
        profile_id: ProfileId,
        /// Profile display name.
        name: String,
        /// Profile email.
        email: String,
    },
    /// Details are stored on the caregiver record itself.
    Guest {
        /// Guest display name.
        name: String,
        /// Optional phone number.
        #[serde(skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        /// Optional email address.
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

/// A person who can be scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caregiver {
    /// Caregiver identifier.
    pub id: CaregiverId,
    /// Name and contact source.
    pub contact: CaregiverContact,
    /// Current guest access code, if one was issued.
    pub access_code: Option<AccessCode>,
    /// Inactive caregivers cannot log in or act.
    pub is_active: bool,
}

impl Caregiver {
    /// Display name resolved from the authoritative contact source.
    pub fn display_name(&self) -> &str {
        match &self.contact {
            CaregiverContact::Linked { name, .. } | CaregiverContact::Guest { name, .. } => name,
        }
    }

    /// Linked profile, when this is not a guest caregiver.
    pub fn profile_id(&self) -> Option<ProfileId> {
        match &self.contact {
            CaregiverContact::Linked { profile_id, .. } => Some(*profile_id),
            CaregiverContact::Guest { .. } => None,
        }
    }

    /// Whether the caregiver has no linked profile.
    pub fn is_guest(&self) -> bool {
        matches!(self.contact, CaregiverContact::Guest { .. })
    }
}

/// Contact details supplied when creating a caregiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewCaregiverContact {
    /// Link to an existing profile.
    Linked(ProfileId),
    /// Store guest contact fields.
    Guest {
        /// Guest display name, non-empty.
        name: String,
        /// Optional phone number.
        phone: Option<String>,
        /// Optional email address.
        email: Option<String>,
    },
}

/// Validated input for a caregiver insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCaregiver {
    /// Caregiver identifier chosen by the service.
    pub id: CaregiverId,
    /// Contact source.
    pub contact: NewCaregiverContact,
    /// Initial access code.
    pub access_code: Option<AccessCode>,
    /// Initial active flag.
    pub is_active: bool,
}
