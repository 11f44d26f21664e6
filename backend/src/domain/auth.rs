//! Account login credentials and password digests.
//!
//! Inbound adapters validate raw payload strings through
//! [`LoginCredentials::try_from_parts`] before talking to a login port.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::ids::ProfileId;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use carelink::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Example.org ", "secret").unwrap();
/// assert_eq!(creds.email(), "admin@example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the profile lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Salted SHA-256 password digest stored alongside a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: String,
    digest: String,
}

const SALT_BYTES: usize = 16;

impl PasswordDigest {
    /// Rebuild a digest from stored hex columns.
    pub fn from_stored(salt: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            digest: digest.into(),
        }
    }

    /// Derive a digest for `password` using a freshly generated salt.
    pub fn generate(password: &str) -> Self {
        let mut salt = [0_u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let digest = Self::compute(&salt, password);
        Self { salt, digest }
    }

    fn compute(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether `password` produces this digest.
    pub fn matches(&self, password: &str) -> bool {
        let candidate = Self::compute(&self.salt, password);
        // Compare every byte so timing does not reveal the matching prefix.
        candidate.len() == self.digest.len()
            && candidate
                .bytes()
                .zip(self.digest.bytes())
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    /// Hex-encoded salt.
    pub fn salt(&self) -> &str {
        self.salt.as_str()
    }

    /// Hex-encoded digest.
    pub fn digest(&self) -> &str {
        self.digest.as_str()
    }
}

/// Stored login record for a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Profile owning the credentials.
    pub profile_id: ProfileId,
    /// Salted password digest.
    pub password: PasswordDigest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("carer@example.org", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn digest_matches_only_the_original_password() {
        let digest = PasswordDigest::generate("correct horse");
        assert!(digest.matches("correct horse"));
        assert!(!digest.matches("correct horse "));
        assert!(!digest.matches("battery staple"));
    }

    #[rstest]
    fn stored_digest_round_trips_through_columns() {
        let digest = PasswordDigest::generate("secret");
        let restored = PasswordDigest::from_stored(digest.salt(), digest.digest());
        assert!(restored.matches("secret"));
    }
}
