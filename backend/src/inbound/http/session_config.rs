//! Session cookie settings read from the environment.
//!
//! | Variable | Meaning | Debug default |
//! | --- | --- | --- |
//! | `SESSION_KEY_FILE` | signing/encryption key, at least 64 bytes | generated key |
//! | `SESSION_COOKIE_SECURE` | mark the cookie `Secure` | `true` |
//! | `SESSION_SAMESITE` | `Strict`, `Lax` or `None` | `Lax` |
//! | `SESSION_ALLOW_EPHEMERAL` | accept a generated key when the file is unreadable | `false` |
//! | `SESSION_TTL_HOURS` | cookie lifetime in hours | [`GUEST_SESSION_TTL_HOURS`] |
//!
//! Debug builds log a warning and fall back to the default for missing or
//! malformed values. Release builds reject them, except `SESSION_TTL_HOURS`,
//! which always defaults.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

use crate::domain::GUEST_SESSION_TTL_HOURS;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_HOURS_ENV: &str = "SESSION_TTL_HOURS";

const KEY_FILE_DEFAULT: &str = "/var/run/secrets/session_key";
const KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "a positive number of hours";

/// Whether configuration problems are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Fall back to defaults with a warning.
    Debug,
    /// Refuse to start on missing or malformed values.
    Release,
}

impl BuildMode {
    /// The mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Whether the cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
    /// Cookie lifetime in hours.
    pub ttl_hours: i64,
}

impl SessionSettings {
    /// Short hex fingerprint of the signing key for startup logs.
    ///
    /// ```
    /// use actix_web::cookie::Key;
    /// use carelink::inbound::http::session_config::key_fingerprint;
    ///
    /// let fingerprint = key_fingerprint(&Key::derive_from(&[7; 64]));
    /// assert_eq!(fingerprint.len(), 16);
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        key_fingerprint(&self.key)
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required variable is unset.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable holds a value outside its vocabulary.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is shorter than [`KEY_MIN_LEN`] bytes.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without a secure cookie.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Generated keys are not allowed in release builds.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Truncated SHA-256 of the key's signing half, lowercase hex.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}

/// Read and validate the session settings.
///
/// ```
/// use carelink::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.ttl_hours, 24);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let reader = Reader { env, mode };
    let cookie_secure = reader.toggle(COOKIE_SECURE_ENV, BOOL_EXPECTED, parse_bool, true)?;
    let same_site = reader.toggle(SAMESITE_ENV, SAMESITE_EXPECTED, parse_same_site, SameSite::Lax)?;
    if same_site == SameSite::None && !cookie_secure {
        reader.tolerate(SessionConfigError::InsecureSameSiteNone)?;
    }
    let allow_ephemeral = reader.toggle(ALLOW_EPHEMERAL_ENV, BOOL_EXPECTED, parse_bool, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let ttl_hours = reader.ttl_hours()?;
    let key = reader.key(allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl_hours,
    })
}

struct Reader<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> Reader<'_, E> {
    /// Downgrade `error` to a warning in debug builds.
    fn tolerate(&self, error: SessionConfigError) -> Result<(), SessionConfigError> {
        match self.mode {
            BuildMode::Debug => {
                warn!(%error, "session configuration problem ignored in debug build");
                Ok(())
            }
            BuildMode::Release => Err(error),
        }
    }

    fn toggle<T: Copy>(
        &self,
        name: &'static str,
        expected: &'static str,
        parse: fn(&str) -> Option<T>,
        debug_default: T,
    ) -> Result<T, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            self.tolerate(SessionConfigError::MissingEnv { name })?;
            return Ok(debug_default);
        };
        match parse(value.trim()) {
            Some(parsed) => Ok(parsed),
            None => {
                self.tolerate(SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected,
                })?;
                Ok(debug_default)
            }
        }
    }

    fn ttl_hours(&self) -> Result<i64, SessionConfigError> {
        let Some(value) = self.env.string(TTL_HOURS_ENV) else {
            return Ok(GUEST_SESSION_TTL_HOURS);
        };
        match value.trim().parse::<i64>() {
            Ok(hours) if hours > 0 => Ok(hours),
            _ => {
                self.tolerate(SessionConfigError::InvalidEnv {
                    name: TTL_HOURS_ENV,
                    value,
                    expected: TTL_EXPECTED,
                })?;
                Ok(GUEST_SESSION_TTL_HOURS)
            }
        }
    }

    fn key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| KEY_FILE_DEFAULT.to_owned()),
        );
        let mut bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if allow_ephemeral || self.mode == BuildMode::Debug => {
                warn!(path = %path.display(), error = %source, "using a generated session key");
                return Ok(Key::generate());
            }
            Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
        };
        let length = bytes.len();
        if length < KEY_MIN_LEN {
            bytes.zeroize();
            let error = SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: KEY_MIN_LEN,
            };
            self.tolerate(error)?;
            return Ok(Key::generate());
        }
        let key = Key::derive_from(&bytes);
        bytes.zeroize();
        Ok(key)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
