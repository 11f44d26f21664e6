//! Application settings and the server configuration built from them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use carelink::inbound::http::session_config::SessionSettings;
use carelink::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 10;

/// Settings loaded from `CARELINK_*` environment variables, configuration
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CARELINK")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// PEM-encoded VAPID private key. Push delivery is disabled without it.
    pub vapid_key_file: Option<PathBuf>,
    /// VAPID contact, e.g. `mailto:ops@example.org`.
    pub vapid_subject: Option<String>,
    /// Per-request timeout for push deliveries, in seconds.
    pub push_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Parse the listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] of kind `InvalidInput` for malformed
    /// addresses.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid CARELINK_BIND_ADDR '{raw}': {err}"),
            )
        })
    }

    /// Pool settings for the configured database.
    #[must_use]
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_url.clone())
            .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_SIZE))
    }

    /// Timeout applied to each push delivery.
    #[must_use]
    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs.unwrap_or(DEFAULT_PUSH_TIMEOUT_SECS))
    }
}

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl_hours: i64,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) push: PushSettings,
}

/// Web Push delivery settings.
pub struct PushSettings {
    pub(crate) vapid_key_file: Option<PathBuf>,
    pub(crate) vapid_subject: Option<String>,
    pub(crate) timeout: Duration,
}

impl ServerConfig {
    /// Combine validated session settings with the application settings.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        settings: &AppSettings,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            session_ttl_hours: session.ttl_hours,
            bind_addr,
            db_pool,
            push: PushSettings {
                vapid_key_file: settings.vapid_key_file.clone(),
                vapid_subject: settings.vapid_subject.clone(),
                timeout: settings.push_timeout(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "CARELINK_DATABASE_URL",
        "CARELINK_BIND_ADDR",
        "CARELINK_POOL_MAX_SIZE",
        "CARELINK_VAPID_KEY_FILE",
        "CARELINK_VAPID_SUBJECT",
        "CARELINK_PUSH_TIMEOUT_SECS",
    ];

    fn load(vars: &[(&str, &str)]) -> AppSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = vars
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        AppSettings::load_from_iter([OsString::from("carelink")]).expect("settings load")
    }

    #[rstest]
    fn defaults_apply_when_only_the_database_is_set() {
        let settings = load(&[("CARELINK_DATABASE_URL", "postgres://localhost/carelink")]);
        assert_eq!(settings.database_url, "postgres://localhost/carelink");
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.pool_config().max_size(), DEFAULT_POOL_SIZE);
        assert_eq!(settings.push_timeout(), Duration::from_secs(10));
        assert!(settings.vapid_key_file.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load(&[
            ("CARELINK_DATABASE_URL", "postgres://db/carelink"),
            ("CARELINK_BIND_ADDR", "127.0.0.1:9000"),
            ("CARELINK_POOL_MAX_SIZE", "4"),
            ("CARELINK_VAPID_KEY_FILE", "/run/secrets/vapid.pem"),
            ("CARELINK_VAPID_SUBJECT", "mailto:ops@example.org"),
            ("CARELINK_PUSH_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.pool_config().max_size(), 4);
        assert_eq!(
            settings.vapid_key_file,
            Some(PathBuf::from("/run/secrets/vapid.pem"))
        );
        assert_eq!(settings.vapid_subject.as_deref(), Some("mailto:ops@example.org"));
        assert_eq!(settings.push_timeout(), Duration::from_secs(3));
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let settings = load(&[
            ("CARELINK_DATABASE_URL", "postgres://db/carelink"),
            ("CARELINK_BIND_ADDR", "localhost"),
        ]);
        let err = settings.bind_addr().expect_err("no port");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
