//! Port for reading account profiles and their login credentials.

use async_trait::async_trait;

use crate::domain::{PasswordDigest, Profile, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
    }
}

/// Read access to account profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile by identifier.
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Fetch a profile and its password digest by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Profile, PasswordDigest)>, ProfileRepositoryError>;
}
