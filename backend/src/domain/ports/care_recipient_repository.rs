//! Port for care recipient persistence.

use async_trait::async_trait;

use crate::domain::{CareRecipient, CareRecipientId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by care recipient repository adapters.
    pub enum CareRecipientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "care recipient repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "care recipient repository query failed: {message}",
    }
}

/// Persistence for care recipients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CareRecipientRepository: Send + Sync {
    /// List every recipient ordered by name.
    async fn list(&self) -> Result<Vec<CareRecipient>, CareRecipientRepositoryError>;

    /// Fetch the recipients with the given identifiers. Missing ids are
    /// skipped.
    async fn find_many(
        &self,
        ids: &[CareRecipientId],
    ) -> Result<Vec<CareRecipient>, CareRecipientRepositoryError>;

    /// Insert a recipient.
    async fn create(&self, recipient: &CareRecipient) -> Result<(), CareRecipientRepositoryError>;

    /// Delete a recipient. Returns `false` when it was missing.
    async fn delete(&self, id: &CareRecipientId) -> Result<bool, CareRecipientRepositoryError>;
}
