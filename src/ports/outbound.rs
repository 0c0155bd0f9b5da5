//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, Poll, PollChange};
use std::path::PathBuf;

/// Poll source. Supplies the materialized poll aggregate.
#[async_trait::async_trait]
pub trait PollSourcePort: Send + Sync {
    async fn load_poll(&self) -> Result<Poll, DomainError>;
}

/// Update collaborator. Applies a partial change to the persisted poll.
///
/// Called once per user action. Failures map to `DomainError::MutationRejected`.
#[async_trait::async_trait]
pub trait PollUpdatePort: Send + Sync {
    async fn submit(&self, change: &PollChange) -> Result<(), DomainError>;
}

/// File-download collaborator. Persists an exported payload under a suggested name.
#[async_trait::async_trait]
pub trait DownloadPort: Send + Sync {
    /// Returns the location the payload was written to.
    async fn save(&self, payload: &str, suggested_name: &str) -> Result<PathBuf, DomainError>;
}
