//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Advisory shown instead of the options editor for legacy polls.
pub const LEGACY_POLL_ADVISORY: &str =
    "This poll was created with an older version and does not support this feature.";

#[derive(Error, Debug)]
pub enum DomainError {
    /// User-entered option could not be parsed. Surfaced for inline correction.
    #[error("Invalid option format: {0}")]
    InvalidOptionFormat(String),

    /// Option edit attempted on a legacy poll. Advisory, not a fault.
    #[error("{}", LEGACY_POLL_ADVISORY)]
    LegacyPollUnsupported,

    /// Update collaborator refused or failed. No local retry.
    #[error("Update rejected: {0}")]
    MutationRejected(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
