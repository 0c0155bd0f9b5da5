//! Confirmation outbound port. Render a blocking prompt and wait for the answer.

use crate::domain::{Confirmation, ConfirmPrompt, DomainError};

/// Port for asking the user to acknowledge a destructive change.
///
/// Implemented by adapters (e.g. terminal prompt). Declining is a normal
/// outcome (`Confirmation::Cancel`), not an error.
#[async_trait::async_trait]
pub trait ConfirmPort: Send + Sync {
    /// # Errors
    /// Returns `DomainError::Prompt` if the prompt could not be rendered or read.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> Result<Confirmation, DomainError>;
}
