//! Poll API adapter. Implements PollSourcePort and PollUpdatePort over HTTP.
//!
//! `GET {base}/polls/{id}` loads the poll, `PATCH {base}/polls/{id}` applies a change.

use crate::domain::{DomainError, Poll, PollChange};
use crate::ports::{PollSourcePort, PollUpdatePort};
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use tracing::debug;

/// Remote poll gateway.
///
/// The change payload uses the keys the poll backend expects
/// (`title`, `timeZone`, `optionsToAdd`, `optionsToDelete`, `closed`, ...).
pub struct HttpPollGateway {
    client: Arc<Client>,
    base_url: String,
    poll_id: String,
    token: Option<String>,
}

impl HttpPollGateway {
    /// Create a new gateway.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://polls.example.com/api`
    /// * `poll_id` - ID of the poll being managed
    /// * `token` - Optional bearer token
    pub fn new(base_url: String, poll_id: String, token: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url,
            poll_id,
            token,
        }
    }

    fn poll_url(&self) -> String {
        format!("{}/polls/{}", self.base_url.trim_end_matches('/'), self.poll_id)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait::async_trait]
impl PollSourcePort for HttpPollGateway {
    async fn load_poll(&self) -> Result<Poll, DomainError> {
        let res = self
            .authorize(self.client.get(self.poll_url()))
            .send()
            .await
            .map_err(|e| DomainError::Repo(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Repo(format!(
                "Poll API error {}: {}",
                status, text
            )));
        }

        res.json::<Poll>()
            .await
            .map_err(|e| DomainError::Repo(format!("Invalid poll payload: {}", e)))
    }
}

#[async_trait::async_trait]
impl PollUpdatePort for HttpPollGateway {
    async fn submit(&self, change: &PollChange) -> Result<(), DomainError> {
        debug!(poll_id = %self.poll_id, kind = change.kind(), "submitting poll update");
        let res = self
            .authorize(self.client.patch(self.poll_url()))
            .json(change)
            .send()
            .await
            .map_err(|e| DomainError::MutationRejected(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::MutationRejected(format!(
                "Poll API error {}: {}",
                status, text
            )));
        }

        Ok(())
    }
}
