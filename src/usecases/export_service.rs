//! Export service. Vote matrix -> CSV text -> download collaborator.
//!
//! Read-only: never mutates the poll.

use crate::adapters::export::{export_csv, suggested_file_name};
use crate::domain::display::decode_options;
use crate::domain::{DomainError, Poll};
use crate::ports::DownloadPort;
use chrono::{Local, NaiveDateTime};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Service for exporting a poll's vote matrix.
pub struct ExportService {
    download: Arc<dyn DownloadPort>,
    viewer_tz: Option<Tz>,
}

impl ExportService {
    /// # Arguments
    /// * `download` - Download port implementation (filesystem, etc.)
    /// * `viewer_tz` - Zone time slots are shown in; `None` keeps stored times
    pub fn new(download: Arc<dyn DownloadPort>, viewer_tz: Option<Tz>) -> Self {
        Self { download, viewer_tz }
    }

    /// Render the CSV payload for `poll` without saving it.
    pub fn render(&self, poll: &Poll) -> Result<String, DomainError> {
        let options = decode_options(poll, self.viewer_tz)?;
        export_csv(poll, &options)
            .map_err(|e| DomainError::Export(format!("Failed to generate CSV: {}", e)))
    }

    /// Export `poll` and hand the payload to the download port. Returns the saved location.
    pub async fn export(&self, poll: &Poll) -> Result<PathBuf, DomainError> {
        self.export_at(poll, Local::now().naive_local()).await
    }

    async fn export_at(&self, poll: &Poll, now: NaiveDateTime) -> Result<PathBuf, DomainError> {
        let payload = self.render(poll)?;
        let name = suggested_file_name(&poll.title, now);
        let path = self.download.save(&payload, &name).await?;
        info!(
            poll_id = %poll.id,
            participants = poll.participants.len(),
            options = poll.options.len(),
            path = %path.display(),
            "vote matrix exported"
        );
        Ok(path)
    }
}
