//! Implements PollSourcePort and PollUpdatePort using a JSON file.
//!
//! One poll per file. Changes are applied in memory and written back atomically.

use crate::domain::option_codec;
use crate::domain::{DomainError, OptionId, Poll, PollChange, PollOption};
use crate::ports::{PollSourcePort, PollUpdatePort};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// JSON file-based poll store.
pub struct PollJsonStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: tokio::sync::Mutex<()>,
}

impl PollJsonStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Poll, DomainError> {
        let s = fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::Repo(format!("read {}: {}", self.path.display(), e)))?;
        serde_json::from_str(&s)
            .map_err(|e| DomainError::Repo(format!("parse {}: {}", self.path.display(), e)))
    }

    /// Atomic save using write-replace pattern: temp file, sync_all, rename.
    async fn save(&self, poll: &Poll) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(poll).map_err(|e| DomainError::Repo(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Repo(format!("atomic rename failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl PollSourcePort for PollJsonStore {
    async fn load_poll(&self) -> Result<Poll, DomainError> {
        self.read().await
    }
}

#[async_trait::async_trait]
impl PollUpdatePort for PollJsonStore {
    async fn submit(&self, change: &PollChange) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut poll = self.read().await?;
        apply_change(&mut poll, change)?;
        self.save(&poll).await?;
        debug!(poll_id = %poll.id, kind = change.kind(), "poll file updated");
        Ok(())
    }
}

/// Apply `change` to `poll` the way the poll backend does.
///
/// Option edits drop deleted options together with every vote cast on them,
/// append added values under fresh ids, and keep options ordered by value.
pub fn apply_change(poll: &mut Poll, change: &PollChange) -> Result<(), DomainError> {
    match change {
        PollChange::Details(details) => {
            if details.title.trim().is_empty() {
                return Err(DomainError::MutationRejected("title is required".into()));
            }
            poll.title = details.title.clone();
            poll.location = details.location.clone();
            poll.description = details.description.clone();
        }
        PollChange::Closed { closed } => poll.closed = *closed,
        PollChange::Options {
            time_zone,
            to_add,
            to_delete,
        } => {
            if poll.legacy {
                return Err(DomainError::MutationRejected(
                    "legacy polls do not support option edits".into(),
                ));
            }
            let deleted: HashSet<&OptionId> = to_delete.iter().collect();
            poll.options.retain(|o| !deleted.contains(&o.id));
            for participant in &mut poll.participants {
                participant.votes.retain(|v| !deleted.contains(&v.option_id));
            }

            for value in to_add {
                option_codec::decode(value)
                    .map_err(|e| DomainError::MutationRejected(e.to_string()))?;
                if poll.options.iter().any(|o| &o.value == value) {
                    return Err(DomainError::MutationRejected(format!(
                        "option {} already exists",
                        value
                    )));
                }
                poll.options.push(PollOption {
                    id: OptionId::new(uuid::Uuid::new_v4().to_string()),
                    value: value.clone(),
                    vote_ids: Vec::new(),
                });
            }
            poll.options.sort_by(|a, b| a.value.cmp(&b.value));
            poll.time_zone = time_zone.clone();
        }
    }
    Ok(())
}
