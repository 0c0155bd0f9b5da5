//! Poll mutations: details edit, option edit, lock/unlock.
//!
//! - Legacy polls reject option edits before any diff is computed
//! - Option edits that delete voted options go through the confirmation port
//! - Exactly one update is submitted per accepted action; no retry on failure
//! - The completion callback runs only after a successful (or skipped no-op) update

use crate::domain::option_diff;
use crate::domain::{change_guard, EditableOption};
use crate::domain::{Confirmation, DomainError, Poll, PollChange, PollDetails};
use crate::ports::{ConfirmPort, PollUpdatePort};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Lifecycle of a single edit, observable by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPhase {
    Idle,
    Confirming,
    Submitting,
    Done,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Update submitted and accepted.
    Committed,
    /// User declined the confirmation prompt. Nothing was submitted.
    Cancelled,
    /// Option edit changed nothing; no update was submitted.
    Unchanged,
}

/// Mutation orchestrator. Sequences guard -> submit -> completion callback.
pub struct ManagePollService {
    updater: Arc<dyn PollUpdatePort>,
    confirm: Arc<dyn ConfirmPort>,
    phase: watch::Sender<EditPhase>,
}

impl ManagePollService {
    pub fn new(updater: Arc<dyn PollUpdatePort>, confirm: Arc<dyn ConfirmPort>) -> Self {
        let (phase, _) = watch::channel(EditPhase::Idle);
        Self {
            updater,
            confirm,
            phase,
        }
    }

    /// Watch phase transitions (e.g. to disable a save button).
    pub fn subscribe(&self) -> watch::Receiver<EditPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> EditPhase {
        self.phase.borrow().clone()
    }

    /// True while an update request is pending. Callers should disable resubmission.
    pub fn is_submitting(&self) -> bool {
        *self.phase.borrow() == EditPhase::Submitting
    }

    /// Submit edited title/location/description. Blank optional fields are sent as absent.
    pub async fn update_details<F>(
        &self,
        details: PollDetails,
        on_success: F,
    ) -> Result<MutationOutcome, DomainError>
    where
        F: FnOnce() + Send,
    {
        let details = PollDetails {
            title: details.title.trim().to_string(),
            location: non_blank(details.location),
            description: non_blank(details.description),
        };
        self.commit(PollChange::Details(details), on_success).await
    }

    /// Lock (`true`) or unlock (`false`) the poll.
    pub async fn set_closed<F>(&self, closed: bool, on_success: F) -> Result<MutationOutcome, DomainError>
    where
        F: FnOnce() + Send,
    {
        self.commit(PollChange::Closed { closed }, on_success).await
    }

    /// Replace the poll's option set with `edited`, keeping unchanged options.
    ///
    /// Deleting options that carry votes asks the confirmation port first;
    /// declining returns `Cancelled` without side effects. An empty diff with an
    /// unchanged time zone is not submitted and returns `Unchanged`.
    pub async fn change_options<F>(
        &self,
        poll: &Poll,
        edited: &[EditableOption],
        time_zone: Option<String>,
        on_success: F,
    ) -> Result<MutationOutcome, DomainError>
    where
        F: FnOnce() + Send,
    {
        if poll.legacy {
            info!(poll_id = %poll.id, "option edit refused: legacy poll");
            return Err(DomainError::LegacyPollUnsupported);
        }

        let diff = option_diff::diff(&poll.options, edited);
        let time_zone = non_blank(time_zone);
        let zone_changed = time_zone != non_blank(poll.time_zone.clone());
        debug!(
            poll_id = %poll.id,
            to_add = diff.to_add.len(),
            to_delete = diff.to_delete.len(),
            zone_changed,
            "option diff computed"
        );

        if diff.is_empty() && !zone_changed {
            info!(poll_id = %poll.id, "option edit is a no-op; nothing submitted");
            self.phase.send_replace(EditPhase::Done);
            on_success();
            return Ok(MutationOutcome::Unchanged);
        }

        if change_guard::requires_confirmation(&diff.to_delete) {
            let prompt = change_guard::deletion_prompt(&diff.to_delete);
            self.phase.send_replace(EditPhase::Confirming);
            let answer = match self.confirm.confirm(&prompt).await {
                Ok(answer) => answer,
                Err(e) => {
                    self.phase.send_replace(EditPhase::Idle);
                    return Err(e);
                }
            };
            if answer == Confirmation::Cancel {
                info!(
                    poll_id = %poll.id,
                    voted = change_guard::voted_options(&diff.to_delete).len(),
                    "deletion of voted options declined"
                );
                self.phase.send_replace(EditPhase::Idle);
                return Ok(MutationOutcome::Cancelled);
            }
        }

        let change = PollChange::Options {
            time_zone,
            to_delete: diff.to_delete_ids(),
            to_add: diff.to_add.into_iter().collect(),
        };
        self.commit(change, on_success).await
    }

    async fn commit<F>(&self, change: PollChange, on_success: F) -> Result<MutationOutcome, DomainError>
    where
        F: FnOnce() + Send,
    {
        self.phase.send_replace(EditPhase::Submitting);
        match self.updater.submit(&change).await {
            Ok(()) => {
                info!(kind = change.kind(), "poll updated");
                self.phase.send_replace(EditPhase::Done);
                on_success();
                Ok(MutationOutcome::Committed)
            }
            Err(e) => {
                warn!(kind = change.kind(), error = %e, "poll update failed");
                self.phase.send_replace(EditPhase::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::option_codec::decode;
    use crate::domain::{ConfirmPrompt, OptionId, PollOption, VoteId};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct RecordingUpdater {
        submitted: Mutex<Vec<PollChange>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl PollUpdatePort for RecordingUpdater {
        async fn submit(&self, change: &PollChange) -> Result<(), DomainError> {
            self.submitted.lock().unwrap().push(change.clone());
            if self.fail {
                return Err(DomainError::MutationRejected("validation failed".into()));
            }
            Ok(())
        }
    }

    struct ScriptedConfirm {
        answer: Confirmation,
        asked: AtomicUsize,
    }

    impl ScriptedConfirm {
        fn answering(answer: Confirmation) -> Arc<Self> {
            Arc::new(Self {
                answer,
                asked: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl ConfirmPort for ScriptedConfirm {
        async fn confirm(&self, _prompt: &ConfirmPrompt) -> Result<Confirmation, DomainError> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    fn poll() -> Poll {
        Poll {
            id: "p1".to_string(),
            title: "Offsite".to_string(),
            location: None,
            description: None,
            time_zone: Some("Europe/Berlin".to_string()),
            closed: false,
            legacy: false,
            options: vec![
                PollOption {
                    id: OptionId::new("a"),
                    value: "2024-01-01".to_string(),
                    vote_ids: vec![VoteId("v1".to_string())],
                },
                PollOption {
                    id: OptionId::new("b"),
                    value: "2024-01-02".to_string(),
                    vote_ids: vec![],
                },
            ],
            participants: vec![],
        }
    }

    fn edited(values: &[&str]) -> Vec<EditableOption> {
        values.iter().map(|v| decode(v).unwrap()).collect()
    }

    fn service(
        updater: &Arc<RecordingUpdater>,
        confirm: &Arc<ScriptedConfirm>,
    ) -> ManagePollService {
        ManagePollService::new(
            Arc::clone(updater) as Arc<dyn PollUpdatePort>,
            Arc::clone(confirm) as Arc<dyn ConfirmPort>,
        )
    }

    #[tokio::test]
    async fn test_unvoted_deletion_submits_without_prompt() {
        let updater = Arc::new(RecordingUpdater::default());
        let confirm = ScriptedConfirm::answering(Confirmation::Cancel);
        let svc = service(&updater, &confirm);
        let closed = AtomicBool::new(false);

        let outcome = svc
            .change_options(
                &poll(),
                &edited(&["2024-01-01", "2024-01-05"]),
                Some("Europe/Berlin".to_string()),
                || closed.store(true, Ordering::SeqCst),
            )
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Committed);
        assert_eq!(confirm.asked.load(Ordering::SeqCst), 0);
        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(
            updater.submitted.lock().unwrap().as_slice(),
            &[PollChange::Options {
                time_zone: Some("Europe/Berlin".to_string()),
                to_add: vec!["2024-01-05".to_string()],
                to_delete: vec![OptionId::new("b")],
            }]
        );
        assert_eq!(svc.phase(), EditPhase::Done);
    }

    #[tokio::test]
    async fn test_declined_confirmation_has_no_side_effects() {
        let updater = Arc::new(RecordingUpdater::default());
        let confirm = ScriptedConfirm::answering(Confirmation::Cancel);
        let svc = service(&updater, &confirm);
        let mut called = false;

        let outcome = svc
            .change_options(&poll(), &edited(&["2024-01-02"]), None, || called = true)
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Cancelled);
        assert_eq!(confirm.asked.load(Ordering::SeqCst), 1);
        assert!(updater.submitted.lock().unwrap().is_empty());
        assert!(!called);
        assert_eq!(svc.phase(), EditPhase::Idle);
    }

    #[tokio::test]
    async fn test_confirmed_deletion_is_submitted() {
        let updater = Arc::new(RecordingUpdater::default());
        let confirm = ScriptedConfirm::answering(Confirmation::Proceed);
        let svc = service(&updater, &confirm);

        let outcome = svc
            .change_options(&poll(), &edited(&["2024-01-02"]), Some("Europe/Berlin".into()), || {})
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Committed);
        assert_eq!(confirm.asked.load(Ordering::SeqCst), 1);
        let submitted = updater.submitted.lock().unwrap();
        assert!(matches!(
            &submitted[0],
            PollChange::Options { to_delete, to_add, .. }
                if to_delete == &vec![OptionId::new("a")] && to_add.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_legacy_poll_never_reaches_updater() {
        let updater = Arc::new(RecordingUpdater::default());
        let confirm = ScriptedConfirm::answering(Confirmation::Proceed);
        let svc = service(&updater, &confirm);
        let mut legacy = poll();
        legacy.legacy = true;

        let err = svc
            .change_options(&legacy, &edited(&[]), None, || {})
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::LegacyPollUnsupported));
        assert!(err.to_string().contains("older version"));
        assert_eq!(confirm.asked.load(Ordering::SeqCst), 0);
        assert!(updater.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_noop_edit_is_skipped_but_completes() {
        let updater = Arc::new(RecordingUpdater::default());
        let confirm = ScriptedConfirm::answering(Confirmation::Proceed);
        let svc = service(&updater, &confirm);
        let mut called = false;

        let outcome = svc
            .change_options(
                &poll(),
                &edited(&["2024-01-02", "2024-01-01"]),
                Some("Europe/Berlin".into()),
                || called = true,
            )
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Unchanged);
        assert!(called);
        assert!(updater.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zone_only_change_submits_empty_lists() {
        let updater = Arc::new(RecordingUpdater::default());
        let confirm = ScriptedConfirm::answering(Confirmation::Proceed);
        let svc = service(&updater, &confirm);

        svc.change_options(&poll(), &edited(&["2024-01-01", "2024-01-02"]), Some(" ".into()), || {})
            .await
            .unwrap();

        assert_eq!(
            updater.submitted.lock().unwrap().as_slice(),
            &[PollChange::Options {
                time_zone: None,
                to_add: vec![],
                to_delete: vec![],
            }]
        );
    }

    #[tokio::test]
    async fn test_rejected_update_surfaces_error() {
        let updater = Arc::new(RecordingUpdater {
            fail: true,
            ..Default::default()
        });
        let confirm = ScriptedConfirm::answering(Confirmation::Proceed);
        let svc = service(&updater, &confirm);
        let mut called = false;

        let err = svc.set_closed(true, || called = true).await.unwrap_err();

        assert!(matches!(err, DomainError::MutationRejected(_)));
        assert!(!called);
        assert!(!svc.is_submitting());
        assert!(matches!(svc.phase(), EditPhase::Failed(_)));
        assert_eq!(updater.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_details_blank_fields_become_absent() {
        let updater = Arc::new(RecordingUpdater::default());
        let confirm = ScriptedConfirm::answering(Confirmation::Proceed);
        let svc = service(&updater, &confirm);

        svc.update_details(
            PollDetails {
                title: " Offsite 2024 ".to_string(),
                location: Some("".to_string()),
                description: Some("Agenda TBD".to_string()),
            },
            || {},
        )
        .await
        .unwrap();

        assert_eq!(
            updater.submitted.lock().unwrap().as_slice(),
            &[PollChange::Details(PollDetails {
                title: "Offsite 2024".to_string(),
                location: None,
                description: Some("Agenda TBD".to_string()),
            })]
        );
    }

    struct GatedUpdater {
        gate: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait::async_trait]
    impl PollUpdatePort for GatedUpdater {
        async fn submit(&self, _change: &PollChange) -> Result<(), DomainError> {
            let gate = self.gate.lock().await.take();
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_in_flight_flag_tracks_pending_update() {
        let (release, gate) = oneshot::channel();
        let updater = Arc::new(GatedUpdater {
            gate: tokio::sync::Mutex::new(Some(gate)),
        });
        let svc = Arc::new(ManagePollService::new(
            updater,
            ScriptedConfirm::answering(Confirmation::Proceed),
        ));
        let mut phases = svc.subscribe();
        assert!(!svc.is_submitting());

        let task = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.set_closed(false, || {}).await })
        };

        phases
            .wait_for(|p| *p == EditPhase::Submitting)
            .await
            .unwrap();
        assert!(svc.is_submitting());

        release.send(()).unwrap();
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, MutationOutcome::Committed);
        assert!(!svc.is_submitting());
    }
}
