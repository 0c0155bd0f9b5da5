//! Implements InputPort and ConfirmPort. Inquire-based interactive prompts.
//!
//! Menu mirrors the poll's manage dropdown: edit details, edit options,
//! export to CSV, lock/unlock.

use crate::adapters::ui::progress::spinner;
use crate::domain::display::parse_time_zone;
use crate::domain::option_codec::{self, EditableOption};
use crate::domain::{
    Confirmation, ConfirmPrompt, DomainError, Poll, PollDetails, LEGACY_POLL_ADVISORY,
};
use crate::ports::{ConfirmPort, InputPort, PollSourcePort};
use crate::usecases::{EditPhase, ExportService, ManagePollService, MutationOutcome};
use async_trait::async_trait;
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    EditDetails,
    EditOptions,
    ExportCsv,
    Lock,
    Unlock,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::EditDetails => "Edit details",
            MenuItem::EditOptions => "Edit options",
            MenuItem::ExportCsv => "Export to CSV",
            MenuItem::Lock => "Lock poll",
            MenuItem::Unlock => "Unlock poll",
            MenuItem::Quit => "Quit",
        })
    }
}

fn menu_items(poll: &Poll) -> Vec<MenuItem> {
    vec![
        MenuItem::EditDetails,
        MenuItem::EditOptions,
        MenuItem::ExportCsv,
        if poll.closed {
            MenuItem::Unlock
        } else {
            MenuItem::Lock
        },
        MenuItem::Quit,
    ]
}

fn prompt_err(e: InquireError) -> DomainError {
    DomainError::Prompt(e.to_string())
}

/// Esc on a secondary prompt abandons that editor; everything else is a failure.
fn cancelled<T>(res: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(prompt_err(e)),
    }
}

/// Prompt failures end the session; any other error is shown and the menu continues.
fn keep_menu_open(res: Result<(), DomainError>) -> Result<(), DomainError> {
    match res {
        Ok(()) => Ok(()),
        Err(DomainError::Prompt(e)) => Err(DomainError::Prompt(e)),
        Err(e) => {
            warn!(error = %e, "action not completed");
            println!("{}", e);
            Ok(())
        }
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    source: Arc<dyn PollSourcePort>,
    manage: Arc<ManagePollService>,
    export: Arc<ExportService>,
}

impl TuiInputPort {
    pub fn new(
        source: Arc<dyn PollSourcePort>,
        manage: Arc<ManagePollService>,
        export: Arc<ExportService>,
    ) -> Self {
        Self {
            source,
            manage,
            export,
        }
    }

    async fn edit_details(&self, poll: &Poll) -> Result<(), DomainError> {
        let current = poll.details();
        let Some(title) =
            cancelled(Text::new("Title:").with_initial_value(&current.title).prompt())?
        else {
            return Ok(());
        };
        let Some(location) = cancelled(
            Text::new("Location:")
                .with_initial_value(current.location.as_deref().unwrap_or_default())
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(description) = cancelled(
            Text::new("Description:")
                .with_initial_value(current.description.as_deref().unwrap_or_default())
                .prompt(),
        )?
        else {
            return Ok(());
        };

        let details = PollDetails {
            title,
            location: Some(location),
            description: Some(description),
        };
        let update = self
            .manage
            .update_details(details, || println!("Details saved."));
        self.report("Saving changes", update).await
    }

    async fn edit_options(&self, poll: &Poll) -> Result<(), DomainError> {
        if poll.legacy {
            println!("Sorry! {}", LEGACY_POLL_ADVISORY);
            return Ok(());
        }

        let existing: Vec<String> = poll.options.iter().map(|o| o.value.clone()).collect();
        let all: Vec<usize> = (0..existing.len()).collect();
        let Some(kept) = cancelled(
            MultiSelect::new("Options to keep:", existing)
                .with_default(&all)
                .prompt(),
        )?
        else {
            return Ok(());
        };

        let mut edited: Vec<EditableOption> = kept
            .iter()
            .map(|v| option_codec::decode(v))
            .collect::<Result<_, _>>()?;

        loop {
            let Some(input) = cancelled(
                Text::new("Add option (blank to finish):")
                    .with_help_message("YYYY-MM-DD or YYYY-MM-DDTHH:MM/YYYY-MM-DDTHH:MM")
                    .prompt(),
            )?
            else {
                return Ok(());
            };
            if input.trim().is_empty() {
                break;
            }
            match option_codec::decode(input.trim()) {
                Ok(option) => edited.push(option),
                Err(e) => println!("{}", e),
            }
        }

        let time_zone = loop {
            let Some(input) = cancelled(
                Text::new("Time zone (blank for floating times):")
                    .with_initial_value(poll.time_zone.as_deref().unwrap_or_default())
                    .prompt(),
            )?
            else {
                return Ok(());
            };
            let input = input.trim().to_string();
            if input.is_empty() {
                break None;
            }
            match parse_time_zone(&input) {
                Ok(_) => break Some(input),
                Err(e) => println!("{}", e),
            }
        };

        let update =
            self.manage
                .change_options(poll, &edited, time_zone, || println!("Options saved."));
        self.report("Saving options", update).await
    }

    /// Drive one mutation and report the outcome.
    ///
    /// The spinner appears only once the request is in flight, after any
    /// confirmation prompt. Errors are returned to the menu loop.
    async fn report<Fut>(&self, message: &str, update: Fut) -> Result<(), DomainError>
    where
        Fut: Future<Output = Result<MutationOutcome, DomainError>>,
    {
        let mut phases = self.manage.subscribe();
        tokio::pin!(update);
        let mut pb = None;
        let res = loop {
            tokio::select! {
                res = &mut update => break res,
                Ok(()) = phases.changed() => {
                    if *phases.borrow_and_update() == EditPhase::Submitting && pb.is_none() {
                        pb = Some(spinner(message));
                    }
                }
            }
        };
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        match res {
            Ok(MutationOutcome::Committed) => Ok(()),
            Ok(MutationOutcome::Cancelled) => {
                println!("No changes made.");
                Ok(())
            }
            Ok(MutationOutcome::Unchanged) => {
                println!("Nothing to change.");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let poll = self.source.load_poll().await?;
            println!(
                "{} ({} options, {} participants{})",
                poll.title,
                poll.options.len(),
                poll.participants.len(),
                if poll.closed { ", locked" } else { "" }
            );

            let Some(choice) = cancelled(Select::new("Manage", menu_items(&poll)).prompt())? else {
                return Ok(());
            };

            let res = match choice {
                MenuItem::EditDetails => self.edit_details(&poll).await,
                MenuItem::EditOptions => self.edit_options(&poll).await,
                MenuItem::ExportCsv => self
                    .export
                    .export(&poll)
                    .await
                    .map(|path| println!("Exported to {}", path.display())),
                MenuItem::Lock | MenuItem::Unlock => {
                    let closed = choice == MenuItem::Lock;
                    let update = self.manage.set_closed(closed, || {});
                    self.report("Saving", update).await
                }
                MenuItem::Quit => return Ok(()),
            };
            keep_menu_open(res)?;
        }
    }
}

/// Confirmation adapter. Blocking yes/no prompt; Esc counts as cancel.
pub struct InquireConfirm;

#[async_trait]
impl ConfirmPort for InquireConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> Result<Confirmation, DomainError> {
        let message = format!(
            "{} [{} / {}]",
            prompt.title, prompt.ok_text, prompt.cancel_text
        );
        let answer = Confirm::new(&message)
            .with_help_message(&prompt.description)
            .with_default(!prompt.danger)
            .prompt();
        match answer {
            Ok(true) => Ok(Confirmation::Proceed),
            Ok(false) | Err(InquireError::OperationCanceled) => Ok(Confirmation::Cancel),
            Err(e) => Err(prompt_err(e)),
        }
    }
}
