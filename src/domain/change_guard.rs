//! Destructive-change guard. Deleting an option that carries votes needs an
//! explicit acknowledgment; it is never blocked outright.

use crate::domain::{ConfirmPrompt, PollOption};

pub const DELETE_PROMPT_TITLE: &str = "Are you sure?";
pub const DELETE_PROMPT_OK: &str = "Delete";
pub const DELETE_PROMPT_CANCEL: &str = "Cancel";

/// True iff at least one option in `to_delete` has votes.
pub fn requires_confirmation(to_delete: &[PollOption]) -> bool {
    to_delete.iter().any(PollOption::has_votes)
}

/// Options in `to_delete` that carry at least one vote.
pub fn voted_options(to_delete: &[PollOption]) -> Vec<&PollOption> {
    to_delete.iter().filter(|o| o.has_votes()).collect()
}

/// Prompt handed to the confirmation collaborator before deleting voted options.
pub fn deletion_prompt(to_delete: &[PollOption]) -> ConfirmPrompt {
    let voted = voted_options(to_delete);
    let votes: usize = voted.iter().map(|o| o.vote_ids.len()).sum();
    let description = format!(
        "You are about to delete {} {} that participants have voted for. \
         {} {} will also be deleted.",
        voted.len(),
        if voted.len() == 1 { "option" } else { "options" },
        votes,
        if votes == 1 { "vote" } else { "votes" },
    );
    ConfirmPrompt {
        title: DELETE_PROMPT_TITLE.to_string(),
        description,
        ok_text: DELETE_PROMPT_OK.to_string(),
        cancel_text: DELETE_PROMPT_CANCEL.to_string(),
        danger: true,
    }
}
