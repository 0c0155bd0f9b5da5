//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod change_guard;
pub mod display;
pub mod entities;
pub mod errors;
pub mod option_codec;
pub mod option_diff;

pub use entities::{
    Confirmation, ConfirmPrompt, OptionId, Participant, Poll, PollChange, PollDetails,
    PollOption, Vote, VoteId,
};
pub use errors::{DomainError, LEGACY_POLL_ADVISORY};
pub use option_codec::EditableOption;
pub use option_diff::OptionDiff;
