//! Option diff. Reconciles an edited option list against the persisted set.
//!
//! Identity is the encoded value: an option whose value survives the edit is
//! kept as-is regardless of its position in the edited list.

use crate::domain::option_codec::{self, EditableOption};
use crate::domain::{OptionId, PollOption};
use std::collections::BTreeSet;

/// Add/remove sets produced by [`diff`]. Disjoint by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionDiff {
    /// Encoded values not present in the current set.
    pub to_add: BTreeSet<String>,
    /// Current options whose value is absent from the edit, in poll order.
    pub to_delete: Vec<PollOption>,
}

impl OptionDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_delete.is_empty()
    }

    pub fn to_delete_ids(&self) -> Vec<OptionId> {
        self.to_delete.iter().map(|o| o.id.clone()).collect()
    }
}

/// Compare `current` with `edited` by encoded value.
///
/// Duplicate edited options collapse. An empty `edited` deletes everything;
/// whether a poll may have zero options is decided elsewhere.
pub fn diff(current: &[PollOption], edited: &[EditableOption]) -> OptionDiff {
    let encoded: BTreeSet<String> = edited.iter().map(option_codec::encode).collect();
    let existing: BTreeSet<&str> = current.iter().map(|o| o.value.as_str()).collect();

    let to_delete = current
        .iter()
        .filter(|o| !encoded.contains(&o.value))
        .cloned()
        .collect();

    let to_add = encoded
        .into_iter()
        .filter(|value| !existing.contains(value.as_str()))
        .collect();

    OptionDiff { to_add, to_delete }
}
