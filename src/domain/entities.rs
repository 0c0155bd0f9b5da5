//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/filesystem types here — these are mapped from adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a persisted poll option.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl OptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a vote cast on an option.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteId(pub String);

/// A persisted poll option. Never mutated in place: edits delete and re-add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: OptionId,
    /// Canonical encoded value (`YYYY-MM-DD` or `start/end`). Unique within a poll.
    pub value: String,
    #[serde(default)]
    pub vote_ids: Vec<VoteId>,
}

impl PollOption {
    pub fn has_votes(&self) -> bool {
        !self.vote_ids.is_empty()
    }
}

/// A single vote. Its presence means "yes" for the referenced option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub option_id: OptionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

impl Participant {
    /// True if any of this participant's votes references `option_id`.
    pub fn voted_for(&self, option_id: &OptionId) -> bool {
        self.votes.iter().any(|v| &v.option_id == option_id)
    }
}

/// Poll aggregate as loaded by the poll source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// IANA zone name. `None` means options are floating local times.
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub closed: bool,
    /// Created under the old data model; option edits are not supported.
    #[serde(default)]
    pub legacy: bool,
    #[serde(default)]
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Poll {
    pub fn details(&self) -> PollDetails {
        PollDetails {
            title: self.title.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
        }
    }
}

/// Editable detail fields of a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDetails {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial change submitted to the update collaborator.
///
/// Serialized untagged so each variant produces exactly the keys of its payload
/// (`{title, location, description}`, `{timeZone, optionsToAdd, optionsToDelete}`,
/// `{closed}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PollChange {
    Options {
        #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
        #[serde(rename = "optionsToAdd")]
        to_add: Vec<String>,
        #[serde(rename = "optionsToDelete")]
        to_delete: Vec<OptionId>,
    },
    Closed {
        closed: bool,
    },
    Details(PollDetails),
}

impl PollChange {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PollChange::Details(_) => "details",
            PollChange::Options { .. } => "options",
            PollChange::Closed { .. } => "closed",
        }
    }
}

/// Blocking prompt rendered by the confirmation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub description: String,
    pub ok_text: String,
    pub cancel_text: String,
    /// Render the OK action as destructive.
    pub danger: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_change_payload_keys() {
        let change = PollChange::Options {
            time_zone: Some("Europe/London".to_string()),
            to_add: vec!["2024-01-01".to_string()],
            to_delete: vec![OptionId::new("opt-1")],
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["timeZone"], "Europe/London");
        assert_eq!(json["optionsToAdd"][0], "2024-01-01");
        assert_eq!(json["optionsToDelete"][0], "opt-1");

        let json = serde_json::to_value(PollChange::Closed { closed: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "closed": true }));

        let json = serde_json::to_value(PollChange::Details(PollDetails {
            title: "Team lunch".to_string(),
            location: None,
            description: Some("Bring snacks".to_string()),
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "Team lunch", "description": "Bring snacks" })
        );
    }

    #[test]
    fn test_poll_deserializes_with_defaults() {
        let poll: Poll = serde_json::from_str(
            r#"{"id":"p1","title":"Lunch","options":[{"id":"o1","value":"2024-01-01"}]}"#,
        )
        .unwrap();
        assert!(!poll.closed);
        assert!(!poll.legacy);
        assert!(poll.participants.is_empty());
        assert!(!poll.options[0].has_votes());
    }

    #[test]
    fn test_details_copies_editable_fields() {
        let poll: Poll = serde_json::from_str(
            r#"{"id":"p1","title":"Lunch","location":"Cafe","closed":true}"#,
        )
        .unwrap();
        assert_eq!(
            poll.details(),
            PollDetails {
                title: "Lunch".to_string(),
                location: Some("Cafe".to_string()),
                description: None,
            }
        );
    }
}
