//! Option codec. Maps user-facing options to their canonical encoded value.
//!
//! - Date option: `YYYY-MM-DD`
//! - Time slot: `YYYY-MM-DDTHH:MM:SS/YYYY-MM-DDTHH:MM:SS`
//!
//! No time zone conversion happens here; the zone is poll-level metadata.

use crate::domain::DomainError;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Separator between start and end of an encoded time slot.
pub const RANGE_DELIMITER: char = '/';

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Accepted on input only; canonical output always carries seconds.
const DATETIME_FORMAT_NO_SECONDS: &str = "%Y-%m-%dT%H:%M";

/// Option as edited by the organizer. Exists only during an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableOption {
    Date(NaiveDate),
    TimeSlot {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl EditableOption {
    /// Parse a date option from user input.
    pub fn date_from_str(date: &str) -> Result<Self, DomainError> {
        parse_date(date).map(EditableOption::Date)
    }

    /// Parse a time slot from user input. End must be after start.
    pub fn time_slot_from_strs(start: &str, end: &str) -> Result<Self, DomainError> {
        let start = parse_datetime(start)?;
        let end = parse_datetime(end)?;
        Self::time_slot(start, end)
    }

    pub fn time_slot(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidOptionFormat(format!(
                "time slot ends before it starts: {}/{}",
                start.format(DATETIME_FORMAT),
                end.format(DATETIME_FORMAT)
            )));
        }
        Ok(EditableOption::TimeSlot { start, end })
    }
}

impl fmt::Display for EditableOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

/// Canonical string key for an option.
pub fn encode(option: &EditableOption) -> String {
    match option {
        EditableOption::Date(date) => date.format(DATE_FORMAT).to_string(),
        EditableOption::TimeSlot { start, end } => format!(
            "{}{}{}",
            start.format(DATETIME_FORMAT),
            RANGE_DELIMITER,
            end.format(DATETIME_FORMAT)
        ),
    }
}

/// Inverse of [`encode`]. One segment is a date, two segments a time slot.
pub fn decode(value: &str) -> Result<EditableOption, DomainError> {
    let mut parts = value.split(RANGE_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date), None, None) => EditableOption::date_from_str(date),
        (Some(start), Some(end), None) => EditableOption::time_slot_from_strs(start, end),
        _ => Err(DomainError::InvalidOptionFormat(format!(
            "too many '{}' separators in {:?}",
            RANGE_DELIMITER, value
        ))),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| DomainError::InvalidOptionFormat(format!("{:?}: {}", s, e)))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, DomainError> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT_NO_SECONDS))
        .map_err(|e| DomainError::InvalidOptionFormat(format!("{:?}: {}", s, e)))
}
