//! Display view of poll options: weekday/day/month labels and slot times.
//!
//! Slots of a poll with a time zone are interpreted in that zone and shown in
//! the viewer's zone. Floating polls (no zone) are shown as stored.

use crate::domain::option_codec::{self, EditableOption};
use crate::domain::{DomainError, OptionId, Poll};
use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Labels for one option, in poll order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedOption {
    pub option_id: OptionId,
    /// Short weekday, e.g. `Mon`.
    pub dow: String,
    /// Day of month without padding, e.g. `1`.
    pub day: String,
    /// Short month, e.g. `Jan`.
    pub month: String,
    pub slot: Option<SlotTimes>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTimes {
    pub start_time: String,
    pub end_time: String,
}

/// Parse an IANA zone name.
pub fn parse_time_zone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|e| DomainError::Config(format!("unknown time zone {:?}: {}", name, e)))
}

/// Decode every option of `poll` for display in `viewer_tz`.
pub fn decode_options(poll: &Poll, viewer_tz: Option<Tz>) -> Result<Vec<DecodedOption>, DomainError> {
    let poll_tz = poll
        .time_zone
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_time_zone)
        .transpose()?;

    poll.options
        .iter()
        .map(|option| {
            let decoded = match option_codec::decode(&option.value)? {
                EditableOption::Date(date) => date_labels(date, None),
                EditableOption::TimeSlot { start, end } => {
                    let (start, end) = match (poll_tz, viewer_tz) {
                        (Some(from), Some(to)) => (shift(start, from, to)?, shift(end, from, to)?),
                        _ => (start, end),
                    };
                    date_labels(
                        start.date(),
                        Some(SlotTimes {
                            start_time: start.format("%H:%M").to_string(),
                            end_time: end.format("%H:%M").to_string(),
                        }),
                    )
                }
            };
            Ok(DecodedOption {
                option_id: option.id.clone(),
                ..decoded
            })
        })
        .collect()
}

fn date_labels(date: NaiveDate, slot: Option<SlotTimes>) -> DecodedOption {
    DecodedOption {
        option_id: OptionId::new(""),
        dow: date.format("%a").to_string(),
        day: date.format("%-d").to_string(),
        month: date.format("%b").to_string(),
        slot,
    }
}

fn shift(local: NaiveDateTime, from: Tz, to: Tz) -> Result<NaiveDateTime, DomainError> {
    // Ambiguous (DST fold) resolves to the earlier instant; a gap has none.
    let at = from.from_local_datetime(&local).earliest().ok_or_else(|| {
        DomainError::InvalidOptionFormat(format!("{} does not exist in {}", local, from))
    })?;
    Ok(at.with_timezone(&to).naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PollOption;

    fn poll(time_zone: Option<&str>, values: &[&str]) -> Poll {
        Poll {
            id: "p1".to_string(),
            title: "Planning".to_string(),
            location: None,
            description: None,
            time_zone: time_zone.map(str::to_string),
            closed: false,
            legacy: false,
            options: values
                .iter()
                .enumerate()
                .map(|(i, v)| PollOption {
                    id: OptionId::new(format!("o{}", i)),
                    value: v.to_string(),
                    vote_ids: vec![],
                })
                .collect(),
            participants: vec![],
        }
    }

    #[test]
    fn test_decode_date_and_slot() {
        let p = poll(None, &["2024-01-01", "2024-01-02T09:00:00/2024-01-02T10:00:00"]);
        let decoded = decode_options(&p, None).unwrap();
        assert_eq!(decoded[0].dow, "Mon");
        assert_eq!(decoded[0].day, "1");
        assert_eq!(decoded[0].month, "Jan");
        assert_eq!(decoded[0].slot, None);
        assert_eq!(decoded[0].option_id, OptionId::new("o0"));

        let slot = decoded[1].slot.as_ref().unwrap();
        assert_eq!(decoded[1].dow, "Tue");
        assert_eq!(slot.start_time, "09:00");
        assert_eq!(slot.end_time, "10:00");
    }

    #[test]
    fn test_slot_shifted_into_viewer_zone() {
        let p = poll(Some("Europe/London"), &["2024-01-02T23:30:00/2024-01-03T00:30:00"]);
        let tokyo = parse_time_zone("Asia/Tokyo").unwrap();
        let decoded = decode_options(&p, Some(tokyo)).unwrap();
        let slot = decoded[0].slot.as_ref().unwrap();
        assert_eq!(decoded[0].day, "3");
        assert_eq!(decoded[0].dow, "Wed");
        assert_eq!(slot.start_time, "08:30");
        assert_eq!(slot.end_time, "09:30");
    }

    #[test]
    fn test_floating_poll_ignores_viewer_zone() {
        let p = poll(None, &["2024-01-02T09:00:00/2024-01-02T10:00:00"]);
        let tokyo = parse_time_zone("Asia/Tokyo").unwrap();
        let decoded = decode_options(&p, Some(tokyo)).unwrap();
        assert_eq!(decoded[0].slot.as_ref().unwrap().start_time, "09:00");
    }

    #[test]
    fn test_unknown_poll_zone_is_an_error() {
        let p = poll(Some("Mars/Olympus"), &["2024-01-01"]);
        assert!(matches!(decode_options(&p, None), Err(DomainError::Config(_))));
    }
}
