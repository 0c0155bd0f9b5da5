//! Vote matrix export. Uses the `csv` crate for record assembly.
//!
//! Output shape is consumed by spreadsheet tooling and must not drift:
//! `,` between fields, CRLF between records, `Yes`/`No` cells, no quoting.

use crate::domain::Poll;
use crate::domain::display::DecodedOption;
use chrono::NaiveDateTime;
use csv::{QuoteStyle, Terminator};

const YES: &str = "Yes";
const NO: &str = "No";

/// Header label for the participant column.
pub fn participant_count_label(count: usize) -> String {
    if count == 1 {
        "1 participant".to_string()
    } else {
        format!("{} participants", count)
    }
}

/// Header cell for one option: `Mon 1 Jan` or `Tue 2 Jan 09:00 - 10:00`.
pub fn option_label(option: &DecodedOption) -> String {
    let day = format!("{} {} {}", option.dow, option.day, option.month);
    match &option.slot {
        None => day,
        Some(slot) => format!("{} {} - {}", day, slot.start_time, slot.end_time),
    }
}

/// Serialize participants x options attendance.
///
/// `options` is the display view of `poll.options` in the same order. A vote
/// referencing an option is `Yes`, anything else `No`. Embedded commas are
/// written as-is. Records are joined with CRLF; no trailing terminator.
///
/// # Errors
/// Fails if `options` and `poll.options` differ in length.
pub fn export_csv(poll: &Poll, options: &[DecodedOption]) -> Result<String, csv::Error> {
    if options.len() != poll.options.len() {
        return Err(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "{} option labels for {} poll options",
                options.len(),
                poll.options.len()
            ),
        )));
    }

    let mut records = Vec::with_capacity(poll.participants.len() + 1);

    let mut header = Vec::with_capacity(options.len() + 1);
    header.push(participant_count_label(poll.participants.len()));
    header.extend(options.iter().map(option_label));
    records.push(format_record(&header)?);

    for participant in &poll.participants {
        let mut row = Vec::with_capacity(poll.options.len() + 1);
        row.push(participant.name.as_str());
        for option in &poll.options {
            row.push(if participant.voted_for(&option.id) { YES } else { NO });
        }
        records.push(format_record(&row)?);
    }

    Ok(records.join("\r\n"))
}

/// One record without its terminator.
fn format_record<T: AsRef<[u8]>>(fields: &[T]) -> Result<String, csv::Error> {
    // The writer emits `""` for a lone empty field even with `QuoteStyle::Never`.
    if let [only] = fields {
        if only.as_ref().is_empty() {
            return Ok(String::new());
        }
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(fields)?;
    wtr.flush()?;

    let bytes = wtr.into_inner().map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::Other,
            e.to_string(),
        ))
    })?;

    let mut row = String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    if row.ends_with("\r\n") {
        row.truncate(row.len() - 2);
    }
    Ok(row)
}

/// Download name: title with whitespace replaced by `_`, then `-yyyyMMddhhmm`.
///
/// The hour field is 12-hour (`%I`), matching earlier exports.
pub fn suggested_file_name(title: &str, exported_at: NaiveDateTime) -> String {
    let title: String = title
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}-{}", title, exported_at.format("%Y%m%d%I%M"))
}
