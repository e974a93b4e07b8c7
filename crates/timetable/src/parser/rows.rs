//! Row-level decoding for the course and schedule tables.
//!
//! The schedule table leaves out repeated subject and section labels on
//! follow-up rows, so the shape of a row (its cell count) decides which
//! context it continues:
//!
//! | cells | row kind    | layout                                        |
//! |-------|-------------|-----------------------------------------------|
//! | 6     | new subject | index, code, section, day, time, room         |
//! | 5     | new section | index, section, day, time, room               |
//! | 4     | new time    | index, day, time, room                        |

use crate::model::{ScheduleError, SectionKind, Subject};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Day tokens as printed by the portal, indexed Sunday (0) to Saturday (6).
pub const DAY_TOKENS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Returned by [`day_index`] for tokens outside [`DAY_TOKENS`].
pub const UNKNOWN_DAY: i32 = -1;

/// Placeholder the course table uses for a section that is not offered.
const NO_SECTION: &str = "-";

const COURSE_ROW_CELLS: usize = 6;

static HOUR_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2})").unwrap());

/// Maps a day token to its index, ignoring case.
///
/// Unknown tokens yield [`UNKNOWN_DAY`] rather than an error; the value is
/// forwarded to the schedule model, which rejects it when the slot is built.
pub fn day_index(token: &str) -> i32 {
    DAY_TOKENS
        .iter()
        .position(|day| token.eq_ignore_ascii_case(day))
        .map_or(UNKNOWN_DAY, |i| i as i32)
}

/// Reads the starting hour from a time token such as `09AM` or `02PM`.
///
/// The first two characters are the hour on a 12-hour clock; a `PM` marker
/// adds 12 except for `12PM`. `12AM` is left as 12. Returns `None` when the
/// token does not start with two digits.
pub fn hour_from_token(token: &str) -> Option<i32> {
    let caps = HOUR_PREFIX.captures(token)?;
    let mut hour: i32 = caps.get(1)?.as_str().parse().ok()?;

    if token.contains("PM") && hour != 12 {
        hour += 12;
    }

    Some(hour)
}

/// Shape of a schedule-table row, decided by its cell count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    NewSubject,
    NewSection,
    NewTime,
}

impl RowKind {
    pub fn from_cell_count(count: usize) -> Option<Self> {
        match count {
            6 => Some(RowKind::NewSubject),
            5 => Some(RowKind::NewSection),
            4 => Some(RowKind::NewTime),
            _ => None,
        }
    }
}

/// Builds one subject per well-formed course row.
///
/// Rows with the wrong cell count or an unreadable credit value are skipped.
/// Color indices are handed out in row order over the accepted rows.
pub(crate) fn parse_course_rows(rows: &[Vec<String>]) -> Vec<Subject> {
    let mut subjects = Vec::new();

    for (n, cells) in rows.iter().enumerate() {
        if cells.len() != COURSE_ROW_CELLS {
            debug!(row = n, cells = cells.len(), "Skipping course row with unexpected shape");
            continue;
        }

        let credit_hours = match cells[5].parse::<u32>() {
            Ok(credits) => credits,
            Err(_) => {
                warn!(row = n, value = %cells[5], "Skipping course row with unreadable credit hours");
                continue;
            }
        };

        let color = subjects.len() as u32;
        subjects.push(Subject::new(
            cells[1].clone(),
            cells[2].clone(),
            section_cell(&cells[3]),
            section_cell(&cells[4]),
            credit_hours,
            color,
        ));
    }

    subjects
}

fn section_cell(value: &str) -> Option<String> {
    if value == NO_SECTION {
        None
    } else {
        Some(value.to_string())
    }
}

/// Subject and section the next continuation row applies to.
#[derive(Debug, Default)]
struct RowContext {
    subject: Option<usize>,
    section: Option<SectionKind>,
}

/// Feeds every schedule row into the subjects it belongs to.
///
/// Rows that cannot be attributed or decoded are dropped; the remaining rows
/// are still processed.
pub(crate) fn parse_schedule_rows(rows: &[Vec<String>], subjects: &mut [Subject]) {
    let mut context = RowContext::default();

    for (n, cells) in rows.iter().enumerate() {
        let Some(kind) = RowKind::from_cell_count(cells.len()) else {
            debug!(row = n, cells = cells.len(), "Ignoring schedule row with unexpected shape");
            continue;
        };

        let (section_label, slot) = match kind {
            RowKind::NewSubject => {
                context.subject = subjects.iter().position(|s| s.has_code(&cells[1]));
                (Some(&cells[2]), &cells[3..6])
            }
            RowKind::NewSection => (Some(&cells[1]), &cells[2..5]),
            RowKind::NewTime => (None, &cells[1..4]),
        };

        // Unrecognised labels leave the previous section in place
        if let Some(section) = section_label.and_then(|label| SectionKind::from_label(label)) {
            context.section = Some(section);
        }

        let Some(subject_index) = context.subject else {
            debug!(row = n, "No subject in context, dropping schedule row");
            continue;
        };

        let (day_text, time_text, room) = (&slot[0], &slot[1], &slot[2]);

        let day = day_index(day_text);
        if day == UNKNOWN_DAY {
            warn!(row = n, token = %day_text, "Unknown day token");
        }

        let Some(hour) = hour_from_token(time_text) else {
            warn!(row = n, token = %time_text, "Skipping schedule row with unreadable time");
            continue;
        };

        let Some(section) = context.section else {
            warn!(row = n, error = %ScheduleError::MissingSection, "Skipping schedule row");
            continue;
        };

        let subject = &mut subjects[subject_index];
        if let Err(e) = subject.add_slot(section, day, hour, room) {
            warn!(row = n, subject = %subject.code, error = %e, "Rejected schedule row");
        }
    }
}
