//! Roster entities and the contiguous-slot merge.

mod error;
mod store;
mod types;

pub use error::ScheduleError;
pub use store::{IngestOutcome, RosterStore, StoreError};
pub use types::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

impl Subject {
    /// Adds one hour of meeting time, extending an adjacent slot when possible.
    ///
    /// The first slot on the same day that ends at `hour` or starts right after
    /// it absorbs the new hour: it moves its start back when `hour` precedes it
    /// and grows by one hour either way. If that closes the gap to another slot
    /// on the same day, the neighbor is folded in as well, so runs stay
    /// collapsed whatever order the hours arrive in. An hour that is already
    /// covered is ignored. Otherwise a new one-hour slot is appended.
    ///
    /// Room and section differences do not prevent a merge; the absorbing slot
    /// keeps its own room and section.
    ///
    /// # Errors
    /// Fails without touching the subject when `day` or `hour` is out of range.
    pub fn add_slot(
        &mut self,
        section: SectionKind,
        day: i32,
        hour: i32,
        room: &str,
    ) -> Result<(), ScheduleError> {
        // Validate up front so a merge never stores a value `Schedule::new` would reject
        let candidate = Schedule::new(section, day, hour, 1, room)?;
        let (day, hour) = (candidate.day(), candidate.start_hour());

        if self.slot_at(day, hour).is_some() {
            return Ok(());
        }

        let adjacent = self.schedules.iter().position(|slot| {
            slot.day() == day
                && (hour as u32 + 1 == slot.start_hour() as u32 || hour as u32 == slot.end_hour())
        });

        let Some(mut index) = adjacent else {
            self.schedules.push(candidate);
            return Ok(());
        };

        let slot = &mut self.schedules[index];
        if hour < slot.start_hour() {
            slot.set_start_hour(hour as i32)?;
        }
        slot.set_length(slot.length() as i32 + 1)?;

        let (start, end) = (slot.start_hour() as u32, slot.end_hour());
        let neighbor = self.schedules.iter().enumerate().position(|(i, other)| {
            i != index
                && other.day() == day
                && (other.start_hour() as u32 == end || other.end_hour() == start)
        });

        if let Some(other) = neighbor {
            let absorbed = self.schedules.remove(other);
            if other < index {
                index -= 1;
            }
            let slot = &mut self.schedules[index];
            if absorbed.start_hour() < slot.start_hour() {
                slot.set_start_hour(absorbed.start_hour() as i32)?;
            }
            slot.set_length(slot.length() as i32 + absorbed.length() as i32)?;
        }

        let slot = &self.schedules[index];
        debug!(
            subject = %self.code,
            day = day,
            start = slot.start_hour(),
            length = slot.length(),
            "Merged hour into existing slot"
        );
        Ok(())
    }

    /// Appends an already-built slot as-is, without merging.
    pub fn push_schedule(&mut self, schedule: Schedule) {
        self.schedules.push(schedule);
    }

    /// Finds the slot covering `hour` on `day`, returning its index.
    pub fn slot_at(&self, day: u8, hour: u8) -> Option<usize> {
        self.schedules.iter().position(|s| s.covers(day, hour))
    }
}

/// The full set of subjects for one term.
///
/// A roster is replaced as a whole when new data arrives; it is never diffed
/// against what the grid currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(rename = "timeTable")]
    subjects: Vec<Subject>,
}

impl Roster {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subjects_mut(&mut self) -> &mut Vec<Subject> {
        &mut self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Looks a subject up by code, ignoring case.
    pub fn find_subject(&self, code: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.has_code(code))
    }

    pub fn find_subject_mut(&mut self, code: &str) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.has_code(code))
    }

    /// Sum of credit hours over all subjects.
    pub fn total_credit_hours(&self) -> u32 {
        self.subjects.iter().map(|s| s.credit_hours).sum()
    }

    /// Checks every stored slot, for rosters restored from outside the parser.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.subjects
            .iter()
            .flat_map(|s| s.schedules())
            .try_for_each(Schedule::validate)
    }
}

impl From<Vec<Subject>> for Roster {
    fn from(subjects: Vec<Subject>) -> Self {
        Self::new(subjects)
    }
}
