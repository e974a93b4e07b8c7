/// Types for the roster entities
use super::error::ScheduleError;
use serde::{Deserialize, Serialize};

pub const SUNDAY: u8 = 0;
pub const MONDAY: u8 = 1;
pub const TUESDAY: u8 = 2;
pub const WEDNESDAY: u8 = 3;
pub const THURSDAY: u8 = 4;
pub const FRIDAY: u8 = 5;
pub const SATURDAY: u8 = 6;

/// Which part of a course a slot belongs to.
///
/// Persisted as `0` (lecture) and `1` (tutorial).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SectionKind {
    Lecture,
    Tutorial,
}

impl SectionKind {
    /// Classifies a section label from the portal ("LEC A", "TUT 2", ...).
    ///
    /// Returns `None` when the label carries neither marker.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.contains("LEC") {
            Some(SectionKind::Lecture)
        } else if label.contains("TUT") {
            Some(SectionKind::Tutorial)
        } else {
            None
        }
    }
}

impl TryFrom<u8> for SectionKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SectionKind::Lecture),
            1 => Ok(SectionKind::Tutorial),
            other => Err(format!("unknown section value {other}")),
        }
    }
}

impl From<SectionKind> for u8 {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Lecture => 0,
            SectionKind::Tutorial => 1,
        }
    }
}

/// One contiguous weekly meeting block.
///
/// All constructors and setters validate their input, so a `Schedule` built
/// in code always satisfies `day <= 6`, `start_hour <= 23` and `length >= 1`.
/// Values restored from JSON must be checked with [`Schedule::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    section: SectionKind,
    day: u8,
    #[serde(rename = "time")]
    start_hour: u8,
    length: u8,
    room: String,
}

impl Schedule {
    /// Creates a slot, failing fast on out-of-range values.
    pub fn new(
        section: SectionKind,
        day: i32,
        start_hour: i32,
        length: i32,
        room: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        Ok(Self {
            section,
            day: check_day(day)?,
            start_hour: check_hour(start_hour)?,
            length: check_length(length)?,
            room: room.into(),
        })
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// First hour after the slot (exclusive end).
    pub fn end_hour(&self) -> u32 {
        self.start_hour as u32 + self.length as u32
    }

    /// Returns true if the slot occupies `hour` on `day`.
    pub fn covers(&self, day: u8, hour: u8) -> bool {
        self.day == day && hour >= self.start_hour && (hour as u32) < self.end_hour()
    }

    pub fn set_day(&mut self, day: i32) -> Result<(), ScheduleError> {
        self.day = check_day(day)?;
        Ok(())
    }

    pub fn set_start_hour(&mut self, hour: i32) -> Result<(), ScheduleError> {
        self.start_hour = check_hour(hour)?;
        Ok(())
    }

    pub fn set_length(&mut self, length: i32) -> Result<(), ScheduleError> {
        self.length = check_length(length)?;
        Ok(())
    }

    pub fn set_section(&mut self, section: SectionKind) {
        self.section = section;
    }

    pub fn set_room(&mut self, room: impl Into<String>) {
        self.room = room.into();
    }

    /// Re-checks the value ranges, for slots that did not come through [`Schedule::new`].
    pub fn validate(&self) -> Result<(), ScheduleError> {
        check_day(self.day as i32)?;
        check_hour(self.start_hour as i32)?;
        check_length(self.length as i32)?;
        Ok(())
    }
}

fn check_day(day: i32) -> Result<u8, ScheduleError> {
    if (SUNDAY as i32..=SATURDAY as i32).contains(&day) {
        Ok(day as u8)
    } else {
        Err(ScheduleError::InvalidDay { day })
    }
}

fn check_hour(hour: i32) -> Result<u8, ScheduleError> {
    if (0..=23).contains(&hour) {
        Ok(hour as u8)
    } else {
        Err(ScheduleError::InvalidHour { hour })
    }
}

fn check_length(length: i32) -> Result<u8, ScheduleError> {
    if (1..=24).contains(&length) {
        Ok(length as u8)
    } else {
        Err(ScheduleError::InvalidLength { length })
    }
}

/// One enrolled course and its weekly slots.
///
/// `schedules` keeps insertion (merge) order, which is not necessarily
/// chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "subjectCode")]
    pub code: String,

    #[serde(rename = "subjectDescription")]
    pub description: String,

    #[serde(rename = "lecturerSection")]
    pub lecture_section: Option<String>,

    #[serde(rename = "tutorialSection")]
    pub tutorial_section: Option<String>,

    #[serde(rename = "creditHours")]
    pub credit_hours: u32,

    /// Index into the host's subject color palette
    pub color: u32,

    #[serde(rename = "schedule", default)]
    pub(crate) schedules: Vec<Schedule>,

    /// Reminder events owned by the host application, carried through untouched
    #[serde(rename = "event", default)]
    pub events: Vec<serde_json::Value>,
}

impl Subject {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        lecture_section: Option<String>,
        tutorial_section: Option<String>,
        credit_hours: u32,
        color: u32,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            lecture_section,
            tutorial_section,
            credit_hours,
            color,
            schedules: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Returns true if `code` names this subject, ignoring case.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }

    pub fn has_lecture_section(&self) -> bool {
        self.lecture_section.is_some()
    }

    pub fn has_tutorial_section(&self) -> bool {
        self.tutorial_section.is_some()
    }

    /// The registered section label for the given kind.
    pub fn section_label(&self, kind: SectionKind) -> Option<&str> {
        match kind {
            SectionKind::Lecture => self.lecture_section.as_deref(),
            SectionKind::Tutorial => self.tutorial_section.as_deref(),
        }
    }
}
