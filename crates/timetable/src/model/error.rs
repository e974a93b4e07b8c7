//! Error types for the schedule model.

use thiserror::Error;

/// Errors raised when a schedule slot would violate its value ranges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Day index outside Sunday (0) ..= Saturday (6)
    #[error("Invalid day value {day}, should be between 0 and 6")]
    InvalidDay { day: i32 },

    /// Start hour outside 0 ..= 23
    #[error("Invalid hour value {hour}, should be between 0 and 23")]
    InvalidHour { hour: i32 },

    /// Slot length below one hour
    #[error("Invalid length value {length}, should be larger than or equal to 1")]
    InvalidLength { length: i32 },

    /// A slot was added before any lecture/tutorial context was known
    #[error("No section kind known for this slot")]
    MissingSection,
}
