//! Student timetable engine.
//!
//! - [`parser`] turns a saved course registration page into subjects
//! - [`model`] holds subjects, their merged weekly slots and the roster store
//! - [`grid`] maps slots to pixel rectangles for the day and week views
//! - [`interaction`] drives scrolling, flings, day and mode switches, and taps

pub mod grid;
pub mod interaction;
pub mod model;
pub mod parser;

pub use grid::{DisplayMode, GridConfig, GridGeometry};
pub use interaction::{GestureEvent, Tick, TimetableController, TimetableListener};
pub use model::{Roster, RosterStore, Schedule, SectionKind, Subject};
pub use parser::{parse, ParseError};
