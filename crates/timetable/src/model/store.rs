//! Ownership of the current roster.
//!
//! A `RosterStore` is created by the host application and handed to whoever
//! parses new data and to the grid. Readers take an `Arc<Roster>` snapshot;
//! writers swap in a complete roster in one step, so a reader never observes
//! a half-built roster.

use super::{Roster, ScheduleError};
use crate::parser::{self, ParseError};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from ingesting or persisting a roster.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The portal page could not be read as a roster
    #[error("Could not read schedule data: {0}")]
    Parse(#[from] ParseError),

    /// Reading or writing the save file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The save file is not in the roster JSON format
    #[error("Invalid roster JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The save file holds a slot with out-of-range values
    #[error("Invalid schedule in saved roster: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    /// The background parse task did not complete
    #[error("Parse task failed: {message}")]
    Join { message: String },
}

/// Result of feeding a new portal page into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The roster was replaced; holds the new subject count
    Replaced { subjects: usize },
    /// The page parsed but held no subjects; the previous roster is kept
    NothingParsed,
}

/// Holder of the roster currently shown by the application.
#[derive(Debug, Default)]
pub struct RosterStore {
    current: RwLock<Arc<Roster>>,
}

impl RosterStore {
    /// Creates a store holding an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `roster`.
    pub fn with_roster(roster: Roster) -> Self {
        Self {
            current: RwLock::new(Arc::new(roster)),
        }
    }

    /// Returns the roster as it is right now.
    pub fn snapshot(&self) -> Arc<Roster> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in a complete roster.
    pub fn replace(&self, roster: Roster) -> Arc<Roster> {
        let roster = Arc::new(roster);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = roster.clone();
        info!(subjects = roster.len(), "Roster replaced");
        roster
    }

    /// Parses `markup` on a blocking worker and swaps the result in.
    ///
    /// A structural parse failure leaves the current roster untouched and is
    /// returned as [`StoreError::Parse`]. A page without subjects is reported
    /// as [`IngestOutcome::NothingParsed`] and also keeps the current roster.
    pub async fn ingest(&self, markup: String) -> Result<IngestOutcome, StoreError> {
        let parsed = tokio::task::spawn_blocking(move || parser::parse(&markup))
            .await
            .map_err(|e| StoreError::Join {
                message: e.to_string(),
            })?;

        let subjects = match parsed {
            Ok(subjects) => subjects,
            Err(e) => {
                warn!(error = %e, "Keeping previous roster");
                return Err(e.into());
            }
        };

        if subjects.is_empty() {
            info!("Portal page held no subjects, keeping previous roster");
            return Ok(IngestOutcome::NothingParsed);
        }

        let count = subjects.len();
        self.replace(Roster::new(subjects));
        Ok(IngestOutcome::Replaced { subjects: count })
    }

    /// Serializes the current roster in the save-file format.
    pub fn to_json(&self) -> Result<String, StoreError> {
        self.snapshot().to_json()
    }

    /// Replaces the current roster with one read from save-file JSON.
    pub fn load_json(&self, json: &str) -> Result<Arc<Roster>, StoreError> {
        let roster = Roster::from_json(json)?;
        Ok(self.replace(roster))
    }

    /// Writes the current roster to `path`.
    pub fn save_to_file(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "Roster saved");
        Ok(())
    }

    /// Loads a roster from `path` and makes it current.
    ///
    /// On any error the current roster is kept.
    pub fn load_from_file(&self, path: &Path) -> Result<Arc<Roster>, StoreError> {
        let content = std::fs::read_to_string(path)?;
        self.load_json(&content)
    }
}

impl Roster {
    /// Encodes the roster as `{"timeTable": [...]}`.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes save-file JSON, checking every slot.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let roster: Roster = serde_json::from_str(json)?;
        roster.validate()?;
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SectionKind, Subject, MONDAY};
    use crate::parser::tests::{page, section_markup};
    use crate::parser::{COURSE_ANCHOR, SCHEDULE_ANCHOR};

    fn sample_roster() -> Roster {
        let mut subject = Subject::new("CS101", "Intro to CS", Some("LEC A".into()), None, 3, 0);
        subject
            .add_slot(SectionKind::Lecture, MONDAY as i32, 9, "LAB1")
            .unwrap();
        Roster::new(vec![subject])
    }

    fn portal_page() -> String {
        page(&[
            section_markup(
                COURSE_ANCHOR,
                &[&["1", "MA201", "Calculus", "LEC B", "TUT 1", "4"]],
            ),
            section_markup(
                SCHEDULE_ANCHOR,
                &[&["1", "MA201", "LEC B", "TUE", "08AM", "DK1"]],
            ),
        ])
    }

    #[test]
    fn test_json_uses_save_file_keys() {
        let store = RosterStore::with_roster(sample_roster());
        let json: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();

        let subject = &json["timeTable"][0];
        assert_eq!(subject["subjectCode"], "CS101");
        assert_eq!(subject["subjectDescription"], "Intro to CS");
        assert_eq!(subject["lecturerSection"], "LEC A");
        assert!(subject["tutorialSection"].is_null());
        assert_eq!(subject["creditHours"], 3);
        assert_eq!(subject["color"], 0);
        assert_eq!(subject["event"], serde_json::json!([]));

        let slot = &subject["schedule"][0];
        assert_eq!(slot["day"], 1);
        assert_eq!(slot["time"], 9);
        assert_eq!(slot["length"], 1);
        assert_eq!(slot["section"], 0);
        assert_eq!(slot["room"], "LAB1");
    }

    #[test]
    fn test_load_rejects_out_of_range_slot() {
        let store = RosterStore::with_roster(sample_roster());
        let json = r#"{"timeTable":[{"subjectCode":"X1","subjectDescription":"x",
            "lecturerSection":null,"tutorialSection":null,"creditHours":1,"color":0,
            "schedule":[{"day":9,"time":8,"length":1,"section":0,"room":""}],"event":[]}]}"#;

        let err = store.load_json(json).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidSchedule(ScheduleError::InvalidDay { day: 9 })
        ));
        assert_eq!(store.snapshot().as_ref(), &sample_roster());
    }

    #[test]
    fn test_file_round_trip_keeps_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ttg");

        let mut roster = sample_roster();
        roster.subjects_mut()[0]
            .events
            .push(serde_json::json!({"name": "Quiz 1", "date": 20140312}));

        RosterStore::with_roster(roster.clone())
            .save_to_file(&path)
            .unwrap();

        let restored = RosterStore::new();
        restored.load_from_file(&path).unwrap();
        assert_eq!(restored.snapshot().as_ref(), &roster);
    }

    #[tokio::test]
    async fn test_ingest_replaces_roster() {
        let store = RosterStore::with_roster(sample_roster());
        let before = store.snapshot();

        let outcome = store.ingest(portal_page()).await.unwrap();

        assert_eq!(outcome, IngestOutcome::Replaced { subjects: 1 });
        assert_eq!(store.snapshot().subjects()[0].code, "MA201");
        // Earlier snapshots are unaffected by the swap
        assert_eq!(before.subjects()[0].code, "CS101");
    }

    #[tokio::test]
    async fn test_ingest_failure_keeps_previous_roster() {
        let store = RosterStore::with_roster(sample_roster());

        let err = store
            .ingest("<html><body>maintenance</body></html>".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Parse(ref e) if e.is_structural()));
        assert!(err.to_string().starts_with("Could not read schedule data"));
        assert_eq!(store.snapshot().subjects()[0].code, "CS101");
    }

    #[tokio::test]
    async fn test_ingest_empty_page_keeps_previous_roster() {
        let store = RosterStore::with_roster(sample_roster());
        let markup = page(&[
            section_markup(COURSE_ANCHOR, &[]),
            section_markup(SCHEDULE_ANCHOR, &[]),
        ]);

        assert_eq!(store.ingest(markup).await.unwrap(), IngestOutcome::NothingParsed);
        assert_eq!(store.snapshot().len(), 1);
    }
}
