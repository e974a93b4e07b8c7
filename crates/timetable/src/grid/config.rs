/// Grid and gesture tuning, loadable from JSON
use super::error::{ConfigError, GridError};
use super::geometry::DisplayMode;
use crate::model::{FRIDAY, MONDAY};
use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Settings for the grid geometry and the interaction controller.
///
/// Every field has a default, so a config file only needs the values it
/// changes. Lengths are in pixels, durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub display_mode: DisplayMode,
    /// Day shown in day mode; `None` means today (weekends show Monday)
    pub current_day: Option<u8>,
    pub start_hour: u8,
    pub end_hour: u8,
    pub cell_height: f32,
    pub time_column_width: f32,
    pub header_height: f32,
    /// Shows the header band in day mode too; week mode always has one
    pub show_day_header: bool,
    /// Report taps on cells without a slot to the listener
    pub report_click_on_empty_cell: bool,
    /// Time a day switch takes to travel one column
    pub day_switch_duration_ms: u64,
    /// Share of a column the drag must pass to commit a day switch
    pub day_switch_threshold_ratio: f32,
    pub mode_switch_duration_ms: u64,
    pub fling_min_distance: f32,
    pub fling_min_velocity: f32,
    /// Deceleration of a fling in px/s²
    pub fling_deceleration: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Day,
            current_day: None,
            start_hour: 8,
            end_hour: 22,
            cell_height: 100.0,
            time_column_width: 56.0,
            header_height: 28.0,
            show_day_header: false,
            report_click_on_empty_cell: false,
            day_switch_duration_ms: 300,
            day_switch_threshold_ratio: 0.15,
            mode_switch_duration_ms: 500,
            fling_min_distance: 16.0,
            fling_min_velocity: 50.0,
            fling_deceleration: 2000.0,
        }
    }
}

impl GridConfig {
    /// Loads and validates a config file
    ///
    /// # Arguments
    /// * `path` - Path to a JSON file holding any subset of the fields
    ///
    /// # Returns
    /// * `Ok(GridConfig)` - Defaults overridden by the file's values
    /// * `Err` - If the file can't be read, parsed, or holds unusable values
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: GridConfig = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), mode = ?config.display_mode, "Loaded grid config");

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_hour_range(self.start_hour as i32, self.end_hour as i32)?;

        if !(self.cell_height > 0.0) {
            return Err(GridError::InvalidCellHeight {
                height: self.cell_height,
            }
            .into());
        }

        if let Some(day) = self.current_day {
            check_weekday(day as i32)?;
        }

        if !(self.time_column_width >= 0.0) {
            return Err(invalid_field("time_column_width", "must not be negative"));
        }
        if !(self.header_height >= 0.0) {
            return Err(invalid_field("header_height", "must not be negative"));
        }
        if !(self.day_switch_threshold_ratio > 0.0 && self.day_switch_threshold_ratio < 1.0) {
            return Err(invalid_field(
                "day_switch_threshold_ratio",
                "must be between 0 and 1",
            ));
        }
        if self.day_switch_duration_ms == 0 {
            return Err(invalid_field("day_switch_duration_ms", "must be positive"));
        }
        if !(self.fling_deceleration > 0.0) {
            return Err(invalid_field("fling_deceleration", "must be positive"));
        }

        Ok(())
    }

    /// The configured day, or today's weekday when none is set.
    pub fn resolve_current_day(&self) -> u8 {
        self.current_day
            .unwrap_or_else(|| weekday_index(chrono::Local::now().weekday()))
    }

    pub fn day_switch_duration(&self) -> Duration {
        Duration::from_millis(self.day_switch_duration_ms)
    }

    pub fn mode_switch_duration(&self) -> Duration {
        Duration::from_millis(self.mode_switch_duration_ms)
    }
}

/// Maps a calendar weekday to the grid's day index, sending weekends to Monday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Sat | Weekday::Sun => MONDAY,
        other => other.num_days_from_sunday() as u8,
    }
}

pub(crate) fn check_hour_range(start: i32, end: i32) -> Result<(), GridError> {
    if 0 <= start && start <= end && end <= 23 {
        Ok(())
    } else {
        Err(GridError::InvalidHourRange { start, end })
    }
}

pub(crate) fn check_weekday(day: i32) -> Result<u8, GridError> {
    if (MONDAY as i32..=FRIDAY as i32).contains(&day) {
        Ok(day as u8)
    } else {
        Err(GridError::InvalidDay { day })
    }
}

fn invalid_field(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.start_hour, config.end_hour), (8, 22));
        assert_eq!(config.display_mode, DisplayMode::Day);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"display_mode": "week", "start_hour": 7, "current_day": 3}}"#).unwrap();

        let config = GridConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.display_mode, DisplayMode::Week);
        assert_eq!(config.start_hour, 7);
        assert_eq!(config.end_hour, 22);
        assert_eq!(config.resolve_current_day(), 3);
    }

    #[test]
    fn test_load_rejects_reversed_hours() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"start_hour": 18, "end_hour": 9}}"#).unwrap();

        let err = GridConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(GridError::InvalidHourRange { start: 18, end: 9 })
        ));
    }

    #[test]
    fn test_validate_rejects_weekend_day() {
        let config = GridConfig {
            current_day: Some(6),
            ..GridConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(GridError::InvalidDay { day: 6 }))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = GridConfig {
            day_switch_threshold_ratio: 1.5,
            ..GridConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField {
                field: "day_switch_threshold_ratio",
                ..
            })
        ));
    }

    #[test]
    fn test_weekend_maps_to_monday() {
        assert_eq!(weekday_index(Weekday::Sat), MONDAY);
        assert_eq!(weekday_index(Weekday::Sun), MONDAY);
        assert_eq!(weekday_index(Weekday::Wed), 3);
        assert_eq!(weekday_index(Weekday::Fri), FRIDAY);
    }
}
