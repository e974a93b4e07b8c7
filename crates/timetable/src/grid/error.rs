//! Error types for the grid geometry and its configuration.

use thiserror::Error;

/// Rejected geometry parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    /// Visible hours must satisfy `start <= end <= 23`
    #[error("Invalid visible hour range {start}..={end}")]
    InvalidHourRange { start: i32, end: i32 },

    #[error("Cell height must be positive, got {height}")]
    InvalidCellHeight { height: f32 },

    /// Only Monday (1) through Friday (5) can be shown
    #[error("Day {day} is not a weekday")]
    InvalidDay { day: i32 },

    /// The viewport must be wider than the time column and have some height
    #[error("Viewport {width}x{height} cannot hold the grid")]
    InvalidViewport { width: f32, height: f32 },
}

/// Errors from loading or validating a grid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read grid config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse grid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid grid config: {0}")]
    Invalid(#[from] GridError),

    /// A tuning value outside its usable range
    #[error("Invalid grid config field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
