//! Grid geometry for the day and week views, plus the display-list renderer.

mod config;
mod error;
mod geometry;
pub mod render;

pub(crate) use config::check_weekday;
pub use config::{weekday_index, GridConfig};
pub use error::{ConfigError, GridError};
pub use geometry::*;
pub use render::{render, DrawCommand, Fill, TextAlign};
