//! Mapping between `(day, hour)` cells and pixel rectangles.
//!
//! Nothing here holds gesture or animation state. The caller passes a
//! [`Viewport`] describing the current scroll position, so every function is a
//! plain computation over the geometry and its inputs.

use super::config::{check_hour_range, check_weekday, GridConfig};
use super::error::GridError;
use crate::model::{FRIDAY, MONDAY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of weekday columns in week mode.
pub const WEEK_COLUMNS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// One day spanning the full content width
    #[default]
    Day,
    /// Monday to Friday side by side
    Week,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Day => write!(f, "day"),
            DisplayMode::Week => write!(f, "week"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(DisplayMode::Day),
            "week" => Ok(DisplayMode::Week),
            other => Err(format!("unknown display mode \"{other}\", expected day or week")),
        }
    }
}

/// Axis-aligned pixel rectangle, origin at the top left of the view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment: the right and bottom edges belong to the neighbor.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Scroll state the geometry is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Day centered in day mode, Monday (1) through Friday (5)
    pub current_day: u8,
    /// Vertical scroll, `0` at the first visible hour
    pub scroll_y: f32,
    /// Horizontal drag in day mode; positive values bring the next day in
    pub day_offset: f32,
}

impl Viewport {
    pub fn new(current_day: u8) -> Self {
        Self {
            current_day,
            scroll_y: 0.0,
            day_offset: 0.0,
        }
    }
}

/// One schedule slot positioned on the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    pub subject_index: usize,
    pub schedule_index: usize,
    pub code: String,
    pub room: String,
    pub color: u32,
    pub day: u8,
    pub start_hour: u8,
    pub rect: Rect,
}

/// Pure day/hour to pixel mapping for both display modes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    mode: DisplayMode,
    width: f32,
    height: f32,
    start_hour: u8,
    end_hour: u8,
    cell_height: f32,
    time_column_width: f32,
    header_height: f32,
    show_day_header: bool,
}

impl GridGeometry {
    /// Builds the geometry for a `width` x `height` view.
    ///
    /// # Errors
    /// Fails on an invalid hour range, a non-positive cell height, or a view
    /// too small to hold the time column.
    pub fn new(config: &GridConfig, width: f32, height: f32) -> Result<Self, GridError> {
        check_hour_range(config.start_hour as i32, config.end_hour as i32)?;
        if !(config.cell_height > 0.0) {
            return Err(GridError::InvalidCellHeight {
                height: config.cell_height,
            });
        }

        let mut geometry = Self {
            mode: config.display_mode,
            width: 0.0,
            height: 0.0,
            start_hour: config.start_hour,
            end_hour: config.end_hour,
            cell_height: config.cell_height,
            time_column_width: config.time_column_width,
            header_height: config.header_height,
            show_day_header: config.show_day_header,
        };
        geometry.resize(width, height)?;
        Ok(geometry)
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn set_visible_hour_range(&mut self, start: i32, end: i32) -> Result<(), GridError> {
        check_hour_range(start, end)?;
        self.start_hour = start as u8;
        self.end_hour = end as u8;
        Ok(())
    }

    /// Toggles the header band in day mode. Week mode always shows it.
    pub fn set_header_visible(&mut self, visible: bool) {
        self.show_day_header = visible;
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), GridError> {
        if !(width > self.time_column_width && height > 0.0) {
            return Err(GridError::InvalidViewport { width, height });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn time_column_width(&self) -> f32 {
        self.time_column_width
    }

    pub fn header_visible(&self) -> bool {
        self.header_visible_in(self.mode)
    }

    pub fn header_visible_in(&self, mode: DisplayMode) -> bool {
        mode == DisplayMode::Week || self.show_day_header
    }

    /// Height of the header band, `0` when hidden.
    pub fn header_offset(&self) -> f32 {
        self.header_offset_in(self.mode)
    }

    fn header_offset_in(&self, mode: DisplayMode) -> f32 {
        if self.header_visible_in(mode) {
            self.header_height
        } else {
            0.0
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width_for(self.mode)
    }

    pub fn cell_width_for(&self, mode: DisplayMode) -> f32 {
        let content = self.width - self.time_column_width;
        match mode {
            DisplayMode::Day => content,
            DisplayMode::Week => content / WEEK_COLUMNS as f32,
        }
    }

    /// Total height of the hour rows plus the header band.
    pub fn content_height(&self) -> f32 {
        let rows = (self.end_hour - self.start_hour) as f32 + 1.0;
        self.cell_height * rows + self.header_offset()
    }

    /// Largest vertical scroll that keeps the viewport inside the content.
    pub fn max_scroll_y(&self) -> f32 {
        (self.content_height() - self.height).max(0.0)
    }

    /// Rectangle of a block starting at `hour` on `day`, in the current mode.
    pub fn cell_rect(&self, day: u8, hour: u8, duration: u8, viewport: &Viewport) -> Option<Rect> {
        self.cell_rect_in(self.mode, day, hour, duration, viewport)
    }

    /// Rectangle of a block starting at `hour` on `day` in `mode`.
    ///
    /// Returns `None` for weekend days and for blocks starting after the last
    /// visible hour. A block running past the last visible hour is cut off
    /// there rather than rejected.
    pub fn cell_rect_in(
        &self,
        mode: DisplayMode,
        day: u8,
        hour: u8,
        duration: u8,
        viewport: &Viewport,
    ) -> Option<Rect> {
        if !(MONDAY..=FRIDAY).contains(&day) || hour > self.end_hour {
            return None;
        }

        let duration = duration.min(self.end_hour - hour + 1);
        let cell_width = self.cell_width_for(mode);

        let x = match mode {
            DisplayMode::Week => {
                self.time_column_width + (day - MONDAY) as f32 * cell_width
            }
            DisplayMode::Day => {
                let column = day as f32 - viewport.current_day as f32;
                self.time_column_width + column * cell_width - viewport.day_offset
            }
        };
        let y = (hour as f32 - self.start_hour as f32) * self.cell_height
            + self.header_offset_in(mode)
            - viewport.scroll_y;

        Some(Rect::new(
            x,
            y,
            cell_width,
            duration as f32 * self.cell_height,
        ))
    }

    /// Maps a point in view coordinates back to the `(day, hour)` under it.
    ///
    /// Points in the time column, in the header band, past Friday, or below
    /// the last visible hour map to nothing.
    pub fn locate(&self, x: f32, y: f32, viewport: &Viewport) -> Option<(u8, u8)> {
        let header = self.header_offset();
        if x <= self.time_column_width || y < header {
            return None;
        }

        let offset = match self.mode {
            DisplayMode::Day => viewport.day_offset,
            DisplayMode::Week => 0.0,
        };
        let column = ((x - self.time_column_width + offset) / self.cell_width()).floor() as i32;
        let day = match self.mode {
            DisplayMode::Day => viewport.current_day as i32 + column,
            DisplayMode::Week => MONDAY as i32 + column,
        };
        let day = check_weekday(day).ok()?;

        let row = ((viewport.scroll_y + y - header) / self.cell_height).floor() as i32;
        let hour = self.start_hour as i32 + row;
        if row < 0 || hour > self.end_hour as i32 {
            return None;
        }

        Some((day, hour as u8))
    }

    /// Vertical scroll that puts `hour:minute` at the top of the view.
    ///
    /// Returns `None` when the time is before the first visible hour.
    pub fn scroll_for_time(&self, hour: u8, minute: u8) -> Option<f32> {
        if hour < self.start_hour {
            return None;
        }
        let rows = (hour - self.start_hour) as f32;
        let offset = rows * self.cell_height + self.cell_height * minute as f32 / 60.0;
        Some(offset.clamp(0.0, self.max_scroll_y()))
    }
}
