//! Toolkit-agnostic display list for one frame of the grid.
//!
//! The host walks the returned commands in order and draws them with
//! whatever canvas it has; later commands paint over earlier ones.

use super::geometry::{DisplayMode, GridGeometry, PlacedBlock, Rect, Viewport};
use crate::model::{FRIDAY, MONDAY};
use serde::Serialize;

const SHORT_DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    Header,
    /// Palette index of the subject
    Subject(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    FillRect { rect: Rect, fill: Fill },
    Text {
        x: f32,
        y: f32,
        text: String,
        align: TextAlign,
    },
}

/// Label for the time column, `12AM` through `11PM`.
pub fn hour_label(hour: u8) -> String {
    match hour {
        0 => "12AM".to_string(),
        1..=11 => format!("{hour}AM"),
        12 => "12PM".to_string(),
        _ => format!("{}PM", hour - 12),
    }
}

/// Header label for `day`; short names in week mode, full names in day mode.
pub fn day_label(day: u8, mode: DisplayMode) -> &'static str {
    let names = match mode {
        DisplayMode::Week => &SHORT_DAY_NAMES,
        DisplayMode::Day => &DAY_NAMES,
    };
    names.get(day as usize).copied().unwrap_or("")
}

/// Builds the draw commands for the visible part of the grid.
///
/// `blocks` are drawn at the rectangles they carry, so a mode-switch
/// animation in progress is rendered as-is.
pub fn render(geometry: &GridGeometry, viewport: &Viewport, blocks: &[PlacedBlock]) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    let view = Rect::new(0.0, 0.0, geometry.width(), geometry.height());
    let header = geometry.header_offset();
    let time_column = geometry.time_column_width();

    // Hour rows with their labels
    for hour in geometry.start_hour()..=geometry.end_hour() {
        let y = (hour - geometry.start_hour()) as f32 * geometry.cell_height() + header
            - viewport.scroll_y;
        if y + geometry.cell_height() < header || y > view.height {
            continue;
        }
        commands.push(DrawCommand::Line {
            x1: 0.0,
            y1: y,
            x2: view.width,
            y2: y,
        });
        commands.push(DrawCommand::Text {
            x: time_column / 2.0,
            y,
            text: hour_label(hour),
            align: TextAlign::Center,
        });
    }

    // Column separators
    let column_edges: Vec<f32> = match geometry.mode() {
        DisplayMode::Week => (0..5)
            .map(|i| time_column + i as f32 * geometry.cell_width())
            .collect(),
        DisplayMode::Day => vec![time_column],
    };
    for x in column_edges {
        commands.push(DrawCommand::Line {
            x1: x,
            y1: 0.0,
            x2: x,
            y2: view.height,
        });
    }

    let body = Rect::new(
        time_column,
        header,
        view.width - time_column,
        view.height - header,
    );
    for block in blocks.iter().filter(|b| b.rect.intersects(&body)) {
        commands.push(DrawCommand::FillRect {
            rect: block.rect,
            fill: Fill::Subject(block.color),
        });
        commands.push(DrawCommand::Text {
            x: block.rect.x + 4.0,
            y: block.rect.y + 4.0,
            text: block.code.clone(),
            align: TextAlign::Left,
        });
        if !block.room.is_empty() {
            commands.push(DrawCommand::Text {
                x: block.rect.x + 4.0,
                y: block.rect.y + block.rect.height / 2.0,
                text: block.room.clone(),
                align: TextAlign::Left,
            });
        }
    }

    // Header goes last so scrolled blocks slide under it
    if geometry.header_visible() {
        commands.push(DrawCommand::FillRect {
            rect: Rect::new(0.0, 0.0, view.width, header),
            fill: Fill::Header,
        });
        let labels: Vec<(u8, f32)> = match geometry.mode() {
            DisplayMode::Week => (MONDAY..=FRIDAY)
                .map(|day| {
                    let x = time_column + (day - MONDAY) as f32 * geometry.cell_width();
                    (day, x + geometry.cell_width() / 2.0)
                })
                .collect(),
            DisplayMode::Day => vec![(
                viewport.current_day,
                time_column + geometry.cell_width() / 2.0 - viewport.day_offset,
            )],
        };
        for (day, x) in labels {
            commands.push(DrawCommand::Text {
                x,
                y: header / 2.0,
                text: day_label(day, geometry.mode()).to_string(),
                align: TextAlign::Center,
            });
        }
    }

    commands
}
