//! Gesture handling for the timetable grid.
//!
//! [`TimetableController`] owns all mutable view state: scroll offsets, the
//! locked drag axis, and whichever animations are running. The host feeds it
//! [`GestureEvent`]s as they arrive and calls [`TimetableController::tick`]
//! from its frame or timer callback for as long as it returns
//! [`Tick::Continue`]. Taps and day changes are reported through a
//! [`TimetableListener`].

mod day_switch;
mod hit;
mod mode_switch;
mod scroll;

pub use day_switch::{DaySwitch, DaySwitchStep, SwitchDirection};
pub use hit::find_slot;
pub use mode_switch::ModeSwitchAnimation;
pub use scroll::{FlingScroller, ScrollAxis};

use crate::grid::{
    self, check_weekday, ConfigError, DisplayMode, DrawCommand, GridConfig, GridError,
    GridGeometry, PlacedBlock, Viewport,
};
use crate::model::{Roster, FRIDAY, MONDAY};
use chrono::Timelike;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Whether an animation wants another tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Done,
}

/// Input events in view coordinates.
///
/// `Scroll` carries the scroll distance since the previous event (positive
/// `dy` scrolls further down the day). `Fling` carries the finger velocity in
/// px/s, so an upward flick has negative `vy` and scrolls down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Down { x: f32, y: f32 },
    Scroll { dx: f32, dy: f32 },
    Fling { vx: f32, vy: f32 },
    Tap { x: f32, y: f32 },
    Up,
}

/// Slot under a tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotHit {
    pub subject_index: usize,
    pub schedule_index: usize,
    pub subject_code: String,
}

/// A tap resolved to a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemClick {
    pub day: u8,
    pub hour: u8,
    /// `None` for an empty cell, reported only when enabled
    pub slot: Option<SlotHit>,
}

/// Receiver for the controller's notifications.
pub trait TimetableListener {
    fn on_item_click(&mut self, click: &ItemClick);
    fn on_day_changed(&mut self, day: u8);
}

/// State machine behind the interactive grid.
pub struct TimetableController {
    config: GridConfig,
    geometry: GridGeometry,
    viewport: Viewport,
    roster: Arc<Roster>,
    axis: ScrollAxis,
    /// Axis of the last released gesture, for a fling reported after `Up`
    released_axis: ScrollAxis,
    drag: (f32, f32),
    fling: Option<FlingScroller>,
    day_switch: Option<DaySwitch>,
    mode_switch: Option<ModeSwitchAnimation>,
    listener: Option<Box<dyn TimetableListener>>,
}

impl fmt::Debug for TimetableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimetableController")
            .field("geometry", &self.geometry)
            .field("viewport", &self.viewport)
            .field("subjects", &self.roster.len())
            .field("axis", &self.axis)
            .field("animating", &self.is_animating())
            .finish()
    }
}

impl TimetableController {
    /// Creates a controller for a `width` x `height` view showing `roster`.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the config fails validation or the view
    /// size can't produce a grid.
    pub fn new(
        config: GridConfig,
        width: f32,
        height: f32,
        roster: Arc<Roster>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = GridGeometry::new(&config, width, height)?;
        let current_day = check_weekday(config.resolve_current_day() as i32)?;

        Ok(Self {
            config,
            geometry,
            viewport: Viewport::new(current_day),
            roster,
            axis: ScrollAxis::None,
            released_axis: ScrollAxis::None,
            drag: (0.0, 0.0),
            fling: None,
            day_switch: None,
            mode_switch: None,
            listener: None,
        })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.geometry.mode()
    }

    /// Day shown in day mode; `None` in week mode.
    pub fn current_day(&self) -> Option<u8> {
        match self.geometry.mode() {
            DisplayMode::Day => Some(self.viewport.current_day),
            DisplayMode::Week => None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.fling.is_some() || self.day_switch.is_some() || self.mode_switch.is_some()
    }

    /// Installs the listener and immediately reports the current day to it.
    pub fn set_listener(&mut self, listener: Box<dyn TimetableListener>) {
        let listener = self.listener.insert(listener);
        listener.on_day_changed(self.viewport.current_day);
    }

    /// Swaps in a new roster. Positions are recomputed on the next layout.
    pub fn set_roster(&mut self, roster: Arc<Roster>) {
        self.roster = roster;
        self.mode_switch = None;
        debug!(subjects = self.roster.len(), "Controller roster replaced");
    }

    /// Feeds one input event through the gesture state machine.
    ///
    /// Returns [`Tick::Continue`] when an animation was started or is still
    /// running and the host should keep calling [`Self::tick`].
    pub fn handle(&mut self, event: GestureEvent) -> Tick {
        match event {
            GestureEvent::Down { .. } => {
                // A new touch supersedes any running fling or day switch. An
                // interrupted switch keeps its offset and is re-planned on release.
                self.fling = None;
                self.day_switch = None;
                self.axis = ScrollAxis::None;
                self.released_axis = ScrollAxis::None;
                self.drag = (0.0, 0.0);
            }
            GestureEvent::Scroll { dx, dy } => self.on_scroll(dx, dy),
            GestureEvent::Up => self.on_release(),
            GestureEvent::Fling { vx, vy } => self.on_fling(vx, vy),
            GestureEvent::Tap { x, y } => self.on_tap(x, y),
        }

        self.animation_state()
    }

    fn on_scroll(&mut self, dx: f32, dy: f32) {
        if self.axis == ScrollAxis::None {
            self.axis = match self.geometry.mode() {
                DisplayMode::Week if dx != 0.0 || dy != 0.0 => ScrollAxis::Vertical,
                _ => ScrollAxis::classify(dx, dy),
            };
            debug!(axis = ?self.axis, dx = dx, dy = dy, "Locked scroll axis");
        }

        self.drag.0 += dx;
        self.drag.1 += dy;

        match self.axis {
            ScrollAxis::Vertical => {
                self.viewport.scroll_y =
                    (self.viewport.scroll_y + dy).clamp(0.0, self.geometry.max_scroll_y());
            }
            ScrollAxis::Horizontal => {
                let (lo, hi) = self.day_offset_bounds();
                self.viewport.day_offset = (self.viewport.day_offset + dx).clamp(lo, hi);
            }
            ScrollAxis::None => {}
        }
    }

    /// Horizontal drag range; the edges of the week can't be dragged past.
    fn day_offset_bounds(&self) -> (f32, f32) {
        let width = self.geometry.cell_width();
        let lo = if self.viewport.current_day <= MONDAY {
            0.0
        } else {
            -width
        };
        let hi = if self.viewport.current_day >= FRIDAY {
            0.0
        } else {
            width
        };
        (lo, hi)
    }

    fn on_release(&mut self) {
        self.settle_day_offset();
        self.released_axis = self.axis;
        self.axis = ScrollAxis::None;
    }

    /// Plans a day switch for any day offset left over in day mode, whichever
    /// axis the last gesture locked.
    fn settle_day_offset(&mut self) {
        if self.day_switch.is_some()
            || self.viewport.day_offset == 0.0
            || self.geometry.mode() != DisplayMode::Day
        {
            return;
        }

        self.day_switch = DaySwitch::plan(
            self.viewport.day_offset,
            self.geometry.cell_width(),
            self.config.day_switch_threshold_ratio,
            self.viewport.current_day,
            self.config.day_switch_duration(),
        );
        if let Some(switch) = &self.day_switch {
            debug!(
                offset = self.viewport.day_offset,
                direction = ?switch.direction(),
                target = switch.target(),
                "Started day switch"
            );
        }
    }

    fn on_fling(&mut self, _vx: f32, vy: f32) {
        let axis = match self.axis {
            ScrollAxis::None => self.released_axis,
            locked => locked,
        };
        if axis != ScrollAxis::Vertical {
            return;
        }

        let distance = self.drag.1;
        if distance.abs() <= self.config.fling_min_distance
            || vy.abs() <= self.config.fling_min_velocity
        {
            debug!(distance = distance, velocity = vy, "Fling below threshold");
            return;
        }

        let scroller = FlingScroller::new(
            self.viewport.scroll_y,
            -vy,
            self.config.fling_deceleration,
            0.0,
            self.geometry.max_scroll_y(),
        );
        debug!(velocity = -vy, duration = ?scroller.duration(), "Started fling");
        self.fling = Some(scroller);
    }

    fn on_tap(&mut self, x: f32, y: f32) {
        self.settle_day_offset();

        let Some((day, hour)) = self.geometry.locate(x, y, &self.viewport) else {
            return;
        };

        let slot = find_slot(&self.roster, day, hour);
        if slot.is_none() && !self.config.report_click_on_empty_cell {
            return;
        }

        let click = ItemClick { day, hour, slot };
        debug!(day = day, hour = hour, hit = click.slot.is_some(), "Tap resolved");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_item_click(&click);
        }
    }

    /// Advances running animations by `elapsed` wall-clock time.
    pub fn tick(&mut self, elapsed: Duration) -> Tick {
        if let Some(fling) = self.fling.as_mut() {
            let state = fling.tick(elapsed);
            self.viewport.scroll_y = fling.position();
            if state == Tick::Done {
                self.fling = None;
            }
        }

        if let Some(switch) = &self.day_switch {
            match switch.tick(self.viewport.day_offset, elapsed) {
                DaySwitchStep::Moving { offset } => self.viewport.day_offset = offset,
                DaySwitchStep::Finished { day_delta } => {
                    self.day_switch = None;
                    self.viewport.day_offset = 0.0;
                    if day_delta != 0 {
                        let day = (self.viewport.current_day as i8 + day_delta)
                            .clamp(MONDAY as i8, FRIDAY as i8) as u8;
                        self.change_day(day);
                    }
                }
            }
        }

        if let Some(animation) = self.mode_switch.as_mut() {
            if animation.tick(elapsed) == Tick::Done {
                self.mode_switch = None;
            }
        }

        self.animation_state()
    }

    fn animation_state(&self) -> Tick {
        if self.is_animating() {
            Tick::Continue
        } else {
            Tick::Done
        }
    }

    fn change_day(&mut self, day: u8) {
        if day == self.viewport.current_day {
            return;
        }
        self.viewport.current_day = day;
        // Blocks animating toward the old day's columns would snap at the end
        self.mode_switch = None;
        info!(day = day, "Current day changed");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_day_changed(day);
        }
    }

    /// Shows `day` (Monday = 1 through Friday = 5) in day mode.
    ///
    /// Setting the day already shown does nothing and notifies nobody.
    pub fn set_current_day(&mut self, day: i32) -> Result<(), GridError> {
        let day = check_weekday(day)?;
        if day == self.viewport.current_day {
            return Ok(());
        }
        self.day_switch = None;
        self.viewport.day_offset = 0.0;
        self.change_day(day);
        Ok(())
    }

    /// Switches between day and week layout, animating the blocks across.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if mode == self.geometry.mode() {
            return;
        }

        let from = self.layout();

        self.day_switch = None;
        self.viewport.day_offset = 0.0;
        self.geometry.set_display_mode(mode);

        let to = self.base_layout();
        self.mode_switch = Some(ModeSwitchAnimation::new(
            &from,
            &to,
            self.config.mode_switch_duration(),
        ));
        self.clamp_scroll();

        info!(mode = %mode, "Display mode changed");
    }

    pub fn set_header_visible(&mut self, visible: bool) {
        self.geometry.set_header_visible(visible);
        self.clamp_scroll();
    }

    pub fn set_visible_hour_range(&mut self, start: i32, end: i32) -> Result<(), GridError> {
        self.geometry.set_visible_hour_range(start, end)?;
        self.mode_switch = None;
        self.clamp_scroll();
        Ok(())
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), GridError> {
        self.geometry.resize(width, height)?;
        self.mode_switch = None;
        self.viewport.day_offset = 0.0;
        self.clamp_scroll();
        Ok(())
    }

    /// Scrolls so `hour:minute` sits at the top of the view.
    ///
    /// Times before the first visible hour leave the scroll unchanged.
    pub fn scroll_to_time(&mut self, hour: u8, minute: u8) {
        if let Some(scroll_y) = self.geometry.scroll_for_time(hour, minute) {
            self.fling = None;
            self.viewport.scroll_y = scroll_y;
        }
    }

    /// Scrolls to the local wall-clock time.
    pub fn scroll_to_now(&mut self) {
        let now = chrono::Local::now();
        self.scroll_to_time(now.hour() as u8, now.minute() as u8);
    }

    fn clamp_scroll(&mut self) {
        self.viewport.scroll_y = self
            .viewport
            .scroll_y
            .clamp(0.0, self.geometry.max_scroll_y());
    }

    /// Every slot of the roster placed for the current frame.
    ///
    /// While a mode switch is running the horizontal spans are the animated
    /// ones.
    pub fn layout(&self) -> Vec<PlacedBlock> {
        let mut blocks = self.base_layout();
        if let Some(animation) = &self.mode_switch {
            animation.apply(&mut blocks);
        }
        blocks
    }

    fn base_layout(&self) -> Vec<PlacedBlock> {
        let mut blocks = Vec::new();
        for (subject_index, subject) in self.roster.subjects().iter().enumerate() {
            for (schedule_index, slot) in subject.schedules().iter().enumerate() {
                let Some(rect) = self.geometry.cell_rect(
                    slot.day(),
                    slot.start_hour(),
                    slot.length(),
                    &self.viewport,
                ) else {
                    continue;
                };
                blocks.push(PlacedBlock {
                    subject_index,
                    schedule_index,
                    code: subject.code.clone(),
                    room: slot.room().to_string(),
                    color: subject.color,
                    day: slot.day(),
                    start_hour: slot.start_hour(),
                    rect,
                });
            }
        }
        blocks
    }

    /// Draw commands for the current frame.
    pub fn display_list(&self) -> Vec<DrawCommand> {
        grid::render(&self.geometry, &self.viewport, &self.layout())
    }
}
