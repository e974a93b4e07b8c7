//! Day-switch animation for day mode.
//!
//! After a horizontal drag is released the day offset either settles back to
//! zero or travels a full column to the neighboring day. The offset moves at
//! a fixed px/s rate derived from the column width, so the animation takes
//! the same time whatever the frame rate.

use crate::model::{FRIDAY, MONDAY};
use std::time::Duration;

/// Direction the day offset is moving in.
///
/// `Next` increases the offset (content slides left), `Prev` decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDirection {
    Prev,
    None,
    Next,
}

impl SwitchDirection {
    /// Direction for a release at the given drag state.
    ///
    /// Past the threshold the offset keeps moving the way it was dragged;
    /// short of it, the offset moves back toward zero.
    pub fn from_release(beyond_threshold: bool, toward_next: bool) -> Self {
        if beyond_threshold ^ toward_next {
            SwitchDirection::Prev
        } else {
            SwitchDirection::Next
        }
    }
}

/// Progress of a running day switch after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DaySwitchStep {
    Moving { offset: f32 },
    /// The offset has settled at zero; `day_delta` is `-1`, `0` or `1`
    Finished { day_delta: i8 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySwitch {
    direction: SwitchDirection,
    target: f32,
    /// px/s
    speed: f32,
}

impl DaySwitch {
    /// Plans the animation for a drag released at `offset`.
    ///
    /// Returns `None` when there is nothing to animate. A switch that would
    /// leave Monday..Friday settles back instead.
    ///
    /// # Arguments
    /// * `offset` - Horizontal day offset at release
    /// * `cell_width` - Width of one day column
    /// * `threshold_ratio` - Share of `cell_width` the drag must exceed
    /// * `current_day` - Day shown before the switch
    /// * `duration` - Time to travel one full column
    pub fn plan(
        offset: f32,
        cell_width: f32,
        threshold_ratio: f32,
        current_day: u8,
        duration: Duration,
    ) -> Option<Self> {
        if offset == 0.0 || cell_width <= 0.0 {
            return None;
        }

        let beyond = offset.abs() > cell_width * threshold_ratio;
        let toward_next = offset > 0.0;

        let mut target = match (beyond, toward_next) {
            (true, true) => cell_width,
            (true, false) => -cell_width,
            (false, _) => 0.0,
        };
        if (target > 0.0 && current_day >= FRIDAY) || (target < 0.0 && current_day <= MONDAY) {
            target = 0.0;
        }

        let direction = if target == 0.0 {
            // Settling back always moves toward zero
            if toward_next {
                SwitchDirection::Prev
            } else {
                SwitchDirection::Next
            }
        } else {
            SwitchDirection::from_release(beyond, toward_next)
        };

        let secs = duration.as_secs_f32();
        let speed = if secs > 0.0 {
            cell_width / secs
        } else {
            f32::INFINITY
        };

        Some(Self {
            direction,
            target,
            speed,
        })
    }

    pub fn direction(&self) -> SwitchDirection {
        self.direction
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Advances `offset` by the distance covered in `dt`.
    pub fn tick(&self, offset: f32, dt: Duration) -> DaySwitchStep {
        let step = self.speed * dt.as_secs_f32();
        if !step.is_finite() {
            return self.finish();
        }

        let (next, arrived) = match self.direction {
            SwitchDirection::Next => {
                let next = offset + step;
                (next, next >= self.target)
            }
            SwitchDirection::Prev => {
                let next = offset - step;
                (next, next <= self.target)
            }
            SwitchDirection::None => (self.target, true),
        };

        if arrived {
            self.finish()
        } else {
            DaySwitchStep::Moving { offset: next }
        }
    }

    fn finish(&self) -> DaySwitchStep {
        let day_delta = if self.target > 0.0 {
            1
        } else if self.target < 0.0 {
            -1
        } else {
            0
        };
        DaySwitchStep::Finished { day_delta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TUESDAY, WEDNESDAY};

    const DURATION: Duration = Duration::from_millis(300);

    #[test]
    fn test_release_direction_xor() {
        assert_eq!(SwitchDirection::from_release(true, true), SwitchDirection::Next);
        assert_eq!(SwitchDirection::from_release(true, false), SwitchDirection::Prev);
        assert_eq!(SwitchDirection::from_release(false, true), SwitchDirection::Prev);
        assert_eq!(SwitchDirection::from_release(false, false), SwitchDirection::Next);
    }

    #[test]
    fn test_plan_past_threshold_goes_to_next_day() {
        let switch = DaySwitch::plan(100.0, 300.0, 0.15, TUESDAY, DURATION).unwrap();

        assert_eq!(switch.direction(), SwitchDirection::Next);
        assert_eq!(switch.target(), 300.0);
    }

    #[test]
    fn test_plan_short_drag_settles_back() {
        let switch = DaySwitch::plan(-30.0, 300.0, 0.15, WEDNESDAY, DURATION).unwrap();

        assert_eq!(switch.direction(), SwitchDirection::Next);
        assert_eq!(switch.target(), 0.0);
        assert!(DaySwitch::plan(0.0, 300.0, 0.15, WEDNESDAY, DURATION).is_none());
    }

    #[test]
    fn test_plan_cancels_at_week_edges() {
        let friday = DaySwitch::plan(200.0, 300.0, 0.15, FRIDAY, DURATION).unwrap();
        assert_eq!(friday.target(), 0.0);
        assert_eq!(friday.direction(), SwitchDirection::Prev);

        let monday = DaySwitch::plan(-200.0, 300.0, 0.15, MONDAY, DURATION).unwrap();
        assert_eq!(monday.target(), 0.0);
        assert_eq!(monday.direction(), SwitchDirection::Next);
    }

    #[test]
    fn test_speed_is_independent_of_frame_rate() {
        let switch = DaySwitch::plan(100.0, 300.0, 0.15, TUESDAY, DURATION).unwrap();

        let coarse = match switch.tick(100.0, Duration::from_millis(100)) {
            DaySwitchStep::Moving { offset } => offset,
            other => panic!("unexpected {other:?}"),
        };
        let mut fine = 100.0;
        for _ in 0..10 {
            match switch.tick(fine, Duration::from_millis(10)) {
                DaySwitchStep::Moving { offset } => fine = offset,
                other => panic!("unexpected {other:?}"),
            }
        }

        assert!((coarse - 200.0).abs() < 0.1);
        assert!((coarse - fine).abs() < 0.1);
    }

    #[test]
    fn test_finishes_with_single_day_step() {
        let switch = DaySwitch::plan(-250.0, 300.0, 0.15, WEDNESDAY, DURATION).unwrap();

        assert_eq!(
            switch.tick(-250.0, Duration::from_millis(100)),
            DaySwitchStep::Finished { day_delta: -1 }
        );
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let switch = DaySwitch::plan(100.0, 300.0, 0.15, TUESDAY, Duration::ZERO).unwrap();

        // An infinite speed over a zero tick must not produce NaN
        assert_eq!(
            switch.tick(100.0, Duration::ZERO),
            DaySwitchStep::Finished { day_delta: 1 }
        );
        assert_eq!(
            switch.tick(100.0, Duration::from_millis(16)),
            DaySwitchStep::Finished { day_delta: 1 }
        );
    }
}
