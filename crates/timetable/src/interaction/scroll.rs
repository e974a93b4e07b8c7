//! Scroll-axis lock and the fling simulation.

use super::Tick;
use std::time::Duration;

/// Axis a drag gesture is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAxis {
    #[default]
    None,
    Vertical,
    Horizontal,
}

impl ScrollAxis {
    /// Picks the axis from the first drag delta of a gesture.
    ///
    /// The larger component wins; a tie goes to vertical. A zero delta does
    /// not lock anything.
    pub fn classify(dx: f32, dy: f32) -> Self {
        if dx == 0.0 && dy == 0.0 {
            ScrollAxis::None
        } else if dx.abs() > dy.abs() {
            ScrollAxis::Horizontal
        } else {
            ScrollAxis::Vertical
        }
    }
}

/// Constant-deceleration scroll started by a fling.
///
/// Position follows `p0 + v*t - a*t²/2` (sign-adjusted) until the velocity
/// reaches zero or the position hits a bound. Both happen in finite time,
/// so ticking always ends in [`Tick::Done`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlingScroller {
    start: f32,
    velocity: f32,
    deceleration: f32,
    min: f32,
    max: f32,
    elapsed: f32,
    position: f32,
    finished: bool,
}

impl FlingScroller {
    /// Starts a fling at `start` moving at `velocity` px/s.
    pub fn new(start: f32, velocity: f32, deceleration: f32, min: f32, max: f32) -> Self {
        let start = start.clamp(min, max);
        Self {
            start,
            velocity,
            deceleration: deceleration.abs(),
            min,
            max,
            elapsed: 0.0,
            position: start,
            finished: velocity == 0.0 || deceleration == 0.0,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Time until the velocity reaches zero, ignoring bounds.
    pub fn duration(&self) -> Duration {
        if self.deceleration == 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f32(self.velocity.abs() / self.deceleration)
    }

    /// Advances the simulation by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Tick {
        if self.finished {
            return Tick::Done;
        }

        let total = self.velocity.abs() / self.deceleration;
        self.elapsed = (self.elapsed + dt.as_secs_f32()).min(total);

        let t = self.elapsed;
        let travelled = self.velocity.abs() * t - 0.5 * self.deceleration * t * t;
        let raw = self.start + travelled.copysign(self.velocity);
        self.position = raw.clamp(self.min, self.max);

        if self.elapsed >= total || raw <= self.min || raw >= self.max {
            self.finished = true;
            return Tick::Done;
        }
        Tick::Continue
    }

    /// Stops the fling where it is.
    pub fn abort(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn run(scroller: &mut FlingScroller) -> usize {
        let mut ticks = 0;
        while scroller.tick(FRAME) == Tick::Continue {
            ticks += 1;
            assert!(ticks < 10_000, "fling never finished");
        }
        ticks
    }

    #[test]
    fn test_axis_lock_prefers_larger_delta() {
        assert_eq!(ScrollAxis::classify(10.0, 2.0), ScrollAxis::Horizontal);
        assert_eq!(ScrollAxis::classify(-1.0, 8.0), ScrollAxis::Vertical);
        assert_eq!(ScrollAxis::classify(0.0, 0.0), ScrollAxis::None);
    }

    #[test]
    fn test_axis_tie_goes_vertical() {
        assert_eq!(ScrollAxis::classify(5.0, 5.0), ScrollAxis::Vertical);
        assert_eq!(ScrollAxis::classify(-3.0, 3.0), ScrollAxis::Vertical);
    }

    #[test]
    fn test_fling_stops_at_rest_point() {
        // v = 1000 px/s, a = 2000 px/s² -> rests after 0.5s, 250px further
        let mut scroller = FlingScroller::new(100.0, 1000.0, 2000.0, 0.0, 10_000.0);
        let ticks = run(&mut scroller);

        assert!(ticks <= 32);
        assert!((scroller.position() - 350.0).abs() < 0.01);
        assert!(scroller.is_finished());
    }

    #[test]
    fn test_fling_stops_at_bound() {
        let mut scroller = FlingScroller::new(100.0, -3000.0, 2000.0, 0.0, 900.0);
        run(&mut scroller);

        assert_eq!(scroller.position(), 0.0);
    }

    #[test]
    fn test_zero_velocity_is_done_immediately() {
        let mut scroller = FlingScroller::new(50.0, 0.0, 2000.0, 0.0, 900.0);
        assert_eq!(scroller.tick(FRAME), Tick::Done);
        assert_eq!(scroller.position(), 50.0);
    }

    #[test]
    fn test_fling_moves_monotonically() {
        let mut scroller = FlingScroller::new(0.0, 2500.0, 2000.0, 0.0, 5000.0);
        let mut last = scroller.position();
        while scroller.tick(FRAME) == Tick::Continue {
            assert!(scroller.position() >= last);
            last = scroller.position();
        }
    }
}
