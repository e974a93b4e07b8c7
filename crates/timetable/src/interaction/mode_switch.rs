use super::Tick;
use crate::grid::PlacedBlock;
use std::time::Duration;

/// Horizontal span of one block before and after a display-mode change.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockTransition {
    from_x: f32,
    from_width: f32,
    to_x: f32,
    to_width: f32,
}

/// Cosmetic slide of every block between its day-mode and week-mode columns.
///
/// Only `x` and `width` are interpolated; the vertical placement always comes
/// from the live geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSwitchAnimation {
    transitions: Vec<BlockTransition>,
    elapsed: Duration,
    duration: Duration,
}

impl ModeSwitchAnimation {
    /// Pairs `from` and `to` by position; both must list the same blocks.
    pub fn new(from: &[PlacedBlock], to: &[PlacedBlock], duration: Duration) -> Self {
        let transitions = from
            .iter()
            .zip(to)
            .map(|(a, b)| BlockTransition {
                from_x: a.rect.x,
                from_width: a.rect.width,
                to_x: b.rect.x,
                to_width: b.rect.width,
            })
            .collect();

        Self {
            transitions,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Fraction of the animation completed, `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn tick(&mut self, dt: Duration) -> Tick {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.elapsed >= self.duration {
            Tick::Done
        } else {
            Tick::Continue
        }
    }

    /// Overwrites the horizontal span of `blocks` with the interpolated one.
    pub fn apply(&self, blocks: &mut [PlacedBlock]) {
        let t = self.progress();
        for (block, transition) in blocks.iter_mut().zip(&self.transitions) {
            block.rect.x = lerp(transition.from_x, transition.to_x, t);
            block.rect.width = lerp(transition.from_width, transition.to_width, t);
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
