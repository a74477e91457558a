//! Eased Movement
//!
//! Cubic ease-out tween of a shared position. With `p = min(1, t/limit) - 1`
//! the position is `start + distance * (p^3 + 1)`: fast at first, settling on
//! the target exactly when the time limit is reached.

use std::cell::Cell;
use std::rc::Rc;

use super::{Behavior, Progress, TaskClock};
use crate::core::geometry::Coord;

/// Moves `target` from its value at construction to `to` over `time_limit_ms`.
///
/// The start and the distance are captured once. Re-targeting needs a new task.
#[derive(Debug)]
pub struct EasingMove {
    target: Rc<Cell<Coord>>,
    start: Coord,
    distance: Coord,
    time_limit_ms: f64,
}

impl EasingMove {
    /// Capture the current value of `target` as the start point.
    pub fn new(target: Rc<Cell<Coord>>, to: Coord, time_limit_ms: f64) -> Self {
        let start = target.get();
        Self {
            target,
            start,
            distance: to - start,
            time_limit_ms,
        }
    }

    /// Destination point.
    pub fn destination(&self) -> Coord {
        self.start + self.distance
    }

    fn position_at(&self, elapsed_ms: f64) -> Coord {
        let ratio = if self.time_limit_ms > 0.0 {
            (elapsed_ms / self.time_limit_ms).min(1.0)
        } else {
            1.0
        };
        let p = ratio - 1.0;
        let eased = p * p * p + 1.0;
        self.start + self.distance.times(eased)
    }
}

impl Behavior for EasingMove {
    fn process(&mut self, clock: &mut TaskClock) -> Progress {
        self.target.set(self.position_at(clock.elapsed()));
        if clock.elapsed() >= self.time_limit_ms {
            Progress::Finished
        } else {
            Progress::Running
        }
    }

    fn name(&self) -> &'static str {
        "easing_move"
    }
}
