//! Timed behaviors: periodic repeats, delays and bare containers.

use std::cell::Cell;
use std::rc::Rc;

use super::{Behavior, Progress, TaskClock};

/// Invokes an action every `interval_ms`, forever or a fixed number of times.
pub struct Repeat {
    interval_ms: f64,
    remaining: Option<u32>,
    action: Box<dyn FnMut()>,
}

impl Repeat {
    /// Fire `action` once per elapsed interval, without bound.
    pub fn every(interval_ms: f64, action: impl FnMut() + 'static) -> Self {
        Self {
            interval_ms,
            remaining: None,
            action: Box::new(action),
        }
    }

    /// Flip a shared flag every interval.
    pub fn toggle(flag: Rc<Cell<bool>>, interval_ms: f64) -> Self {
        Self::every(interval_ms, move || flag.set(!flag.get()))
    }

    /// Bound the number of firings.
    pub fn times(mut self, count: u32) -> Self {
        self.remaining = Some(count);
        self
    }

    /// Firings left, `None` when unbounded.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }
}

impl Behavior for Repeat {
    fn process(&mut self, clock: &mut TaskClock) -> Progress {
        if self.remaining == Some(0) {
            return Progress::Finished;
        }
        if clock.elapsed() < self.interval_ms {
            return Progress::Running;
        }

        (self.action)();
        clock.consume(self.interval_ms);

        match self.remaining.as_mut() {
            Some(left) => {
                *left -= 1;
                if *left == 0 {
                    Progress::Finished
                } else {
                    Progress::Running
                }
            }
            None => Progress::Running,
        }
    }

    fn name(&self) -> &'static str {
        "repeat"
    }
}

/// Finishes once `duration_ms` has elapsed. Useful as a delay link in a chain.
#[derive(Clone, Copy, Debug)]
pub struct Wait {
    duration_ms: f64,
}

impl Wait {
    /// Delay of `duration_ms`.
    pub fn new(duration_ms: f64) -> Self {
        Self { duration_ms }
    }
}

impl Behavior for Wait {
    fn process(&mut self, clock: &mut TaskClock) -> Progress {
        if clock.elapsed() >= self.duration_ms {
            Progress::Finished
        } else {
            Progress::Running
        }
    }

    fn name(&self) -> &'static str {
        "wait"
    }
}

/// Never finishes; exists to host children.
#[derive(Clone, Copy, Debug, Default)]
pub struct Container;

impl Behavior for Container {
    fn process(&mut self, _clock: &mut TaskClock) -> Progress {
        Progress::Running
    }

    fn name(&self) -> &'static str {
        "container"
    }
}
