//! Pointer Input and Swipe Classification
//!
//! Raw down/move/up samples become [`PointerState`]s measured against the
//! last down point. Directions are classified with axis flags and a small
//! deadzone:
//!
//! ```text
//!   up    = dy < -deadzone      right = dx >  deadzone
//!   down  = dy >  deadzone      left  = dx < -deadzone
//! ```
//!
//! Diagonals win over single axes; no flag means `Here`. Whether a direction
//! should trigger an action is a separate decision made against the larger
//! swipe-play threshold (see [`PointerState::reaches`]).

use serde::{Deserialize, Serialize};

use crate::core::geometry::{Coord, Direction};

/// Classify a pointer delta into one of the nine directions.
pub fn classify_swipe(delta: Coord, deadzone: f64) -> Direction {
    let up = delta.y < -deadzone;
    let down = delta.y > deadzone;
    let right = delta.x > deadzone;
    let left = delta.x < -deadzone;

    match (up, down, right, left) {
        (true, _, true, _) => Direction::UpRight,
        (_, true, true, _) => Direction::DownRight,
        (_, true, _, true) => Direction::DownLeft,
        (true, _, _, true) => Direction::UpLeft,
        (true, _, _, _) => Direction::Up,
        (_, _, true, _) => Direction::Right,
        (_, true, _, _) => Direction::Down,
        (_, _, _, true) => Direction::Left,
        _ => Direction::Here,
    }
}

// =============================================================================
// POINTER STATE
// =============================================================================

/// One pointer sample measured against the down point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    point: Coord,
    start: Option<Coord>,
    delta: Option<Coord>,
    distance: Option<f64>,
    angle: Option<f64>,
    swipe_direction: Direction,
}

impl PointerState {
    /// Measure `point` against `start`. Without a start nothing is derived.
    pub fn new(point: Coord, start: Option<Coord>, deadzone: f64) -> Self {
        match start {
            Some(start) => {
                let delta = point - start;
                Self {
                    point,
                    start: Some(start),
                    delta: Some(delta),
                    distance: Some(delta.length()),
                    angle: Some(delta.angle_degrees()),
                    swipe_direction: classify_swipe(delta, deadzone),
                }
            }
            None => Self {
                point,
                start: None,
                delta: None,
                distance: None,
                angle: None,
                swipe_direction: Direction::Here,
            },
        }
    }

    /// Current point in world pixels.
    pub fn point(&self) -> Coord {
        self.point
    }

    /// Down point, if a gesture is active.
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    /// `point - start`.
    pub fn delta(&self) -> Option<Coord> {
        self.delta
    }

    /// Euclidean length of the delta.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// Delta angle in degrees, in (-180, 180].
    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    /// Classified direction.
    pub fn swipe_direction(&self) -> Direction {
        self.swipe_direction
    }

    /// Whether the gesture has travelled further than `threshold` pixels.
    pub fn reaches(&self, threshold: f64) -> bool {
        self.distance.is_some_and(|d| d > threshold)
    }
}

/// Completed gesture reported on pointer-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerGesture {
    /// Released inside the deadzone
    Tap(PointerState),
    /// Released outside the deadzone
    Swipe(Direction, PointerState),
}

/// Queued input event, delivered to the active scene on the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed
    Down(PointerState),
    /// Pointer moved while pressed
    Move(PointerState),
    /// Gesture finished
    Up(PointerGesture),
}

// =============================================================================
// POINTER
// =============================================================================

/// Tracks the down point and turns screen samples into pointer states.
#[derive(Clone, Debug)]
pub struct Pointer {
    deadzone: f64,
    scale_ratio: f64,
    anchor: Option<Coord>,
}

impl Pointer {
    /// Pointer with a classification deadzone and a screen-to-world ratio.
    pub fn new(deadzone: f64, scale_ratio: f64) -> Self {
        Self {
            deadzone,
            scale_ratio,
            anchor: None,
        }
    }

    /// Down point of the active gesture.
    pub fn anchor(&self) -> Option<Coord> {
        self.anchor
    }

    fn to_world(&self, screen: Coord) -> Coord {
        screen.times(self.scale_ratio)
    }

    /// Start a gesture.
    pub fn down(&mut self, screen: Coord) -> PointerState {
        let point = self.to_world(screen);
        self.anchor = Some(point);
        PointerState::new(point, Some(point), self.deadzone)
    }

    /// Re-measure against the anchor. Ignored when no gesture is active.
    pub fn moved(&self, screen: Coord) -> Option<PointerState> {
        let anchor = self.anchor?;
        Some(PointerState::new(self.to_world(screen), Some(anchor), self.deadzone))
    }

    /// Finish the gesture and clear the anchor.
    pub fn up(&mut self, screen: Coord) -> Option<PointerGesture> {
        let anchor = self.anchor.take()?;
        let state = PointerState::new(self.to_world(screen), Some(anchor), self.deadzone);
        Some(match state.swipe_direction() {
            Direction::Here => PointerGesture::Tap(state),
            direction => PointerGesture::Swipe(direction, state),
        })
    }
}
