//! 2D Geometry
//!
//! Pixel coordinates, grid coordinates and the nine swipe/step directions.
//! Screen convention: +X is east, +Y is south (row 0 is the northmost row).

use std::fmt;
use std::ops::{Add, Neg, Sub};
use serde::{Deserialize, Serialize};

// =============================================================================
// COORD
// =============================================================================

/// 2D point or vector in world pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Coord {
    /// Origin
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Component-wise scale by a size.
    #[inline]
    pub fn scale(self, size: Size) -> Self {
        Self::new(self.x * size.width, self.y * size.height)
    }

    /// Multiply both components by a scalar.
    #[inline]
    pub fn times(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.sub(other).length()
    }

    /// Step one unit in a direction.
    #[inline]
    pub fn plus(self, direction: Direction) -> Self {
        let (dx, dy) = direction.step();
        Self::new(self.x + f64::from(dx), self.y + f64::from(dy))
    }

    /// Angle of this vector in degrees, normalized into (-180, 180].
    pub fn angle_degrees(self) -> f64 {
        let angle = self.y.atan2(self.x).to_degrees();
        if angle <= -180.0 {
            angle + 360.0
        } else {
            angle
        }
    }

    /// Convert to tuple.
    #[inline]
    pub fn tuple(self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Add for Coord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Coord::add(self, rhs)
    }
}

impl Sub for Coord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Coord::sub(self, rhs)
    }
}

impl Neg for Coord {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// =============================================================================
// GRID POSITION
// =============================================================================

/// Integer cell coordinate: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl GridPos {
    /// Create a new grid position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor in a direction.
    #[inline]
    pub fn plus(self, direction: Direction) -> Self {
        let (dx, dy) = direction.step();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Top-left pixel of this cell.
    #[inline]
    pub fn to_pixel(self, tile_size: f64) -> Coord {
        Coord::new(f64::from(self.x) * tile_size, f64::from(self.y) * tile_size)
    }

    /// Cell containing a pixel position.
    #[inline]
    pub fn from_pixel(pixel: Coord, tile_size: f64) -> Self {
        Self::new(
            (pixel.x / tile_size).floor() as i32,
            (pixel.y / tile_size).floor() as i32,
        )
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// =============================================================================
// SIZE
// =============================================================================

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square size.
    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// Center point of a rectangle of this size anchored at the origin.
    pub fn center(self) -> Coord {
        Coord::new(self.width / 2.0, self.height / 2.0)
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// One of the nine step directions. `Here` is "no direction".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// No movement
    #[default]
    Here,
    /// North (-Y)
    Up,
    /// North-east
    UpRight,
    /// East (+X)
    Right,
    /// South-east
    DownRight,
    /// South (+Y)
    Down,
    /// South-west
    DownLeft,
    /// West (-X)
    Left,
    /// North-west
    UpLeft,
}

impl Direction {
    /// All nine directions.
    pub const ALL: [Direction; 9] = [
        Direction::Here,
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// Unit grid step.
    #[inline]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Direction::Here => (0, 0),
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
        }
    }

    /// Canonical angle in degrees. Right is 0, Down is 90, Up is -90.
    /// `Here` reports 0.
    pub const fn angle(self) -> f64 {
        match self {
            Direction::Here | Direction::Right => 0.0,
            Direction::DownRight => 45.0,
            Direction::Down => 90.0,
            Direction::DownLeft => 135.0,
            Direction::Left => 180.0,
            Direction::UpLeft => -135.0,
            Direction::Up => -90.0,
            Direction::UpRight => -45.0,
        }
    }

    /// Inverse direction.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Here => Direction::Here,
            Direction::Up => Direction::Down,
            Direction::UpRight => Direction::DownLeft,
            Direction::Right => Direction::Left,
            Direction::DownRight => Direction::UpLeft,
            Direction::Down => Direction::Up,
            Direction::DownLeft => Direction::UpRight,
            Direction::Left => Direction::Right,
            Direction::UpLeft => Direction::DownRight,
        }
    }

    /// Whether this is a real direction (not `Here`).
    #[inline]
    pub fn is_some(self) -> bool {
        self != Direction::Here
    }
}

// =============================================================================
// TESTS
// =============================================================================
