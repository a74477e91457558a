//! Core primitives.
//!
//! Geometry is pure and immutable. Configuration and error types live here so
//! every other module can depend on them without cycles.

pub mod config;
pub mod error;
pub mod geometry;

// Re-export core types
pub use config::EngineConfig;
pub use error::{ConfigError, DesignError, EngineError, SceneError, StageError};
pub use geometry::{Coord, Direction, GridPos, Size};
