//! Error types.
//!
//! Blocked movement is not an error (see [`crate::game::stage::MoveResult`]).
//! Everything here is a programmer or content error and is reported eagerly.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::geometry::GridPos;
use crate::game::character::CharacterId;

/// Crate-wide result alias.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Stage placement and lookup errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    /// Terrain id was never registered.
    #[error("terrain '{0}' is not registered")]
    UnknownTerrain(String),

    /// Grid position lies outside the stage.
    #[error("position {pos} is outside the {width}x{height} stage")]
    OutOfBounds {
        /// Requested position
        pos: GridPos,
        /// Stage width
        width: usize,
        /// Stage height
        height: usize,
    },

    /// Target cell already holds a character.
    #[error("cell {0} is already occupied")]
    Occupied(GridPos),

    /// Character is not placed on this stage.
    #[error("character {0} is not on the stage")]
    UnknownCharacter(CharacterId),
}

/// Map design validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DesignError {
    /// No rows, or an empty first row.
    #[error("map design has no cells")]
    Empty,

    /// A row whose length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of this row
        found: usize,
    },

    /// Symbol missing from the legend.
    #[error("symbol '{symbol}' at {pos} is not in the legend")]
    UnknownSymbol {
        /// Offending symbol
        symbol: char,
        /// Where it appears
        pos: GridPos,
    },

    /// Legend points at an unregistered terrain id.
    #[error("legend maps '{symbol}' to unregistered terrain '{terrain}'")]
    UnregisteredTerrain {
        /// Legend symbol
        symbol: char,
        /// Terrain id
        terrain: String,
    },
}

/// Scene registry errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// No scene registered under this id.
    #[error("scene '{0}' is not registered")]
    UnknownScene(String),

    /// Tick or input delivered before `start`.
    #[error("no scene is active")]
    NotStarted,
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid config JSON.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Stage operation failed
    #[error(transparent)]
    Stage(#[from] StageError),

    /// Map design rejected
    #[error(transparent)]
    Design(#[from] DesignError),

    /// Scene registry failure
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}
