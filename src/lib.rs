//! # Gridwalk
//!
//! Core of a small frame-driven dungeon game: cooperative tasks, swipe input
//! and a tile-grid stage. Rendering and audio are reached through traits.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         GRIDWALK                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Pure primitives and ambient types        │
//! │  ├── geometry.rs  - Coord, GridPos, Size, Direction          │
//! │  ├── config.rs    - Engine configuration (serde)             │
//! │  └── error.rs     - Error enums                              │
//! │                                                              │
//! │  task/            - Cooperative per-frame task tree          │
//! │  ├── mod.rs       - Task, TaskStatus, TaskRunner             │
//! │  ├── repeat.rs    - Repeat / Wait / Container behaviors      │
//! │  └── easing.rs    - Cubic ease-out movement                  │
//! │                                                              │
//! │  game/            - Tile-grid world model                    │
//! │  ├── terrain.rs   - Terrain kinds, prototypes, registry      │
//! │  ├── character.rs - Hero / Monster occupants                 │
//! │  ├── stage.rs     - Cells, placement, move resolution        │
//! │  └── design.rs    - Declarative map designs                  │
//! │                                                              │
//! │  scene/           - Scene lifecycle and input                │
//! │  ├── input.rs     - PointerState, swipe classifier, Pointer  │
//! │  ├── render.rs    - Sprite / Renderer / AudioPlayer traits   │
//! │  ├── headless.rs  - Recording collaborators                  │
//! │  ├── director.rs  - Scene registry, tick and input wiring    │
//! │  ├── title.rs     - Title scene                              │
//! │  └── dungeon.rs   - Dungeon scene                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Model
//!
//! One external ticker calls [`Director::tick`] with the elapsed milliseconds.
//! Pointer samples are queued and delivered at the start of the next tick, so
//! scene handlers never run re-entrantly against the task tree or the stage.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod scene;
pub mod task;

// Re-export commonly used types
pub use core::config::EngineConfig;
pub use core::error::{EngineError, Result};
pub use core::geometry::{Coord, Direction, GridPos, Size};
pub use game::stage::{MoveResult, Stage};
pub use scene::director::Director;
pub use scene::input::{Pointer, PointerGesture, PointerState};
pub use task::{Task, TaskRunner, TaskStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scene id of the title screen.
pub const TITLE_SCENE: &str = "title";

/// Scene id of the dungeon.
pub const DUNGEON_SCENE: &str = "dungeon";
