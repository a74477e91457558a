//! Scenes and Input
//!
//! A [`Scene`] owns its stage and task tree. The [`director::Director`] owns
//! the registry of scenes, the active-scene slot and the input queue, and
//! hands each scene a [`SceneContext`] with the collaborators it may use.
//!
//! ## Module Structure
//!
//! - `input`: pointer states, swipe classifier, gesture tracking
//! - `render`: sprite, renderer and audio traits
//! - `headless`: recording implementations of those traits
//! - `director`: registry, tick and input wiring
//! - `title`, `dungeon`: the bundled scenes

pub mod director;
pub mod dungeon;
pub mod headless;
pub mod input;
pub mod render;
pub mod title;

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::geometry::Direction;
use crate::game::terrain::TerrainRegistry;
use crate::task::TaskRunner;

pub use director::Director;
pub use dungeon::DungeonScene;
pub use input::{Pointer, PointerEvent, PointerGesture, PointerState};
pub use render::{AudioPlayer, Playback, Renderer, Sprite, SpriteHandle};
pub use title::TitleScene;

/// What the director should do after a scene callback.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SceneCommand {
    /// Stay on the current scene
    #[default]
    None,
    /// Activate another registered scene
    SwitchTo(String),
}

/// Collaborators lent to a scene for the duration of one callback.
pub struct SceneContext<'a> {
    /// Sprite factory and camera
    pub renderer: &'a mut dyn Renderer,
    /// Sound trigger
    pub audio: &'a mut dyn AudioPlayer,
    /// Terrain prototypes
    pub terrain: &'a mut TerrainRegistry,
    /// Engine configuration
    pub config: &'a EngineConfig,
    /// Latest pointer state while the pointer is held
    pub pointer: Option<PointerState>,
}

/// One screen of the game.
///
/// There is no teardown hook: switching away simply stops calling the scene,
/// and the director clears the renderer's display list before the next setup.
pub trait Scene {
    /// Build the scene. Called on every activation.
    fn setup(&mut self, ctx: &mut SceneContext<'_>) -> Result<()>;

    /// The scene's task tree. The director advances it before `update`.
    fn tasks(&mut self) -> &mut TaskRunner;

    /// Per-frame logic, after the task tree has advanced.
    fn update(&mut self, _elapsed_ms: f64, _ctx: &mut SceneContext<'_>) -> Result<SceneCommand> {
        Ok(SceneCommand::None)
    }

    /// Pointer pressed.
    fn pointer_down(
        &mut self,
        _state: &PointerState,
        _ctx: &mut SceneContext<'_>,
    ) -> Result<SceneCommand> {
        Ok(SceneCommand::None)
    }

    /// Pointer moved while pressed.
    fn pointer_move(
        &mut self,
        _state: &PointerState,
        _ctx: &mut SceneContext<'_>,
    ) -> Result<SceneCommand> {
        Ok(SceneCommand::None)
    }

    /// Released inside the deadzone.
    fn tap(&mut self, _state: &PointerState, _ctx: &mut SceneContext<'_>) -> Result<SceneCommand> {
        Ok(SceneCommand::None)
    }

    /// Released outside the deadzone.
    fn swipe(
        &mut self,
        _direction: Direction,
        _state: &PointerState,
        _ctx: &mut SceneContext<'_>,
    ) -> Result<SceneCommand> {
        Ok(SceneCommand::None)
    }
}
