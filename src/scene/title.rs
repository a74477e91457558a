//! Title scene: a flashing prompt, any tap starts the game.

use std::cell::Cell;
use std::rc::Rc;
use tracing::info;

use crate::core::error::Result;
use crate::scene::render::SpriteHandle;
use crate::scene::{PointerState, Scene, SceneCommand, SceneContext};
use crate::task::{Repeat, Task, TaskRunner};

const PROMPT: &str = "Touch Start";
const PROMPT_SIZE: f64 = 24.0;
const PROMPT_COLOR: u32 = 0xc0c0c0;

/// Title screen.
pub struct TitleScene {
    next: String,
    tasks: TaskRunner,
    prompt: Option<SpriteHandle>,
    prompt_on: Rc<Cell<bool>>,
}

impl TitleScene {
    /// Title that switches to `next` on tap.
    pub fn new(next: impl Into<String>) -> Self {
        Self {
            next: next.into(),
            tasks: TaskRunner::new(),
            prompt: None,
            prompt_on: Rc::new(Cell::new(true)),
        }
    }

    /// Whether the prompt is currently shown.
    pub fn prompt_visible(&self) -> bool {
        self.prompt.as_ref().is_some_and(|p| p.borrow().is_visible())
    }
}

impl Scene for TitleScene {
    fn setup(&mut self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let prompt = ctx.renderer.spawn_text(PROMPT, PROMPT_SIZE, PROMPT_COLOR);
        prompt.borrow_mut().set_position(ctx.renderer.screen_size().center());

        self.prompt_on.set(true);
        let flash = Repeat::toggle(Rc::clone(&self.prompt_on), ctx.config.flash_interval_ms);
        self.tasks.spawn(Task::new(flash));
        self.prompt = Some(prompt);
        Ok(())
    }

    fn tasks(&mut self) -> &mut TaskRunner {
        &mut self.tasks
    }

    fn update(&mut self, _elapsed_ms: f64, _ctx: &mut SceneContext<'_>) -> Result<SceneCommand> {
        if let Some(prompt) = &self.prompt {
            prompt.borrow_mut().set_visible(self.prompt_on.get());
        }
        Ok(SceneCommand::None)
    }

    fn tap(&mut self, _state: &PointerState, _ctx: &mut SceneContext<'_>) -> Result<SceneCommand> {
        info!(next = %self.next, "title tapped");
        Ok(SceneCommand::SwitchTo(self.next.clone()))
    }
}
