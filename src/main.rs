//! Gridwalk Demo
//!
//! Runs a scripted headless session: title screen, tap to start, then a
//! walk through the dungeon that opens the door on the east wall.
//!
//! Usage: `gridwalk-demo [config.json]`. Log level via `RUST_LOG`.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridwalk::scene::headless::{HeadlessAudio, HeadlessRenderer};
use gridwalk::{Coord, Director, EngineConfig, TITLE_SCENE, VERSION};

/// Frame length of the simulated ticker (about 60 Hz).
const FRAME_MS: f64 = 16.0;

/// Frames to wait after each gesture so the step animation completes.
const SETTLE_FRAMES: usize = 15;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Gridwalk Demo v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            EngineConfig::load(&path).with_context(|| format!("loading config {}", path))?
        }
        None => EngineConfig::default(),
    };
    info!(tile = config.tile_size(), swipe_play = config.swipe_play, "config ready");

    let renderer = HeadlessRenderer::new(config.screen, 1.0);
    let audio = HeadlessAudio::default();
    let mut director = Director::new(config, Box::new(renderer.clone()), Box::new(audio.clone()))
        .with_standard_scenes();

    director.start(TITLE_SCENE)?;
    run_frames(&mut director, 80)?;
    let prompt_visible = renderer.live_with_texture("text").iter().any(|s| s.visible);
    info!(prompt_visible, "title screen shown");

    tap(&mut director)?;
    info!(scene = ?director.current_scene(), "started");

    let route = [
        (1.0, 0.0),
        (1.0, 0.0),
        (1.0, 0.0),
        (1.0, 0.0),
        (1.0, 0.0),
        (1.0, 0.0),
        (1.0, 0.0),
        (0.0, 1.0),
        (0.0, 1.0),
        (0.0, 1.0),
        (0.0, 1.0),
    ];
    for (dx, dy) in route {
        swipe(&mut director, dx, dy)?;
        if let Some(hero) = renderer.live_with_texture("hero").first() {
            info!(position = %hero.position, camera = %renderer.camera(), "hero");
        }
    }

    tap(&mut director)?;

    info!(
        frames = director.frame(),
        footsteps = audio.count("footstep"),
        doors = audio.count("door"),
        sprites = renderer.live_sprite_count(),
        "=== Demo Complete ==="
    );
    Ok(())
}

fn run_frames(director: &mut Director, frames: usize) -> gridwalk::Result<()> {
    for _ in 0..frames {
        director.tick(FRAME_MS)?;
    }
    Ok(())
}

fn tap(director: &mut Director) -> gridwalk::Result<()> {
    let center = director.config().screen.center();
    director.pointer_down(center);
    director.pointer_up(center);
    run_frames(director, 1)
}

/// Swipe from the screen center by 48 pixels in (`dx`, `dy`).
fn swipe(director: &mut Director, dx: f64, dy: f64) -> gridwalk::Result<()> {
    let start = director.config().screen.center();
    let end = start + Coord::new(dx, dy).times(48.0);
    director.pointer_down(start);
    director.pointer_move(end);
    director.pointer_up(end);
    run_frames(director, SETTLE_FRAMES)
}
