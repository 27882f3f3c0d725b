#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Tile Fusion experience.
//!
//! The binary owns the wiring: it parses startup options, loads and
//! validates the color theme, seeds the spawning system, and hands the
//! rendering backend a closure that routes each frame's input through the
//! world and back into the scene.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tile_fusion_core::{Command, Event, GameStatus};
use tile_fusion_rendering::{FrameInput, Presentation, RenderingBackend, Scene, Theme};
use tile_fusion_rendering_macroquad::MacroquadBackend;
use tile_fusion_system_spawning::Spawning;
use tile_fusion_world::{self as world, query, World};

/// Startup options accepted by the Tile Fusion binary.
#[derive(Debug, Parser)]
#[command(name = "tile-fusion", about = "4x4 sliding-tile merge puzzle")]
struct Options {
    /// Title applied to the created window.
    #[arg(long, default_value = "Tile Fusion")]
    title: String,

    /// Initial window width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Seed for the tile spawn sequence; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to the color theme manifest.
    #[arg(long, default_value = "assets/theme.toml")]
    theme: PathBuf,
}

/// Session wiring: the authoritative world, the spawning system, and the
/// scratch buffers the command/event exchange reuses every frame.
struct Session {
    world: World,
    spawning: Spawning<ChaCha8Rng>,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            spawning: Spawning::new(ChaCha8Rng::seed_from_u64(seed)),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Places the tile every fresh session starts with.
    fn bootstrap(&mut self) {
        self.events.clear();
        let empty = query::empty_cells(&self.world);
        self.spawning.spawn_initial(&empty, &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Processes one frame of input and refreshes the scene.
    ///
    /// A resolved direction becomes a `ShiftTiles` command; the resulting
    /// events drive the spawning system, whose placements are applied before
    /// the scene is rebuilt from world queries.
    fn frame(&mut self, input: FrameInput, scene: &mut Scene) {
        if let Some(direction) = input.direction {
            self.events.clear();
            world::apply(
                &mut self.world,
                Command::ShiftTiles { direction },
                &mut self.events,
            );

            let empty = query::empty_cells(&self.world);
            self.spawning
                .handle(&self.events, &empty, &mut self.commands);
            for command in self.commands.drain(..) {
                world::apply(&mut self.world, command, &mut self.events);
            }
        }

        *scene = self.scene();
    }

    /// Captures the current world state as a drawable scene.
    fn scene(&self) -> Scene {
        Scene::new(
            *query::grid(&self.world).rows(),
            query::status(&self.world) == GameStatus::GameOver,
        )
    }
}

/// Entry point for the Tile Fusion command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    let theme = Theme::load(&options.theme).with_context(|| {
        format!(
            "failed to load color theme from {}",
            options.theme.display()
        )
    })?;

    let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("starting session with spawn seed {seed}");

    let mut session = Session::new(seed);
    session.bootstrap();

    let presentation = Presentation::new(
        options.title,
        options.width,
        options.height,
        theme,
        session.scene(),
    );

    MacroquadBackend::new().run(presentation, move |_dt, input, scene| {
        session.frame(input, scene)
    })
}
