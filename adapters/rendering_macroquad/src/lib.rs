#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Tile Fusion.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::{Color as MacroquadColor, WHITE},
    input::{
        is_key_pressed, is_mouse_button_pressed, is_mouse_button_released, mouse_position,
        KeyCode, MouseButton,
    },
    shapes::draw_rectangle,
    text::{draw_text, measure_text},
    window::{clear_background, next_frame, screen_height, screen_width, Conf},
};
use std::time::Duration;
use tile_fusion_core::{Direction, TileValue, GRID_SIZE};
use tile_fusion_rendering::{
    swipe_threshold, Color, FrameInput, Presentation, RenderingBackend, Scene, SwipeTracker, Theme,
};

/// Fraction of a cell left as gutter on each side of the tile body.
const TILE_INSET: f32 = 0.05;

/// Fraction of a cell covered by the tile body.
const TILE_BODY: f32 = 0.9;

/// Window-height divisor that yields the tile value font size.
const FONT_HEIGHT_DIVISOR: f32 = 11.0;

const GAME_OVER_TEXT: &str = "GAME OVER";

/// Snapshot of edge-triggered move keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Escape` or `Q` to quit the game loop.
    quit_requested: bool,
    /// Down arrow or `S`.
    down: bool,
    /// Left arrow or `A`.
    left: bool,
    /// Up arrow or `W`.
    up: bool,
    /// Right arrow or `D`.
    right: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let down = is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S);
        let left = is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A);
        let up = is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W);
        let right = is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D);

        Self {
            quit_requested,
            down,
            left,
            up,
            right,
        }
    }

    /// Direction pressed this frame, checked in [`Direction::ALL`] order.
    fn direction(&self) -> Option<Direction> {
        if self.down {
            Some(Direction::Down)
        } else if self.left {
            Some(Direction::Left)
        } else if self.up {
            Some(Direction::Up)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// Keyboard input wins over a swipe resolved on the same frame.
fn resolve_direction(keyboard: Option<Direction>, swipe: Option<Direction>) -> Option<Direction> {
    keyboard.or(swipe)
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend;

impl MacroquadBackend {
    /// Creates a backend with default platform settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            window_width,
            window_height,
            theme,
            scene,
        } = presentation;

        let config = Conf {
            window_title,
            window_width: window_width as i32,
            window_height: window_height as i32,
            window_resizable: false,
            ..Conf::default()
        };

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut swipes = SwipeTracker::new();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested {
                    break;
                }

                if is_mouse_button_pressed(MouseButton::Left) {
                    let (x, y) = mouse_position();
                    swipes.press(Vec2::new(x, y));
                }
                let mut swipe = None;
                if is_mouse_button_released(MouseButton::Left) {
                    let (x, y) = mouse_position();
                    let threshold = swipe_threshold(screen_width(), screen_height());
                    swipe = swipes.release(Vec2::new(x, y), threshold);
                }

                let frame_input = FrameInput {
                    direction: resolve_direction(keyboard.direction(), swipe),
                };
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, frame_input, &mut scene);

                draw_scene(&scene, &theme);

                next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_scene(scene: &Scene, theme: &Theme) {
    clear_background(to_macroquad_color(theme.border()));

    let tile_width = screen_width() / GRID_SIZE as f32;
    let tile_height = screen_height() / GRID_SIZE as f32;
    for (row_index, row) in scene.tiles.iter().enumerate() {
        for (column_index, &value) in row.iter().enumerate() {
            let x = column_index as f32 * tile_width + tile_width * TILE_INSET;
            let y = row_index as f32 * tile_height + tile_height * TILE_INSET;
            draw_tile(
                x,
                y,
                tile_width * TILE_BODY,
                tile_height * TILE_BODY,
                value,
                theme,
            );
        }
    }

    if scene.game_over {
        draw_game_over_overlay();
    }
}

fn draw_tile(x: f32, y: f32, width: f32, height: f32, value: TileValue, theme: &Theme) {
    if value.is_empty() {
        draw_rectangle(x, y, width, height, to_macroquad_color(theme.empty()));
        return;
    }

    // Theme loading validates the full reachable value range, so the lookup
    // only misses for the empty marker handled above.
    let Some(colors) = theme.tile_colors(value) else {
        return;
    };

    draw_rectangle(x, y, width, height, to_macroquad_color(colors.background));

    let text = value.to_string();
    let font_size = (screen_height() / FONT_HEIGHT_DIVISOR) as u16;
    let dimensions = measure_text(&text, None, font_size, 1.0);
    draw_text(
        &text,
        x + width / 2.0 - dimensions.width / 2.0,
        y + height / 2.0 + dimensions.offset_y / 2.0,
        f32::from(font_size),
        to_macroquad_color(colors.font),
    );
}

fn draw_game_over_overlay() {
    draw_rectangle(
        0.0,
        0.0,
        screen_width(),
        screen_height(),
        MacroquadColor::new(0.0, 0.0, 0.0, 0.55),
    );

    let font_size = (screen_height() / 8.0) as u16;
    let dimensions = measure_text(GAME_OVER_TEXT, None, font_size, 1.0);
    draw_text(
        GAME_OVER_TEXT,
        screen_width() / 2.0 - dimensions.width / 2.0,
        screen_height() / 2.0 + dimensions.offset_y / 2.0,
        f32::from(font_size),
        WHITE,
    );
}

fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}
