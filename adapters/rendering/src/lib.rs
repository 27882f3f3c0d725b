#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Fusion adapters.
//!
//! Backends present a declarative [`Scene`] and feed captured input back to
//! the caller through [`FrameInput`]; nothing in this crate touches a window
//! or an event queue directly.

mod theme;

pub use theme::{Theme, ThemeError, TileColors};

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::time::Duration;
use tile_fusion_core::{Direction, TileValue, GRID_SIZE};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Direction resolved from keyboard or swipe input on this frame, if any.
    pub direction: Option<Direction>,
}

/// Swipe threshold derived from the window dimensions.
///
/// The returned value is compared against the *squared* magnitude of the
/// press-to-release delta, so the effective drag distance grows with the
/// square root of the window dimensions.
#[must_use]
pub fn swipe_threshold(window_width: f32, window_height: f32) -> f32 {
    (window_width + window_height) / 2.0
}

/// Classifies mouse press/release pairs into directional swipes.
///
/// The press position is recorded as an anchor; on release the delta
/// `anchor - release` is measured against the threshold, the dominant axis
/// picks horizontal versus vertical, and the delta's sign picks the
/// direction: a positive horizontal delta (release left of press) maps to
/// [`Direction::Left`] and a positive vertical delta (release above press)
/// maps to [`Direction::Up`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeTracker {
    anchor: Option<Vec2>,
}

impl SwipeTracker {
    /// Creates a tracker with no recorded press.
    #[must_use]
    pub const fn new() -> Self {
        Self { anchor: None }
    }

    /// Records the pointer position of a button press.
    pub fn press(&mut self, position: Vec2) {
        self.anchor = Some(position);
    }

    /// Consumes the anchored press and classifies the gesture.
    ///
    /// Returns `None` when no press was recorded or the squared delta
    /// magnitude does not exceed `threshold`.
    pub fn release(&mut self, position: Vec2, threshold: f32) -> Option<Direction> {
        let anchor = self.anchor.take()?;
        let delta = anchor - position;
        if delta.length_squared() <= threshold {
            return None;
        }

        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Some(Direction::Left)
            } else {
                Some(Direction::Right)
            }
        } else if delta.y > 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }
}

/// Scene description covering the grid contents and the session outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Row-major tile values to draw.
    pub tiles: [[TileValue; GRID_SIZE]; GRID_SIZE],
    /// Whether the terminal-state overlay should be shown.
    pub game_over: bool,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub const fn new(tiles: [[TileValue; GRID_SIZE]; GRID_SIZE], game_over: bool) -> Self {
        Self { tiles, game_over }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window width in pixels.
    pub window_width: u32,
    /// Initial window height in pixels.
    pub window_height: u32,
    /// Validated color theme applied to tiles, border and background.
    pub theme: Theme,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        window_width: u32,
        window_height: u32,
        theme: Theme,
        scene: Scene,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_width,
            window_height,
            theme,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tile Fusion scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
