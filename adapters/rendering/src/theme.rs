//! Validated color theme loaded from a versioned TOML manifest.
//!
//! The manifest maps every supported tile value to a background/font color
//! pair and names the shared `border` and `empty` colors. Loading fails
//! closed: a missing value, an unknown key, a malformed hex color or an
//! unsupported manifest version aborts startup instead of defaulting.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tile_fusion_core::TileValue;

use crate::Color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Exponent of the largest tile value reachable on a 4x4 grid (2^17).
const MAX_TILE_EXPONENT: u32 = 17;

/// Background and font colors assigned to one tile value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileColors {
    /// Fill color of the tile body.
    pub background: Color,
    /// Color used for the value text.
    pub font: Color,
}

/// Complete color theme consumed by rendering backends.
#[derive(Clone, Debug)]
pub struct Theme {
    border: Color,
    empty: Color,
    tiles: HashMap<u32, TileColors>,
}

impl Theme {
    /// Loads and validates the theme manifest at the provided path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read theme manifest at {}",
                manifest_path.display()
            )
        })?;
        let manifest: Manifest =
            toml::from_str(&contents).context("failed to parse theme manifest toml contents")?;
        let theme = Self::from_manifest(manifest)?;
        Ok(theme)
    }

    /// Color drawn behind and between the tiles.
    #[must_use]
    pub const fn border(&self) -> Color {
        self.border
    }

    /// Fill color of an empty cell.
    #[must_use]
    pub const fn empty(&self) -> Color {
        self.empty
    }

    /// Colors assigned to the provided tile value.
    ///
    /// Every value from 2 through 2^17 is guaranteed present after a
    /// successful load, so this only returns `None` for the empty marker.
    #[must_use]
    pub fn tile_colors(&self, value: TileValue) -> Option<&TileColors> {
        self.tiles.get(&value.get())
    }

    fn from_manifest(manifest: Manifest) -> Result<Self, ThemeError> {
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            return Err(ThemeError::UnsupportedVersion {
                found: manifest.version,
            });
        }

        let border = parse_hex_color(&manifest.border)?;
        let empty = parse_hex_color(&manifest.empty)?;

        let mut tiles = HashMap::with_capacity(manifest.tiles.len());
        for (key, entry) in &manifest.tiles {
            let value = parse_tile_key(key)?;
            let colors = TileColors {
                background: parse_hex_color(&entry.background)?,
                font: parse_hex_color(&entry.font)?,
            };
            if tiles.insert(value, colors).is_some() {
                return Err(ThemeError::DuplicateTileValue { value });
            }
        }

        for exponent in 1..=MAX_TILE_EXPONENT {
            let value = 1_u32 << exponent;
            if !tiles.contains_key(&value) {
                return Err(ThemeError::MissingTileValue { value });
            }
        }

        Ok(Self {
            border,
            empty,
            tiles,
        })
    }
}

/// Errors produced while validating a theme manifest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    /// The manifest declares a version this build does not understand.
    #[error("unsupported theme manifest version {found}; expected {SUPPORTED_MANIFEST_VERSION}")]
    UnsupportedVersion {
        /// Version number found in the manifest.
        found: u32,
    },
    /// A `[tiles]` key is not a supported tile value.
    #[error("theme entry `{key}` is not a supported tile value")]
    UnknownTileKey {
        /// Offending manifest key.
        key: String,
    },
    /// Two manifest keys resolve to the same tile value.
    #[error("theme contains duplicate colors for tile value {value}")]
    DuplicateTileValue {
        /// Tile value with more than one manifest entry.
        value: u32,
    },
    /// A supported tile value has no colors assigned.
    #[error("theme is missing colors for tile value {value}")]
    MissingTileValue {
        /// Tile value without a manifest entry.
        value: u32,
    },
    /// A color string is not of the `#rrggbb` form.
    #[error("malformed hex color `{color}`; expected `#rrggbb`")]
    MalformedColor {
        /// Offending color string.
        color: String,
    },
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    border: String,
    empty: String,
    tiles: HashMap<String, TileEntry>,
}

#[derive(Debug, Deserialize)]
struct TileEntry {
    background: String,
    font: String,
}

fn parse_tile_key(key: &str) -> Result<u32, ThemeError> {
    let unknown = || ThemeError::UnknownTileKey {
        key: key.to_owned(),
    };
    let value: u32 = key.parse().map_err(|_| unknown())?;
    if TileValue::new(value).is_none() || value > 1 << MAX_TILE_EXPONENT {
        return Err(unknown());
    }
    Ok(value)
}

fn parse_hex_color(text: &str) -> Result<Color, ThemeError> {
    let malformed = || ThemeError::MalformedColor {
        color: text.to_owned(),
    };

    let digits = text.strip_prefix('#').ok_or_else(malformed)?;
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(malformed());
    }

    let mut channels = [0_u8; 3];
    for (index, channel) in channels.iter_mut().enumerate() {
        *channel =
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).map_err(|_| malformed())?;
    }

    Ok(Color::from_rgb_u8(channels[0], channels[1], channels[2]))
}

#[cfg(test)]
mod tests {
    use super::{parse_hex_color, Manifest, Theme, ThemeError, MAX_TILE_EXPONENT};
    use crate::Color;
    use tile_fusion_core::TileValue;

    fn manifest_with_tiles(tile_lines: &str) -> String {
        format!("version = 1\nborder = \"#8f7a66\"\nempty = \"#cdc1b4\"\n\n{tile_lines}")
    }

    fn full_tile_table() -> String {
        let mut lines = String::new();
        for exponent in 1..=MAX_TILE_EXPONENT {
            let value = 1_u32 << exponent;
            lines.push_str(&format!(
                "[tiles.{value}]\nbackground = \"#eee4da\"\nfont = \"#776e65\"\n\n"
            ));
        }
        lines
    }

    fn parse(contents: &str) -> Result<Theme, ThemeError> {
        let manifest: Manifest = toml::from_str(contents).expect("test manifests are valid toml");
        Theme::from_manifest(manifest)
    }

    #[test]
    fn complete_manifest_loads() {
        let theme = parse(&manifest_with_tiles(&full_tile_table())).expect("complete theme");
        assert_eq!(theme.border(), Color::from_rgb_u8(0x8f, 0x7a, 0x66));
        assert_eq!(theme.empty(), Color::from_rgb_u8(0xcd, 0xc1, 0xb4));
        for exponent in 1..=MAX_TILE_EXPONENT {
            let value = TileValue::new(1 << exponent).expect("valid tile value");
            assert!(theme.tile_colors(value).is_some(), "missing {value}");
        }
        assert!(theme.tile_colors(TileValue::EMPTY).is_none());
    }

    #[test]
    fn missing_tile_value_fails_closed() {
        let mut lines = String::new();
        for exponent in 1..MAX_TILE_EXPONENT {
            let value = 1_u32 << exponent;
            lines.push_str(&format!(
                "[tiles.{value}]\nbackground = \"#eee4da\"\nfont = \"#776e65\"\n\n"
            ));
        }

        let error = parse(&manifest_with_tiles(&lines)).expect_err("incomplete theme");
        assert_eq!(
            error,
            ThemeError::MissingTileValue {
                value: 1 << MAX_TILE_EXPONENT,
            }
        );
    }

    #[test]
    fn unknown_tile_keys_are_rejected() {
        let mut lines = full_tile_table();
        lines.push_str("[tiles.3]\nbackground = \"#eee4da\"\nfont = \"#776e65\"\n");

        let error = parse(&manifest_with_tiles(&lines)).expect_err("non power of two key");
        assert_eq!(
            error,
            ThemeError::UnknownTileKey {
                key: "3".to_owned(),
            }
        );
    }

    #[test]
    fn oversized_tile_keys_are_rejected() {
        let mut lines = full_tile_table();
        let oversized = 1_u64 << (MAX_TILE_EXPONENT + 1);
        lines.push_str(&format!(
            "[tiles.{oversized}]\nbackground = \"#eee4da\"\nfont = \"#776e65\"\n"
        ));

        let error = parse(&manifest_with_tiles(&lines)).expect_err("value beyond the 4x4 ceiling");
        assert_eq!(
            error,
            ThemeError::UnknownTileKey {
                key: oversized.to_string(),
            }
        );
    }

    #[test]
    fn malformed_hex_colors_are_rejected() {
        for bad in ["eee4da", "#eee4d", "#eee4dag", "#eee4daff"] {
            let contents = format!(
                "version = 1\nborder = \"{bad}\"\nempty = \"#cdc1b4\"\n\n{}",
                full_tile_table()
            );
            let error = parse(&contents).expect_err("malformed color");
            assert_eq!(
                error,
                ThemeError::MalformedColor {
                    color: bad.to_owned(),
                }
            );
        }
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        let contents = format!(
            "version = 2\nborder = \"#8f7a66\"\nempty = \"#cdc1b4\"\n\n{}",
            full_tile_table()
        );
        let error = parse(&contents).expect_err("future version");
        assert_eq!(error, ThemeError::UnsupportedVersion { found: 2 });
    }

    #[test]
    fn hex_parsing_scales_to_unit_channels() {
        let color = parse_hex_color("#ff0080").expect("valid color");
        assert!((color.red - 1.0).abs() < f32::EPSILON);
        assert!(color.green.abs() < f32::EPSILON);
        assert!((color.blue - 128.0 / 255.0).abs() < f32::EPSILON);
    }
}
