#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Fusion engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Number of columns and rows composing the play grid.
pub const GRID_SIZE: usize = 4;

/// Directions a move can push the tiles toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Compaction toward decreasing row indices.
    Up,
    /// Compaction toward increasing row indices.
    Down,
    /// Compaction toward decreasing column indices.
    Left,
    /// Compaction toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction, in input-priority order.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::Right,
    ];
}

/// Value held by a single grid cell.
///
/// Zero denotes an empty cell; every occupied cell holds a power of two
/// reachable by repeated doubling of the spawn values 2 and 4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileValue(u32);

impl TileValue {
    /// The empty cell marker.
    pub const EMPTY: TileValue = TileValue(0);

    /// The dominant spawn value.
    pub const TWO: TileValue = TileValue(2);

    /// The rare spawn value.
    pub const FOUR: TileValue = TileValue(4);

    /// Creates a tile value, rejecting anything that is not a power of two
    /// greater than or equal to 2.
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        if value >= 2 && value.is_power_of_two() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric representation of the tile value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the cell holding this value is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the value produced when two tiles of this value merge.
    ///
    /// Doubling the empty marker yields the empty marker.
    #[must_use]
    pub const fn doubled(self) -> Self {
        Self(self.0 * 2)
    }
}

impl std::fmt::Display for TileValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a single grid cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: usize,
    row: usize,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }
}

/// Lifecycle of a single play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Moves are accepted and the grid can still change.
    #[default]
    InProgress,
    /// No move can change the grid; further moves are ignored.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Compacts and merges all tiles toward the given direction's edge.
    ShiftTiles {
        /// Edge the tiles are pushed toward.
        direction: Direction,
    },
    /// Places a freshly spawned tile into an empty cell.
    PlaceTile {
        /// Cell that should receive the tile.
        cell: CellCoord,
        /// Value assigned to the spawned tile.
        value: TileValue,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reports the outcome of a directional move.
    TilesShifted {
        /// Direction the move pushed toward.
        direction: Direction,
        /// Whether the grid differs from its state before the move.
        changed: bool,
    },
    /// Confirms that a spawned tile was placed into the grid.
    TilePlaced {
        /// Cell that received the tile.
        cell: CellCoord,
        /// Value the tile was placed with.
        value: TileValue,
    },
    /// Reports that a tile placement request was rejected.
    TilePlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that no further move can change the grid.
    GameEnded,
}

/// Reasons a tile placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell already holds a tile.
    CellOccupied,
    /// The requested value is not a spawnable or mergeable tile value.
    InvalidValue,
}
