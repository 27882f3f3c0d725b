#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Tile Fusion.
//!
//! The world owns the 4×4 play grid and executes [`Command`] values through
//! the [`apply`] entry point, broadcasting [`Event`] values that systems and
//! adapters react to. All mutation flows through commands; read access flows
//! through the [`query`] module.

use tile_fusion_core::{
    CellCoord, Command, Direction, Event, GameStatus, PlacementError, TileValue, GRID_SIZE,
};

/// Fixed-size play grid holding one [`TileValue`] per cell.
///
/// Cells are addressed as `rows[row][column]`. Equality is value equality,
/// which is what move-change detection relies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    rows: [[TileValue; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [[TileValue::EMPTY; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Builds a grid from raw numeric values.
    ///
    /// Returns `None` when any entry is neither zero nor a power of two
    /// greater than or equal to 2.
    #[must_use]
    pub fn from_values(values: [[u32; GRID_SIZE]; GRID_SIZE]) -> Option<Self> {
        let mut rows = [[TileValue::EMPTY; GRID_SIZE]; GRID_SIZE];
        for (row_index, row) in values.iter().enumerate() {
            for (column_index, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                rows[row_index][column_index] = TileValue::new(value)?;
            }
        }
        Some(Self { rows })
    }

    /// Value held by the cell at the provided coordinate.
    #[must_use]
    pub const fn value_at(&self, cell: CellCoord) -> TileValue {
        self.rows[cell.row()][cell.column()]
    }

    /// Raw row-major cell contents.
    #[must_use]
    pub const fn rows(&self) -> &[[TileValue; GRID_SIZE]; GRID_SIZE] {
        &self.rows
    }

    /// Sum of all tile values currently on the grid.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.rows
            .iter()
            .flatten()
            .map(|tile| u64::from(tile.get()))
            .sum()
    }

    /// Enumerates the coordinates of every empty cell in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        for (row_index, row) in self.rows.iter().enumerate() {
            for (column_index, tile) in row.iter().enumerate() {
                if tile.is_empty() {
                    cells.push(CellCoord::new(column_index, row_index));
                }
            }
        }
        cells
    }

    /// Reports whether no move in any direction could change the grid.
    ///
    /// True only when every cell is occupied and no horizontally or
    /// vertically adjacent pair holds equal values, checked across the whole
    /// grid on both axes.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        if self.rows.iter().flatten().any(TileValue::is_empty) {
            return false;
        }

        for row in 0..GRID_SIZE {
            for column in 0..GRID_SIZE {
                let tile = self.rows[row][column];
                if column + 1 < GRID_SIZE && tile == self.rows[row][column + 1] {
                    return false;
                }
                if row + 1 < GRID_SIZE && tile == self.rows[row + 1][column] {
                    return false;
                }
            }
        }

        true
    }

    /// Compacts and merges every line toward the given direction's edge.
    ///
    /// Returns whether the grid differs from its state before the move,
    /// determined by whole-grid value comparison.
    fn shift(&mut self, direction: Direction) -> bool {
        let before = self.rows;

        match direction {
            Direction::Left => {
                for row in &mut self.rows {
                    slide_line_left(row);
                }
            }
            Direction::Right => {
                for row in &mut self.rows {
                    slide_line_right(row);
                }
            }
            Direction::Up => {
                transpose(&mut self.rows);
                for row in &mut self.rows {
                    slide_line_left(row);
                }
                transpose(&mut self.rows);
            }
            Direction::Down => {
                transpose(&mut self.rows);
                for row in &mut self.rows {
                    slide_line_right(row);
                }
                transpose(&mut self.rows);
            }
        }

        self.rows != before
    }

    fn place(&mut self, cell: CellCoord, value: TileValue) {
        self.rows[cell.row()][cell.column()] = value;
    }
}

/// Slides all non-empty values in the line toward index 0, preserving order.
fn compact_line_left(line: &mut [TileValue; GRID_SIZE]) {
    let mut write = 0;
    for read in 0..GRID_SIZE {
        if !line[read].is_empty() {
            line.swap(read, write);
            write += 1;
        }
    }
}

/// Slides all non-empty values in the line toward the last index, preserving order.
fn compact_line_right(line: &mut [TileValue; GRID_SIZE]) {
    let mut write = GRID_SIZE;
    for read in (0..GRID_SIZE).rev() {
        if !line[read].is_empty() {
            write -= 1;
            line.swap(read, write);
        }
    }
}

/// Compacts toward index 0, merges adjacent equal pairs scanning from the
/// left edge inward, then closes the holes the merges opened.
///
/// The merge pass doubles the tile nearer the edge and empties the farther
/// slot; because the scan only moves inward, a freshly merged tile is never a
/// merge candidate again within the same move.
fn slide_line_left(line: &mut [TileValue; GRID_SIZE]) {
    compact_line_left(line);
    for index in 0..GRID_SIZE - 1 {
        if !line[index].is_empty() && line[index] == line[index + 1] {
            line[index] = line[index].doubled();
            line[index + 1] = TileValue::EMPTY;
        }
    }
    compact_line_left(line);
}

/// Mirror of [`slide_line_left`] compacting toward the last index and
/// scanning from the right edge inward.
fn slide_line_right(line: &mut [TileValue; GRID_SIZE]) {
    compact_line_right(line);
    for index in (1..GRID_SIZE).rev() {
        if !line[index].is_empty() && line[index] == line[index - 1] {
            line[index] = line[index].doubled();
            line[index - 1] = TileValue::EMPTY;
        }
    }
    compact_line_right(line);
}

/// Mirrors the grid across its main diagonal.
///
/// Applied before and after a horizontal slide to express vertical moves with
/// the two row algorithms.
fn transpose(rows: &mut [[TileValue; GRID_SIZE]; GRID_SIZE]) {
    for row in 0..GRID_SIZE {
        for column in row + 1..GRID_SIZE {
            let value = rows[row][column];
            rows[row][column] = rows[column][row];
            rows[column][row] = value;
        }
    }
}

/// Authoritative session state: the grid plus its lifecycle status.
#[derive(Clone, Copy, Debug, Default)]
pub struct World {
    grid: Grid,
    status: GameStatus,
}

impl World {
    /// Creates a fresh session with an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session resuming from the provided grid.
    ///
    /// The status is derived from the grid: a terminal grid starts directly
    /// in [`GameStatus::GameOver`].
    #[must_use]
    pub fn from_grid(grid: Grid) -> Self {
        let status = if grid.is_terminal() {
            GameStatus::GameOver
        } else {
            GameStatus::InProgress
        };
        Self { grid, status }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ShiftTiles { direction } => {
            if world.status == GameStatus::GameOver {
                return;
            }

            let changed = world.grid.shift(direction);
            out_events.push(Event::TilesShifted { direction, changed });
        }
        Command::PlaceTile { cell, value } => {
            if value.is_empty() {
                out_events.push(Event::TilePlacementRejected {
                    cell,
                    reason: PlacementError::InvalidValue,
                });
                return;
            }
            if !world.grid.value_at(cell).is_empty() {
                out_events.push(Event::TilePlacementRejected {
                    cell,
                    reason: PlacementError::CellOccupied,
                });
                return;
            }

            world.grid.place(cell, value);
            out_events.push(Event::TilePlaced { cell, value });

            if world.grid.is_terminal() {
                world.status = GameStatus::GameOver;
                out_events.push(Event::GameEnded);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use tile_fusion_core::{CellCoord, GameStatus};

    /// Provides read-only access to the play grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current lifecycle status of the session.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Enumerates the coordinates of every empty cell.
    #[must_use]
    pub fn empty_cells(world: &World) -> Vec<CellCoord> {
        world.grid.empty_cells()
    }

    /// Reports whether no move in any direction could change the grid.
    #[must_use]
    pub fn is_terminal(world: &World) -> bool {
        world.grid.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::{compact_line_left, slide_line_left, slide_line_right, transpose, Grid};
    use tile_fusion_core::{Direction, TileValue, GRID_SIZE};

    fn line(values: [u32; GRID_SIZE]) -> [TileValue; GRID_SIZE] {
        values.map(|value| {
            if value == 0 {
                TileValue::EMPTY
            } else {
                TileValue::new(value).expect("test lines use valid tile values")
            }
        })
    }

    #[test]
    fn compaction_is_stable_and_preserves_order() {
        let mut row = line([0, 4, 0, 2]);
        compact_line_left(&mut row);
        assert_eq!(row, line([4, 2, 0, 0]));
    }

    #[test]
    fn left_slide_merges_after_compaction() {
        let mut row = line([2, 0, 2, 4]);
        slide_line_left(&mut row);
        assert_eq!(row, line([4, 4, 0, 0]), "merged pair must not merge again");
    }

    #[test]
    fn left_slide_merges_disjoint_pairs_once_each() {
        let mut row = line([2, 2, 2, 2]);
        slide_line_left(&mut row);
        assert_eq!(row, line([4, 4, 0, 0]));
    }

    #[test]
    fn left_slide_merges_both_pairs_of_a_double_pair_row() {
        let mut row = line([2, 2, 4, 4]);
        slide_line_left(&mut row);
        assert_eq!(row, line([4, 8, 0, 0]));
    }

    #[test]
    fn left_slide_prefers_the_pair_nearest_the_edge() {
        let mut row = line([2, 2, 2, 0]);
        slide_line_left(&mut row);
        assert_eq!(row, line([4, 2, 0, 0]));
    }

    #[test]
    fn right_slide_mirrors_the_left_slide() {
        let mut row = line([2, 0, 2, 4]);
        slide_line_right(&mut row);
        assert_eq!(row, line([0, 0, 4, 4]));

        let mut quad = line([2, 2, 2, 2]);
        slide_line_right(&mut quad);
        assert_eq!(quad, line([0, 0, 4, 4]));

        let mut trailing = line([0, 2, 2, 2]);
        slide_line_right(&mut trailing);
        assert_eq!(trailing, line([0, 0, 2, 4]));
    }

    #[test]
    fn transpose_is_an_involution() {
        let grid = Grid::from_values([
            [2, 4, 8, 16],
            [0, 2, 0, 4],
            [32, 0, 2, 0],
            [0, 8, 0, 2],
        ])
        .expect("valid grid");
        let mut rows = *grid.rows();
        transpose(&mut rows);
        assert_eq!(rows[0][1].get(), 0);
        assert_eq!(rows[1][0].get(), 4);
        transpose(&mut rows);
        assert_eq!(&rows, grid.rows());
    }

    #[test]
    fn vertical_shift_runs_along_columns() {
        let mut grid = Grid::from_values([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [2, 0, 0, 0],
            [4, 0, 0, 0],
        ])
        .expect("valid grid");
        assert!(grid.shift(Direction::Up));
        let expected = Grid::from_values([
            [4, 0, 0, 0],
            [4, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ])
        .expect("valid grid");
        assert_eq!(grid, expected);
    }

    #[test]
    fn shift_reports_unchanged_grids() {
        let mut grid = Grid::from_values([
            [2, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ])
        .expect("valid grid");
        assert!(!grid.shift(Direction::Left), "already compacted row");
        assert!(grid.shift(Direction::Right));
    }

    #[test]
    fn terminal_requires_full_grid_without_equal_neighbours() {
        let checkerboard = Grid::from_values([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ])
        .expect("valid grid");
        assert!(checkerboard.is_terminal());

        let with_hole = Grid::from_values([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 0, 4],
            [4, 2, 4, 2],
        ])
        .expect("valid grid");
        assert!(!with_hole.is_terminal());

        let with_vertical_pair = Grid::from_values([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 2, 2],
        ])
        .expect("valid grid");
        assert!(!with_vertical_pair.is_terminal());
    }

    #[test]
    fn terminal_detects_pairs_on_the_far_edges() {
        // Equal neighbours only in the last row and in the last column.
        let last_row_pair = Grid::from_values([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 8, 8],
        ])
        .expect("valid grid");
        assert!(!last_row_pair.is_terminal());

        let last_column_pair = Grid::from_values([
            [2, 4, 2, 4],
            [4, 2, 4, 8],
            [2, 4, 2, 8],
            [4, 2, 4, 2],
        ])
        .expect("valid grid");
        assert!(!last_column_pair.is_terminal());
    }

    #[test]
    fn from_values_rejects_invalid_entries() {
        assert!(Grid::from_values([
            [2, 4, 0, 0],
            [0, 3, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ])
        .is_none());
    }
}
