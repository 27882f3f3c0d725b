#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for emitting tile placement commands.
//!
//! The system owns the session's only source of randomness. It never touches
//! the grid directly: it consumes the world's event stream plus a read-only
//! list of empty cells and answers with [`Command::PlaceTile`] batches that
//! the caller feeds back into the world.

use rand::Rng;
use tile_fusion_core::{CellCoord, Command, Event, TileValue};

/// Probability that a spawned tile holds a 4 instead of a 2.
const FOUR_SPAWN_PROBABILITY: f64 = 0.1;

/// Pure system that spawns one tile after every move that changed the grid.
#[derive(Debug)]
pub struct Spawning<R: Rng> {
    rng: R,
}

impl<R: Rng> Spawning<R> {
    /// Creates a new spawning system driven by the provided random source.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes events and the current empty cells to emit placement commands.
    ///
    /// One placement is emitted per `TilesShifted` event whose `changed` flag
    /// is set. When no empty cell exists nothing is emitted; the terminal
    /// check belongs to the world, and spawning into a full grid must never
    /// be attempted.
    pub fn handle(&mut self, events: &[Event], empty_cells: &[CellCoord], out: &mut Vec<Command>) {
        for event in events {
            if let Event::TilesShifted { changed: true, .. } = event {
                self.spawn_one(empty_cells, out);
            }
        }
    }

    /// Emits the placement that seeds a fresh session before the first frame.
    pub fn spawn_initial(&mut self, empty_cells: &[CellCoord], out: &mut Vec<Command>) {
        self.spawn_one(empty_cells, out);
    }

    fn spawn_one(&mut self, empty_cells: &[CellCoord], out: &mut Vec<Command>) {
        if empty_cells.is_empty() {
            return;
        }

        let index = self.rng.gen_range(0..empty_cells.len());
        let value = if self.rng.gen_bool(FOUR_SPAWN_PROBABILITY) {
            TileValue::FOUR
        } else {
            TileValue::TWO
        };
        out.push(Command::PlaceTile {
            cell: empty_cells[index],
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::Spawning;
    use rand::rngs::mock::StepRng;
    use tile_fusion_core::{CellCoord, Command, Direction, Event};

    #[test]
    fn ignores_moves_that_did_not_change_the_grid() {
        let mut spawning = Spawning::new(StepRng::new(0, 1));
        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TilesShifted {
                direction: Direction::Left,
                changed: false,
            }],
            &[CellCoord::new(0, 0)],
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn emits_nothing_without_empty_cells() {
        let mut spawning = Spawning::new(StepRng::new(0, 1));
        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TilesShifted {
                direction: Direction::Up,
                changed: true,
            }],
            &[],
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn emits_one_placement_per_changed_shift() {
        let mut spawning = Spawning::new(StepRng::new(0, 1));
        let mut commands = Vec::new();
        let cells = [CellCoord::new(1, 1), CellCoord::new(2, 3)];
        let shifted = Event::TilesShifted {
            direction: Direction::Right,
            changed: true,
        };
        spawning.handle(&[shifted, shifted], &cells, &mut commands);
        assert_eq!(commands.len(), 2);
        for command in &commands {
            assert!(matches!(command, Command::PlaceTile { .. }));
        }
    }
}
