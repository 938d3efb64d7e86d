/// Board setup: places the player and scatters enemies.
///
/// The player starts at the grid centre. Enemies land on uniformly random
/// free cells drawn from the world's RNG, so a given seed always produces the
/// same board.

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::domain::entity::random_cell;
use crate::domain::grid::{Grid, Position};
use super::world::WorldState;

/// Random rejection sampling gives up after this many misses per enemy and
/// falls back to picking from the list of free cells.
const SAMPLE_ATTEMPTS: usize = 32;

/// Build a fresh world and fill it with `enemy_count` enemies.
pub fn new_game(grid: Grid, enemy_count: usize, seed: u64) -> WorldState {
    let mut world = WorldState::new(grid, seed);
    populate(&mut world, enemy_count);
    info!(
        seed,
        width = grid.width(),
        height = grid.height(),
        enemies = world.enemies.len(),
        "new game"
    );
    world
}

/// Add up to `enemy_count` enemies on distinct free cells.
/// Returns how many were placed; fewer than requested only when the board
/// runs out of free cells.
pub fn populate(world: &mut WorldState, enemy_count: usize) -> usize {
    let grid = *world.grid();
    let free = grid.cell_count().saturating_sub(world.enemies.len() + 1);
    let count = if enemy_count > free {
        warn!(requested = enemy_count, free, "not enough free cells, capping enemy count");
        free
    } else {
        enemy_count
    };

    for placed in 0..count {
        let Some(pos) = pick_free_cell(world) else {
            return placed;
        };
        world.add_enemy(pos);
    }
    count
}

/// Rebuild the world on the same grid with a new seed and enemy count.
pub fn restart(world: &mut WorldState, enemy_count: usize, seed: u64) {
    let grid = *world.grid();
    *world = new_game(grid, enemy_count, seed);
}

fn pick_free_cell(world: &mut WorldState) -> Option<Position> {
    let grid = *world.grid();
    for _ in 0..SAMPLE_ATTEMPTS {
        let pos = random_cell(&grid, &mut world.rng);
        if !world.is_occupied(pos) {
            return Some(pos);
        }
    }

    // Crowded board: choose among what is left.
    let free: Vec<Position> = (1..=grid.height())
        .flat_map(|y| (1..=grid.width()).map(move |x| Position::new(x, y)))
        .filter(|&pos| !world.is_occupied(pos))
        .collect();
    free.choose(&mut world.rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn enemies_never_spawn_on_player_or_each_other() {
        let w = new_game(Grid::new(30, 30), 30, 11);
        assert_eq!(w.enemies().len(), 30);
        let mut seen = HashSet::new();
        for e in w.enemies() {
            assert!(w.grid().contains(e.pos));
            assert_ne!(e.pos, w.player().pos);
            assert!(seen.insert(e.pos), "duplicate enemy at {}", e.pos);
        }
    }

    #[test]
    fn enemy_ids_are_unique_and_skip_player() {
        let w = new_game(Grid::new(10, 10), 5, 3);
        let ids: Vec<usize> = w.enemies().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(w.player().id, 0);
    }

    #[test]
    fn crowded_board_fills_every_free_cell() {
        let w = new_game(Grid::new(3, 3), 100, 5);
        assert_eq!(w.enemies().len(), 8);
        let mut cells: Vec<Position> = w.enemies().iter().map(|e| e.pos).collect();
        cells.push(w.player().pos);
        let unique: HashSet<Position> = cells.into_iter().collect();
        assert_eq!(unique.len(), 9);
    }

    #[test]
    fn same_seed_same_board() {
        let a = new_game(Grid::new(30, 30), 30, 99);
        let b = new_game(Grid::new(30, 30), 30, 99);
        let pa: Vec<Position> = a.enemies().iter().map(|e| e.pos).collect();
        let pb: Vec<Position> = b.enemies().iter().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn restart_keeps_grid() {
        let mut w = new_game(Grid::new(12, 8), 4, 1);
        w.enemies.clear();
        restart(&mut w, 6, 2);
        assert_eq!(w.grid(), &Grid::new(12, 8));
        assert_eq!(w.enemies().len(), 6);
        assert_eq!(w.seed, 2);
        assert_eq!(w.tick, 0);
    }
}
