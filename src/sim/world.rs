/// WorldState: the complete snapshot of a running game.
///
/// The world owns every entity and the random source. Collaborators get a
/// shared borrow for drawing; only `sim::step` and `sim::spawn` mutate it.
///
/// ## Tick stages
///
/// One call to `step::advance` walks
/// `Idle → PlayerMoved → EnemiesMoved → CollisionsResolved → Idle`.
/// `stage` records the last stage reached, which is always `Idle` between
/// ticks.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::entity::Entity;
use crate::domain::grid::{Grid, Position};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    /// Every enemy has exploded. Moves are still accepted.
    Cleared,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickStage {
    Idle,
    PlayerMoved,
    EnemiesMoved,
    CollisionsResolved,
}

pub struct WorldState {
    grid: Grid,

    // ── Entities ──
    pub player: Entity,
    pub enemies: Vec<Entity>,
    /// Next id handed to a spawned enemy. The player is always id 0.
    pub next_enemy_id: usize,

    // ── Randomness ──
    pub seed: u64,
    pub rng: ChaCha8Rng,

    // ── Meta ──
    pub phase: Phase,
    pub stage: TickStage,
    pub tick: u64,
}

impl WorldState {
    /// Empty world: player at the grid centre, no enemies.
    pub fn new(grid: Grid, seed: u64) -> Self {
        WorldState {
            grid,
            player: Entity::player(grid.center()),
            enemies: vec![],
            next_enemy_id: 1,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: Phase::Playing,
            stage: TickStage::Idle,
            tick: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    /// Place the player. Out-of-bounds positions are refused.
    #[cfg(test)]
    pub fn place_player(&mut self, pos: Position) -> bool {
        if !self.grid.contains(pos) {
            return false;
        }
        self.player.pos = pos;
        true
    }

    /// Add an enemy at `pos`, returning its id. Out-of-bounds positions are refused.
    pub fn add_enemy(&mut self, pos: Position) -> Option<usize> {
        if !self.grid.contains(pos) {
            return None;
        }
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        self.enemies.push(Entity::enemy(id, pos));
        if self.phase == Phase::Cleared {
            self.phase = Phase::Playing;
        }
        Some(id)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.player.pos == pos || self.enemies.iter().any(|e| e.pos == pos)
    }
}
