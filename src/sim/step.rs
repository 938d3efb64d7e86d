/// The step function: advances the world by one turn.
///
/// Processing order:
///   1. Player movement (the external action)
///   2. Enemy movement (greedy chase toward the post-move player)
///   3. Collision resolution (overlapping enemies explode)
///
/// Every stage completes before the next begins; nothing here blocks or
/// performs I/O beyond tracing events.

use tracing::{debug, info};

use crate::domain::action::Action;
#[cfg(test)]
use crate::domain::action::ActionError;
use crate::domain::ai;
use crate::domain::collision::find_overlap;
use crate::domain::entity::MoveOutcome;
use super::event::Explosion;
use super::world::{Phase, TickStage, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry points
// ══════════════════════════════════════════════════════════════

pub fn advance(world: &mut WorldState, action: Action) -> Vec<Explosion> {
    world.tick += 1;

    resolve_player_movement(world, action);
    resolve_enemy_movement(world);
    let explosions = resolve_collisions(world);
    world.stage = TickStage::Idle;

    explosions
}

/// Parse an action token and advance. An unknown token is returned to the
/// caller untouched and the world does not tick.
#[cfg(test)]
pub fn advance_token(world: &mut WorldState, token: &str) -> Result<Vec<Explosion>, ActionError> {
    let action: Action = token.parse()?;
    Ok(advance(world, action))
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player_movement(world: &mut WorldState, action: Action) {
    let grid = *world.grid();
    match world.player.apply(action, &grid, &mut world.rng) {
        MoveOutcome::Moved { from, to } => debug!(tick = world.tick, "player {action}: {from} -> {to}"),
        MoveOutcome::Blocked => debug!(tick = world.tick, "player {action} blocked at {}", world.player.pos),
        MoveOutcome::Teleported { from, to } => debug!(tick = world.tick, "player teleport: {from} -> {to}"),
        MoveOutcome::Stayed => {}
    }
    world.stage = TickStage::PlayerMoved;
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

fn resolve_enemy_movement(world: &mut WorldState) {
    let grid = *world.grid();
    let target = world.player.pos;
    for enemy in world.enemies.iter_mut() {
        let heading = ai::decide(enemy.pos, target);
        enemy.step(heading, &grid);
    }
    world.stage = TickStage::EnemiesMoved;
}

// ══════════════════════════════════════════════════════════════
// Collisions
// ══════════════════════════════════════════════════════════════

fn resolve_collisions(world: &mut WorldState) -> Vec<Explosion> {
    let mut explosions = Vec::new();
    while let Some(idx) = find_overlap(world.player.pos, &world.enemies) {
        let enemy = world.enemies.remove(idx);
        info!(tick = world.tick, id = enemy.id, "enemy exploded at {}", enemy.pos);
        explosions.push(Explosion { enemy_id: enemy.id, pos: enemy.pos });
    }

    if world.enemies.is_empty() && world.phase == Phase::Playing {
        world.phase = Phase::Cleared;
        info!(tick = world.tick, "all enemies destroyed");
    }
    world.stage = TickStage::CollisionsResolved;
    explosions
}
