/// Entities: the Player robot and the Enemy robots.
///
/// Both share one struct; `Role` tags which is which. Colours and glyphs
/// belong to the renderer and are derived from the role there.

use rand::Rng;
use tracing::info;

use super::action::{Action, Heading};
use super::grid::{Grid, Position};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Player,
    Enemy,
}

/// What a single `Entity::apply` did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Empty heading; nothing to do.
    Stayed,
    Moved { from: Position, to: Position },
    /// Destination was off the grid; position unchanged.
    Blocked,
    Teleported { from: Position, to: Position },
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: usize,
    pub role: Role,
    pub pos: Position,
}

impl Entity {
    pub fn player(pos: Position) -> Self {
        Entity { id: 0, role: Role::Player, pos }
    }

    pub fn enemy(id: usize, pos: Position) -> Self {
        Entity { id, role: Role::Enemy, pos }
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, grid: &Grid, rng: &mut R) -> MoveOutcome {
        match action {
            Action::Step(heading) => self.step(heading, grid),
            Action::Teleport => {
                let from = self.pos;
                let to = self.teleport(grid, rng);
                MoveOutcome::Teleported { from, to }
            }
        }
    }

    /// All-or-nothing step: either the full delta lands in bounds or the
    /// entity does not move at all.
    pub fn step(&mut self, heading: Heading, grid: &Grid) -> MoveOutcome {
        if heading.is_stay() {
            return MoveOutcome::Stayed;
        }
        let (dx, dy) = heading.delta();
        let target = self.pos.offset(dx, dy);
        if !grid.contains(target) {
            return MoveOutcome::Blocked;
        }
        let from = self.pos;
        self.pos = target;
        MoveOutcome::Moved { from, to: target }
    }

    /// Jump to a uniformly random cell. Always lands in bounds.
    pub fn teleport<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) -> Position {
        self.pos = random_cell(grid, rng);
        info!(id = self.id, role = ?self.role, "teleported to {}", self.pos);
        self.pos
    }
}

/// Uniform over `[1, width] × [1, height]`, axes drawn independently.
pub fn random_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Position {
    Position::new(
        rng.gen_range(1..=grid.width()),
        rng.gen_range(1..=grid.height()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn act(token: &str) -> Action {
        token.parse().unwrap()
    }

    #[test]
    fn step_commits_full_delta_in_bounds() {
        let grid = Grid::new(30, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut e = Entity::player(Position::new(5, 5));
        let out = e.apply(act("NE"), &grid, &mut rng);
        assert_eq!(out, MoveOutcome::Moved { from: Position::new(5, 5), to: Position::new(6, 4) });
        assert_eq!(e.pos, Position::new(6, 4));
    }

    #[test]
    fn diagonal_off_one_edge_is_rejected_entirely() {
        // x would stay legal but y would not: no sliding along the wall.
        let grid = Grid::new(30, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut e = Entity::player(Position::new(5, 1));
        assert_eq!(e.apply(act("NE"), &grid, &mut rng), MoveOutcome::Blocked);
        assert_eq!(e.pos, Position::new(5, 1));

        let mut e = Entity::player(Position::new(30, 30));
        assert_eq!(e.apply(act("SE"), &grid, &mut rng), MoveOutcome::Blocked);
        assert_eq!(e.apply(act("E"), &grid, &mut rng), MoveOutcome::Blocked);
        assert_eq!(e.pos, Position::new(30, 30));
    }

    #[test]
    fn every_heading_lands_on_delta_or_stays_put() {
        let grid = Grid::new(4, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for token in ["N", "S", "W", "E", "NW", "NE", "SW", "SE"] {
            let Action::Step(heading) = act(token) else { unreachable!() };
            let (dx, dy) = heading.delta();
            for x in 1..=4 {
                for y in 1..=3 {
                    let start = Position::new(x, y);
                    let mut e = Entity::enemy(1, start);
                    e.apply(Action::Step(heading), &grid, &mut rng);
                    let expected = start.offset(dx, dy);
                    if grid.contains(expected) {
                        assert_eq!(e.pos, expected, "{token} from {start}");
                    } else {
                        assert_eq!(e.pos, start, "{token} from {start}");
                    }
                }
            }
        }
    }

    #[test]
    fn stay_does_not_move() {
        let grid = Grid::new(30, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut e = Entity::enemy(3, Position::new(7, 7));
        assert_eq!(e.apply(Action::STAY, &grid, &mut rng), MoveOutcome::Stayed);
        assert_eq!(e.pos, Position::new(7, 7));
    }

    #[test]
    fn teleport_lands_in_bounds() {
        let grid = Grid::new(30, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut e = Entity::player(Position::new(1, 1));
        for _ in 0..500 {
            e.apply(Action::Teleport, &grid, &mut rng);
            assert!(grid.contains(e.pos), "{} out of bounds", e.pos);
        }
    }

    #[test]
    fn teleport_is_reproducible_under_seed() {
        let grid = Grid::new(30, 30);
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut e = Entity::player(Position::new(1, 1));
            (0..10).map(|_| e.teleport(&grid, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
    }

    #[test]
    fn teleport_leaves_the_corner() {
        let grid = Grid::new(30, 30);
        let moved = (0..4u64).any(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut e = Entity::player(Position::new(1, 1));
            e.apply(Action::Teleport, &grid, &mut rng);
            e.pos != Position::new(1, 1)
        });
        assert!(moved);
    }

    #[test]
    fn single_cell_grid_teleports_in_place() {
        let grid = Grid::new(1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut e = Entity::player(Position::new(1, 1));
        let out = e.apply(Action::Teleport, &grid, &mut rng);
        assert_eq!(out, MoveOutcome::Teleported { from: Position::new(1, 1), to: Position::new(1, 1) });
    }
}
