/// Enemy AI: greedy single-step chase.
///
/// Each axis is closed independently by one cell, vertical considered first.
/// No lookahead and no obstacle avoidance; an axis that already matches the
/// player contributes nothing. The result is a `Heading`, so an enemy can
/// never decide to teleport.

use super::action::{Heading, Horizontal, Vertical};
use super::grid::Position;

pub fn decide(enemy: Position, player: Position) -> Heading {
    let vertical = if player.y > enemy.y {
        Some(Vertical::South)
    } else if player.y < enemy.y {
        Some(Vertical::North)
    } else {
        None
    };
    let horizontal = if player.x > enemy.x {
        Some(Horizontal::East)
    } else if player.x < enemy.x {
        Some(Horizontal::West)
    } else {
        None
    };
    Heading::new(vertical, horizontal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn colocated_enemy_stays() {
        assert!(decide(p(4, 4), p(4, 4)).is_stay());
        assert_eq!(decide(p(4, 4), p(4, 4)).token(), "");
    }

    #[test]
    fn one_axis_differs_gives_single_letter() {
        assert_eq!(decide(p(5, 7), p(5, 5)).token(), "N");
        assert_eq!(decide(p(5, 3), p(5, 5)).token(), "S");
        assert_eq!(decide(p(9, 5), p(5, 5)).token(), "W");
        assert_eq!(decide(p(1, 5), p(5, 5)).token(), "E");
    }

    #[test]
    fn both_axes_differ_gives_diagonal_vertical_first() {
        assert_eq!(decide(p(1, 1), p(5, 5)).token(), "SE");
        assert_eq!(decide(p(9, 9), p(5, 5)).token(), "NW");
        assert_eq!(decide(p(9, 1), p(5, 5)).token(), "SW");
        assert_eq!(decide(p(1, 9), p(5, 5)).token(), "NE");
    }

    #[test]
    fn token_length_tracks_differing_axes() {
        for ex in 1..=5 {
            for ey in 1..=5 {
                let enemy = p(ex, ey);
                let player = p(3, 3);
                let differing = (ex != 3) as usize + (ey != 3) as usize;
                assert_eq!(decide(enemy, player).token().len(), differing, "enemy {enemy}");
            }
        }
    }

    #[test]
    fn step_never_increases_either_axis_gap() {
        for ex in 1..=6 {
            for ey in 1..=6 {
                let enemy = p(ex, ey);
                let player = p(2, 5);
                let (dx, dy) = decide(enemy, player).delta();
                let next = enemy.offset(dx, dy);
                assert!((player.x - next.x).abs() <= (player.x - enemy.x).abs());
                assert!((player.y - next.y).abs() <= (player.y - enemy.y).abs());
            }
        }
    }
}
