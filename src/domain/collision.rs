/// Position-overlap lookup.

use super::entity::Entity;
use super::grid::Position;

/// Index of the first entity in `others` standing on `pos`, in collection
/// order. Ties always resolve to the lowest index.
pub fn find_overlap(pos: Position, others: &[Entity]) -> Option<usize> {
    others.iter().position(|other| other.pos == pos)
}
