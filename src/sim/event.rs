/// Records emitted by a simulation step.
/// The renderer draws them for one frame, then they are dropped.

use crate::domain::grid::Position;

/// An enemy was destroyed at `pos` this tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Explosion {
    pub enemy_id: usize,
    pub pos: Position,
}
