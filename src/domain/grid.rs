/// Grid coordinate space.
///
/// Coordinates are 1-indexed and inclusive: `(1, 1)` is the top-left cell,
/// `(width, height)` the bottom-right. Every committed entity position must
/// pass `Grid::is_valid`.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Shift by a delta. No bounds check; callers validate through the grid.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Position { x: self.x + dx, y: self.y + dy }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Largest accepted side length. Keeps every in-bounds coordinate and its
/// one-cell neighbours far from `i32` overflow.
pub const MAX_SIDE: i32 = 1024;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Bounds are clamped to `1..=MAX_SIDE`, so the grid always has a cell.
    pub fn new(width: i32, height: i32) -> Self {
        Grid { width: width.clamp(1, MAX_SIDE), height: height.clamp(1, MAX_SIDE) }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        (1..=self.width).contains(&x) && (1..=self.height).contains(&y)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.is_valid(pos.x, pos.y)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Middle cell, rounded toward the top-left.
    pub fn center(&self) -> Position {
        Position::new((self.width + 1) / 2, (self.height + 1) / 2)
    }
}
