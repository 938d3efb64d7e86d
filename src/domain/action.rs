/// Movement vocabulary.
///
/// Externally an action is a token from the closed set
/// `N S W E NW NE SW SE T` (plus `""` for "stay").
/// Internally it is either a `Heading` (at most one vertical and one
/// horizontal component) or a teleport, so "T plus a direction" cannot exist.
/// Tokens are only parsed at the boundary (`Action::from_str`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Vertical {
    North,
    South,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Horizontal {
    West,
    East,
}

/// Directional part of a move. Both `None` means "stay".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Heading {
    pub vertical: Option<Vertical>,
    pub horizontal: Option<Horizontal>,
}

impl Heading {
    pub const STAY: Heading = Heading { vertical: None, horizontal: None };

    pub const fn new(vertical: Option<Vertical>, horizontal: Option<Horizontal>) -> Self {
        Heading { vertical, horizontal }
    }

    pub fn is_stay(self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }

    /// `(dx, dy)` with y growing downward.
    pub fn delta(self) -> (i32, i32) {
        let dy = match self.vertical {
            Some(Vertical::North) => -1,
            Some(Vertical::South) => 1,
            None => 0,
        };
        let dx = match self.horizontal {
            Some(Horizontal::West) => -1,
            Some(Horizontal::East) => 1,
            None => 0,
        };
        (dx, dy)
    }

    /// Token form, vertical letter first: `""`, `"N"`, `"SE"`, ...
    pub fn token(self) -> &'static str {
        use Horizontal::*;
        use Vertical::*;
        match (self.vertical, self.horizontal) {
            (None, None) => "",
            (Some(North), None) => "N",
            (Some(South), None) => "S",
            (None, Some(West)) => "W",
            (None, Some(East)) => "E",
            (Some(North), Some(West)) => "NW",
            (Some(North), Some(East)) => "NE",
            (Some(South), Some(West)) => "SW",
            (Some(South), Some(East)) => "SE",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Step(Heading),
    Teleport,
}

impl Action {
    pub const STAY: Action = Action::Step(Heading::STAY);

    /// All tokens accepted at the boundary, in binding order.
    pub const TOKENS: [&'static str; 10] = ["N", "S", "W", "E", "NW", "NE", "SW", "SE", "T", ""];

    pub fn token(self) -> &'static str {
        match self {
            Action::Step(h) => h.token(),
            Action::Teleport => "T",
        }
    }
}

impl From<Heading> for Action {
    fn from(h: Heading) -> Self {
        Action::Step(h)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Step(h) if h.is_stay() => f.write_str("stay"),
            _ => f.write_str(self.token()),
        }
    }
}

/// An action token outside the closed vocabulary.
/// This means the input mapping upstream is broken; it is never coerced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("action token {0:?} is not in the movement vocabulary")]
    Unknown(String),
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        use Horizontal::*;
        use Vertical::*;
        let heading = match token {
            "T" => return Ok(Action::Teleport),
            "" => Heading::STAY,
            "N" => Heading::new(Some(North), None),
            "S" => Heading::new(Some(South), None),
            "W" => Heading::new(None, Some(West)),
            "E" => Heading::new(None, Some(East)),
            "NW" => Heading::new(Some(North), Some(West)),
            "NE" => Heading::new(Some(North), Some(East)),
            "SW" => Heading::new(Some(South), Some(West)),
            "SE" => Heading::new(Some(South), Some(East)),
            other => return Err(ActionError::Unknown(other.to_string())),
        };
        Ok(Action::Step(heading))
    }
}
