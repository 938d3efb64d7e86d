/// Input mapping: terminal key events → one command per turn.
///
/// The game is turn-based, so only fresh presses matter; repeats and
/// releases are ignored. Keys with no binding are dropped here and never
/// reach the simulation.

use std::collections::HashMap;
use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, warn};

use crate::config::KeyConfig;
use crate::domain::action::{Action, ActionError};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Act(Action),
    Restart,
    Quit,
    /// Terminal resized; repaint without ticking.
    Redraw,
}

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];

pub struct InputState {
    bindings: HashMap<KeyCode, Action>,
}

impl InputState {
    /// Build the key table. Every bound token must be in the action
    /// vocabulary; a bad token is a programming error and is returned.
    pub fn new(keys: &KeyConfig) -> Result<Self, ActionError> {
        let mut bindings = HashMap::with_capacity(32);
        for (token, names) in &keys.bindings {
            let action: Action = token.parse()?;
            for name in names {
                match parse_key(name) {
                    Some(code) => {
                        bindings.insert(code, action);
                        // Also accept the shifted letter unless it is bound elsewhere.
                        if let KeyCode::Char(c) = code {
                            let upper = KeyCode::Char(c.to_ascii_uppercase());
                            bindings.entry(upper).or_insert(action);
                        }
                    }
                    None => warn!("unknown key name {name:?} for action {action}, ignoring"),
                }
            }
        }
        Ok(InputState { bindings })
    }

    /// Block until the player produces a mapped command.
    pub fn next_command(&mut self) -> io::Result<Command> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(cmd) = self.map_key(key) {
                        return Ok(cmd);
                    }
                }
                Event::Resize(_, _) => return Ok(Command::Redraw),
                _ => {}
            }
        }
    }

    /// Translate one key event. `None` means the key is dropped.
    pub fn map_key(&self, key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
                _ => None,
            };
        }
        if KEYS_QUIT.contains(&key.code) {
            return Some(Command::Quit);
        }
        if let Some(&action) = self.bindings.get(&key.code) {
            return Some(Command::Act(action));
        }
        if KEYS_RESTART.contains(&key.code) {
            return Some(Command::Restart);
        }
        debug!(code = ?key.code, "unmapped key dropped");
        None
    }
}

fn parse_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Space" => KeyCode::Char(' '),
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}
