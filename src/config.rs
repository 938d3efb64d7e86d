/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// The result is immutable for the rest of the session.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

use crate::domain::action::Action;
use crate::domain::grid::MAX_SIDE;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub enemy_count: usize,
    /// Fixed RNG seed; `None` draws a fresh one per game.
    pub seed: Option<u64>,
    pub keys: KeyConfig,
    pub colors: ColorConfig,
}

/// Key names bound to each action token. Single characters match that
/// character; named keys are `Up`, `Down`, `Left`, `Right`, `Space`,
/// `Enter`, `Tab`.
#[derive(Clone, Debug)]
pub struct KeyConfig {
    pub bindings: Vec<(String, Vec<String>)>,
}

pub type Rgb = (u8, u8, u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorConfig {
    pub tile_even: Rgb,
    pub tile_odd: Rgb,
    pub player: Rgb,
    pub enemy: Rgb,
    pub explosion: Rgb,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    enemies: TomlEnemies,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    keys: TomlKeys,
    #[serde(default)]
    colors: TomlColors,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlEnemies {
    #[serde(default = "default_enemy_count")]
    count: usize,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlKeys {
    #[serde(default = "default_keys_n")]
    n: Vec<String>,
    #[serde(default = "default_keys_s")]
    s: Vec<String>,
    #[serde(default = "default_keys_w")]
    w: Vec<String>,
    #[serde(default = "default_keys_e")]
    e: Vec<String>,
    #[serde(default = "default_keys_nw")]
    nw: Vec<String>,
    #[serde(default = "default_keys_ne")]
    ne: Vec<String>,
    #[serde(default = "default_keys_sw")]
    sw: Vec<String>,
    #[serde(default = "default_keys_se")]
    se: Vec<String>,
    #[serde(default = "default_keys_t")]
    t: Vec<String>,
    #[serde(default = "default_keys_stay")]
    stay: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlColors {
    #[serde(default = "default_tile_even")]
    tile_even: [u8; 3],
    #[serde(default = "default_tile_odd")]
    tile_odd: [u8; 3],
    #[serde(default = "default_player_color")]
    player: [u8; 3],
    #[serde(default = "default_enemy_color")]
    enemy: [u8; 3],
    #[serde(default = "default_explosion_color")]
    explosion: [u8; 3],
}

// ── Defaults ──

fn default_width() -> i32 { 30 }
fn default_height() -> i32 { 30 }
fn default_enemy_count() -> usize { 30 }

fn keys(names: &[&str]) -> Vec<String> { names.iter().map(|s| s.to_string()).collect() }
fn default_keys_n() -> Vec<String> { keys(&["Up", "w", "k"]) }
fn default_keys_s() -> Vec<String> { keys(&["Down", "s", "j"]) }
fn default_keys_w() -> Vec<String> { keys(&["Left", "a", "h"]) }
fn default_keys_e() -> Vec<String> { keys(&["Right", "d", "l"]) }
fn default_keys_nw() -> Vec<String> { keys(&["q", "y"]) }
fn default_keys_ne() -> Vec<String> { keys(&["e", "u"]) }
fn default_keys_sw() -> Vec<String> { keys(&["z", "b"]) }
fn default_keys_se() -> Vec<String> { keys(&["x", "n"]) }
fn default_keys_t() -> Vec<String> { keys(&["t"]) }
fn default_keys_stay() -> Vec<String> { keys(&[".", "Space"]) }

fn default_tile_even() -> [u8; 3] { [204, 204, 204] }    // gray80
fn default_tile_odd() -> [u8; 3] { [229, 229, 229] }     // gray90
fn default_player_color() -> [u8; 3] { [100, 149, 237] } // cornflower blue
fn default_enemy_color() -> [u8; 3] { [178, 34, 34] }    // firebrick
fn default_explosion_color() -> [u8; 3] { [255, 165, 0] } // orange

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid { width: default_width(), height: default_height() }
    }
}

impl Default for TomlEnemies {
    fn default() -> Self {
        TomlEnemies { count: default_enemy_count() }
    }
}

impl Default for TomlKeys {
    fn default() -> Self {
        TomlKeys {
            n: default_keys_n(),
            s: default_keys_s(),
            w: default_keys_w(),
            e: default_keys_e(),
            nw: default_keys_nw(),
            ne: default_keys_ne(),
            sw: default_keys_sw(),
            se: default_keys_se(),
            t: default_keys_t(),
            stay: default_keys_stay(),
        }
    }
}

impl Default for TomlColors {
    fn default() -> Self {
        TomlColors {
            tile_even: default_tile_even(),
            tile_odd: default_tile_odd(),
            player: default_player_color(),
            enemy: default_enemy_color(),
            explosion: default_explosion_color(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        GameConfig::from_toml(load_toml(&candidate_dirs()))
    }

    /// Parse config text directly. Errors fall back to defaults with a warning.
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg),
            Err(e) => {
                warn!("config.toml parse error, using default settings: {e}");
                GameConfig::default()
            }
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let (width, height) = (cfg.grid.width, cfg.grid.height);
        if width < 1 || height < 1 {
            warn!(width, height, "grid dimensions must be at least 1; raising");
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            warn!(width, height, max = MAX_SIDE, "grid dimensions too large; capping");
        }

        // Same order as `Action::TOKENS`.
        let k = cfg.keys;
        let keys = [k.n, k.s, k.w, k.e, k.nw, k.ne, k.sw, k.se, k.t, k.stay];
        let bindings = Action::TOKENS
            .iter()
            .map(|t| t.to_string())
            .zip(keys)
            .collect();

        let c = cfg.colors;
        GameConfig {
            width: width.clamp(1, MAX_SIDE),
            height: height.clamp(1, MAX_SIDE),
            enemy_count: cfg.enemies.count,
            seed: cfg.general.seed,
            keys: KeyConfig { bindings },
            colors: ColorConfig {
                tile_even: rgb(c.tile_even),
                tile_odd: rgb(c.tile_odd),
                player: rgb(c.player),
                enemy: rgb(c.enemy),
                explosion: rgb(c.explosion),
            },
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Rgb {
    (r, g, b)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warn!("{} parse error, using default settings: {e}", path.display());
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
