/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only ever borrows the world immutably.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::{ColorConfig, Rgb};
use crate::domain::grid::Position;
use crate::sim::event::Explosion;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell outside the board, so the
    /// terminal's own default never shows through.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Camera ──

/// Viewport into the board, in 1-indexed grid coordinates.
///
/// `(x, y)` is the grid coordinate of the top-left visible cell.
/// Boards that fit the terminal are centred; larger ones scroll with a
/// dead zone around the player.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Camera {
    x: i32,
    y: i32,
    view_w: usize,
    view_h: usize,
}

impl Camera {
    fn new() -> Self {
        Camera { x: 1, y: 1, view_w: 0, view_h: 0 }
    }

    fn follow(&mut self, target: Position, board_w: i32, board_h: i32) {
        self.x = follow_axis(self.x, target.x, self.view_w as i32, board_w);
        self.y = follow_axis(self.y, target.y, self.view_h as i32, board_h);
    }
}

fn follow_axis(origin: i32, target: i32, view: i32, board: i32) -> i32 {
    if view <= 0 { return origin; }
    if board <= view {
        // Centre: may start left of column 1, those cells draw as void.
        return 1 - (view - board) / 2;
    }
    let margin = view / 5;
    let mut origin = origin;
    if target < origin + margin {
        origin = target - margin;
    } else if target > origin + view - margin - 1 {
        origin = target - view + margin + 1;
    }
    origin.clamp(1, board - view + 1)
}

// ── Renderer ──

/// Each board cell is 2 terminal columns wide.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    camera: Camera,
    palette: Palette,
}

#[derive(Clone, Copy)]
struct Palette {
    tile_even: Color,
    tile_odd: Color,
    player: Color,
    enemy: Color,
    explosion: Color,
}

impl From<&ColorConfig> for Palette {
    fn from(c: &ColorConfig) -> Self {
        let rgb = |(r, g, b): Rgb| Color::Rgb { r, g, b };
        Palette {
            tile_even: rgb(c.tile_even),
            tile_odd: rgb(c.tile_odd),
            player: rgb(c.player),
            enemy: rgb(c.enemy),
            explosion: rgb(c.explosion),
        }
    }
}

impl Renderer {
    pub fn new(colors: &ColorConfig) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            camera: Camera::new(),
            palette: Palette::from(colors),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, explosions: &[Explosion]) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.fit_viewport(world);
        self.front.clear();
        self.compose_game(world, explosions);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    /// Viewport = what fits between the HUD and the message/help rows.
    /// Narrow boards are centred in the full terminal width; the height is
    /// capped to the board so the message rows sit right under it.
    fn fit_viewport(&mut self, world: &WorldState) {
        let grid = world.grid();
        let reserved_rows = MAP_ROW + 4;
        self.camera.view_w = self.term_w / CELL_W;
        self.camera.view_h = self.term_h.saturating_sub(reserved_rows).max(1).min(grid.height() as usize);
        self.camera.follow(world.player().pos, grid.width(), grid.height());
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState, explosions: &[Explosion]) {
        // ── HUD row ──
        let hud = format!(
            " ROBOTS  Enemies:{:<4} Turn:{:<6} Seed:{} ",
            w.enemies().len(), w.tick, w.seed,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Board (camera viewport) ──
        let cam = self.camera.clone();
        for vy in 0..cam.view_h {
            let row = MAP_ROW + vy;
            if row >= self.front.height { break; }
            for vx in 0..cam.view_w {
                let col = vx * CELL_W;
                if col + 1 >= self.front.width { break; }
                let pos = Position::new(cam.x + vx as i32, cam.y + vy as i32);
                self.compose_cell(w, explosions, pos, col, row);
            }
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + cam.view_h + 1;
        let message = match w.phase {
            Phase::Cleared => Some(" All robots destroyed!  R: new game  Esc: quit ".to_string()),
            Phase::Playing if !explosions.is_empty() => {
                let ids: Vec<String> = explosions.iter().map(|e| format!("#{}", e.enemy_id)).collect();
                Some(format!(" Boom! Robot {} destroyed ", ids.join(", ")))
            }
            Phase::Playing => None,
        };
        if let Some(msg) = message {
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &msg, Color::Black, MSG_BG);
        }

        // ── Help bar ──
        let help_row = MAP_ROW + cam.view_h + 3;
        let help = " Move: arrows/wasd/hjkl  Diag: q e z x / y u b n  T: teleport  .: wait  R: restart  Esc: quit";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }

    /// Draw board cell `pos` at terminal (col, row). Cells off the board are void.
    fn compose_cell(&mut self, w: &WorldState, explosions: &[Explosion], pos: Position, col: usize, row: usize) {
        if !w.grid().contains(pos) {
            self.front.set(col, row, Cell::BLANK);
            self.front.set(col + 1, row, Cell::BLANK);
            return;
        }

        let pal = self.palette;
        // An explosion always shares the player's cell, so it tints the
        // background and the player glyph stays on top.
        let bg = if explosions.iter().any(|e| e.pos == pos) {
            pal.explosion
        } else if (pos.x + pos.y) % 2 == 0 {
            pal.tile_even
        } else {
            pal.tile_odd
        };

        let glyph = if w.player().pos == pos {
            Some(('█', pal.player))
        } else if w.enemies().iter().any(|e| e.pos == pos) {
            Some(('▓', pal.enemy))
        } else {
            None
        };

        let (ch, fg) = glyph.unwrap_or((' ', Color::Reset));
        self.front.set(col, row, Cell::new(ch, fg, bg));
        self.front.set(col + 1, row, Cell::new(ch, fg, bg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::GameConfig;
    use crate::domain::action::Action;
    use crate::domain::grid::Grid;
    use crate::sim::step;

    /// Renderer laid out for an 80x24 terminal without touching the tty.
    fn offscreen(world: &WorldState) -> Renderer {
        let mut r = Renderer::new(&GameConfig::default().colors);
        r.term_w = 80;
        r.term_h = 24;
        r.front.resize(80, 24);
        r.fit_viewport(world);
        r
    }

    /// Terminal cell showing board cell `pos`, if it is in view.
    fn screen_cell(r: &Renderer, pos: Position) -> Option<Cell> {
        let vx = usize::try_from(pos.x - r.camera.x).ok()?;
        let vy = usize::try_from(pos.y - r.camera.y).ok()?;
        (vx < r.camera.view_w && vy < r.camera.view_h)
            .then(|| r.front.get(vx * CELL_W, MAP_ROW + vy))
    }

    #[test]
    fn collision_frame_shows_explosion_under_player() {
        let mut w = WorldState::new(Grid::new(30, 30), 3);
        w.player.pos = Position::new(5, 5);
        w.add_enemy(Position::new(5, 6)).unwrap();
        let boom = step::advance(&mut w, Action::STAY);
        assert_eq!(boom.len(), 1);

        let mut r = offscreen(&w);
        r.compose_game(&w, &boom);
        let cell = screen_cell(&r, Position::new(5, 5)).unwrap();
        let explosion = Palette::from(&GameConfig::default().colors).explosion;
        assert_eq!(cell.bg, explosion);
        assert_eq!(cell.ch, '█');

        // Next frame without explosions: plain board again.
        r.front.clear();
        r.compose_game(&w, &[]);
        assert_ne!(screen_cell(&r, Position::new(5, 5)).unwrap().bg, explosion);
    }

    #[test]
    fn explosion_message_names_destroyed_robots() {
        let mut w = WorldState::new(Grid::new(30, 30), 3);
        w.player.pos = Position::new(5, 5);
        w.add_enemy(Position::new(5, 6)).unwrap();
        w.add_enemy(Position::new(20, 20)).unwrap();
        let boom = step::advance(&mut w, Action::STAY);

        let mut r = offscreen(&w);
        r.compose_game(&w, &boom);
        let row = MAP_ROW + r.camera.view_h + 1;
        let text: String = (0..r.front.width).map(|x| r.front.get(x, row).ch).collect();
        assert!(text.contains("Robot #1 destroyed"), "{text:?}");
    }

    #[test]
    fn narrow_board_is_centred_in_terminal() {
        // 80 columns = 40 board cells; a 10-wide board leaves 15 void cells each side.
        let w = WorldState::new(Grid::new(10, 5), 1);
        let r = offscreen(&w);
        assert_eq!(r.camera.view_w, 40);
        assert_eq!(r.camera.x, -14);
        assert_eq!(r.camera.view_h, 5);
        assert_eq!(r.camera.y, 1);
    }

    #[test]
    fn small_board_is_centred() {
        // 10 columns visible, 6-wide board: two void columns on the left.
        assert_eq!(follow_axis(1, 3, 10, 6), -1);
    }

    #[test]
    fn large_board_scrolls_with_dead_zone() {
        // view 10, margin 2: target at 9 from origin 1 is past 1+10-2-1 = 8.
        assert_eq!(follow_axis(1, 9, 10, 30), 2);
        // inside dead zone: unchanged
        assert_eq!(follow_axis(5, 8, 10, 30), 5);
        // near the far edge: clamped so the last column is flush
        assert_eq!(follow_axis(15, 30, 10, 30), 21);
        // back toward the start: clamped at 1
        assert_eq!(follow_axis(10, 1, 10, 30), 1);
    }

    #[test]
    fn frame_buffer_ignores_out_of_range_writes() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(1, 1, "abcdef", Color::White, Color::Reset);
        assert_eq!(fb.get(1, 1).ch, 'a');
        assert_eq!(fb.get(2, 1).ch, 'b');
        assert_eq!(fb.get(5, 5), Cell::BLANK);
    }
}
