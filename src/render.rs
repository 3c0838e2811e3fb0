//! Turns a game snapshot into a grid of coloured terminal glyphs.
//!
//! One arena cell is two terminal columns wide, which keeps the cells
//! roughly square in most terminal fonts. The canvas has a score line on
//! top and a border around the arena.

use crate::arena::Arena;
use crate::player::{Cell, Player};
use crate::state::Snapshot;

use crossterm::style::Color;

const CELL_COLS: u16 = 2;
const SCORE_ROWS: u16 = 1;

const BLOCK_CHAR: char = '█';
const CORNER_CHAR: char = '●';
const PAUSE_TEXT: &str = "PAUSED";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };

    pub fn new(ch: char, color: Color) -> Self {
        Glyph { ch, color }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Canvas { width, height, glyphs: vec![Glyph::BLANK; width as usize * height as usize] }
    }

    /// Canvas size needed to draw the given arena, or `None` when it does
    /// not fit in terminal coordinates.
    pub fn checked_size_for(arena: &Arena) -> Option<(u16, u16)> {
        let cols = u16::try_from(arena.cols()).ok()?;
        let rows = u16::try_from(arena.rows()).ok()?;
        let width = cols.checked_mul(CELL_COLS)?.checked_add(2)?;
        let height = rows.checked_add(2 + SCORE_ROWS)?;
        Some((width, height))
    }

    /// Saturates for arenas that `GameConfig::validate` rejects, so such a
    /// canvas never fits a terminal.
    pub fn size_for(arena: &Arena) -> (u16, u16) {
        Canvas::checked_size_for(arena).unwrap_or((u16::MAX, u16::MAX))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Glyph {
        self.glyphs[self.index(x, y)]
    }

    /// Writes outside the canvas are clipped.
    pub fn put(&mut self, x: u16, y: u16, glyph: Glyph) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.glyphs[i] = glyph;
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x.saturating_add(i as u16), y, Glyph::new(ch, color));
        }
    }

    /// The text of one row, colours dropped.
    #[cfg(test)]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, x: u16, y: u16) -> usize {
        self.width as usize * y as usize + x as usize
    }
}

pub fn player_color(player: Player) -> Color {
    match player {
        Player::A => Color::Red,
        Player::B => Color::Blue,
    }
}

/// Background, border, corner markers, trails, bodies, scores and the pause
/// overlay, painted in that order.
pub fn compose(snapshot: &Snapshot) -> Canvas {
    let arena = snapshot.arena;
    let (width, height) = Canvas::size_for(&arena);
    let mut canvas = Canvas::new(width, height);

    draw_border(&mut canvas);

    let (max_col, max_row) = (arena.cols() - 1, arena.rows() - 1);
    for &(col, row) in [(0, 0), (max_col, 0), (0, max_row), (max_col, max_row)].iter() {
        let cell = Cell::new(col * arena.cell_size(), row * arena.cell_size());
        let (x, y) = screen_pos(&arena, cell);
        canvas.put(x, y, Glyph::new(CORNER_CHAR, Color::White));
    }

    for &player in Player::ALL.iter() {
        let color = player_color(player);
        for &(from, to) in snapshot.trails[player.index()] {
            draw_segment(&mut canvas, &arena, from, to, color);
        }
    }

    for &player in Player::ALL.iter() {
        let color = player_color(player);
        for &cell in snapshot.bodies[player.index()] {
            let (x, y) = screen_pos(&arena, cell);
            for dx in 0..CELL_COLS {
                canvas.put(x.saturating_add(dx), y, Glyph::new(BLOCK_CHAR, color));
            }
        }
    }

    let red = format!("RED: {}", snapshot.scores[Player::A.index()]);
    let blue = format!("BLUE: {}", snapshot.scores[Player::B.index()]);
    canvas.put_str(1, 0, &red, player_color(Player::A));
    canvas.put_str(width.saturating_sub(blue.len() as u16 + 1), 0, &blue, player_color(Player::B));

    if snapshot.paused {
        let x = (width - PAUSE_TEXT.len() as u16) / 2;
        let (_, y) = screen_pos(&arena, Cell::new(0, arena.rows() / 2 * arena.cell_size()));
        canvas.put_str(x, y, PAUSE_TEXT, Color::White);
    }

    canvas
}

///////////////////////////////////////////////////////////////////////////////

// Out-of-range cells land past the canvas edge and are clipped by `put`.
fn screen_pos(arena: &Arena, cell: Cell) -> (u16, u16) {
    let (col, row) = arena.grid_pos(cell);
    let x = u16::try_from(col).ok().and_then(|c| c.checked_mul(CELL_COLS)).and_then(|x| x.checked_add(1));
    let y = u16::try_from(row).ok().and_then(|r| r.checked_add(SCORE_ROWS + 1));
    (x.unwrap_or(u16::MAX), y.unwrap_or(u16::MAX))
}

fn draw_border(canvas: &mut Canvas) {
    let (width, height) = (canvas.width(), canvas.height());
    let (top, bottom) = (SCORE_ROWS, height - 1);

    for x in 0..width {
        let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
        canvas.put(x, top, Glyph::new(ch, Color::Reset));
        canvas.put(x, bottom, Glyph::new(ch, Color::Reset));
    }

    for y in top + 1..bottom {
        canvas.put(0, y, Glyph::new('|', Color::Reset));
        canvas.put(width - 1, y, Glyph::new('|', Color::Reset));
    }
}

/// Segments join neighbouring cells, so a line is the two half cells
/// between their centres.
fn draw_segment(canvas: &mut Canvas, arena: &Arena, from: Cell, to: Cell, color: Color) {
    let (fx, fy) = screen_pos(arena, from);
    let (tx, ty) = screen_pos(arena, to);

    if fy == ty {
        for x in fx.min(tx)..=fx.max(tx).saturating_add(1) {
            canvas.put(x, fy, Glyph::new('─', color));
        }
    } else {
        for y in fy.min(ty)..=fy.max(ty) {
            canvas.put(fx, y, Glyph::new('│', color));
        }
    }
}
