use crate::player::{Cell, Player};

/// Fixed playing field, measured in arena units. Every position on it is a
/// multiple of `cell_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl Arena {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Self {
        Arena { width, height, cell_size }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Number of grid columns.
    pub fn cols(&self) -> i32 {
        self.width / self.cell_size
    }

    /// Number of grid rows.
    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn is_aligned(&self, cell: Cell) -> bool {
        cell.x % self.cell_size == 0 && cell.y % self.cell_size == 0
    }

    /// Where a player stands at the start of every round: A at a quarter of
    /// the width, B at three quarters, both on the vertical centre line.
    pub fn start_cell(&self, player: Player) -> Cell {
        let x = match player {
            Player::A => self.width / 4,
            // Widened so that 3 * width cannot overflow.
            Player::B => (3 * i64::from(self.width) / 4) as i32,
        };
        Cell::new(x, self.height / 2)
    }

    /// Grid coordinates (column, row) of an aligned cell.
    pub fn grid_pos(&self, cell: Cell) -> (i32, i32) {
        (cell.x / self.cell_size, cell.y / self.cell_size)
    }
}
