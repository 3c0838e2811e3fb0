use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Player {
    A,
    B,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::A, Player::B];

    pub fn index(self) -> usize {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::A => "RED",
            Player::B => "BLUE",
        }
    }

    pub fn start_direction(self) -> Direction {
        match self {
            Player::A => Right,
            Player::B => Left,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Unit displacement scaled by the cell size.
    pub fn displacement(self, cell_size: i32) -> (i32, i32) {
        match self {
            Up => (0, -cell_size),
            Down => (0, cell_size),
            Left => (-cell_size, 0),
            Right => (cell_size, 0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction, cell_size: i32) -> Cell {
        let (dx, dy) = direction.displacement(cell_size);
        Cell::new(self.x + dx, self.y + dy)
    }
}

/// A pair of consecutive body cells, kept for drawing.
pub type Segment = (Cell, Cell);

/// One player's state within a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Racer {
    body: Vec<Cell>,
    trail: Vec<Segment>,
    direction: Direction,
}

impl Racer {
    pub fn new(start: Cell, direction: Direction) -> Self {
        Racer { body: vec![start], trail: vec![], direction }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn trail(&self) -> &[Segment] {
        &self.trail
    }

    pub fn head(&self) -> Cell {
        // The body is never empty: it starts with one cell and only grows.
        self.body[self.body.len() - 1]
    }

    pub fn next_head(&self, cell_size: i32) -> Cell {
        self.head().step(self.direction, cell_size)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn push_head(&mut self, new_head: Cell) {
        let old_head = self.head();
        self.body.push(new_head);
        self.trail.push((old_head, new_head));
    }

    /// Returns whether the direction was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    #[cfg(test)]
    pub fn get_direction(&self) -> Direction {
        self.direction
    }
}
