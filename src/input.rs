use std::collections::{vec_deque, VecDeque};

use crate::player::{Direction::{*, self}, Player};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Turn(Player, Direction),
    TogglePause,
    Confirm,
    Quit,
}

impl Command {
    pub fn from_event(ev: &Event) -> Option<Command> {
        match ev {
            Event::Key(key) => Command::from_key_event(key),
            Event::Mouse(MouseEvent { kind: MouseEventKind::Down(_), .. }) => Some(Command::TogglePause),
            _ => None,
        }
    }

    pub fn from_key_event(ev: &KeyEvent) -> Option<Command> {
        if is_ctrl_c(ev) {
            return Some(Command::Quit);
        }

        match ev.code {
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Enter => Some(Command::Confirm),
            KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
                'w' => Some(Command::Turn(Player::A, Up)),
                'a' => Some(Command::Turn(Player::A, Left)),
                's' => Some(Command::Turn(Player::A, Down)),
                'd' => Some(Command::Turn(Player::A, Right)),
                'i' => Some(Command::Turn(Player::B, Up)),
                'j' => Some(Command::Turn(Player::B, Left)),
                'k' => Some(Command::Turn(Player::B, Down)),
                'l' => Some(Command::Turn(Player::B, Right)),
                'p' => Some(Command::TogglePause),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Commands waiting for the next tick, oldest first. Never grows beyond its
/// capacity; overflow is dropped.
#[derive(Debug)]
pub struct InputQueue {
    pending: VecDeque<Command>,
    capacity: usize,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        InputQueue { pending: VecDeque::with_capacity(capacity), capacity }
    }

    /// Returns false if the command was dropped.
    pub fn push(&mut self, cmd: Command) -> bool {
        if self.pending.len() >= self.capacity {
            warn!(?cmd, capacity = self.capacity, "Input queue full, dropping command");
            return false;
        }

        self.pending.push_back(cmd);
        true
    }

    pub fn drain(&mut self) -> vec_deque::Drain<'_, Command> {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
