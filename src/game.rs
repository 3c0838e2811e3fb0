use std::time::Instant;

use crate::config::GameConfig;
use crate::error::AppError;
use crate::input::{Command, InputQueue};
use crate::player::Player;
use crate::render::{self, Canvas};
use crate::scheduler::{Scheduler, Simulation};
use crate::state::{GameState, TickOutcome};
use crate::term::TermManager;

use crossterm::event::Event;
use tracing::{debug, info};

const INTRO_LINES: &[&str] = &[
    "THIS IS A SURVIVAL GAME FOR TWO PLAYERS",
    "STARTING WITH AN EMPTY SCREEN, PATHS ARE DRAWN",
    "BY THE TWO PLAYERS, ONE RED AND THE OTHER BLUE",
    "THE OBJECT IS TO KEEP YOUR PATH FROM RUNNING",
    "INTO ANYTHING FOR AS LONG AS POSSIBLE",
    "THIS GAME TAKES PRACTICE SO DON'T GIVE UP!",
    "",
    "RED (LEFT) STEERS WITH W A S D",
    "BLUE (RIGHT) STEERS WITH I J K L",
    "CLICK THE MOUSE (OR PRESS P) TO PAUSE",
    "ESC TO QUIT",
    "",
    "HIT ENTER TO BEGIN",
];

/// The game state plus the commands that arrived since the last step.
/// Stepping a session first replays its queued commands, in arrival order,
/// then advances the game.
pub struct Session {
    state: GameState,
    queue: InputQueue,
}

impl Session {
    pub fn new(state: GameState, queue_capacity: usize) -> Self {
        Session { state, queue: InputQueue::new(queue_capacity) }
    }

    pub fn enqueue(&mut self, cmd: Command) -> bool {
        self.queue.push(cmd)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Turn(player, dir) => self.state.change_direction(player, dir),
            Command::TogglePause => self.state.toggle_pause(),
            Command::Confirm | Command::Quit => {},
        }
    }
}

impl Simulation for Session {
    type Outcome = TickOutcome;

    fn step(&mut self) -> TickOutcome {
        if !self.queue.is_empty() {
            debug!(queued = self.queue.len(), "Replaying queued input");
        }

        let pending: Vec<Command> = self.queue.drain().collect();
        for cmd in pending {
            self.apply(cmd);
        }
        self.state.advance()
    }
}

pub struct BlockadeGame {
    config: GameConfig,
    term: TermManager,
    session: Session,
}

impl BlockadeGame {
    pub fn new(config: GameConfig) -> Result<Self, AppError> {
        let state = GameState::new(config.arena());
        let session = Session::new(state, config.input_queue_capacity);
        Ok(BlockadeGame { term: TermManager::new()?, config, session })
    }

    /// Start screen, then the main loop until the players quit.
    pub fn start(&mut self) -> Result<(), AppError> {
        self.initialize()?;

        if self.show_intro()? {
            self.play()?;
        }

        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.term.restore();
        info!(
            red = self.session.state().score(Player::A),
            blue = self.session.state().score(Player::B),
            "Blockade stopped"
        );
    }

    ///////////////////////////////////////////////////////////////////////////

    fn initialize(&mut self) -> Result<(), AppError> {
        let (cols, rows) = Canvas::size_for(self.session.state().arena());
        let (have_cols, have_rows) = self.term.get_terminal_size();
        debug!(cols, rows, have_cols, have_rows, "Checking terminal size");
        self.term.ensure_fits(cols, rows)?;

        self.term.setup()?;
        self.term.clear()
    }

    /// Returns false if the players quit instead of confirming.
    fn show_intro(&mut self) -> Result<bool, AppError> {
        self.term.show_message(INTRO_LINES)?;

        loop {
            match Command::from_event(&self.term.read_event_blocking()?) {
                Some(Command::Confirm) => break,
                Some(Command::Quit) => return Ok(false),
                _ => {},
            }
        }

        self.term.hide_message()?;
        Ok(true)
    }

    fn play(&mut self) -> Result<(), AppError> {
        info!(interval_ms = self.config.step_interval_ms, "Round started");

        let mut scheduler = Scheduler::new(self.config.step_interval(), Instant::now());
        self.draw()?;

        loop {
            let timeout = scheduler.time_until_due(Instant::now());

            for ev in self.term.read_events(timeout)? {
                if let Event::Resize(width, height) = ev {
                    self.term.resize(width, height)?;
                    continue;
                }

                match Command::from_event(&ev) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Confirm) | None => {},
                    Some(cmd) => {
                        self.session.enqueue(cmd);
                    },
                }
            }

            scheduler.poll(Instant::now(), &mut self.session);
            self.draw()?;
        }
    }

    fn draw(&mut self) -> Result<(), AppError> {
        let canvas = render::compose(&self.session.state().snapshot());
        self.term.present(&canvas)
    }
}
