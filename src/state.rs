use crate::arena::Arena;
use crate::player::{Cell, Direction, Player, Racer, Segment};
use crate::scheduler::Simulation;

use tracing::{debug, info};

/// Why a move ended the round.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Crash {
    Boundary,
    OwnTrail,
    OpponentTrail,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Paused,
    Moved,
    Crashed { loser: Player, cause: Crash },
}

/// Read-only view handed to the renderer once per frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub arena: Arena,
    pub bodies: [&'a [Cell]; 2],
    pub trails: [&'a [Segment]; 2],
    pub scores: [u32; 2],
    pub paused: bool,
}

/// The whole game: two racers, their scores and the pause flag.
///
/// Scores survive resets; only a new `GameState` zeroes them.
#[derive(Debug, Clone)]
pub struct GameState {
    arena: Arena,
    racers: [Racer; 2],
    scores: [u32; 2],
    paused: bool,
}

impl GameState {
    pub fn new(arena: Arena) -> Self {
        GameState {
            arena,
            racers: initial_racers(&arena),
            scores: [0, 0],
            paused: false,
        }
    }

    /// Ignored when `new_direction` is the opposite of the current one.
    /// Accepted while paused; it takes effect on the first tick after resuming.
    pub fn change_direction(&mut self, player: Player, new_direction: Direction) {
        if !self.racers[player.index()].set_direction(new_direction) {
            debug!(player = player.name(), ?new_direction, "Reversal ignored");
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!(paused = self.paused, "Pause toggled");
    }

    /// Moves A, then B. B's move is checked against A's body as it stands
    /// after A's move in the same tick.
    pub fn advance(&mut self) -> TickOutcome {
        if self.paused {
            return TickOutcome::Paused;
        }

        for &player in Player::ALL.iter() {
            let new_head = self.racers[player.index()].next_head(self.arena.cell_size());

            if let Some(cause) = self.collision(player, new_head) {
                let winner = player.opponent();
                self.scores[winner.index()] += 1;
                info!(
                    loser = player.name(),
                    ?cause,
                    red = self.scores[0],
                    blue = self.scores[1],
                    "Round over"
                );
                self.reset();
                return TickOutcome::Crashed { loser: player, cause };
            }

            self.racers[player.index()].push_head(new_head);
        }

        debug!(length = self.racers[0].body().len(), "Tick");
        TickOutcome::Moved
    }

    /// Puts both racers back on their start cells. Scores and pause are kept.
    pub fn reset(&mut self) {
        self.racers = initial_racers(&self.arena);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            arena: self.arena,
            bodies: [self.racers[0].body(), self.racers[1].body()],
            trails: [self.racers[0].trail(), self.racers[1].trail()],
            scores: self.scores,
            paused: self.paused,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[cfg(test)]
    pub fn body(&self, player: Player) -> &[Cell] {
        self.racers[player.index()].body()
    }

    #[cfg(test)]
    pub fn trail(&self, player: Player) -> &[Segment] {
        self.racers[player.index()].trail()
    }

    #[cfg(test)]
    pub fn direction(&self, player: Player) -> Direction {
        self.racers[player.index()].get_direction()
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    ///////////////////////////////////////////////////////////////////////////

    fn collision(&self, player: Player, new_head: Cell) -> Option<Crash> {
        if !self.arena.contains(new_head) {
            Some(Crash::Boundary)
        } else if self.racers[player.index()].occupies(new_head) {
            Some(Crash::OwnTrail)
        } else if self.racers[player.opponent().index()].occupies(new_head) {
            Some(Crash::OpponentTrail)
        } else {
            None
        }
    }
}

impl Simulation for GameState {
    type Outcome = TickOutcome;

    fn step(&mut self) -> TickOutcome {
        self.advance()
    }
}

fn initial_racers(arena: &Arena) -> [Racer; 2] {
    [
        Racer::new(arena.start_cell(Player::A), Player::A.start_direction()),
        Racer::new(arena.start_cell(Player::B), Player::B.start_direction()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Direction::*;
    use crate::scheduler::Scheduler;
    use proptest::prelude::*;
    use std::time::{Duration, Instant};

    fn new_game() -> GameState {
        GameState::new(Arena::new(640, 480, 20))
    }

    fn assert_initial_layout(game: &GameState) {
        assert_eq!(game.body(Player::A), &[Cell::new(160, 240)]);
        assert_eq!(game.body(Player::B), &[Cell::new(480, 240)]);
        assert!(game.trail(Player::A).is_empty());
        assert!(game.trail(Player::B).is_empty());
        assert_eq!(game.direction(Player::A), Right);
        assert_eq!(game.direction(Player::B), Left);
    }

    #[test]
    fn starts_in_initial_layout() {
        let game = new_game();
        assert_initial_layout(&game);
        assert_eq!((game.score(Player::A), game.score(Player::B)), (0, 0));
        assert!(!game.is_paused());
    }

    #[test]
    fn one_tick_moves_both_players() {
        let mut game = new_game();
        assert_eq!(game.advance(), TickOutcome::Moved);

        assert_eq!(game.body(Player::A), &[Cell::new(160, 240), Cell::new(180, 240)]);
        assert_eq!(game.body(Player::B), &[Cell::new(480, 240), Cell::new(460, 240)]);
        assert_eq!(game.trail(Player::A), &[(Cell::new(160, 240), Cell::new(180, 240))]);
        assert_eq!(game.trail(Player::B), &[(Cell::new(480, 240), Cell::new(460, 240))]);
        assert_eq!((game.score(Player::A), game.score(Player::B)), (0, 0));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut game = new_game();
        game.change_direction(Player::A, Left);
        assert_eq!(game.direction(Player::A), Right);
        game.change_direction(Player::A, Up);
        assert_eq!(game.direction(Player::A), Up);
    }

    #[test]
    fn boundary_crash_scores_for_opponent() {
        let mut game = new_game();
        game.change_direction(Player::A, Up);

        // A needs 12 ticks to reach y = 0.
        for _ in 0..12 {
            assert_eq!(game.advance(), TickOutcome::Moved);
        }
        assert_eq!(game.body(Player::A).last(), Some(&Cell::new(160, 0)));

        let outcome = game.advance();
        assert_eq!(outcome, TickOutcome::Crashed { loser: Player::A, cause: Crash::Boundary });
        assert_eq!((game.score(Player::A), game.score(Player::B)), (0, 1));
        assert_initial_layout(&game);
    }

    #[test]
    fn boundary_crash_on_far_edges() {
        let mut game = new_game();
        game.change_direction(Player::B, Down);

        // B needs 11 ticks to reach y = 460, the last row.
        for _ in 0..11 {
            assert_eq!(game.advance(), TickOutcome::Moved);
        }
        assert_eq!(game.body(Player::B).last(), Some(&Cell::new(480, 460)));

        let outcome = game.advance();
        assert_eq!(outcome, TickOutcome::Crashed { loser: Player::B, cause: Crash::Boundary });
        assert_eq!((game.score(Player::A), game.score(Player::B)), (1, 0));
    }

    #[test]
    fn self_crash_scores_for_opponent() {
        let mut game = new_game();
        game.advance();
        game.change_direction(Player::A, Up);
        game.advance();
        game.change_direction(Player::A, Left);
        game.advance();
        game.change_direction(Player::A, Down);

        let outcome = game.advance();
        assert_eq!(outcome, TickOutcome::Crashed { loser: Player::A, cause: Crash::OwnTrail });
        assert_eq!((game.score(Player::A), game.score(Player::B)), (0, 1));
        assert_initial_layout(&game);
    }

    #[test]
    fn head_on_favours_first_mover() {
        let mut game = new_game();
        // After 7 ticks A is at 300 and B at 340. On the 8th, A takes 320
        // first and B runs into it.
        for _ in 0..7 {
            assert_eq!(game.advance(), TickOutcome::Moved);
        }
        assert_eq!(game.body(Player::A).last(), Some(&Cell::new(300, 240)));
        assert_eq!(game.body(Player::B).last(), Some(&Cell::new(340, 240)));

        let outcome = game.advance();
        assert_eq!(
            outcome,
            TickOutcome::Crashed { loser: Player::B, cause: Crash::OpponentTrail }
        );
        assert_eq!((game.score(Player::A), game.score(Player::B)), (1, 0));
        assert_initial_layout(&game);
    }

    #[test]
    fn opponent_crash_scores_for_b() {
        let mut game = new_game();
        for _ in 0..7 {
            assert_eq!(game.advance(), TickOutcome::Moved);
        }
        game.change_direction(Player::B, Up);
        assert_eq!(game.advance(), TickOutcome::Moved);
        assert_eq!(game.body(Player::A).last(), Some(&Cell::new(320, 240)));
        assert_eq!(game.body(Player::B).last(), Some(&Cell::new(340, 220)));

        // A's next cell (340, 240) is part of B's trail.
        let outcome = game.advance();
        assert_eq!(
            outcome,
            TickOutcome::Crashed { loser: Player::A, cause: Crash::OpponentTrail }
        );
        assert_eq!((game.score(Player::A), game.score(Player::B)), (0, 1));
        assert_initial_layout(&game);
    }

    #[test]
    fn side_edges_are_walls() {
        let mut game = new_game();
        game.change_direction(Player::A, Up);
        game.advance();
        game.change_direction(Player::A, Left);
        for _ in 0..8 {
            assert_eq!(game.advance(), TickOutcome::Moved);
        }
        assert_eq!(game.body(Player::A).last(), Some(&Cell::new(0, 220)));
        assert_eq!(
            game.advance(),
            TickOutcome::Crashed { loser: Player::A, cause: Crash::Boundary }
        );
        assert_eq!((game.score(Player::A), game.score(Player::B)), (0, 1));
        assert_initial_layout(&game);

        let mut game = new_game();
        game.change_direction(Player::B, Up);
        game.advance();
        game.change_direction(Player::B, Right);
        for _ in 0..7 {
            assert_eq!(game.advance(), TickOutcome::Moved);
        }
        assert_eq!(game.body(Player::B).last(), Some(&Cell::new(620, 220)));
        assert_eq!(
            game.advance(),
            TickOutcome::Crashed { loser: Player::B, cause: Crash::Boundary }
        );
        assert_eq!((game.score(Player::A), game.score(Player::B)), (1, 0));
    }

    #[test]
    fn crash_skips_second_move() {
        let mut game = new_game();
        game.change_direction(Player::A, Up);
        for _ in 0..12 {
            game.advance();
        }
        game.advance();
        // B did not move after the reset in the crashing tick.
        assert_eq!(game.body(Player::B), &[Cell::new(480, 240)]);
    }

    #[test]
    fn scores_accumulate_across_rounds() {
        let mut game = new_game();
        for _ in 0..3 {
            game.change_direction(Player::A, Up);
            while let TickOutcome::Moved = game.advance() {}
        }
        assert_eq!((game.score(Player::A), game.score(Player::B)), (0, 3));
    }

    #[test]
    fn pause_freezes_everything() {
        let mut game = new_game();
        game.advance();
        game.toggle_pause();
        assert!(game.is_paused());

        let before = game.clone();
        for _ in 0..50 {
            assert_eq!(game.advance(), TickOutcome::Paused);
        }
        assert_eq!(game.racers, before.racers);
        assert_eq!(game.scores, before.scores);

        game.toggle_pause();
        assert!(!game.is_paused());
        assert_eq!(game.advance(), TickOutcome::Moved);
    }

    #[test]
    fn direction_change_while_paused_applies_after_resume() {
        let mut game = new_game();
        game.toggle_pause();
        game.change_direction(Player::A, Down);
        game.advance();
        assert_eq!(game.body(Player::A).len(), 1);

        game.toggle_pause();
        game.advance();
        assert_eq!(game.body(Player::A).last(), Some(&Cell::new(160, 260)));
    }

    #[test]
    fn reset_keeps_scores_and_pause() {
        let mut game = new_game();
        game.scores = [4, 2];
        game.advance();
        game.change_direction(Player::A, Down);
        game.toggle_pause();

        game.reset();
        assert_initial_layout(&game);
        assert_eq!(game.scores, [4, 2]);
        assert!(game.is_paused());
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut game = new_game();
        game.advance();
        let snap = game.snapshot();
        assert_eq!(snap.bodies[0], game.body(Player::A));
        assert_eq!(snap.bodies[1], game.body(Player::B));
        assert_eq!(snap.trails[0].len(), 1);
        assert_eq!(snap.scores, [0, 0]);
        assert!(!snap.paused);
    }

    #[test]
    fn scheduler_steps_game() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new(Duration::from_millis(100), t0);
        let mut game = new_game();

        assert_eq!(scheduler.poll(t0 + Duration::from_millis(40), &mut game), None);
        assert_eq!(game.body(Player::A).len(), 1);
        assert_eq!(
            scheduler.poll(t0 + Duration::from_millis(110), &mut game),
            Some(TickOutcome::Moved)
        );
        assert_eq!(game.body(Player::A), &[Cell::new(160, 240), Cell::new(180, 240)]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Turn(Player, Direction),
        Pause,
        Tick,
    }

    fn op() -> impl Strategy<Value = Op> {
        let player = prop_oneof![Just(Player::A), Just(Player::B)];
        let dir = prop_oneof![Just(Up), Just(Down), Just(Left), Just(Right)];
        prop_oneof![
            2 => (player, dir).prop_map(|(p, d)| Op::Turn(p, d)),
            1 => Just(Op::Pause),
            6 => Just(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_over_random_play(ops in proptest::collection::vec(op(), 0..400)) {
            let mut game = new_game();
            let arena = *game.arena();
            let mut crashes = 0u32;

            for op in ops {
                match op {
                    Op::Turn(p, d) => game.change_direction(p, d),
                    Op::Pause => game.toggle_pause(),
                    Op::Tick => {
                        if let TickOutcome::Crashed { .. } = game.advance() {
                            crashes += 1;
                        }
                        prop_assert_eq!(game.body(Player::A).len(), game.body(Player::B).len());
                    }
                }

                for &p in Player::ALL.iter() {
                    prop_assert_eq!(game.trail(p).len() + 1, game.body(p).len());
                    for &cell in game.body(p) {
                        prop_assert!(arena.contains(cell));
                        prop_assert!(arena.is_aligned(cell));
                    }
                }
            }

            prop_assert_eq!(game.score(Player::A) + game.score(Player::B), crashes);
        }
    }
}
