//! The turn and timer state machine of a game session

use log::{debug, info, trace};

use crate::board::{Board, Player, Position};
use crate::clock::{Scheduler, TimerEvent, TimerId, TimerKind};
use crate::config::GameConfig;
use crate::error::MoveError;
use crate::presenter::Presenter;
use crate::win::{WinDetector, WinningLine};

/// Where a game stands
///
/// Every status other than `InProgress` is terminal until the session is
/// restarted.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Tied,
    /// The player who ran out of time
    TimedOut(Player),
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The winner, if there is one: the player who connected four, or the
    /// opponent of the player who ran out of time
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(*player),
            GameStatus::TimedOut(loser) => Some(loser.other()),
            GameStatus::InProgress | GameStatus::Tied => None,
        }
    }
}

/// The result of a drop request
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DropOutcome {
    /// Where the disc landed, `None` if the request was ignored
    pub placed_at: Option<Position>,
    pub status: GameStatus,
    /// The player to move after this request
    pub current_player: Player,
    /// Why the request was ignored
    pub rejected: Option<MoveError>,
}

/// Everything a UI needs to draw the session from scratch
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Snapshot {
    pub board: Board,
    pub current_player: Player,
    pub status: GameStatus,
    pub time_remaining: u32,
    /// Whether the session has started (and not been stopped)
    pub active: bool,
    pub winning_line: Option<WinningLine>,
}

/// Drives one game session
///
/// The controller owns the board, whose turn it is and the game status;
/// it is the only caller of [`Board::place`]. Every operation takes
/// `&mut self` and returns immediately, so drops, timer callbacks and
/// restarts are applied strictly one at a time, and a drop checks the status
/// and places its disc without anything slipping in between. A host that
/// shares a controller between threads wraps the whole controller in a single
/// `Mutex`.
///
/// Anomalous input (full or unknown columns, drops after the game ended,
/// stale timer callbacks) is ignored rather than reported as an error.
pub struct TurnController<P, S> {
    board: Board,
    detector: WinDetector,
    presenter: P,
    scheduler: S,
    config: GameConfig,
    current_player: Player,
    status: GameStatus,
    time_remaining: u32,
    active: bool,
    // the armed countdown, if any
    timer: Option<TimerId>,
    last_timer: TimerId,
    winning_line: Option<WinningLine>,
}

impl<P: Presenter, S: Scheduler> TurnController<P, S> {
    /// Creates an idle session: an empty board, Player 1 to move and no
    /// countdown running until the session starts
    pub fn new(config: GameConfig, presenter: P, scheduler: S) -> Self {
        Self {
            board: Board::new(),
            detector: WinDetector::new(),
            presenter,
            scheduler,
            time_remaining: config.time_per_turn,
            config,
            current_player: Player::One,
            status: GameStatus::InProgress,
            active: false,
            timer: None,
            last_timer: TimerId::new(0),
            winning_line: None,
        }
    }

    /// Drops a disc for the current player into `column` (one-indexed)
    ///
    /// Ignored when the game is over, the column does not exist or the column
    /// is full. Dropping into an idle session starts it.
    pub fn drop_disc(&mut self, column: usize) -> DropOutcome {
        if self.status.is_terminal() {
            return self.rejected(MoveError::GameOver);
        }

        let player = self.current_player;
        let position = match self.board.place(column, player) {
            Ok(position) => position,
            Err(err) => return self.rejected(err),
        };
        debug!("{} dropped a disc at {}", player, position);

        if !self.active {
            info!("game started");
            self.active = true;
        }
        self.presenter.on_disc_placed(position, player);

        if let Some(line) = self.detector.check_four_in_row(&self.board, position, player) {
            self.presenter.on_four_in_row(&line);
            self.winning_line = Some(line);
            self.end_game(GameStatus::Won(player));
        } else if self.board.is_full() {
            self.end_game(GameStatus::Tied);
        } else {
            self.current_player = player.other();
            self.start_countdown();
            debug!("{}'s turn", self.current_player);
            self.presenter
                .on_turn_changed(self.current_player, self.time_remaining);
        }

        DropOutcome {
            placed_at: Some(position),
            status: self.status,
            current_player: self.current_player,
            rejected: None,
        }
    }

    /// Routes a scheduler callback, ignoring any that belong to a countdown
    /// which has since been cancelled
    pub fn on_timer(&mut self, event: TimerEvent) {
        if self.timer != Some(event.id) {
            trace!("ignoring stale {:?} for {:?}", event.kind, event.id);
            return;
        }
        match event.kind {
            TimerKind::Tick => self.on_tick(),
            TimerKind::Deadline => self.on_turn_timer_expired(),
        }
    }

    /// The current player failed to move in time and loses
    ///
    /// Ignored once the game is over.
    pub fn on_turn_timer_expired(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.time_remaining = 0;
        self.end_game(GameStatus::TimedOut(self.current_player));
    }

    /// Clears the board and starts a new game with Player 1 to move
    pub fn restart(&mut self) {
        // an untouched board has nothing to reset
        if !self.board.is_empty() || self.status.is_terminal() {
            self.reset();
        }
        info!("game restarted");
        self.start();
    }

    /// Starts the session and the current player's countdown
    pub fn start(&mut self) {
        self.active = true;
        self.start_countdown();
        self.presenter
            .on_turn_changed(self.current_player, self.time_remaining);
    }

    /// Abandons the session without declaring a winner
    ///
    /// The countdown is cancelled before this returns and the board is
    /// cleared; the next drop starts a fresh game.
    pub fn stop(&mut self) {
        if self.active {
            info!("game stopped");
        }
        self.reset();
        self.active = false;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            current_player: self.current_player,
            status: self.status,
            time_remaining: self.time_remaining,
            active: self.active,
            winning_line: self.winning_line.clone(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn on_tick(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        trace!("{}s left for {}", self.time_remaining, self.current_player);
        self.presenter.on_tick(self.time_remaining);

        if self.time_remaining == 0 {
            self.on_turn_timer_expired();
        }
    }

    fn rejected(&self, err: MoveError) -> DropOutcome {
        debug!("ignoring drop: {}", err);
        DropOutcome {
            placed_at: None,
            status: self.status,
            current_player: self.current_player,
            rejected: Some(err),
        }
    }

    fn end_game(&mut self, status: GameStatus) {
        self.cancel_countdown();
        self.status = status;
        match status.winner() {
            Some(winner) => info!("game over, {} wins ({:?})", winner, status),
            None => info!("game over, tie"),
        }
        self.presenter.on_game_ended(status);
    }

    fn start_countdown(&mut self) {
        self.cancel_countdown();

        let id = self.last_timer.next();
        self.last_timer = id;
        self.timer = Some(id);
        self.time_remaining = self.config.time_per_turn;

        self.scheduler.every_second(id);
        self.scheduler.after_seconds(id, self.config.time_per_turn);
    }

    fn cancel_countdown(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn reset(&mut self) {
        self.cancel_countdown();
        self.board.clear();
        self.current_player = Player::One;
        self.status = GameStatus::InProgress;
        self.time_remaining = self.config.time_per_turn;
        self.winning_line = None;
        self.presenter.on_board_cleared();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimerQueue;
    use crate::{HEIGHT, WIDTH};

    fn controller() -> TurnController<(), TimerQueue> {
        TurnController::new(GameConfig::default(), (), TimerQueue::new())
    }

    #[test]
    fn test_new_session_is_idle() {
        let controller = controller();
        let snapshot = controller.snapshot();

        assert!(!snapshot.active);
        assert_eq!(snapshot.status, GameStatus::InProgress);
        assert_eq!(snapshot.current_player, Player::One);
        assert_eq!(snapshot.time_remaining, 15);
        assert!(snapshot.board.is_empty());
        assert_eq!(controller.scheduler().pending(), 0);
    }

    #[test]
    fn test_first_drop_starts_the_session() {
        let mut controller = controller();
        let outcome = controller.drop_disc(4);

        assert_eq!(outcome.placed_at, Some(Position::new(4, HEIGHT)));
        assert_eq!(outcome.current_player, Player::Two);
        assert!(controller.is_active());
        // tick and deadline for Player 2
        assert_eq!(controller.scheduler().pending(), 2);
    }

    #[test]
    fn test_invalid_and_full_columns_are_ignored() {
        let mut controller = controller();
        for _ in 0..HEIGHT {
            controller.drop_disc(1);
        }
        let before = controller.snapshot();

        let outcome = controller.drop_disc(1);
        assert_eq!(outcome.placed_at, None);
        assert_eq!(outcome.rejected, Some(MoveError::ColumnFull(1)));

        let outcome = controller.drop_disc(WIDTH + 1);
        assert_eq!(outcome.rejected, Some(MoveError::InvalidColumn(WIDTH + 1)));

        let outcome = controller.drop_disc(0);
        assert_eq!(outcome.rejected, Some(MoveError::InvalidColumn(0)));

        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn test_status_winner() {
        assert_eq!(GameStatus::Won(Player::Two).winner(), Some(Player::Two));
        assert_eq!(GameStatus::TimedOut(Player::One).winner(), Some(Player::Two));
        assert_eq!(GameStatus::Tied.winner(), None);
        assert_eq!(GameStatus::InProgress.winner(), None);
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::Tied.is_terminal());
    }

    #[test]
    fn test_expiry_on_a_fresh_session() {
        let mut controller = controller();
        controller.on_turn_timer_expired();

        assert_eq!(controller.status(), GameStatus::TimedOut(Player::One));
        assert_eq!(controller.time_remaining(), 0);
        assert_eq!(controller.drop_disc(1).rejected, Some(MoveError::GameOver));
    }

    #[test]
    fn test_stale_timer_event_is_ignored() {
        let mut controller = controller();
        controller.start();
        controller.drop_disc(1);

        // the first countdown was replaced by the drop
        controller.on_timer(TimerEvent {
            id: TimerId::new(1),
            kind: TimerKind::Deadline,
        });
        assert_eq!(controller.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_stop_cancels_the_countdown() {
        let mut controller = controller();
        controller.restart();
        controller.drop_disc(2);
        controller.stop();

        assert_eq!(controller.scheduler().pending(), 0);
        let snapshot = controller.snapshot();
        assert!(!snapshot.active);
        assert!(snapshot.board.is_empty());
        assert_eq!(snapshot.status, GameStatus::InProgress);
        assert_eq!(snapshot.current_player, Player::One);
    }
}
