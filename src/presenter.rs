use crate::board::{Player, Position};
use crate::controller::GameStatus;
use crate::win::WinningLine;

/// The UI collaborator the engine reports state changes to
///
/// The engine never touches presentation state itself; everything a screen
/// needs arrives through these callbacks or through
/// [`TurnController::snapshot`](crate::TurnController::snapshot). Every
/// method defaults to doing nothing, so `()` is a valid (silent) presenter.
pub trait Presenter {
    /// A disc landed at `at`
    fn on_disc_placed(&mut self, _at: Position, _player: Player) {}

    /// `player` is now to move, with a fresh countdown
    fn on_turn_changed(&mut self, _player: Player, _time_remaining: u32) {}

    /// One second of the current turn went by
    fn on_tick(&mut self, _time_remaining: u32) {}

    /// Raised right before [`Presenter::on_game_ended`] when a run completes
    fn on_four_in_row(&mut self, _line: &WinningLine) {}

    /// The game reached a terminal status
    fn on_game_ended(&mut self, _status: GameStatus) {}

    /// Every disc was removed, by a restart or by abandoning the game
    fn on_board_cleared(&mut self) {}
}

impl Presenter for () {}
