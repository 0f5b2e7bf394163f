//! Turning user input into engine operations

use crate::clock::Scheduler;
use crate::controller::{DropOutcome, TurnController};
use crate::error::MoveError;
use crate::presenter::Presenter;
use crate::WIDTH;

/// Something a user asked for
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Action {
    /// Drop a disc into a one-indexed column
    Drop(usize),
    Restart,
    /// Leave the game for the menu
    Menu,
    Quit,
}

impl Action {
    /// A drop into `column`, which must be between 1 and `WIDTH`
    pub fn column(column: usize) -> Result<Self, MoveError> {
        if (1..=WIDTH).contains(&column) {
            Ok(Action::Drop(column))
        } else {
            Err(MoveError::InvalidColumn(column))
        }
    }

    /// Maps a key press to an action: column digits drop a disc, `r`
    /// restarts, `m` goes back to the menu and `q` quits
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'r' => Some(Action::Restart),
            'm' => Some(Action::Menu),
            'q' => Some(Action::Quit),
            digit => digit
                .to_digit(10)
                .and_then(|column| Action::column(column as usize).ok()),
        }
    }
}

impl<P: Presenter, S: Scheduler> TurnController<P, S> {
    /// Forwards an action to the matching operation
    ///
    /// Only drops produce an outcome. Leaving for the menu and quitting both
    /// abandon the game; what happens next is up to the host.
    pub fn dispatch(&mut self, action: Action) -> Option<DropOutcome> {
        match action {
            Action::Drop(column) => Some(self.drop_disc(column)),
            Action::Restart => {
                self.restart();
                None
            }
            Action::Menu | Action::Quit => {
                self.stop();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimerQueue;
    use crate::config::GameConfig;
    use crate::controller::GameStatus;

    #[test]
    fn test_from_key() {
        assert_eq!(Action::from_key('1'), Some(Action::Drop(1)));
        assert_eq!(Action::from_key('7'), Some(Action::Drop(7)));
        assert_eq!(Action::from_key('0'), None);
        assert_eq!(Action::from_key('8'), None);
        assert_eq!(Action::from_key('R'), Some(Action::Restart));
        assert_eq!(Action::from_key('m'), Some(Action::Menu));
        assert_eq!(Action::from_key('q'), Some(Action::Quit));
        assert_eq!(Action::from_key('x'), None);
    }

    #[test]
    fn test_column_validation() {
        assert_eq!(Action::column(3), Ok(Action::Drop(3)));
        assert_eq!(Action::column(0), Err(MoveError::InvalidColumn(0)));
        assert_eq!(
            Action::column(WIDTH + 1),
            Err(MoveError::InvalidColumn(WIDTH + 1))
        );
    }

    #[test]
    fn test_dispatch() {
        let mut controller = TurnController::new(GameConfig::default(), (), TimerQueue::new());

        let outcome = controller.dispatch(Action::Drop(3)).unwrap();
        assert!(outcome.placed_at.is_some());

        assert_eq!(controller.dispatch(Action::Menu), None);
        assert!(!controller.is_active());
        assert!(controller.board().is_empty());

        assert_eq!(controller.dispatch(Action::Restart), None);
        assert!(controller.is_active());
        assert_eq!(controller.status(), GameStatus::InProgress);
    }
}
