//! A two-player 'Connect 4' game engine
//!
//! The engine owns the board, the four-in-a-row rule and a per-turn
//! countdown. It is driven by a host that forwards user actions and timer
//! callbacks, and it reports every change to a [`Presenter`].
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::{GameConfig, GameStatus, Player, TimerQueue, TurnController};
//!
//! let mut game = TurnController::new(GameConfig::default(), (), TimerQueue::new());
//!
//! // Player 1 stacks column 4, Player 2 answers in column 5
//! for column in [4, 5, 4, 5, 4, 5].iter().copied() {
//!     game.drop_disc(column);
//! }
//! let outcome = game.drop_disc(4);
//!
//! assert_eq!(outcome.status, GameStatus::Won(Player::One));
//! ```

use static_assertions::*;

pub mod board;

pub mod win;

pub mod clock;

pub mod presenter;

pub mod controller;

pub mod dispatch;

pub mod config;

pub mod error;


pub use board::{Board, Cell, Player, Position};
pub use clock::{Scheduler, TimerEvent, TimerId, TimerKind, TimerQueue};
pub use config::{AppConfig, GameConfig, LogConfig};
pub use controller::{DropOutcome, GameStatus, Snapshot, TurnController};
pub use dispatch::Action;
pub use error::{ConfigError, MoveError};
pub use presenter::Presenter;
pub use win::{Axis, WinDetector, WinningLine};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// Seconds a player has to move unless configured otherwise
pub const DEFAULT_TIME_PER_TURN: u32 = 15;

// a run of four must fit along every axis
const_assert!(WIDTH >= win::CONNECT && HEIGHT >= win::CONNECT);
// columns are chosen with a single digit key
const_assert!(WIDTH <= 9);
