use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEvent},
    style::{style, Attribute, Color, Print, PrintStyledContent},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    ExecutableCommand, QueueableCommand,
};
use log::Level;

use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

use connect4_engine::{
    Action, GameConfig, GameStatus, Player, Position, Presenter, Snapshot, TimerQueue,
    TurnController, WinningLine, HEIGHT, WIDTH,
};

use crate::logger::{self, LogEntry};

// upper bound on how long input polling may block between clock updates
const IDLE_POLL: Duration = Duration::from_millis(250);
const LOG_LINES: usize = 6;

// screen rows
const BOARD_TOP: u16 = 3;
const STATUS_ROW: u16 = BOARD_TOP + HEIGHT as u16 + 1;
const LOG_TOP: u16 = STATUS_ROW + 3;

type Game = TurnController<TerminalPresenter, TimerQueue>;

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

/// Draws the session with crossterm whenever the engine reports a change
pub struct TerminalPresenter {
    message: String,
    notice: Option<String>,
    highlight: Vec<Position>,
    logs: Vec<LogEntry>,
    dirty: bool,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            message: String::from("Drop a disc to start the game"),
            notice: None,
            highlight: Vec::new(),
            logs: Vec::new(),
            dirty: true,
        }
    }

    /// Shows a one-off message, such as why a key press did nothing
    pub fn notice(&mut self, notice: String) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    fn collect_logs(&mut self) {
        let new_logs = logger::collect_logs();
        if !new_logs.is_empty() {
            self.logs.extend(new_logs);
            let excess = self.logs.len().saturating_sub(LOG_LINES);
            self.logs.drain(..excess);
            self.dirty = true;
        }
    }

    fn draw(
        &mut self,
        stdout: &mut Stdout,
        snapshot: &Snapshot,
        time_per_turn: u32,
    ) -> Result<()> {
        stdout
            .queue(Clear(ClearType::All))?
            .queue(MoveTo(0, 0))?
            .queue(PrintStyledContent(
                style("Connect 4").attribute(Attribute::Bold),
            ))?
            .queue(MoveTo(0, 1))?
            .queue(Print(format!(
                "Connect four discs in a row, column or diagonal. {}s per turn.",
                time_per_turn
            )))?;

        let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        stdout
            .queue(MoveTo(0, BOARD_TOP - 1))?
            .queue(PrintStyledContent(style(cols)))?;

        for (row, cells) in snapshot.board.rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let position = Position::new(col + 1, row + 1);
                let background = if self.highlight.contains(&position) {
                    Color::White
                } else {
                    Color::DarkBlue
                };
                stdout
                    .queue(MoveTo(col as u16, BOARD_TOP + row as u16))?
                    .queue(PrintStyledContent(
                        style("O")
                            .attribute(Attribute::Bold)
                            .on(background)
                            .with(cell.player().map_or(background, player_color)),
                    ))?;
            }
        }

        stdout.queue(MoveTo(0, STATUS_ROW))?;
        if snapshot.active && snapshot.status == GameStatus::InProgress {
            stdout.queue(PrintStyledContent(
                style(format!(
                    "{}'s turn, {}s left",
                    snapshot.current_player, snapshot.time_remaining
                ))
                .with(player_color(snapshot.current_player)),
            ))?;
        } else {
            stdout.queue(PrintStyledContent(
                style(self.message.as_str()).attribute(Attribute::Bold),
            ))?;
        }

        if let Some(notice) = &self.notice {
            stdout
                .queue(MoveTo(0, STATUS_ROW + 1))?
                .queue(Print(notice))?;
        }

        stdout
            .queue(MoveTo(0, STATUS_ROW + 2))?
            .queue(Print("1-7 drop a disc, r restart, m menu, q quit"))?;

        for (i, entry) in self.logs.iter().enumerate() {
            let color = match entry.level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Grey,
                Level::Debug => Color::Magenta,
                Level::Trace => Color::Blue,
            };
            stdout
                .queue(MoveTo(0, LOG_TOP + i as u16))?
                .queue(PrintStyledContent(style(entry.message.as_str()).with(color)))?;
        }

        stdout.flush()?;
        self.dirty = false;
        Ok(())
    }
}

impl Presenter for TerminalPresenter {
    fn on_disc_placed(&mut self, _at: Position, _player: Player) {
        self.notice = None;
        self.dirty = true;
    }

    fn on_turn_changed(&mut self, player: Player, _time_remaining: u32) {
        self.message = format!("{}'s turn", player);
        self.dirty = true;
    }

    fn on_tick(&mut self, _time_remaining: u32) {
        self.dirty = true;
    }

    fn on_four_in_row(&mut self, line: &WinningLine) {
        self.highlight = line.positions().collect();
    }

    fn on_game_ended(&mut self, status: GameStatus) {
        self.message = match status {
            GameStatus::Won(player) => format!("{} wins! Press r to play again", player),
            GameStatus::Tied => String::from("Tie! Press r to play again"),
            GameStatus::TimedOut(player) => format!(
                "Time over! {} wins. Press r to play again",
                player.other()
            ),
            GameStatus::InProgress => self.message.clone(),
        };
        self.dirty = true;
    }

    fn on_board_cleared(&mut self) {
        self.highlight.clear();
        self.notice = None;
        self.message = String::from("Drop a disc to start the game");
        self.dirty = true;
    }
}

/// Runs a two-player game in the terminal until the players quit
pub fn run(config: &GameConfig) -> Result<()> {
    let mut game = TurnController::new(
        config.clone(),
        TerminalPresenter::new(),
        TimerQueue::new(),
    );
    let mut stdout = stdout();

    enable_raw_mode()?;
    let _raw = RawModeGuard;
    stdout.execute(Hide)?;

    event_loop(&mut game, &mut stdout)
}

// leaves raw mode and shows the cursor again however `run` exits
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        restore(&mut stdout());
    }
}

// errors are ignored so every step gets a chance to run
fn restore<W: Write>(out: &mut W) {
    let _ = disable_raw_mode();
    let _ = out.queue(MoveTo(0, LOG_TOP + LOG_LINES as u16));
    let _ = out.queue(Show);
    let _ = out.flush();
}

fn event_loop(game: &mut Game, stdout: &mut Stdout) -> Result<()> {
    let mut last_update = Instant::now();

    loop {
        game.presenter_mut().collect_logs();
        if game.presenter().dirty {
            let snapshot = game.snapshot();
            let time_per_turn = game.config().time_per_turn;
            game.presenter_mut().draw(stdout, &snapshot, time_per_turn)?;
        }

        let timeout = game
            .scheduler()
            .next_due()
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));

        let ready = poll(timeout)?;

        // before any key is handled so a new countdown starts from now
        catch_up(game, &mut last_update, Instant::now());

        if ready {
            match read()? {
                Event::Key(KeyEvent { code, .. }) => {
                    let action = match code {
                        KeyCode::Char(key) => Action::from_key(key),
                        KeyCode::Esc => Some(Action::Quit),
                        _ => None,
                    };
                    match action {
                        Some(Action::Quit) => {
                            game.stop();
                            return Ok(());
                        }
                        Some(action) => {
                            let rejected = game.dispatch(action).and_then(|outcome| outcome.rejected);
                            if let Some(err) = rejected {
                                game.presenter_mut().notice(err.to_string());
                            }
                        }
                        None => {}
                    }
                }
                Event::Resize(..) => game.presenter_mut().dirty = true,
                _ => {}
            }
        }
    }
}

/// Feeds the wall-clock time since `last_update` into the turn countdown
fn catch_up(game: &mut Game, last_update: &mut Instant, now: Instant) {
    let events = game
        .scheduler_mut()
        .advance(now.saturating_duration_since(*last_update));
    *last_update = now;
    for event in events {
        game.on_timer(event);
    }
}
