//! The turn clock's scheduling capability
//!
//! The engine never sleeps or spawns threads. It asks a [`Scheduler`] for
//! callbacks and the host feeds the resulting [`TimerEvent`]s back through
//! [`TurnController::on_timer`](crate::TurnController::on_timer).

use std::time::Duration;

const SECOND: Duration = Duration::from_secs(1);

/// Identifies one arming of the turn countdown
///
/// A fresh id is minted on every turn change, so an event carrying an older
/// id is recognisably stale.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(generation: u64) -> Self {
        Self(generation)
    }

    /// The id armed after this one
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum TimerKind {
    /// Periodic, once per second
    Tick,
    /// One-shot, the end of the turn
    Deadline,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TimerEvent {
    pub id: TimerId,
    pub kind: TimerKind,
}

/// "Call back every second" and "call back after N seconds", both cancellable
pub trait Scheduler {
    /// Fire a [`TimerKind::Tick`] for `id` every second until cancelled
    fn every_second(&mut self, id: TimerId);

    /// Fire a single [`TimerKind::Deadline`] for `id`, `seconds` from now
    fn after_seconds(&mut self, id: TimerId, seconds: u32);

    /// Drop every pending callback for `id`
    ///
    /// Must take effect before returning: nothing scheduled under `id` may
    /// fire afterwards.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Copy, Clone, Debug)]
struct Armed {
    id: TimerId,
    kind: TimerKind,
    fires_at: Duration,
    period: Option<Duration>,
}

/// A deterministic [`Scheduler`] driven by elapsed time
///
/// Time only moves when [`TimerQueue::advance`] is called, so a host can feed
/// it wall-clock deltas and a test can feed it exact seconds.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    armed: Vec<Armed>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `elapsed`, returning every callback that
    /// came due, in firing order
    ///
    /// Callbacks due at the same instant fire ticks before deadlines, then in
    /// the order they were scheduled.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerEvent> {
        let target = self.now + elapsed;
        let mut fired = Vec::new();

        loop {
            let due = self
                .armed
                .iter()
                .enumerate()
                .filter(|(_, armed)| armed.fires_at <= target)
                .min_by_key(|(i, armed)| (armed.fires_at, armed.kind, *i))
                .map(|(i, _)| i);

            let i = match due {
                Some(i) => i,
                None => break,
            };

            let Armed { id, kind, period, .. } = self.armed[i];
            fired.push(TimerEvent { id, kind });
            match period {
                Some(period) => self.armed[i].fires_at += period,
                None => {
                    self.armed.remove(i);
                }
            }
        }

        self.now = target;
        fired
    }

    /// Time until the next callback fires, if any is pending
    pub fn next_due(&self) -> Option<Duration> {
        self.armed
            .iter()
            .map(|armed| armed.fires_at.saturating_sub(self.now))
            .min()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.armed.iter().any(|armed| armed.id == id)
    }

    /// The number of scheduled callbacks
    pub fn pending(&self) -> usize {
        self.armed.len()
    }
}

impl Scheduler for TimerQueue {
    fn every_second(&mut self, id: TimerId) {
        self.armed.push(Armed {
            id,
            kind: TimerKind::Tick,
            fires_at: self.now + SECOND,
            period: Some(SECOND),
        });
    }

    fn after_seconds(&mut self, id: TimerId, seconds: u32) {
        self.armed.push(Armed {
            id,
            kind: TimerKind::Deadline,
            fires_at: self.now + SECOND * seconds,
            period: None,
        });
    }

    fn cancel(&mut self, id: TimerId) {
        self.armed.retain(|armed| armed.id != id);
    }
}
