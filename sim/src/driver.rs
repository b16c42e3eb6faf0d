//! Fixed-rate tick driver.
//!
//! Each simulated object runs on its own tokio task. The task owns the
//! object; external events reach it through an unbounded inbox, so an event
//! and a tick of the same object never interleave. Ticks of different
//! objects run independently.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{trace, warn};

use crate::error::{SimError, SimResult};

/// Default tick period (20 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Shortest period a driver ticks at; shorter periods are raised to it.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Whether a driver keeps running after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

/// Why a driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The object returned [`TickFlow::Stop`].
    Finished,
    /// The handle cancelled the driver or was dropped.
    Cancelled,
    /// The object reported itself invalid before a tick or an event.
    Invalid,
}

/// An object driven by a [`TickHandle`].
pub trait Simulated: Send + 'static {
    /// External state change delivered through the inbox.
    type Event: Send + 'static;

    /// Applies an external event.
    fn on_event(&mut self, event: Self::Event) -> TickFlow;

    /// Advances the object by one tick.
    fn on_tick(&mut self) -> TickFlow;

    /// Checked before every [`on_tick`](Self::on_tick) and
    /// [`on_event`](Self::on_event).
    fn is_valid(&self) -> bool {
        true
    }

    /// Called once after the driver stops, with every event that arrived
    /// but was never delivered.
    fn on_stop(&mut self, reason: StopReason, leftovers: Vec<Self::Event>) {
        let _ = (reason, leftovers);
    }
}

/// Handle to a running driver.
///
/// Dropping the handle stops the driver.
#[derive(Debug)]
pub struct TickHandle<E> {
    inbox: mpsc::UnboundedSender<E>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl<E: Send + 'static> TickHandle<E> {
    /// Delivers `event` to the object.
    ///
    /// Returns [`SimError::DriverClosed`] once the driver has stopped; the
    /// event is dropped.
    pub fn send(&self, event: E) -> SimResult<()> {
        self.inbox.send(event).map_err(|_| SimError::DriverClosed)
    }

    /// Stops the driver. Cancelling a stopped driver does nothing.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Returns `true` once the driver no longer accepts events.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }

    /// Returns `true` once the driver task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the driver to stop on its own.
    pub async fn join(self) {
        let Self {
            inbox,
            cancel,
            task,
        } = self;
        if let Err(err) = task.await {
            warn!(error = %err, "tick driver task failed");
        }
        drop((inbox, cancel));
    }
}

/// Starts driving `object`, ticking every `period`.
///
/// The first tick fires one period after spawning. Periods shorter than
/// [`MIN_TICK_INTERVAL`] are raised to it.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn spawn<S: Simulated>(object: S, period: Duration) -> TickHandle<S::Event> {
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let task = tokio::spawn(run(object, period, inbox_rx, cancel_rx));
    TickHandle {
        inbox: inbox_tx,
        cancel: cancel_tx,
        task,
    }
}

async fn run<S: Simulated>(
    mut object: S,
    period: Duration,
    mut inbox: mpsc::UnboundedReceiver<S::Event>,
    mut cancel: watch::Receiver<bool>,
) {
    let period = period.max(MIN_TICK_INTERVAL);
    let mut ticker = time::interval_at(Instant::now() + period, period);
    let mut ticks = 0u64;
    let mut undelivered = None;
    let reason = loop {
        tokio::select! {
            biased;

            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break StopReason::Cancelled;
                }
            }
            event = inbox.recv() => {
                let Some(event) = event else {
                    break StopReason::Cancelled;
                };
                if !object.is_valid() {
                    undelivered = Some(event);
                    break StopReason::Invalid;
                }
                if object.on_event(event) == TickFlow::Stop {
                    break StopReason::Finished;
                }
            }
            _ = ticker.tick() => {
                if !object.is_valid() {
                    break StopReason::Invalid;
                }
                ticks += 1;
                trace!(ticks, "tick");
                if object.on_tick() == TickFlow::Stop {
                    break StopReason::Finished;
                }
            }
        }
    };

    inbox.close();
    let mut leftovers: Vec<S::Event> = undelivered.into_iter().collect();
    while let Ok(event) = inbox.try_recv() {
        leftovers.push(event);
    }
    trace!(?reason, ticks, leftovers = leftovers.len(), "tick driver stopped");
    object.on_stop(reason, leftovers);
}
