//! Cooperative timers and the background ticker that drives them.
//!
//! Timers never call into controls from another thread. A [Ticker] thread only
//! posts [SystemEvent::Tick] into a window's queue; the window then fires due
//! timers from [TimerQueue] on the UI thread as [InternalEvent::Timer](crate::event::InternalEvent::Timer).

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Sender};
use wui_theme::error::{Error, Result};

use crate::control::ControlId;
use crate::event::{Event, SystemEvent};
use crate::window::Poster;

/// Identifies a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Generate a new unique timer ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    owner: ControlId,
    interval: Duration,
    due: Instant,
}

/// Repeating timers owned by controls, polled on the UI thread.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
}

impl TimerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating timer for `owner` that first fires at `now + interval`.
    pub fn start(&mut self, owner: ControlId, interval: Duration, now: Instant) -> TimerId {
        let id = TimerId::new();
        self.insert(id, owner, interval, now);
        id
    }

    /// Start a timer under a preallocated ID, replacing a timer with the same ID.
    pub fn insert(&mut self, id: TimerId, owner: ControlId, interval: Duration, now: Instant) {
        self.entries.retain(|entry| entry.id != id);
        self.entries.push(Entry {
            id,
            owner,
            interval,
            due: now + interval,
        });
    }

    /// Stop a timer. Returns whether it was running.
    pub fn stop(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Stop every timer of `owner`.
    pub fn stop_owned_by(&mut self, owner: ControlId) {
        self.entries.retain(|entry| entry.owner != owner);
    }

    /// Whether the timer is running.
    pub fn is_running(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Number of running timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timer is running.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timers due at `now`, in start order. Each one is rescheduled to `now + interval`.
    pub fn due(&mut self, now: Instant) -> Vec<(TimerId, ControlId)> {
        let mut fired = Vec::new();
        for entry in &mut self.entries {
            if entry.due <= now {
                entry.due = now + entry.interval;
                fired.push((entry.id, entry.owner));
            }
        }
        fired
    }
}

/// A background thread that posts [SystemEvent::Tick] at a fixed interval.
#[derive(Default)]
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Create a stopped ticker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the thread is running.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start posting ticks to `poster` every `interval`.
    pub fn start(&mut self, poster: Poster, interval: Duration) -> Result<()> {
        if self.handle.is_some() {
            return Err(Error::already_started("ticker", "ticker thread is already running"));
        }

        let (stop_tx, stop_rx) = channel::bounded::<()>(0);
        let ticks = channel::tick(interval);

        let handle = std::thread::Builder::new()
            .name("wui-ticker".to_string())
            .spawn(move || loop {
                channel::select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticks) -> tick => {
                        let Ok(now) = tick else { break };
                        if poster.post(Event::System(SystemEvent::Tick(now))).is_err() {
                            log::debug!("ticker stopped: window is gone");
                            break;
                        }
                    },
                }
            })
            .map_err(|e| Error::system_error("ticker", e.to_string()))?;

        log::debug!("ticker started ({:?})", interval);
        self.stop = Some(stop_tx);
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the stop channel and wakes the thread.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("ticker thread panicked");
            }
            log::debug!("ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
