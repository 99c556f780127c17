//! Change notifications for the shared profile slot.
//!
//! Two independent triggers feed a single callback: storage events from
//! other contexts, and a fixed-cadence poll for writes made in this context
//! (which never produce a storage event here). Neither trigger diffs; the
//! consumer re-reads and decides whether anything changed.

use crate::storage::{KeyValueStore, ListenerId, StorageEvent};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTrigger {
    CrossContext,
    Poll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeOptions {
    pub cross_context: bool,
    /// `None` disables the same-context poll.
    pub poll_interval: Option<Duration>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            cross_context: true,
            poll_interval: Some(DEFAULT_POLL_INTERVAL),
        }
    }
}

impl BridgeOptions {
    /// Only storage events, no polling.
    pub fn events_only() -> Self {
        Self {
            cross_context: true,
            poll_interval: None,
        }
    }

    /// Only polling, no storage events.
    pub fn polling_only(interval: Duration) -> Self {
        Self {
            cross_context: false,
            poll_interval: Some(interval),
        }
    }

    pub fn disabled() -> Self {
        Self {
            cross_context: false,
            poll_interval: None,
        }
    }
}

/// Repeating timer running on its own thread. Dropping it cancels the timer
/// and waits for the thread, so no tick runs after `drop` returns.
pub struct IntervalTimer {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTimer {
    pub fn start<F>(interval: Duration, tick: F) -> io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("profile-poll".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            // A tick callback dropping its own timer must not join itself.
            if handle.thread().id() != std::thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

/// Subscription source for one storage key.
pub struct ChangeBridge {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    options: BridgeOptions,
}

impl ChangeBridge {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>, options: BridgeOptions) -> Self {
        Self {
            storage,
            key: key.into(),
            options,
        }
    }

    pub fn options(&self) -> BridgeOptions {
        self.options
    }

    /// Wire both triggers to `on_change`. Everything is released when the
    /// returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(ChangeTrigger) + Send + Sync + 'static,
    {
        let on_change = Arc::new(on_change);

        let listener = if self.options.cross_context {
            let key = self.key.clone();
            let cb = Arc::clone(&on_change);
            Some(self.storage.add_listener(Arc::new(move |event: &StorageEvent| {
                if event.key == key {
                    cb(ChangeTrigger::CrossContext);
                }
            })))
        } else {
            None
        };

        let timer = self.options.poll_interval.and_then(|interval| {
            let cb = Arc::clone(&on_change);
            match IntervalTimer::start(interval, move || cb(ChangeTrigger::Poll)) {
                Ok(timer) => Some(timer),
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "could not start profile poll timer");
                    None
                }
            }
        });

        Subscription {
            storage: Arc::clone(&self.storage),
            listener,
            timer,
        }
    }
}

/// Live subscription created by [`ChangeBridge::subscribe`].
pub struct Subscription {
    storage: Arc<dyn KeyValueStore>,
    listener: Option<ListenerId>,
    timer: Option<IntervalTimer>,
}

impl Subscription {
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_some()
    }

    /// Release the listener and stop the timer.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(id) = self.listener.take() {
            self.storage.remove_listener(id);
        }
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}
