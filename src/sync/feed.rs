use super::bridge::{BridgeOptions, ChangeTrigger, Subscription};
use super::store::ProfileStore;
use crate::profile::record::ProfileRecord;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Called from the bridge threads to ask the UI for another frame.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Pending {
    dirty: AtomicBool,
    after_signal: AtomicBool,
    signals: AtomicU64,
    ticks: AtomicU64,
}

impl Pending {
    fn mark(&self, trigger: ChangeTrigger) {
        match trigger {
            ChangeTrigger::CrossContext => {
                self.signals.fetch_add(1, Ordering::Relaxed);
                self.after_signal.store(true, Ordering::SeqCst);
            }
            ChangeTrigger::Poll => {
                self.ticks.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.dirty.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub reads: u64,
    pub failures: u64,
    pub cross_context_signals: u64,
    pub poll_ticks: u64,
    pub last_read: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

/// Per-widget view of the shared record.
///
/// Mounting reads the slot synchronously and only then subscribes, so the
/// first render always sees the initial read. Bridge callbacks just flag the
/// feed dirty; the re-read happens on the owner's thread in
/// [`ProfileFeed::refresh`].
pub struct ProfileFeed {
    store: ProfileStore,
    record: Option<Arc<ProfileRecord>>,
    pending: Arc<Pending>,
    subscription: Option<Subscription>,
    stats: FeedStats,
}

impl ProfileFeed {
    pub fn mount(store: ProfileStore, options: BridgeOptions, waker: Option<Waker>) -> Self {
        let mut feed = Self {
            store,
            record: None,
            pending: Arc::new(Pending::default()),
            subscription: None,
            stats: FeedStats::default(),
        };
        feed.reload(false);

        let pending = Arc::clone(&feed.pending);
        let subscription = feed.store.bridge(options).subscribe(move |trigger| {
            pending.mark(trigger);
            if let Some(wake) = &waker {
                wake();
            }
        });
        feed.subscription = Some(subscription);
        tracing::debug!(key = feed.store.key(), "profile feed mounted");
        feed
    }

    /// Re-read the slot if a trigger fired since the last call. Returns
    /// `true` when the shared record changed.
    pub fn refresh(&mut self) -> bool {
        if !self.pending.dirty.swap(false, Ordering::SeqCst) {
            return false;
        }
        let after_signal = self.pending.after_signal.swap(false, Ordering::SeqCst);
        self.reload(after_signal)
    }

    /// Re-read unconditionally.
    pub fn force_refresh(&mut self) -> bool {
        self.pending.dirty.store(false, Ordering::SeqCst);
        self.reload(false)
    }

    fn reload(&mut self, after_signal: bool) -> bool {
        self.stats.reads += 1;
        self.stats.last_read = Some(Local::now());
        match self.store.try_read() {
            Ok(next) => {
                self.stats.last_error = None;
                if next.as_ref() == self.record.as_deref() {
                    return false;
                }
                tracing::debug!(
                    key = self.store.key(),
                    present = next.is_some(),
                    "shared profile record changed"
                );
                self.record = next.map(Arc::new);
                true
            }
            Err(e) => {
                self.stats.failures += 1;
                if after_signal {
                    tracing::warn!(error = %e, "profile changed in another context but is unreadable; keeping last good data");
                } else {
                    tracing::warn!(error = %e, "shared profile unreadable; keeping last good data");
                }
                self.stats.last_error = Some(e.to_string());
                false
            }
        }
    }

    pub fn record(&self) -> Option<&ProfileRecord> {
        self.record.as_deref()
    }

    /// Cheap handle to the current record, immutable for a resolution pass.
    pub fn snapshot(&self) -> Option<Arc<ProfileRecord>> {
        self.record.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!(key = self.store.key(), "profile feed unmounted");
        }
    }

    pub fn stats(&self) -> FeedStats {
        FeedStats {
            cross_context_signals: self.pending.signals.load(Ordering::Relaxed),
            poll_ticks: self.pending.ticks.load(Ordering::Relaxed),
            ..self.stats.clone()
        }
    }
}

impl Drop for ProfileFeed {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStorage};
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn setup() -> (Arc<MemoryStorage>, MemoryStorage, ProfileStore) {
        let reader = Arc::new(MemoryStorage::new());
        let writer = reader.sibling();
        let store = ProfileStore::new(reader.clone(), "doctorData");
        (reader, writer, store)
    }

    #[test]
    fn mount_reads_before_any_trigger() {
        let (_reader, writer, store) = setup();
        writer
            .set_item("doctorData", r#"{"conditions":["Asthma"]}"#)
            .unwrap();
        let feed = ProfileFeed::mount(store, BridgeOptions::disabled(), None);
        assert_eq!(
            feed.record().and_then(|r| r.conditions.clone()),
            Some(vec!["Asthma".to_string()])
        );
        assert_eq!(feed.stats().reads, 1);
    }

    #[test]
    fn cross_context_write_marks_dirty_and_wakes() {
        let (_reader, writer, store) = setup();
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = Arc::clone(&wakes);
        let mut feed = ProfileFeed::mount(
            store,
            BridgeOptions::events_only(),
            Some(Arc::new(move || {
                w.fetch_add(1, Ordering::SeqCst);
            })),
        );
        assert!(!feed.refresh());

        writer.set_item("doctorData", r#"{"totalReviews":7}"#).unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert!(feed.refresh());
        assert_eq!(feed.record().and_then(|r| r.total_reviews), Some(7));
        assert_eq!(feed.stats().cross_context_signals, 1);
    }

    #[test]
    fn unparseable_write_keeps_last_good_record() {
        let (_reader, writer, store) = setup();
        writer.set_item("doctorData", r#"{"totalReviews":7}"#).unwrap();
        let mut feed = ProfileFeed::mount(store, BridgeOptions::events_only(), None);

        writer.set_item("doctorData", "{not json").unwrap();
        assert!(!feed.refresh());
        assert_eq!(feed.record().and_then(|r| r.total_reviews), Some(7));
        let stats = feed.stats();
        assert_eq!(stats.failures, 1);
        assert!(stats.last_error.is_some());
    }

    #[test]
    fn removed_slot_clears_record() {
        let (_reader, writer, store) = setup();
        writer.set_item("doctorData", "{}").unwrap();
        let mut feed = ProfileFeed::mount(store, BridgeOptions::events_only(), None);
        assert!(feed.record().is_some());
        writer.remove_item("doctorData").unwrap();
        assert!(feed.refresh());
        assert!(feed.record().is_none());
    }

    #[test]
    fn same_context_write_is_picked_up_by_polling() {
        let (reader, _writer, store) = setup();
        let mut feed = ProfileFeed::mount(
            store,
            BridgeOptions::polling_only(Duration::from_millis(10)),
            None,
        );
        reader.set_item("doctorData", r#"{"recommendedRate":91}"#).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while feed.record().is_none() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(15));
            feed.refresh();
        }
        assert_eq!(feed.record().and_then(|r| r.recommended_rate), Some(91));
        assert!(feed.stats().poll_ticks > 0);
    }

    #[test]
    fn drop_detaches_listener() {
        let (reader, _writer, store) = setup();
        let feed = ProfileFeed::mount(store, BridgeOptions::events_only(), None);
        assert_eq!(reader.listener_count(), 1);
        drop(feed);
        assert_eq!(reader.listener_count(), 0);
    }

    #[test]
    fn unmount_is_idempotent() {
        let (reader, _writer, store) = setup();
        let mut feed = ProfileFeed::mount(store, BridgeOptions::events_only(), None);
        feed.unmount();
        feed.unmount();
        assert!(!feed.is_mounted());
        assert_eq!(reader.listener_count(), 0);
    }
}
