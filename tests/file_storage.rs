use profile_widgets::storage::{FileStorage, KeyValueStore, StorageEvent};
use profile_widgets::sync::{BridgeOptions, ProfileFeed, ProfileStore};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::{Duration, Instant};
use tempfile::tempdir;

const SETTLE: Duration = Duration::from_millis(200);

fn recorder() -> (Arc<Mutex<Vec<StorageEvent>>>, Arc<dyn Fn(&StorageEvent) + Send + Sync>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    (
        events,
        Arc::new(move |e: &StorageEvent| sink.lock().unwrap().push(e.clone())),
    )
}

fn wait_for(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        sleep(Duration::from_millis(10));
    }
    done()
}

#[test]
#[serial]
fn other_handle_hears_write_but_writer_does_not() {
    let dir = tempdir().unwrap();
    let writer = FileStorage::open(dir.path()).unwrap();
    let reader = FileStorage::open(dir.path()).unwrap();

    let (heard_by_reader, reader_listener) = recorder();
    let (heard_by_writer, writer_listener) = recorder();
    let reader_id = reader.add_listener(reader_listener);
    let writer_id = writer.add_listener(writer_listener);

    writer
        .set_item("doctorData", r#"{"conditions":["Asthma"]}"#)
        .unwrap();

    assert!(wait_for(|| !heard_by_reader.lock().unwrap().is_empty()));
    let event = heard_by_reader.lock().unwrap()[0].clone();
    assert_eq!(event.key, "doctorData");
    assert_eq!(event.new_value.as_deref(), Some(r#"{"conditions":["Asthma"]}"#));

    sleep(SETTLE);
    assert!(heard_by_writer.lock().unwrap().is_empty());

    reader.remove_listener(reader_id);
    writer.remove_listener(writer_id);
}

#[test]
#[serial]
fn removal_is_announced_without_value() {
    let dir = tempdir().unwrap();
    let writer = FileStorage::open(dir.path()).unwrap();
    writer.set_item("doctorData", "{}").unwrap();

    let reader = FileStorage::open(dir.path()).unwrap();
    let (heard, listener) = recorder();
    reader.add_listener(listener);

    writer.remove_item("doctorData").unwrap();
    assert!(wait_for(|| !heard.lock().unwrap().is_empty()));
    assert_eq!(heard.lock().unwrap()[0].new_value, None);
}

#[test]
#[serial]
fn feed_follows_edits_from_another_handle() {
    let dir = tempdir().unwrap();
    let editor = FileStorage::open(dir.path()).unwrap();
    let widget_side = Arc::new(FileStorage::open(dir.path()).unwrap());
    let store = ProfileStore::new(widget_side, "doctorData");

    let mut feed = ProfileFeed::mount(store, BridgeOptions::events_only(), None);
    assert!(feed.record().is_none());

    editor
        .set_item("doctorData", r#"{"totalReviews":42}"#)
        .unwrap();
    assert!(wait_for(|| {
        feed.refresh();
        feed.record().and_then(|r| r.total_reviews) == Some(42)
    }));
    assert!(feed.stats().cross_context_signals >= 1);
}

#[test]
#[serial]
fn keys_with_separators_still_reach_the_feed() {
    let dir = tempdir().unwrap();
    let key = "clinic/doctor data";
    let editor = FileStorage::open(dir.path()).unwrap();
    let widget_side = Arc::new(FileStorage::open(dir.path()).unwrap());
    let store = ProfileStore::new(widget_side, key);

    let mut feed = ProfileFeed::mount(store, BridgeOptions::events_only(), None);
    editor.set_item(key, r#"{"overallRating":4.1}"#).unwrap();
    assert!(wait_for(|| {
        feed.refresh();
        feed.record().and_then(|r| r.overall_rating) == Some(4.1)
    }));
    assert!(feed.stats().cross_context_signals >= 1);
}
