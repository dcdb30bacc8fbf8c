mod common;

use common::{FakeSource, live_root, records_eventually, tracker_with};
use filetracker_watchman::{ChangeEvent, ChangeKind, WatchSignal};
use tempfile::TempDir;

#[tokio::test]
async fn excluded_folder_is_discarded_and_documents_recorded() {
    let dir = TempDir::new().unwrap();
    let source = FakeSource::new();
    let tracker = tracker_with(&dir, &["Temp"], &source).await;

    tracker.start_monitoring_roots(&[live_root("C:\\")]).await.unwrap();

    assert!(source.create_file("C:\\", "C:\\Users\\me\\Temp\\x.txt").await);
    assert!(source.create_file("C:\\", "C:\\Users\\me\\Documents\\x.txt").await);

    assert!(records_eventually(&tracker, |records| !records.is_empty()).await);
    assert_eq!(tracker.get_records().await, vec!["C:\\Users\\me\\Documents".to_string()]);

    tracker.stop_monitoring().await;
}

#[tokio::test]
async fn directories_and_non_create_events_are_ignored() {
    let dir = TempDir::new().unwrap();
    let source = FakeSource::new();
    let tracker = tracker_with(&dir, &[], &source).await;
    tracker.start_monitoring_roots(&[live_root("/data")]).await.unwrap();

    let file = ChangeEvent::created_file("/data", "/data/old/a.txt");
    for kind in [ChangeKind::Modify, ChangeKind::Remove, ChangeKind::Rename, ChangeKind::Other] {
        let event = ChangeEvent { kind, ..file.clone() };
        assert!(source.emit("/data", WatchSignal::Event(event)).await);
    }
    let new_dir = ChangeEvent::created_dir("/data", "/data/made/sub");
    assert!(source.emit("/data", WatchSignal::Event(new_dir)).await);
    assert!(source.create_file("/data", "/data/new/b.txt").await);

    assert!(records_eventually(&tracker, |records| !records.is_empty()).await);
    assert_eq!(tracker.get_records().await, vec!["/data/new".to_string()]);

    tracker.stop_monitoring().await;
}

#[tokio::test]
async fn repeated_saves_keep_folder_at_front_once() {
    let dir = TempDir::new().unwrap();
    let source = FakeSource::new();
    let tracker = tracker_with(&dir, &[], &source).await;
    tracker.start_monitoring_roots(&[live_root("/data")]).await.unwrap();

    for path in ["/data/A/1", "/data/B/1", "/data/A/2"] {
        assert!(source.create_file("/data", path).await);
    }

    assert!(records_eventually(&tracker, |records| records == ["/data/A", "/data/B"]).await);

    tracker.stop_monitoring().await;
}

#[tokio::test]
async fn manual_add_and_clear_through_facade() {
    let dir = TempDir::new().unwrap();
    let source = FakeSource::new();
    let tracker = tracker_with(&dir, &[], &source).await;

    tracker.add_record("A").await.unwrap();
    tracker.add_record("B").await.unwrap();
    tracker.add_record("A").await.unwrap();
    assert_eq!(tracker.get_records().await, vec!["A".to_string(), "B".to_string()]);

    tracker.clear_records().await.unwrap();
    assert!(tracker.get_records().await.is_empty());
}

#[tokio::test]
async fn records_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    {
        let tracker = tracker_with(&dir, &[], &FakeSource::new()).await;
        tracker.add_record("/kept").await.unwrap();
    }
    let tracker = tracker_with(&dir, &[], &FakeSource::new()).await;
    assert_eq!(tracker.get_records().await, vec!["/kept".to_string()]);
}
