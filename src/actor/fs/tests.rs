use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::debouncer::{ChangeKind, DEBOUNCE_MS, Debouncer, is_temp_file};
use super::{RebuildFn, WatchFilter, change_summary, run_loop};
use crate::actor::messages::WsMsg;

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::Permissions,
    ))
}

// =============================================================================
// Debouncer
// =============================================================================

#[test]
fn test_debouncer_empty() {
    let mut debouncer = Debouncer::new();
    assert!(!debouncer.is_ready());
    assert!(!debouncer.is_pending());
    assert!(debouncer.take_if_ready().is_none());
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/site/content/a.yaml"], create_kind()));
    debouncer.add_event(&make_event(vec!["/site/content/b.yaml"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/site/content/c.yaml"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/site/content/a.yaml")],
        ChangeKind::Created
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/site/content/b.yaml")],
        ChangeKind::Modified
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/site/content/c.yaml")],
        ChangeKind::Removed
    );
}

#[test]
fn test_rename_counts_as_modify() {
    let mut debouncer = Debouncer::new();
    let rename = notify::EventKind::Modify(notify::event::ModifyKind::Name(
        notify::event::RenameMode::To,
    ));

    assert!(debouncer.add_event(&make_event(vec!["/site/content/a.yaml"], rename)));
    assert_eq!(
        debouncer.changes[&PathBuf::from("/site/content/a.yaml")],
        ChangeKind::Modified
    );
}

#[test]
fn test_change_summary_names_first_path() {
    let mut changes = FxHashMap::default();
    assert_eq!(change_summary(&changes), None);

    changes.insert(PathBuf::from("/site/content/b.yaml"), ChangeKind::Removed);
    assert_eq!(change_summary(&changes).unwrap(), "removed b.yaml");

    changes.insert(PathBuf::from("/site/content/a.yaml"), ChangeKind::Created);
    changes.insert(PathBuf::from("/site/pages/home.html"), ChangeKind::Modified);
    assert_eq!(change_summary(&changes).unwrap(), "created a.yaml (+2 more)");
}

#[test]
fn test_metadata_and_access_events_ignored() {
    let mut debouncer = Debouncer::new();

    assert!(!debouncer.add_event(&make_event(vec!["/site/pages/home.html"], metadata_kind())));
    assert!(!debouncer.add_event(&make_event(
        vec!["/site/pages/home.html"],
        notify::EventKind::Access(notify::event::AccessKind::Read),
    )));
    assert!(debouncer.changes.is_empty());
    assert!(!debouncer.is_pending());
}

#[test]
fn test_temp_files_ignored() {
    for path in [
        "/site/content/.a.yaml.swp",
        "/site/content/a.yaml~",
        "/site/content/a.swp",
        "/site/content/4913.tmp",
        "/site/content/#a.yaml#",
        "/site/public/.index.html.folio-tmp-1-0",
    ] {
        assert!(is_temp_file(&PathBuf::from(path)), "{path}");
    }
    assert!(!is_temp_file(&PathBuf::from("/site/content/a.yaml")));

    let mut debouncer = Debouncer::new();
    assert!(!debouncer.add_event(&make_event(vec!["/site/content/a.yaml~"], modify_kind())));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_state_transitions() {
    let mut debouncer = Debouncer::new();
    let a = "/site/content/a.yaml";
    let b = "/site/content/b.yaml";
    let c = "/site/content/c.yaml";

    // created then removed within the window: nothing to report
    debouncer.add_event(&make_event(vec![a], create_kind()));
    debouncer.add_event(&make_event(vec![a], remove_kind()));
    assert!(!debouncer.changes.contains_key(&PathBuf::from(a)));

    // modified then removed: removed
    debouncer.add_event(&make_event(vec![b], modify_kind()));
    debouncer.add_event(&make_event(vec![b], remove_kind()));
    assert_eq!(debouncer.changes[&PathBuf::from(b)], ChangeKind::Removed);

    // removed then recreated (atomic save): created
    debouncer.add_event(&make_event(vec![c], remove_kind()));
    debouncer.add_event(&make_event(vec![c], create_kind()));
    assert_eq!(debouncer.changes[&PathBuf::from(c)], ChangeKind::Created);

    // still pending even though `a` cancelled out
    assert!(debouncer.is_pending());
}

#[test]
fn test_burst_coalesces_into_one_batch() {
    let mut debouncer = Debouncer::with_window(Duration::from_millis(40));
    for i in 0..10 {
        let path = format!("/site/content/{}.yaml", i % 3);
        debouncer.add_event(&make_event(vec![path.as_str()], modify_kind()));
    }
    assert!(!debouncer.is_ready());
    assert!(debouncer.take_if_ready().is_none());

    std::thread::sleep(Duration::from_millis(60));
    let batch = debouncer.take_if_ready().unwrap();
    assert_eq!(batch.len(), 3);
    assert!(debouncer.take_if_ready().is_none());
    assert!(!debouncer.is_pending());
}

#[test]
fn test_sleep_duration() {
    let mut debouncer = Debouncer::new();
    assert!(debouncer.sleep_duration() > Duration::from_secs(60));

    debouncer.add_event(&make_event(vec!["/site/content/a.yaml"], modify_kind()));
    let sleep = debouncer.sleep_duration();
    assert!(sleep <= Duration::from_millis(DEBOUNCE_MS));
    assert!(sleep >= Duration::from_millis(1));
}

// =============================================================================
// Watch filter
// =============================================================================

#[test]
fn test_watch_filter() {
    let filter = WatchFilter {
        dirs: vec![PathBuf::from("/site/content"), PathBuf::from("/site/pages")],
        files: vec![PathBuf::from("/site/config.yaml")],
    };
    assert!(filter.is_relevant(&PathBuf::from("/site/content/a.yaml")));
    assert!(filter.is_relevant(&PathBuf::from("/site/pages/nested/x.html")));
    assert!(filter.is_relevant(&PathBuf::from("/site/config.yaml")));
    assert!(!filter.is_relevant(&PathBuf::from("/site/public/index.html")));
    assert!(!filter.is_relevant(&PathBuf::from("/site/README.md")));
    assert!(!filter.is_relevant(&PathBuf::from("/site/content-old/a.yaml")));
}

// =============================================================================
// Rebuild loop
// =============================================================================

struct Harness {
    events: mpsc::Sender<notify::Event>,
    ws_rx: mpsc::Receiver<WsMsg>,
    builds: Arc<AtomicUsize>,
    handle: tokio::task::JoinHandle<()>,
}

fn harness(build_time: Duration) -> Harness {
    let (events, events_rx) = mpsc::channel(64);
    let (ws_tx, ws_rx) = mpsc::channel(64);
    let builds = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&builds);
    let rebuild: RebuildFn = Arc::new(move || {
        std::thread::sleep(build_time);
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let handle = tokio::spawn(run_loop(
        events_rx,
        Debouncer::with_window(Duration::from_millis(50)),
        rebuild,
        ws_tx,
    ));

    Harness {
        events,
        ws_rx,
        builds,
        handle,
    }
}

fn drain_rebuilt(rx: &mut mpsc::Receiver<WsMsg>) -> usize {
    let mut count = 0;
    while let Ok(msg) = rx.try_recv() {
        assert!(matches!(msg, WsMsg::Rebuilt), "unexpected {msg:?}");
        count += 1;
    }
    count
}

#[tokio::test]
async fn test_ten_rapid_events_one_rebuild() {
    let mut h = harness(Duration::ZERO);

    for i in 0..10 {
        let path = format!("/site/content/{i}.yaml");
        h.events
            .send(make_event(vec![path.as_str()], modify_kind()))
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(h.builds.load(Ordering::SeqCst), 1);
    assert_eq!(drain_rebuilt(&mut h.ws_rx), 1);

    drop(h.events);
    h.handle.await.unwrap();
}

#[tokio::test]
async fn test_events_during_rebuild_cause_one_more() {
    let mut h = harness(Duration::from_millis(200));

    h.events
        .send(make_event(vec!["/site/content/a.yaml"], modify_kind()))
        .await
        .unwrap();
    // the first rebuild starts after ~50ms and runs for 200ms
    tokio::time::sleep(Duration::from_millis(120)).await;
    for _ in 0..5 {
        h.events
            .send(make_event(vec!["/site/content/b.yaml"], modify_kind()))
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(700)).await;

    assert_eq!(h.builds.load(Ordering::SeqCst), 2);
    assert_eq!(drain_rebuilt(&mut h.ws_rx), 2);

    drop(h.events);
    h.handle.await.unwrap();
}

#[tokio::test]
async fn test_ignored_events_never_rebuild() {
    let mut h = harness(Duration::ZERO);

    h.events
        .send(make_event(vec!["/site/content/a.yaml"], metadata_kind()))
        .await
        .unwrap();
    h.events
        .send(make_event(vec!["/site/content/.a.yaml.swp"], modify_kind()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(h.builds.load(Ordering::SeqCst), 0);
    assert_eq!(drain_rebuilt(&mut h.ws_rx), 0);

    drop(h.events);
    h.handle.await.unwrap();
}
