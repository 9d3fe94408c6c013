mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use orrery::prelude::*;
use orrery::registry::storage;
use serial_test::serial;
use support::shape;

fn open(dir: &tempfile::TempDir) -> Arc<dyn WindowRegistry> {
    Arc::new(
        FileRegistry::for_session(Some(dir.path()), "test")
            .expect("store should open"),
    )
}

#[test]
fn separate_store_handles_see_each_other() {
    let dir = tempfile::tempdir().expect("tempdir");
    let poll = Duration::from_millis(250);
    let mut now = Instant::now();

    let mut first = WindowManager::new(open(&dir), poll);
    let mut second = WindowManager::new(open(&dir), poll);

    let first_id = first.init(shape(0.0, 0.0), Metadata::new()).expect("init");
    let second_id =
        second.init(shape(800.0, 0.0), Metadata::new()).expect("init");
    assert!(second_id > first_id);

    now += poll;
    let update = first.update(None, now);
    assert!(update.windows_changed);
    assert_eq!(first.windows().len(), 2);

    second.update(Some(shape(1600.0, 0.0)), now);
    now += poll;
    first.update(None, now);
    assert_eq!(first.windows()[1].shape, shape(1600.0, 0.0));

    second.close();
    now += poll;
    let update = first.update(None, now);
    assert!(update.windows_changed);
    assert_eq!(first.windows().len(), 1);
    assert_eq!(first.index(), Some(0));
}

#[test]
fn clear_startup_leaves_an_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");

    let registry = open(&dir);
    for x in [0.0, 800.0] {
        let id = registry.next_id().expect("id");
        registry
            .register(WindowDescriptor::new(id, shape(x, 0.0), Metadata::new()))
            .expect("register");
    }
    assert_eq!(registry.list().len(), 2);

    let options = LaunchOptions {
        session: "test".to_string(),
        store_dir: Some(dir.path().to_path_buf()),
        clear: true,
        ..LaunchOptions::default()
    };

    assert!(matches!(prepare(&options), Ok(Prepared::Cleared)));
    assert!(open(&dir).list().is_empty());

    let scene = SceneController::new(SceneConfig::default());
    assert!(scene.planets().is_empty());
}

#[test]
fn clear_startup_sends_stopped_without_a_window() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (_commands_tx, commands) = command_channel();
    let (events, events_rx) = event_channel();

    let options = LaunchOptions {
        session: "test".to_string(),
        store_dir: Some(dir.path().to_path_buf()),
        clear: true,
        ..LaunchOptions::default()
    };

    run_with_channels(options, commands, events).expect("clear should succeed");
    assert_eq!(events_rx.try_recv(), Ok(RuntimeEvent::Stopped));
}

#[test]
fn prepare_rejects_invalid_config() {
    let options = LaunchOptions {
        backend: RegistryBackend::Memory,
        config: SceneConfig {
            falloff: 0.0,
            ..SceneConfig::default()
        },
        ..LaunchOptions::default()
    };

    assert!(prepare(&options).is_err());
}

#[test]
#[serial]
fn default_store_lives_under_the_cache_dir() {
    let session = format!("test-{}", std::process::id());
    let registry =
        FileRegistry::for_session(None, &session).expect("store should open");

    assert!(registry.root().ends_with(&session));
    let cache = storage::cache_dir().expect("cache dir");
    assert!(registry.root().starts_with(&cache));

    let id = registry.next_id().expect("id");
    registry
        .register(WindowDescriptor::new(id, shape(0.0, 0.0), Metadata::new()))
        .expect("register");
    assert_eq!(registry.list().len(), 1);

    registry.clear().expect("clear");
    assert!(!registry.root().exists());
}

fn wait_for(
    manager: &mut WindowManager,
    now: Instant,
    mut done: impl FnMut(&WindowManager, ManagerUpdate) -> bool,
) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        let update = manager.update(None, now);
        if done(manager, update) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    false
}

#[test]
fn store_notifications_drive_updates_between_polls() {
    let dir = tempfile::tempdir().expect("tempdir");
    let poll = Duration::from_secs(3600);
    let now = Instant::now();

    let mut first = WindowManager::new(open(&dir), poll);
    first.init(shape(0.0, 0.0), Metadata::new()).expect("init");
    first.update(None, now);

    let mut second = WindowManager::new(open(&dir), poll);
    second.init(shape(800.0, 0.0), Metadata::new()).expect("init");

    let mut changed = false;
    assert!(wait_for(&mut first, now, |manager, update| {
        changed |= update.windows_changed;
        manager.windows().len() == 2
    }));
    assert!(changed);

    second.update(Some(shape(1600.0, 0.0)), now);
    assert!(wait_for(&mut first, now, |manager, update| {
        assert!(!update.windows_changed);
        manager.windows().get(1).is_some_and(|peer| peer.shape.x == 1600.0)
    }));

    let update = first.update(Some(shape(100.0, 0.0)), now);
    assert!(update.shape_changed);
    std::thread::sleep(Duration::from_millis(300));
    let update = first.update(None, now);
    assert!(!update.windows_changed);
    assert_eq!(first.windows()[0].shape, shape(100.0, 0.0));
    assert_eq!(first.windows().len(), 2);
}
