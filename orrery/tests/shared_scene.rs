mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use orrery::prelude::*;
use support::{shape, start};

fn memory_registry() -> Arc<dyn WindowRegistry> {
    Arc::new(MemoryRegistry::new())
}

#[test]
fn two_windows_share_two_planets_and_one_line() {
    let registry = memory_registry();
    let now = Instant::now();

    let mut first = start(&registry, 0.0, 0.0);
    let mut second = start(&registry, 800.0, 0.0);

    first.frame_at(Some(shape(0.0, 0.0)), now, 0.0);
    second.frame_at(Some(shape(800.0, 0.0)), now, 0.0);

    for context in [&first, &second] {
        assert_eq!(context.manager().windows().len(), 2);
        assert_eq!(context.scene().planets().len(), 2);
        assert_eq!(context.scene().lines().len(), 1);
    }

    assert_eq!(first.scene().world_offset_target(), [0.0, 0.0]);
    assert_eq!(second.scene().world_offset_target(), [-800.0, 0.0]);
}

#[test]
fn moving_a_window_only_moves_targets() {
    let registry = memory_registry();
    let mut now = Instant::now();

    let mut first = start(&registry, 0.0, 0.0);
    let mut second = start(&registry, 800.0, 0.0);
    first.frame_at(Some(shape(0.0, 0.0)), now, 0.0);

    let update = second.frame_at(Some(shape(1600.0, 0.0)), now, 0.0);
    assert!(update.shape_changed);
    assert!(!update.windows_changed);
    assert_eq!(second.scene().world_offset_target(), [-1600.0, 0.0]);

    for _ in 0..400 {
        now += Duration::from_millis(16);
        let update = first.frame_at(Some(shape(0.0, 0.0)), now, 0.0);
        assert!(!update.windows_changed);
        second.frame_at(Some(shape(1600.0, 0.0)), now, 0.0);
    }

    for context in [&first, &second] {
        assert_eq!(context.scene().planets().len(), 2);
        assert_eq!(context.scene().lines().len(), 1);
    }

    let moved = first.scene().planets()[1].position;
    assert!((moved[0] - 2000.0).abs() < 0.5, "{:?}", moved);
    assert!((moved[1] - 300.0).abs() < 0.5, "{:?}", moved);

    let offset = second.scene().world_offset();
    assert!((offset[0] + 1600.0).abs() < 0.5, "{:?}", offset);
}

#[test]
fn fifth_window_is_ignored() {
    let registry = memory_registry();
    let now = Instant::now();

    let mut contexts = (0..5)
        .map(|i| start(&registry, i as f32 * 100.0, 0.0))
        .collect::<Vec<_>>();

    for (i, context) in contexts.iter_mut().enumerate() {
        context.frame_at(Some(shape(i as f32 * 100.0, 0.0)), now, 0.0);
    }

    for context in &contexts {
        assert_eq!(context.manager().windows().len(), 5);
        assert_eq!(context.scene().planets().len(), 4);
        assert_eq!(context.scene().lines().len(), 6);
    }

    let fifth = contexts.pop().expect("five contexts");
    fifth.close();
    contexts[0].frame_at(Some(shape(0.0, 0.0)), now, 0.0);
    assert_eq!(contexts[0].manager().windows().len(), 4);
    assert_eq!(contexts[0].scene().planets().len(), 4);
}

#[test]
fn closing_a_window_drops_its_planet() {
    let registry = memory_registry();
    let now = Instant::now();

    let mut first = start(&registry, 0.0, 0.0);
    let second = start(&registry, 800.0, 0.0);
    first.frame_at(Some(shape(0.0, 0.0)), now, 0.0);
    assert_eq!(first.scene().planets().len(), 2);

    second.close();
    let update = first.frame_at(Some(shape(0.0, 0.0)), now, 0.0);

    assert!(update.windows_changed);
    assert_eq!(first.scene().planets().len(), 1);
    assert!(first.scene().lines().is_empty());
}
