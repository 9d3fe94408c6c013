use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::registry::{
    Metadata, RegistryEvent, WindowDescriptor, WindowId, WindowRegistry,
    WindowSet, WindowShape, same_members,
};

type ShapeChangeCallback = Box<dyn FnMut(&WindowShape)>;
type WindowsChangeCallback = Box<dyn FnMut(&[WindowDescriptor])>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ManagerUpdate {
    pub shape_changed: bool,
    pub windows_changed: bool,
}

/// One window's view of the shared registry: owns this window's record and
/// keeps a snapshot of everyone else's.
pub struct WindowManager {
    registry: Arc<dyn WindowRegistry>,
    changes: Receiver<RegistryEvent>,
    poll_interval: Duration,
    last_poll: Option<Instant>,
    id: Option<WindowId>,
    shape: WindowShape,
    windows: WindowSet,
    on_shape_change: Option<ShapeChangeCallback>,
    on_windows_change: Option<WindowsChangeCallback>,
}

impl WindowManager {
    pub fn new(
        registry: Arc<dyn WindowRegistry>,
        poll_interval: Duration,
    ) -> Self {
        let changes = registry.subscribe();
        Self {
            registry,
            changes,
            poll_interval,
            last_poll: None,
            id: None,
            shape: WindowShape::default(),
            windows: vec![],
            on_shape_change: None,
            on_windows_change: None,
        }
    }

    pub fn init(
        &mut self,
        shape: WindowShape,
        metadata: Metadata,
    ) -> Result<WindowId, String> {
        if let Some(id) = self.id {
            return Err(format!("window {} is already registered", id));
        }

        let id = self.registry.next_id()?;
        self.registry
            .register(WindowDescriptor::new(id, shape, metadata))?;

        self.id = Some(id);
        self.shape = shape;
        self.windows = self.registry.list();

        info!(
            "registered window {} at {:?} ({} open)",
            id,
            shape,
            self.windows.len()
        );

        Ok(id)
    }

    pub fn id(&self) -> Option<WindowId> {
        self.id
    }

    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    pub fn windows(&self) -> &[WindowDescriptor] {
        &self.windows
    }

    /// Index of this window in the shared set.
    pub fn index(&self) -> Option<usize> {
        let id = self.id?;
        self.windows.iter().position(|window| window.id == id)
    }

    pub fn set_shape_change_callback(
        &mut self,
        callback: impl FnMut(&WindowShape) + 'static,
    ) {
        self.on_shape_change = Some(Box::new(callback));
    }

    pub fn set_windows_change_callback(
        &mut self,
        callback: impl FnMut(&[WindowDescriptor]) + 'static,
    ) {
        self.on_windows_change = Some(Box::new(callback));
    }

    /// Called once per frame. `shape` is `None` when the window position
    /// could not be read this frame.
    pub fn update(
        &mut self,
        shape: Option<WindowShape>,
        now: Instant,
    ) -> ManagerUpdate {
        let mut result = ManagerUpdate::default();
        let Some(id) = self.id else {
            return result;
        };

        if let Some(shape) = shape.filter(|shape| *shape != self.shape) {
            self.shape = shape;

            if let Err(err) = self.registry.update_shape(id, shape) {
                warn!("failed to publish shape of window {}: {}", id, err);
            }

            if let Some(own) =
                self.windows.iter_mut().find(|window| window.id == id)
            {
                own.shape = shape;
            }

            if let Some(callback) = self.on_shape_change.as_mut() {
                callback(&shape);
            }

            result.shape_changed = true;
        }

        let external = self.drain_changes(id);
        let poll_due = self.last_poll.is_none_or(|last| {
            now.saturating_duration_since(last) >= self.poll_interval
        });

        if external || poll_due {
            self.last_poll = Some(now);
            result.windows_changed = self.refresh();
        }

        result
    }

    /// Deregister. Safe to call more than once.
    pub fn close(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };

        match self.registry.unregister(id) {
            Ok(()) => info!("unregistered window {}", id),
            Err(err) => warn!("failed to unregister window {}: {}", id, err),
        }
    }

    fn drain_changes(&mut self, id: WindowId) -> bool {
        let mut external = false;

        loop {
            match self.changes.try_recv() {
                Ok(event) => {
                    if !event.is_from(id) {
                        external = true;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("registry change feed closed; polling only");
                    break;
                }
            }
        }

        external
    }

    fn refresh(&mut self) -> bool {
        let windows = self.registry.list();
        let changed = !same_members(&self.windows, &windows);
        self.windows = windows;

        if changed {
            debug!(
                "window set changed: {:?}",
                self.windows.iter().map(|w| w.id).collect::<Vec<_>>()
            );

            if let Some(callback) = self.on_windows_change.as_mut() {
                callback(&self.windows);
            }
        }

        changed
    }
}

impl Drop for WindowManager {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::registry::memory::MemoryRegistry;

    const POLL: Duration = Duration::from_millis(250);

    fn shape(x: f32) -> WindowShape {
        WindowShape::new(x, 0.0, 800.0, 600.0)
    }

    fn manager(registry: &Arc<MemoryRegistry>, x: f32) -> WindowManager {
        let mut manager = WindowManager::new(registry.clone(), POLL);
        manager
            .init(shape(x), Metadata::default())
            .expect("init manager");
        manager
    }

    #[test]
    fn init_registers_and_snapshots() {
        let registry = Arc::new(MemoryRegistry::new());
        let first = manager(&registry, 0.0);
        let second = manager(&registry, 800.0);

        assert_eq!(first.windows().len(), 1);
        assert_eq!(second.windows().len(), 2);
        assert_eq!(second.index(), Some(1));
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn init_twice_is_rejected() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 0.0);
        assert!(first.init(shape(0.0), Metadata::default()).is_err());
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn peer_registration_triggers_windows_change() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 0.0);
        let start = Instant::now();
        first.update(None, start);

        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        first.set_windows_change_callback(move |windows| {
            sink.borrow_mut().push(windows.len());
        });

        let _second = manager(&registry, 800.0);

        // Well inside the poll interval: only the change feed can explain it.
        let update = first.update(None, start + Duration::from_millis(1));
        assert!(update.windows_changed);
        assert_eq!(first.windows().len(), 2);
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn own_writes_do_not_count_as_external() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 0.0);
        let start = Instant::now();
        first.update(None, start);

        let update =
            first.update(Some(shape(50.0)), start + Duration::from_millis(1));
        assert!(update.shape_changed);
        assert!(!update.windows_changed);
        assert_eq!(first.windows()[0].shape.x, 50.0);
    }

    #[test]
    fn shape_change_publishes_and_calls_back() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 0.0);

        let shapes = Rc::new(RefCell::new(vec![]));
        let sink = shapes.clone();
        first.set_shape_change_callback(move |shape| {
            sink.borrow_mut().push(*shape);
        });

        let now = Instant::now();
        let moved = shape(1600.0);
        assert!(first.update(Some(moved), now).shape_changed);
        assert!(!first.update(Some(moved), now).shape_changed);

        assert_eq!(*shapes.borrow(), vec![moved]);
        assert_eq!(registry.list()[0].shape, moved);
    }

    #[test]
    fn missing_shape_is_no_update() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 10.0);

        let update = first.update(None, Instant::now());
        assert!(!update.shape_changed);
        assert_eq!(first.shape(), shape(10.0));
    }

    #[test]
    fn peer_moves_refresh_shapes_without_membership_change() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 0.0);
        let mut second = manager(&registry, 800.0);
        let start = Instant::now();
        first.update(None, start);
        second.update(None, start);

        second.update(Some(shape(1600.0)), start);
        let update = first.update(None, start + Duration::from_millis(1));

        assert!(!update.windows_changed);
        assert_eq!(first.windows()[1].shape.x, 1600.0);
    }

    #[test]
    fn polling_catches_unnotified_changes() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 0.0);
        let start = Instant::now();
        first.update(None, start);

        // Drop everything the feed would have said.
        let _second = manager(&registry, 800.0);
        while first.changes.try_recv().is_ok() {}

        let early = first.update(None, start + POLL / 2);
        assert!(!early.windows_changed);

        let due = first.update(None, start + POLL);
        assert!(due.windows_changed);
        assert_eq!(first.windows().len(), 2);
    }

    #[test]
    fn close_and_drop_unregister() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut first = manager(&registry, 0.0);
        let second = manager(&registry, 800.0);

        first.close();
        first.close();
        assert_eq!(registry.list().len(), 1);

        drop(second);
        assert!(registry.list().is_empty());
    }
}
