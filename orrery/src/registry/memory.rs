use std::sync::mpsc::{self, Receiver, Sender};

use indexmap::IndexMap;
use parking_lot::Mutex;

use super::{
    RegistryEvent, WindowDescriptor, WindowId, WindowRegistry, WindowSet,
    WindowShape,
};

/// Registry for windows that share one process.
#[derive(Default)]
pub struct MemoryRegistry {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    count: WindowId,
    windows: IndexMap<WindowId, WindowDescriptor>,
    subscribers: Vec<Sender<RegistryEvent>>,
}

impl State {
    fn publish(&mut self, event: RegistryEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowRegistry for MemoryRegistry {
    fn next_id(&self) -> Result<WindowId, String> {
        let mut state = self.state.lock();
        state.count += 1;
        Ok(state.count)
    }

    fn register(&self, descriptor: WindowDescriptor) -> Result<(), String> {
        let mut state = self.state.lock();
        let id = descriptor.id;
        state.count = state.count.max(id);
        state.windows.insert(id, descriptor);
        // Ids only grow, but a caller may register out of order.
        state.windows.sort_keys();
        state.publish(RegistryEvent::Changed { writer: Some(id) });
        Ok(())
    }

    fn unregister(&self, id: WindowId) -> Result<(), String> {
        let mut state = self.state.lock();
        if state.windows.shift_remove(&id).is_some() {
            state.publish(RegistryEvent::Changed { writer: Some(id) });
        }
        Ok(())
    }

    fn update_shape(
        &self,
        id: WindowId,
        shape: WindowShape,
    ) -> Result<(), String> {
        let mut state = self.state.lock();
        match state.windows.get_mut(&id) {
            Some(descriptor) => descriptor.shape = shape,
            None => {
                state.windows.insert(
                    id,
                    WindowDescriptor::new(id, shape, Default::default()),
                );
                state.windows.sort_keys();
            }
        }
        state.publish(RegistryEvent::Changed { writer: Some(id) });
        Ok(())
    }

    fn list(&self) -> WindowSet {
        self.state.lock().windows.values().cloned().collect()
    }

    fn subscribe(&self) -> Receiver<RegistryEvent> {
        let (tx, rx) = mpsc::channel();
        self.state.lock().subscribers.push(tx);
        rx
    }

    fn clear(&self) -> Result<(), String> {
        let mut state = self.state.lock();
        state.windows.clear();
        state.count = 0;
        state.publish(RegistryEvent::Cleared);
        Ok(())
    }
}
