//! The shared window registry: every open window publishes its own screen
//! rectangle here and reads everyone else's.

pub mod file_store;
pub mod memory;
pub mod storage;
pub mod store_watch;

use std::sync::mpsc::Receiver;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type WindowId = u64;
pub type Metadata = IndexMap<String, String>;
pub type WindowSet = Vec<WindowDescriptor>;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct WindowShape {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl WindowShape {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn position(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.w * 0.5, self.y + self.h * 0.5]
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct WindowDescriptor {
    pub id: WindowId,
    pub shape: WindowShape,
    #[serde(default)]
    pub metadata: Metadata,
}

impl WindowDescriptor {
    pub fn new(id: WindowId, shape: WindowShape, metadata: Metadata) -> Self {
        Self {
            id,
            shape,
            metadata,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegistryEvent {
    /// A record was written or removed. `writer` is the window whose record
    /// changed, when the store can tell.
    Changed { writer: Option<WindowId> },
    Cleared,
}

impl RegistryEvent {
    pub fn is_from(&self, id: WindowId) -> bool {
        matches!(self, Self::Changed { writer: Some(writer) } if *writer == id)
    }
}

/// Storage seam between windows. Each window only ever writes its own
/// record; there is no locking beyond per-record atomic replacement.
pub trait WindowRegistry: Send + Sync {
    fn next_id(&self) -> Result<WindowId, String>;

    fn register(&self, descriptor: WindowDescriptor) -> Result<(), String>;

    fn unregister(&self, id: WindowId) -> Result<(), String>;

    fn update_shape(
        &self,
        id: WindowId,
        shape: WindowShape,
    ) -> Result<(), String>;

    /// All live records in registration order.
    fn list(&self) -> WindowSet;

    fn subscribe(&self) -> Receiver<RegistryEvent>;

    fn clear(&self) -> Result<(), String>;
}

/// True when both sets hold the same windows in the same order. Shapes are
/// ignored; a moved window is not a membership change.
pub fn same_members(a: &[WindowDescriptor], b: &[WindowDescriptor]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.id == b.id)
}
