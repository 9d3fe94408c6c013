use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::{RegistryEvent, WindowId};

/// Turns filesystem notifications on a store's `windows/` directory into
/// registry change events.
pub struct StoreWatch {
    _watcher: RecommendedWatcher,
}

impl StoreWatch {
    pub fn start(
        dir: PathBuf,
        events: Sender<RegistryEvent>,
    ) -> Result<Self, notify::Error> {
        let mut watcher = notify::recommended_watcher(move |result| {
            let Ok(event) = result else {
                return;
            };

            for change in record_changes(&event) {
                // Receiver gone; the next poll notices nothing either way.
                let _ = events.send(change);
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self { _watcher: watcher })
    }
}

fn record_changes(event: &Event) -> Vec<RegistryEvent> {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return vec![];
    }

    if event.paths.is_empty() {
        return vec![RegistryEvent::Changed { writer: None }];
    }

    event
        .paths
        .iter()
        .filter_map(|path| record_id(path))
        .map(|writer| RegistryEvent::Changed {
            writer: Some(writer),
        })
        .collect()
}

/// Id of the window owning a record file, `None` for anything that is not
/// a finished `<id>.json` record.
pub fn record_id(path: &Path) -> Option<WindowId> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return None;
    }

    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
}
