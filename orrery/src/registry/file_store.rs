//! Cross-process registry backed by a session directory:
//!
//! ```text
//! <session>/count            highest id handed out
//! <session>/windows/<id>.json one record per open window
//! ```
//!
//! A record file is claimed with `create_new` before it is written, so two
//! processes racing for the same id cannot both win. Records are replaced
//! with write-then-rename, so readers see either the old or the new record.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use log::{debug, trace, warn};
use parking_lot::Mutex;

use super::storage::{self, read_json, read_json_if_exists, write_json};
use super::store_watch::{StoreWatch, record_id};
use super::{
    Metadata, RegistryEvent, WindowDescriptor, WindowId, WindowRegistry,
    WindowSet, WindowShape,
};

const COUNT_FILE: &str = "count";
const WINDOWS_DIR: &str = "windows";

/// Give up on id allocation after this many already-claimed slots.
const MAX_ID_PROBES: u64 = 1024;

pub struct FileRegistry {
    root: PathBuf,
    watches: Mutex<Vec<StoreWatch>>,
}

impl FileRegistry {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, String> {
        let root = root.into();
        let registry = Self {
            root,
            watches: Mutex::new(vec![]),
        };
        registry.ensure_dirs()?;
        debug!("window store at {}", registry.root.display());
        Ok(registry)
    }

    /// Open the store for `session` under `base`, or under the platform
    /// cache directory when `base` is `None`.
    pub fn for_session(
        base: Option<&Path>,
        session: &str,
    ) -> Result<Self, String> {
        Self::open(storage::session_dir(base, session)?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn windows_dir(&self) -> PathBuf {
        self.root.join(WINDOWS_DIR)
    }

    fn record_path(&self, id: WindowId) -> PathBuf {
        self.windows_dir().join(format!("{}.json", id))
    }

    fn count_path(&self) -> PathBuf {
        self.root.join(COUNT_FILE)
    }

    fn ensure_dirs(&self) -> Result<(), String> {
        fs::create_dir_all(self.windows_dir()).map_err(|err| {
            format!(
                "failed to create window store '{}': {}",
                self.root.display(),
                err
            )
        })
    }

    fn read_count(&self) -> WindowId {
        match read_json_if_exists::<WindowId>(&self.count_path()) {
            Ok(count) => count.unwrap_or(0),
            Err(err) => {
                warn!("ignoring unreadable id counter: {}", err);
                0
            }
        }
    }

    fn highest_record_id(&self) -> WindowId {
        fs::read_dir(self.windows_dir())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter_map(|entry| record_id(&entry.path()))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    fn write_record(
        &self,
        descriptor: &WindowDescriptor,
    ) -> Result<(), String> {
        write_json(&self.record_path(descriptor.id), descriptor).map_err(
            |err| {
                format!("failed to write window {}: {}", descriptor.id, err)
            },
        )
    }
}

impl WindowRegistry for FileRegistry {
    fn next_id(&self) -> Result<WindowId, String> {
        self.ensure_dirs()?;

        let start = self.read_count().max(self.highest_record_id()) + 1;

        for id in start..start + MAX_ID_PROBES {
            let claim = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.record_path(id));

            match claim {
                Ok(_) => {
                    if let Err(err) = write_json(&self.count_path(), &id) {
                        warn!("failed to persist id counter: {}", err);
                    }
                    trace!("claimed window id {}", id);
                    return Ok(id);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(format!(
                        "failed to claim window id {}: {}",
                        id, err
                    ));
                }
            }
        }

        Err(format!(
            "no free window id in {}..{}",
            start,
            start + MAX_ID_PROBES
        ))
    }

    fn register(&self, descriptor: WindowDescriptor) -> Result<(), String> {
        self.write_record(&descriptor)
    }

    fn unregister(&self, id: WindowId) -> Result<(), String> {
        storage::remove_if_exists(&self.record_path(id))
            .map_err(|err| format!("failed to remove window {}: {}", id, err))
    }

    fn update_shape(
        &self,
        id: WindowId,
        shape: WindowShape,
    ) -> Result<(), String> {
        let path = self.record_path(id);
        let metadata = read_json::<WindowDescriptor>(&path)
            .map(|descriptor| descriptor.metadata)
            .unwrap_or_else(|_| Metadata::default());

        self.write_record(&WindowDescriptor::new(id, shape, metadata))
    }

    fn list(&self) -> WindowSet {
        let entries = match fs::read_dir(self.windows_dir()) {
            Ok(entries) => entries,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!("failed to read window store: {}", err);
                }
                return vec![];
            }
        };

        let mut windows = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter_map(|path| {
                let id = record_id(&path)?;
                match read_json::<WindowDescriptor>(&path) {
                    Ok(descriptor) if descriptor.id == id => Some(descriptor),
                    // Claimed but not yet written, mid-replace, or junk.
                    Ok(_) | Err(_) => None,
                }
            })
            .collect::<Vec<_>>();

        windows.sort_by_key(|descriptor| descriptor.id);
        windows
    }

    fn subscribe(&self) -> Receiver<RegistryEvent> {
        let (tx, rx) = mpsc::channel();

        if let Err(err) = self.ensure_dirs() {
            warn!("store notifications unavailable: {}", err);
            return rx;
        }

        match StoreWatch::start(self.windows_dir(), tx) {
            Ok(watch) => self.watches.lock().push(watch),
            Err(err) => {
                warn!(
                    "store notifications unavailable for '{}': {}; relying on polling",
                    self.root.display(),
                    err
                );
            }
        }

        rx
    }

    fn clear(&self) -> Result<(), String> {
        self.watches.lock().clear();
        storage::remove_dir_if_exists(&self.root).map_err(|err| {
            format!(
                "failed to clear window store '{}': {}",
                self.root.display(),
                err
            )
        })
    }
}
