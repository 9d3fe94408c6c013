use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::config::SceneConfig;
use crate::registry::file_store::FileRegistry;
use crate::registry::memory::MemoryRegistry;
use crate::registry::storage::DEFAULT_SESSION;
use crate::registry::{Metadata, WindowRegistry};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RegistryBackend {
    /// Shared with every process using the same session.
    #[default]
    File,
    /// Private to this process.
    Memory,
}

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub session: String,
    pub store_dir: Option<PathBuf>,
    pub backend: RegistryBackend,
    /// Windows to open at launch in this process.
    pub windows: usize,
    /// Wipe the shared store and exit without opening anything.
    pub clear: bool,
    pub config: SceneConfig,
    pub metadata: Metadata,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            session: DEFAULT_SESSION.to_string(),
            store_dir: None,
            backend: RegistryBackend::default(),
            windows: 1,
            clear: false,
            config: SceneConfig::default(),
            metadata: Metadata::default(),
        }
    }
}

pub enum Prepared {
    Cleared,
    Ready(Arc<dyn WindowRegistry>),
}

pub fn open_registry(
    options: &LaunchOptions,
) -> Result<Arc<dyn WindowRegistry>, String> {
    Ok(match options.backend {
        RegistryBackend::Memory => Arc::new(MemoryRegistry::new()),
        RegistryBackend::File => Arc::new(FileRegistry::for_session(
            options.store_dir.as_deref(),
            &options.session,
        )?),
    })
}

/// Open the registry, or clear it when asked to and stop there.
pub fn prepare(options: &LaunchOptions) -> Result<Prepared, String> {
    options.config.validate()?;
    let registry = open_registry(options)?;

    if options.clear {
        registry.clear()?;
        info!("cleared window store for session '{}'", options.session);
        return Ok(Prepared::Cleared);
    }

    Ok(Prepared::Ready(registry))
}
