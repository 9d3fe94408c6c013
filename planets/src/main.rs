use std::path::PathBuf;

use clap::Parser;
use orrery::prelude::*;

/// Open planet windows that share one scene across processes.
#[derive(Debug, Parser)]
#[command(name = "planets", version)]
struct Args {
    /// Remove every window record for the session and exit
    #[arg(long)]
    clear: bool,

    /// Namespace for the shared window store
    #[arg(long, env = "ORRERY_SESSION", default_value = "default")]
    session: String,

    /// Store root instead of the user cache directory
    #[arg(long = "store-dir")]
    store_dir: Option<PathBuf>,

    /// Windows to open in this process
    #[arg(long, default_value_t = 1)]
    windows: usize,

    /// Keep the registry in memory (windows in this process only)
    #[arg(long)]
    memory: bool,

    #[arg(long)]
    fps: Option<f32>,

    /// YAML scene configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stored with the window record as `name`
    #[arg(long, default_value = "planets")]
    name: String,
}

fn main() {
    init_logger();

    let args = Args::parse();

    if let Err(err) = launch(args) {
        eprintln!("planets failed: {}", err);
        std::process::exit(1);
    }
}

fn launch(args: Args) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.fps = fps;
    }

    let mut metadata = Metadata::new();
    metadata.insert("name".to_string(), args.name);

    let options = LaunchOptions {
        session: args.session,
        store_dir: args.store_dir,
        backend: if args.memory {
            RegistryBackend::Memory
        } else {
            RegistryBackend::File
        },
        windows: args.windows,
        clear: args.clear,
        config,
        metadata,
    };

    debug!("launching with {:?}", options);

    run(options)
}
