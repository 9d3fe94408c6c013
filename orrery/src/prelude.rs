pub use crate::config::SceneConfig;
pub use crate::framework::logging::init_logger;
pub use crate::framework::logging::{debug, error, info, trace, warn};
pub use crate::motion::smoothing::{smooth, smooth2};
pub use crate::registry::file_store::FileRegistry;
pub use crate::registry::memory::MemoryRegistry;
pub use crate::registry::{
    Metadata, RegistryEvent, WindowDescriptor, WindowId, WindowRegistry,
    WindowSet, WindowShape,
};
pub use crate::{run, run_with_channels};
pub use crate::runtime::context::Context;
pub use crate::runtime::day_clock::DayClock;
pub use crate::runtime::events::{
    RuntimeCommand, RuntimeCommandReceiver, RuntimeCommandSender, RuntimeEvent,
    RuntimeEventReceiver, RuntimeEventSender, command_channel, event_channel,
};
pub use crate::runtime::frame_clock::FrameClock;
pub use crate::runtime::startup::{
    LaunchOptions, Prepared, RegistryBackend, prepare,
};
pub use crate::scene::controller::SceneController;
pub use crate::scene::force_line::ForceLine;
pub use crate::scene::planet::Planet;
pub use crate::window::manager::{ManagerUpdate, WindowManager};
