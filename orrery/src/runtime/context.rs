use std::sync::Arc;
use std::time::Instant;

use crate::config::SceneConfig;
use crate::registry::{Metadata, WindowId, WindowRegistry, WindowShape};
use crate::runtime::day_clock::DayClock;
use crate::scene::controller::SceneController;
use crate::window::manager::{ManagerUpdate, WindowManager};

/// Everything one window needs between frames: its registry membership,
/// its scene and its clock.
pub struct Context {
    manager: WindowManager,
    scene: SceneController,
    clock: DayClock,
}

impl Context {
    /// Register the window, snap the world offset to its position and build
    /// the initial planets.
    pub fn start(
        registry: Arc<dyn WindowRegistry>,
        config: SceneConfig,
        shape: WindowShape,
        metadata: Metadata,
    ) -> Result<Self, String> {
        let mut manager = WindowManager::new(registry, config.poll_interval());
        manager.init(shape, metadata)?;

        let mut scene = SceneController::new(config);
        scene.set_offset_target(shape.position(), false);
        scene.reconcile(manager.windows());

        Ok(Self {
            manager,
            scene,
            clock: DayClock::new(),
        })
    }

    pub fn id(&self) -> Option<WindowId> {
        self.manager.id()
    }

    pub fn manager(&self) -> &WindowManager {
        &self.manager
    }

    pub fn scene(&self) -> &SceneController {
        &self.scene
    }

    pub fn frame(
        &mut self,
        shape: Option<WindowShape>,
        now: Instant,
    ) -> ManagerUpdate {
        let elapsed = self.clock.seconds();
        self.frame_at(shape, now, elapsed)
    }

    /// One frame with an explicit scene time in seconds.
    pub fn frame_at(
        &mut self,
        shape: Option<WindowShape>,
        now: Instant,
        elapsed: f64,
    ) -> ManagerUpdate {
        let update = self.manager.update(shape, now);

        if update.shape_changed {
            self.scene
                .set_offset_target(self.manager.shape().position(), true);
        }

        if update.windows_changed {
            self.scene.reconcile(self.manager.windows());
        }

        self.scene.update_frame(self.manager.windows(), elapsed);

        update
    }

    pub fn close(mut self) {
        self.manager.close();
    }
}
