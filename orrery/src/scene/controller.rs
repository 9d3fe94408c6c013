use log::debug;

use crate::config::SceneConfig;
use crate::framework::math::Vec2;
use crate::motion::smoothing::smooth2;
use crate::registry::WindowDescriptor;
use crate::scene::force_line::{self, ForceLine};
use crate::scene::planet::Planet;

/// Owns the renderable state of one window: planets bound by index to the
/// shared window set, the lines between them, and the world offset that
/// cancels out this window's own screen position.
pub struct SceneController {
    config: SceneConfig,
    planets: Vec<Planet>,
    lines: Vec<ForceLine>,
    world_offset: Vec2,
    world_offset_target: Vec2,
}

impl SceneController {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            planets: vec![],
            lines: vec![],
            world_offset: [0.0, 0.0],
            world_offset_target: [0.0, 0.0],
        }
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn lines(&self) -> &[ForceLine] {
        &self.lines
    }

    pub fn world_offset(&self) -> Vec2 {
        self.world_offset
    }

    pub fn world_offset_target(&self) -> Vec2 {
        self.world_offset_target
    }

    /// Match planets to the first `max_planets` windows. Existing planets
    /// keep their state; only trailing ones are added or removed. Binding is
    /// by index, so if the set reorders a planet takes over whichever
    /// window now sits at its index.
    pub fn reconcile(&mut self, windows: &[WindowDescriptor]) {
        let windows = &windows[..windows.len().min(self.config.max_planets)];

        self.planets.truncate(windows.len());

        let existing = self.planets.len();
        for (index, window) in windows.iter().enumerate().skip(existing) {
            self.planets.push(Planet::for_index(
                index,
                window.shape.center(),
                &self.config,
            ));
        }

        self.lines =
            force_line::connect(&self.planets, self.config.line_color);

        debug!(
            "reconciled {} planets, {} lines",
            self.planets.len(),
            self.lines.len()
        );
    }

    /// Point the world offset at `-screen_position`. Without easing the
    /// offset jumps there immediately.
    pub fn set_offset_target(&mut self, screen_position: Vec2, easing: bool) {
        self.world_offset_target = [-screen_position[0], -screen_position[1]];
        if !easing {
            self.world_offset = self.world_offset_target;
        }
    }

    /// Advance one frame: ease the world offset and each planet toward its
    /// target, spin planets by `elapsed` seconds, and keep line endpoints on
    /// their planets.
    pub fn update_frame(&mut self, windows: &[WindowDescriptor], elapsed: f64) {
        let falloff = self.config.falloff;
        let [rate_x, rate_y] = self.config.rotation_rates;

        self.world_offset =
            smooth2(self.world_offset, self.world_offset_target, falloff);

        for planet in &mut self.planets {
            let Some(window) = windows.get(planet.index) else {
                continue;
            };

            planet.position =
                smooth2(planet.position, window.shape.center(), falloff);
            planet.rotation = [
                (elapsed * rate_x as f64) as f32,
                (elapsed * rate_y as f64) as f32,
            ];
        }

        for line in &mut self.lines {
            if let (Some(from), Some(to)) =
                (self.planets.get(line.from), self.planets.get(line.to))
            {
                line.start = from.position;
                line.end = to.position;
            }
        }
    }
}
