use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::framework::math::Rgba;

pub const MAX_SPHERE_SEGMENTS: u32 = 256;

/// Tunables for the planet scene and its window loop. Every field has a
/// default so a YAML override file only needs the keys it changes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub max_planets: usize,
    /// Low-pass factor applied per frame to planet positions and the world
    /// offset.
    pub falloff: f32,
    pub base_radius: f32,
    pub radius_step: f32,
    pub hue_step: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub sphere_segments: u32,
    /// Radians per second about the X and Y axes.
    pub rotation_rates: [f32; 2],
    pub line_color: Rgba,
    pub poll_interval_ms: u64,
    pub init_delay_ms: u64,
    pub fps: f32,
    pub window_size: [u32; 2],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_planets: 4,
            falloff: 0.05,
            base_radius: 100.0,
            radius_step: 50.0,
            hue_step: 0.1,
            saturation: 1.0,
            lightness: 0.5,
            sphere_segments: 16,
            rotation_rates: [0.5, 0.3],
            line_color: [0.0, 1.0, 0.0, 0.5],
            poll_interval_ms: 250,
            init_delay_ms: 500,
            fps: 60.0,
            window_size: [800, 600],
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|err| {
            format!("failed to read config '{}': {}", path.display(), err)
        })?;
        Self::from_yaml(&yaml).map_err(|err| {
            format!("failed to parse config '{}': {}", path.display(), err)
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config = serde_yml::from_str::<Self>(yaml)
            .map_err(|err| err.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.falloff > 0.0 && self.falloff <= 1.0) {
            return Err(format!(
                "falloff must be in (0, 1], got {}",
                self.falloff
            ));
        }
        if !(3..=MAX_SPHERE_SEGMENTS).contains(&self.sphere_segments) {
            return Err(format!(
                "sphere_segments must be in [3, {}], got {}",
                MAX_SPHERE_SEGMENTS, self.sphere_segments
            ));
        }
        if self.fps <= 0.0 {
            return Err(format!("fps must be positive, got {}", self.fps));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SceneConfig::from_yaml("max_planets: 6\nfalloff: 0.1\n")
            .expect("parse partial config");

        assert_eq!(config.max_planets, 6);
        assert_eq!(config.falloff, 0.1);
        assert_eq!(config.base_radius, 100.0);
        assert_eq!(config.rotation_rates, [0.5, 0.3]);
    }

    #[test]
    fn rejects_falloff_outside_unit_interval() {
        let err = SceneConfig::from_yaml("falloff: 1.5\n")
            .expect_err("falloff > 1 must fail");
        assert!(err.contains("falloff"));

        assert!(SceneConfig::from_yaml("falloff: 0.0\n").is_err());
    }

    #[test]
    fn sphere_segments_are_bounded() {
        assert!(SceneConfig::from_yaml("sphere_segments: 2").is_err());
        assert!(SceneConfig::from_yaml("sphere_segments: 256").is_ok());
        assert!(SceneConfig::from_yaml("sphere_segments: 50000").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SceneConfig::load("/definitely/not/here.yaml")
            .expect_err("missing file must fail");
        assert!(err.contains("failed to read config"));
    }
}
