use crate::config::SceneConfig;
use crate::framework::math::{Rgba, Vec2, hsl_to_rgb};

/// A wireframe sphere bound to the window at `index` in the shared set.
#[derive(Clone, Debug, PartialEq)]
pub struct Planet {
    pub index: usize,
    pub radius: f32,
    pub color: Rgba,
    pub position: Vec2,
    /// Radians about the X and Y axes.
    pub rotation: Vec2,
}

impl Planet {
    /// Radius and colour depend only on `index`; the planet starts exactly
    /// at `center`.
    pub fn for_index(index: usize, center: Vec2, config: &SceneConfig) -> Self {
        let [r, g, b] = hsl_to_rgb(
            index as f32 * config.hue_step,
            config.saturation,
            config.lightness,
        );

        Self {
            index,
            radius: config.base_radius + index as f32 * config.radius_step,
            color: [r, g, b, 1.0],
            position: center,
            rotation: [0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_with_index() {
        let config = SceneConfig::default();
        let radii = (0..4)
            .map(|i| Planet::for_index(i, [0.0, 0.0], &config).radius)
            .collect::<Vec<_>>();
        assert_eq!(radii, vec![100.0, 150.0, 200.0, 250.0]);
    }

    #[test]
    fn first_planet_is_red_and_placed_at_center() {
        let planet =
            Planet::for_index(0, [400.0, 300.0], &SceneConfig::default());
        assert_eq!(planet.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(planet.position, [400.0, 300.0]);
        assert_eq!(planet.rotation, [0.0, 0.0]);
    }

    #[test]
    fn hue_steps_per_index() {
        let config = SceneConfig::default();
        let a = Planet::for_index(1, [0.0, 0.0], &config);
        let b = Planet::for_index(2, [0.0, 0.0], &config);
        assert_ne!(a.color, b.color);
        assert_eq!(a.color[3], 1.0);
    }
}
