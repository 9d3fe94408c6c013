//! Single-pole low-pass smoothing. Each call moves `current` a fixed
//! fraction of the remaining distance toward `target`, so for a factor in
//! `(0, 1]` the error shrinks by `1 - factor` per step and never changes
//! sign.

use crate::framework::math::Vec2;

pub fn smooth(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

pub fn smooth2(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    [
        smooth(current[0], target[0], factor),
        smooth(current[1], target[1], factor),
    ]
}
