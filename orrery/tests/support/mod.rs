#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use orrery::prelude::*;

pub fn gpu_tests_enabled() -> bool {
    matches!(
        env::var("ORRERY_RUN_GPU_TESTS")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn shape(x: f32, y: f32) -> WindowShape {
    WindowShape::new(x, y, 800.0, 600.0)
}

pub fn start(registry: &Arc<dyn WindowRegistry>, x: f32, y: f32) -> Context {
    Context::start(
        registry.clone(),
        SceneConfig::default(),
        shape(x, y),
        Metadata::new(),
    )
    .expect("context should start")
}
