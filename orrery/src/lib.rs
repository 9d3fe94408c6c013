pub mod config;
pub mod framework;
pub mod motion;
pub mod prelude;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod scene;
pub mod window;

pub use runtime::app::{run, run_with_channels};
