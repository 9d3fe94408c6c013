pub mod app;
pub mod context;
pub mod day_clock;
pub mod events;
pub mod frame_clock;
pub mod startup;
