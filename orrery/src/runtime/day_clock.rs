use chrono::{Local, NaiveTime, Timelike};

/// Seconds since local midnight. Every window on the machine reads the same
/// wall clock, so planets spin in step across processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DayClock;

impl DayClock {
    pub fn new() -> Self {
        Self
    }

    pub fn seconds(&self) -> f64 {
        Self::seconds_at(Local::now().time())
    }

    pub fn seconds_at(time: NaiveTime) -> f64 {
        // Leap seconds report nanos past 1e9; fold them into the same second.
        let nanos = time.nanosecond().min(999_999_999);
        time.num_seconds_from_midnight() as f64 + nanos as f64 / 1e9
    }
}
