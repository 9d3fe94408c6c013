use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TickResult {
    pub should_render: bool,
    pub frames_advanced: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LoopState {
    Running,
    Paused,
    Stopped,
}

/// Paces the frame loop at a fixed rate. The loop can be paused, stepped a
/// frame at a time while paused, and stopped for good.
#[derive(Debug)]
pub struct FrameClock {
    fps: f32,
    frame_count: u64,
    state: LoopState,
    step_requested: bool,
    last_tick: Instant,
    accumulator: Duration,
    frame_intervals: VecDeque<Duration>,
    max_intervals: usize,
}

impl FrameClock {
    pub fn new(fps: f32) -> Self {
        Self::with_start(fps, Instant::now())
    }

    pub fn with_start(fps: f32, now: Instant) -> Self {
        Self {
            fps: fps.max(1.0),
            frame_count: 0,
            state: LoopState::Running,
            step_requested: false,
            last_tick: now,
            accumulator: Duration::ZERO,
            frame_intervals: VecDeque::new(),
            max_intervals: 90,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn paused(&self) -> bool {
        self.state == LoopState::Paused
    }

    pub fn stopped(&self) -> bool {
        self.state == LoopState::Stopped
    }

    /// No effect once stopped.
    pub fn set_paused(&mut self, paused: bool) {
        self.state = match (self.state, paused) {
            (LoopState::Stopped, _) => LoopState::Stopped,
            (_, true) => LoopState::Paused,
            (_, false) => LoopState::Running,
        };
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.step_requested = false;
    }

    pub fn advance_single_frame(&mut self) {
        if !self.stopped() {
            self.step_requested = true;
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fps)
    }

    pub fn next_deadline(&self) -> Instant {
        let remaining = self
            .frame_duration()
            .checked_sub(self.accumulator)
            .unwrap_or_default();
        self.last_tick + remaining
    }

    pub fn average_fps(&self) -> f32 {
        if self.frame_intervals.is_empty() {
            return 0.0;
        }

        let sum: Duration = self.frame_intervals.iter().copied().sum();
        let avg = sum / self.frame_intervals.len() as u32;

        if avg.is_zero() {
            return 0.0;
        }

        1.0 / avg.as_secs_f32()
    }

    pub fn tick(&mut self, now: Instant) -> TickResult {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        match self.state {
            LoopState::Stopped => return TickResult::default(),
            LoopState::Paused => {
                // No catch-up debt builds while paused.
                self.accumulator = Duration::ZERO;
                if !self.step_requested {
                    return TickResult::default();
                }
                self.step_requested = false;
                return self.advance(1, elapsed);
            }
            LoopState::Running => {}
        }

        self.accumulator += elapsed;

        if self.step_requested {
            self.step_requested = false;
            return self.advance(1, elapsed);
        }

        let frame_duration = self.frame_duration();
        let mut advanced = 0u32;

        while self.accumulator >= frame_duration {
            self.accumulator -= frame_duration;
            advanced += 1;
        }

        self.advance(advanced, elapsed)
    }

    fn advance(&mut self, frames: u32, interval: Duration) -> TickResult {
        if frames == 0 {
            return TickResult::default();
        }

        self.frame_count += frames as u64;
        self.frame_intervals.push_back(interval);
        if self.frame_intervals.len() > self.max_intervals {
            self.frame_intervals.pop_front();
        }

        TickResult {
            should_render: true,
            frames_advanced: frames,
        }
    }
}
