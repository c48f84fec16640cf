//! Frame pacing clock

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

/// Frame times kept for the fps average
const FPS_SAMPLES: usize = 10;

/// Paces the game loop to a target tick rate and tracks frame timing
pub struct FrameClock {
    /// Target iterations per second, 0 means unlimited
    pub tick_rate: u32,
    /// Time between the last two frame boundaries, in seconds
    pub delta_time: f64,
    /// Total elapsed time since the last reset, in seconds
    pub total_time: f64,
    /// Frames completed since the last reset
    pub frame_count: u64,
    /// Last frame boundary
    last_instant: Instant,
    samples: VecDeque<f64>,
}

impl FrameClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_rate,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            samples: VecDeque::with_capacity(FPS_SAMPLES),
        }
    }

    /// Time budget of one iteration, `None` when pacing is disabled
    pub fn frame_budget(&self) -> Option<Duration> {
        (self.tick_rate > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(self.tick_rate)))
    }

    /// Start counting from now. Call when a run begins.
    pub fn reset(&mut self) {
        self.delta_time = 0.0;
        self.total_time = 0.0;
        self.frame_count = 0;
        self.samples.clear();
        self.last_instant = Instant::now();
    }

    /// Block until the frame budget has elapsed since the previous boundary,
    /// then mark a new boundary. Returns the time since the previous boundary.
    pub fn tick(&mut self) -> Duration {
        if let Some(budget) = self.frame_budget() {
            let elapsed = self.last_instant.elapsed();
            if elapsed < budget {
                thread::sleep(budget - elapsed);
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant);
        self.last_instant = now;

        self.delta_time = elapsed.as_secs_f64();
        self.total_time += self.delta_time;
        self.frame_count += 1;
        if self.samples.len() == FPS_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(self.delta_time);

        elapsed
    }

    /// Average frames per second over the last few frames
    pub fn fps(&self) -> f64 {
        let total: f64 = self.samples.iter().sum();
        if total > 0.0 {
            self.samples.len() as f64 / total
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(30)
    }
}
