use std::time::{Duration, Instant};

pub struct PerformanceTimer {
    start: Instant,
}

impl PerformanceTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for PerformanceTimer {
    fn default() -> Self {
        Self::new()
    }
}
