use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct CspStats {
    request_count: AtomicUsize,
    compile_count: AtomicUsize,
    compile_failure_count: AtomicUsize,
    header_count: AtomicUsize,
    policy_update_count: AtomicUsize,
    header_generation_time_ns: AtomicUsize,
    timed_pass_count: AtomicUsize,
    start_time: Instant,
}

impl Default for CspStats {
    fn default() -> Self {
        Self {
            request_count: Default::default(),
            compile_count: Default::default(),
            compile_failure_count: Default::default(),
            header_count: Default::default(),
            policy_update_count: Default::default(),
            header_generation_time_ns: Default::default(),
            timed_pass_count: Default::default(),
            start_time: Instant::now(),
        }
    }
}

impl CspStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn compile_count(&self) -> usize {
        self.compile_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn compile_failure_count(&self) -> usize {
        self.compile_failure_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn header_count(&self) -> usize {
        self.header_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn policy_update_count(&self) -> usize {
        self.policy_update_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn header_generation_time_ns(&self) -> usize {
        self.header_generation_time_ns.load(Ordering::Relaxed)
    }

    /// Middleware passes that completed and recorded their generation time.
    #[inline]
    pub fn timed_pass_count(&self) -> usize {
        self.timed_pass_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn avg_header_generation_time_ns(&self) -> f64 {
        let count = self.timed_pass_count.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            self.header_generation_time_ns.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    #[inline]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    #[inline]
    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_compile_count(&self) {
        self.compile_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_compile_failure_count(&self) {
        self.compile_failure_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_header_count(&self) {
        self.header_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_policy_update_count(&self) {
        self.policy_update_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_header_generation_time(&self, time_ns: usize) {
        self.header_generation_time_ns
            .fetch_add(time_ns, Ordering::Relaxed);
        self.timed_pass_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.compile_count.store(0, Ordering::Relaxed);
        self.compile_failure_count.store(0, Ordering::Relaxed);
        self.header_count.store(0, Ordering::Relaxed);
        self.policy_update_count.store(0, Ordering::Relaxed);
        self.header_generation_time_ns.store(0, Ordering::Relaxed);
        self.timed_pass_count.store(0, Ordering::Relaxed);
    }
}

impl fmt::Display for CspStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSP Middleware Statistics:")?;
        writeln!(f, "  Uptime: {} seconds", self.uptime_secs())?;
        writeln!(f, "  Requests processed: {}", self.request_count())?;
        writeln!(f, "  Policies compiled: {}", self.compile_count())?;
        writeln!(f, "  Compilation failures: {}", self.compile_failure_count())?;
        writeln!(f, "  Headers emitted: {}", self.header_count())?;
        writeln!(f, "  Policy reloads: {}", self.policy_update_count())?;
        writeln!(
            f,
            "  Average header generation time: {:.2} ns",
            self.avg_header_generation_time_ns()
        )?;
        Ok(())
    }
}
