use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Returns the number of milliseconds since UNIX EPOCH
#[inline]
pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or_default()
}

/// A source of network-adjusted time, used by block sanity rules which reject
/// timestamps too far in the future.
pub trait TimeSource: Send + Sync {
    /// Current adjusted time in milliseconds since UNIX EPOCH
    fn adjusted_time(&self) -> u64;
}

/// A [`TimeSource`] backed by the local system clock with a fixed offset
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource {
    offset_millis: i64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset_millis: i64) -> Self {
        Self { offset_millis }
    }
}

impl TimeSource for SystemTimeSource {
    fn adjusted_time(&self) -> u64 {
        unix_now().saturating_add_signed(self.offset_millis)
    }
}

/// Stopwatch which reports on drop if the timed operation passed the threshold `TR` in milliseconds
pub struct Stopwatch<const TR: u64 = 1000> {
    name: &'static str,
    start: Instant,
}

impl Stopwatch {
    pub fn new(name: &'static str) -> Self {
        Self { name, start: Instant::now() }
    }
}

impl<const TR: u64> Stopwatch<TR> {
    pub fn with_threshold(name: &'static str) -> Self {
        Self { name, start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<const TR: u64> Drop for Stopwatch<TR> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if elapsed > Duration::from_millis(TR) {
            czz_core::trace!("[{}] Abnormal time: {:#?}", self.name, elapsed);
        }
    }
}
