//! Timing abstractions
//!
//! Sleeping is expressed with [`embedded_hal::delay::DelayNs`]. Rate limiting
//! additionally needs to know how much time has passed, which is what
//! [`Monotonic`] provides.

/// Monotonic microsecond clock
///
/// The epoch is arbitrary; only differences between two readings are
/// meaningful. Readings never go backwards.
pub trait Monotonic {
    /// Microseconds since an arbitrary, fixed epoch
    fn now_micros(&self) -> u64;

    /// Microseconds elapsed since an earlier reading
    fn elapsed_since(&self, earlier: u64) -> u64 {
        self.now_micros().saturating_sub(earlier)
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_micros(&self) -> u64 {
        T::now_micros(self)
    }
}

/// Delay provider backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

/// Monotonic clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock whose epoch is now
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Monotonic for StdClock {
    fn now_micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}
