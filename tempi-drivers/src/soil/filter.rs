//! Sliding-window moisture filter
//!
//! Zero is the sensor's "no reading" value. Zero samples are dropped on the
//! way in, so a true reading of exactly 0 is indistinguishable from a missed
//! sample and is lost as well.

use heapless::HistoryBuffer;

/// Default number of samples averaged by [`SoilSensor`](super::SoilSensor)
pub const DEFAULT_WINDOW: usize = 8;

/// Fixed-capacity ring of the most recent non-zero moisture samples
///
/// Once full, each new sample overwrites the oldest one.
pub struct MoistureFilter<const N: usize> {
    samples: HistoryBuffer<u16, N>,
}

impl<const N: usize> Default for MoistureFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MoistureFilter<N> {
    /// Create an empty filter
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    /// Add a sample; returns false if it was discarded
    pub fn push(&mut self, sample: u16) -> bool {
        if sample == 0 {
            return false;
        }
        self.samples.write(sample);
        true
    }

    /// Arithmetic mean of the held samples, 0 when empty
    pub fn average(&self) -> u16 {
        let held = self.samples.as_slice();
        if held.is_empty() {
            return 0;
        }
        let sum: u32 = held.iter().map(|&s| u32::from(s)).sum();
        (sum / held.len() as u32) as u16
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True until the first non-zero sample arrives
    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    /// Window size
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop all held samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_average_skips_zero_samples() {
        let mut filter = MoistureFilter::<5>::new();
        for sample in [300, 0, 500, 0, 700] {
            filter.push(sample);
        }

        assert_eq!(filter.len(), 3);
        assert_eq!(filter.average(), 500);
    }

    #[test]
    fn test_all_zero_average() {
        let mut filter = MoistureFilter::<5>::new();
        for _ in 0..5 {
            assert!(!filter.push(0));
        }

        assert!(filter.is_empty());
        assert_eq!(filter.average(), 0);
    }

    #[test]
    fn test_window_overwrites_oldest() {
        let mut filter = MoistureFilter::<3>::new();
        for sample in [100, 200, 300, 400] {
            filter.push(sample);
        }

        // 100 has been pushed out
        assert_eq!(filter.len(), 3);
        assert_eq!(filter.average(), 300);
    }

    #[test]
    fn test_clear() {
        let mut filter = MoistureFilter::<4>::new();
        filter.push(1_000);
        filter.clear();

        assert!(filter.is_empty());
        assert_eq!(filter.average(), 0);
        assert_eq!(filter.capacity(), 4);
    }

    #[test]
    fn test_average_does_not_overflow() {
        let mut filter = MoistureFilter::<8>::new();
        for _ in 0..8 {
            filter.push(u16::MAX);
        }
        assert_eq!(filter.average(), u16::MAX);
    }

    proptest! {
        #[test]
        fn prop_average_within_held_range(samples in proptest::collection::vec(any::<u16>(), 0..40)) {
            let mut filter = MoistureFilter::<DEFAULT_WINDOW>::new();
            for &s in &samples {
                filter.push(s);
            }

            let held: Vec<u16> = samples.iter().copied().filter(|&s| s != 0).collect();
            let window = &held[held.len().saturating_sub(DEFAULT_WINDOW)..];

            prop_assert_eq!(filter.len(), window.len());
            if window.is_empty() {
                prop_assert_eq!(filter.average(), 0);
            } else {
                let min = *window.iter().min().unwrap();
                let max = *window.iter().max().unwrap();
                let avg = filter.average();
                prop_assert!(avg >= min && avg <= max);
            }
        }
    }
}
