//! Millisecond time abstraction for platform-agnostic timing.
//!
//! Embedded tick counters are 32-bit and wrap roughly every 49.7 days, so every
//! elapsed-time computation in this crate goes through [`Millis::elapsed_since`].

/// A monotonic millisecond instant that wraps at 2^32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// The zero instant.
    pub const ZERO: Self = Millis(0);

    /// Milliseconds elapsed since `earlier`, correct across a counter wrap.
    #[inline]
    pub fn elapsed_since(self, earlier: Millis) -> u32 {
        if self.0 >= earlier.0 {
            self.0 - earlier.0
        } else {
            (u32::MAX - earlier.0) + self.0 + 1
        }
    }

    /// Shifts the instant forward, wrapping at 2^32.
    #[inline]
    pub fn wrapping_add(self, millis: u32) -> Millis {
        Millis(self.0.wrapping_add(millis))
    }

    /// Raw counter value.
    #[inline]
    pub fn as_millis(self) -> u32 {
        self.0
    }
}

impl From<u32> for Millis {
    fn from(millis: u32) -> Self {
        Millis(millis)
    }
}

/// Trait for abstracting time sources.
///
/// Implement this over your platform's millisecond tick (SysTick counter,
/// `embassy_time::Instant::now().as_millis() as u32`, an RTC, ...).
pub trait TimeSource {
    /// Returns the current time instant.
    fn now(&self) -> Millis;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_without_wrap() {
        assert_eq!(Millis(1500).elapsed_since(Millis(500)), 1000);
        assert_eq!(Millis(42).elapsed_since(Millis(42)), 0);
    }

    #[test]
    fn elapsed_across_wrap_matches_modular_difference() {
        let pairs = [
            (u32::MAX, 0u32),
            (u32::MAX - 999, 1000),
            (u32::MAX - 10, 5),
            (1, 0),
            (0x8000_0000, 0x7FFF_FFFF),
        ];

        for (start, now) in pairs {
            assert_eq!(
                Millis(now).elapsed_since(Millis(start)),
                now.wrapping_sub(start)
            );
        }
    }

    #[test]
    fn wrapping_add_rolls_over() {
        assert_eq!(Millis(u32::MAX).wrapping_add(1), Millis(0));
        assert_eq!(Millis(u32::MAX - 9).wrapping_add(20), Millis(10));
    }
}
