//! Empty-channel detection.
//!
//! A channel is trivial when every value is exactly [`CHANNEL_MIN`] or
//! [`CHANNEL_MAX`]. A single value in between disqualifies it. Both
//! backends feed their scalars through [`TrivialityTracker`], whether the
//! values come from a pixel read or a render target readback.
//!
//! An empty sequence is trivial: nothing in it disqualifies it.

use mask_core::{CHANNEL_MAX, CHANNEL_MIN};

/// Returns `true` if every value is a boundary value (or there are none).
///
/// ```rust
/// use mask_ops::is_trivial;
///
/// assert!(is_trivial([0, 0, 255, 0]));
/// assert!(!is_trivial([0, 1, 255]));
/// assert!(is_trivial([]));
/// ```
pub fn is_trivial<I: IntoIterator<Item = u8>>(values: I) -> bool {
    let mut tracker = TrivialityTracker::new();
    for v in values {
        tracker.observe(v);
        if !tracker.is_trivial() {
            return false;
        }
    }
    tracker.is_trivial()
}

/// Running "constant so far" flag, fed one value at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrivialityTracker {
    trivial: bool,
    seen: usize,
}

impl Default for TrivialityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TrivialityTracker {
    /// Starts out trivial.
    pub const fn new() -> Self {
        Self {
            trivial: true,
            seen: 0,
        }
    }

    /// Records one value.
    #[inline]
    pub fn observe(&mut self, value: u8) {
        self.seen += 1;
        if value != CHANNEL_MIN && value != CHANNEL_MAX {
            self.trivial = false;
        }
    }

    /// Whether every value observed so far was a boundary value.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.trivial
    }

    /// Number of values observed.
    pub fn seen(&self) -> usize {
        self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_values_only() {
        assert!(is_trivial([0, 0, 255, 0]));
        assert!(is_trivial([255; 16]));
    }

    #[test]
    fn test_interior_value_disqualifies() {
        assert!(!is_trivial([0, 1, 255]));
        assert!(!is_trivial([254]));
    }

    #[test]
    fn test_empty_is_trivial() {
        assert!(is_trivial(std::iter::empty()));
        assert!(TrivialityTracker::new().is_trivial());
    }

    #[test]
    fn test_tracker_is_sticky() {
        let mut t = TrivialityTracker::new();
        t.observe(0);
        t.observe(128);
        t.observe(255);
        assert!(!t.is_trivial());
        assert_eq!(t.seen(), 3);
    }
}
