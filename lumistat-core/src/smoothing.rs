//! Exponential smoothing of volatile metrics.
//!
//! Raw load figures jump around far too much for a 10 fps bar display,
//! so each metric keeps a displayed value that chases the reported one
//! geometrically. Convergence is a function of the render tick period;
//! the filter itself never clamps - `draw_bar` is responsible for
//! keeping the displayed value inside the surface.

/// Fraction of the remaining gap closed per render tick
pub const SMOOTHING_ALPHA: f32 = 0.1;

/// A metric with a reported target and a displayed, filtered value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Smoothed {
    current: f32,
    target: f32,
}

impl Smoothed {
    /// Create a filter at rest at zero
    pub const fn new() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
        }
    }

    /// Update the reported value the display should chase
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Advance one render tick and return the new displayed value
    pub fn step(&mut self) -> f32 {
        self.current += (self.target - self.current) * SMOOTHING_ALPHA;
        self.current
    }

    /// The displayed value as of the last step
    pub fn value(&self) -> f32 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_point_is_stable() {
        let mut metric = Smoothed::new();
        metric.set_target(0.0);
        assert_eq!(metric.step(), 0.0);

        let mut metric = Smoothed {
            current: 42.0,
            target: 42.0,
        };
        assert_eq!(metric.step(), 42.0);
    }

    #[test]
    fn test_converges_toward_target() {
        let mut metric = Smoothed::new();
        metric.set_target(55.0);

        let mut previous_gap = 55.0f32;
        for _ in 0..100 {
            let value = metric.step();
            let gap = (55.0 - value).abs();
            assert!(gap < previous_gap, "gap must shrink every tick");
            assert!(value <= 55.0, "must never overshoot a constant target");
            previous_gap = gap;
        }
        assert!(previous_gap < 0.01);
    }

    #[test]
    fn test_first_step_closes_ten_percent() {
        let mut metric = Smoothed::new();
        metric.set_target(100.0);
        assert!((metric.step() - 10.0).abs() < 1e-4);
        assert!((metric.step() - 19.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn test_gap_shrinks_for_any_start(current in -1e3f32..1e3, target in -1e3f32..1e3) {
            let mut metric = Smoothed { current, target };
            let before = (target - current).abs();
            metric.step();
            let after = (target - metric.value()).abs();
            prop_assert!(after <= before);
        }
    }
}
