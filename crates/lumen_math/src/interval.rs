/// A closed range of ray parameters or channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// The same interval with its upper bound replaced.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// The unit interval [0, 1], used for channel clamping.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(1e-4, f64::INFINITY);

        // Exclusive bounds - the self-intersection epsilon is rejected
        assert!(!interval.surrounds(1e-4));
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(f64::INFINITY));

        assert!(interval.surrounds(2e-4));
        assert!(interval.surrounds(1e5));
    }

    #[test]
    fn test_interval_clamp() {
        assert_eq!(Interval::UNIT.clamp(-5.0), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.5), 0.5);
        assert_eq!(Interval::UNIT.clamp(15.0), 1.0);
    }

    #[test]
    fn test_interval_with_max() {
        let narrowed = Interval::new(1e-4, f64::INFINITY).with_max(3.0);
        assert_eq!(narrowed.min, 1e-4);
        assert_eq!(narrowed.max, 3.0);
    }
}
