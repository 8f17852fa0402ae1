/// A closed range of ray distances (or coordinates along one axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns the same interval with its upper bound lowered to `max`.
    ///
    /// Used to shrink the search range as closer hits are found.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, self.max.min(max))
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        // Outside bounds
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
        assert!(!interval.contains(f32::NAN));
    }

    #[test]
    fn test_interval_with_max() {
        let interval = Interval::new(0.0, 10.0);

        assert_eq!(interval.with_max(4.0), Interval::new(0.0, 4.0));
        // Never grows
        assert_eq!(interval.with_max(20.0), interval);
    }

    #[test]
    fn test_interval_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);

        // Expanded by 2.0 on each side (4.0 / 2)
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
        assert_eq!(expanded.size(), 14.0);
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(empty.size() < 0.0);
        assert!(!empty.contains(0.0));
        assert!(!empty.contains(f32::INFINITY));
    }

    #[test]
    fn test_interval_surrounding() {
        let a = Interval::new(1.0, 5.0);
        let b = Interval::new(-2.0, 3.0);

        assert_eq!(Interval::surrounding(&a, &b), Interval::new(-2.0, 5.0));
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
    }
}
