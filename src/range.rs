use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The closed interval a price is known to lie in.
///
/// Always satisfies `min < max` with both bounds (and the span between them) finite,
/// including when loaded through serde.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceRange")]
pub struct PriceRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawPriceRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawPriceRange> for PriceRange {
    type Error = ConfigurationError;

    fn try_from(raw: RawPriceRange) -> Result<Self, Self::Error> {
        PriceRange::new(raw.min, raw.max)
    }
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigurationError> {
        // Written so that NaN bounds fail as well
        if !(min < max) || !(max - min).is_finite() {
            return Err(ConfigurationError::InvalidRange { min, max });
        }
        debug!("price range configured as [{}, {}]", min, max);
        Ok(PriceRange { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Maps `x` affinely so that `min` lands on 0 and `max` on 1.
    /// Values outside the range extrapolate past the unit interval.
    pub fn normalize(&self, x: f64) -> f64 {
        (x - self.min) / self.span()
    }

    pub fn denormalize(&self, y: f64) -> f64 {
        y * self.span() + self.min
    }
}

pub fn normalize(x: f64, range: PriceRange) -> f64 {
    range.normalize(x)
}

pub fn denormalize(y: f64, range: PriceRange) -> f64 {
    range.denormalize(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bounds_map_to_unit_interval() {
        let range = PriceRange::new(240.0, 60000.0).unwrap();
        assert_eq!(normalize(240.0, range), 0.0);
        assert_eq!(normalize(60000.0, range), 1.0);
        assert_relative_eq!(normalize(30120.0, range), 0.5);
    }

    #[test]
    fn out_of_range_values_extrapolate() {
        let range = PriceRange::new(240.0, 60000.0).unwrap();
        assert!(normalize(0.0, range) < 0.0);
        assert!(normalize(120000.0, range) > 1.0);
        assert!(!range.contains(120000.0));
        assert_relative_eq!(denormalize(2.0, range), 119760.0);
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert_eq!(
            PriceRange::new(60000.0, 240.0),
            Err(ConfigurationError::InvalidRange {
                min: 60000.0,
                max: 240.0
            })
        );
    }

    #[test]
    fn empty_and_non_finite_ranges_are_rejected() {
        assert!(PriceRange::new(5.0, 5.0).is_err());
        assert!(PriceRange::new(f64::NAN, 5.0).is_err());
        assert!(PriceRange::new(0.0, f64::INFINITY).is_err());
        assert!(PriceRange::new(f64::MIN, f64::MAX).is_err());
    }

    #[test]
    fn round_trip_inside_and_outside_range() {
        let range = PriceRange::new(240.0, 60000.0).unwrap();
        for price in [240.0, 242.0, 12345.0, 12346.0, 59999.99, -1000.0, 1.0e6] {
            assert_relative_eq!(
                denormalize(normalize(price, range), range),
                price,
                max_relative = 1e-12
            );
        }
    }
}
