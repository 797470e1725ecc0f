//! Fixed-point encoding of reals as signed integers scaled by `2^scale`.

use crate::error::{ConfigurationError, OverflowError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Narrowest container that still has a sign bit and one value bit
pub const MIN_WIDTH: u32 = 2;
pub const MAX_WIDTH: u32 = 64;

/// A real number stored as `round(x * 2^scale)` in a signed container.
/// The integer is held in an `i64` whatever the container width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FixedPointValue(i64);

impl FixedPointValue {
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl From<i64> for FixedPointValue {
    fn from(raw: i64) -> Self {
        FixedPointValue(raw)
    }
}

impl From<i32> for FixedPointValue {
    fn from(raw: i32) -> Self {
        FixedPointValue(i64::from(raw))
    }
}

impl TryFrom<FixedPointValue> for i32 {
    type Error = std::num::TryFromIntError;

    fn try_from(value: FixedPointValue) -> std::result::Result<Self, Self::Error> {
        i32::try_from(value.0)
    }
}

/// Scale exponent and container width of a fixed-point encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFixedPointConfig")]
pub struct FixedPointConfig {
    scale: u32,
    width: u32,
}

#[derive(Deserialize)]
struct RawFixedPointConfig {
    scale: u32,
    width: u32,
}

impl TryFrom<RawFixedPointConfig> for FixedPointConfig {
    type Error = ConfigurationError;

    fn try_from(raw: RawFixedPointConfig) -> std::result::Result<Self, Self::Error> {
        FixedPointConfig::new(raw.scale, raw.width)
    }
}

impl FixedPointConfig {
    /// Fails unless `width` is in `2..=64` and `scale < width - 1`, so that at
    /// least one bit above the fraction is left for the sign.
    pub fn new(scale: u32, width: u32) -> std::result::Result<Self, ConfigurationError> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(ConfigurationError::UnsupportedWidth(width));
        }
        if scale >= width - 1 {
            return Err(ConfigurationError::InsufficientHeadroom { scale, width });
        }
        debug!("fixed point configured with scale {} in {} bits", scale, width);
        Ok(FixedPointConfig { scale, width })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Distance between adjacent encodable reals, `2^-scale`.
    pub fn resolution(&self) -> f64 {
        1.0 / scale_factor(self.scale)
    }

    /// Smallest real that encodes without overflow.
    pub fn min_value(&self) -> f64 {
        self.container_min() as f64 / scale_factor(self.scale)
    }

    /// Largest real that encodes without overflow (up to f64 rounding for 64-bit containers).
    pub fn max_value(&self) -> f64 {
        self.container_max() as f64 / scale_factor(self.scale)
    }

    fn container_min(&self) -> i64 {
        i64::MIN >> (MAX_WIDTH - self.width)
    }

    fn container_max(&self) -> i64 {
        i64::MAX >> (MAX_WIDTH - self.width)
    }

    pub fn to_fixed(&self, x: f64) -> std::result::Result<FixedPointValue, OverflowError> {
        // Scale, then round half away from zero
        let rounded = (x * scale_factor(self.scale)).round();
        // -2^(W-1) is exact in f64 for every supported width, and every integral
        // f64 strictly below 2^(W-1) fits the container.
        let limit = 2.0_f64.powi(self.width as i32 - 1);
        // Checked after rounding; NaN and infinities never fit
        if rounded.is_nan() || rounded < -limit || rounded >= limit {
            return Err(OverflowError {
                value: x,
                scale: self.scale,
                width: self.width,
            });
        }
        Ok(FixedPointValue(rounded as i64))
    }

    pub fn from_fixed(&self, n: FixedPointValue) -> f64 {
        from_fixed(n, self.scale)
    }
}

fn scale_factor(scale: u32) -> f64 {
    2.0_f64.powi(scale as i32)
}

/// Validates `scale`/`width` and encodes `x` in one step.
pub fn to_fixed(x: f64, scale: u32, width: u32) -> Result<FixedPointValue> {
    let config = FixedPointConfig::new(scale, width)?;
    Ok(config.to_fixed(x)?)
}

pub fn from_fixed(n: FixedPointValue, scale: u32) -> f64 {
    n.raw() as f64 / scale_factor(scale)
}
