use crate::error::{OverflowError, Result};
use crate::fixed::{FixedPointConfig, FixedPointValue};
use crate::range::PriceRange;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Normalizes a price into its range, then stores it as a fixed-point integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceCodec {
    pub range: PriceRange,
    pub fixed: FixedPointConfig,
}

impl PriceCodec {
    pub fn new(range: PriceRange, scale: u32, width: u32) -> Result<Self> {
        let fixed = FixedPointConfig::new(scale, width)?;
        Ok(PriceCodec { range, fixed })
    }

    pub fn encode(&self, price: f64) -> std::result::Result<FixedPointValue, OverflowError> {
        let normalized = self.range.normalize(price);
        if !(0.0..=1.0).contains(&normalized) {
            warn!(
                "price {} is outside [{}, {}] (normalized to {})",
                price,
                self.range.min(),
                self.range.max(),
                normalized
            );
        }
        self.fixed.to_fixed(normalized)
    }

    pub fn decode(&self, value: FixedPointValue) -> f64 {
        self.range.denormalize(self.fixed.from_fixed(value))
    }

    pub fn round_trip_error(&self, price: f64) -> std::result::Result<f64, OverflowError> {
        let decoded = self.decode(self.encode(price)?);
        Ok((decoded - price).abs())
    }

    /// Worst-case quantization error in price units: half a fixed-point step scaled by the span,
    /// plus a little slack for the floating-point arithmetic on either side.
    pub fn error_bound(&self) -> f64 {
        // Half a step in the unit interval, scaled back to price units
        let quantization = self.range.span() * self.fixed.resolution() / 2.0;
        // Rounding in normalize and denormalize, relative to the largest bound
        let arithmetic = 4.0 * f64::EPSILON * self.range.min().abs().max(self.range.max().abs());
        quantization + arithmetic
    }
}
