pub mod bits;
pub mod codec;
pub mod error;
pub mod fixed;
pub mod range;
pub mod tracing;

pub use bits::{bits_of, parse_bits, render_bits, write_bits, FloatBits, FloatLayout, InspectFloat};
pub use codec::PriceCodec;
pub use error::{ConfigurationError, Error, OverflowError, ParseBitsError, Result};
pub use fixed::{from_fixed, to_fixed, FixedPointConfig, FixedPointValue};
pub use range::{denormalize, normalize, PriceRange};
