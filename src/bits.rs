//! Bit-level view of IEEE 754 binary32/binary64 values.
//!
//! Every decomposition starts from `to_bits`, so the fields are read from the
//! exact stored pattern, NaN payloads and the sign of zero included.

use crate::error::ParseBitsError;
use num_traits::{NumCast, PrimInt, Unsigned};
use std::fmt;
use std::io::{self, Write};
use std::num::FpCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatLayout {
    Binary32,
    Binary64,
}

impl FloatLayout {
    pub const fn width(self) -> u32 {
        match self {
            FloatLayout::Binary32 => 32,
            FloatLayout::Binary64 => 64,
        }
    }

    pub const fn exponent_bits(self) -> u32 {
        match self {
            FloatLayout::Binary32 => 8,
            FloatLayout::Binary64 => 11,
        }
    }

    pub const fn mantissa_bits(self) -> u32 {
        match self {
            FloatLayout::Binary32 => 23,
            FloatLayout::Binary64 => 52,
        }
    }

    pub const fn exponent_bias(self) -> i32 {
        match self {
            FloatLayout::Binary32 => 127,
            FloatLayout::Binary64 => 1023,
        }
    }

    const fn exponent_mask(self) -> u64 {
        (1 << self.exponent_bits()) - 1
    }

    const fn mantissa_mask(self) -> u64 {
        (1 << self.mantissa_bits()) - 1
    }

    fn from_width(width: usize) -> Option<Self> {
        match width {
            32 => Some(FloatLayout::Binary32),
            64 => Some(FloatLayout::Binary64),
            _ => None,
        }
    }
}

/// A float type whose storage can be reinterpreted as an unsigned integer of the same width.
pub trait InspectFloat: Copy {
    type Bits: PrimInt + Unsigned + Into<u64>;

    const LAYOUT: FloatLayout;

    fn to_raw(self) -> Self::Bits;

    fn from_raw(bits: Self::Bits) -> Self;

    /// `None` when `raw` has bits set above this type's width.
    fn from_raw_u64(raw: u64) -> Option<Self> {
        <Self::Bits as NumCast>::from(raw).map(Self::from_raw)
    }
}

impl InspectFloat for f32 {
    type Bits = u32;
    const LAYOUT: FloatLayout = FloatLayout::Binary32;

    fn to_raw(self) -> u32 {
        self.to_bits()
    }

    fn from_raw(bits: u32) -> Self {
        f32::from_bits(bits)
    }
}

impl InspectFloat for f64 {
    type Bits = u64;
    const LAYOUT: FloatLayout = FloatLayout::Binary64;

    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    fn from_raw(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

/// Sign, biased exponent and mantissa fields of a float's raw bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatBits {
    layout: FloatLayout,
    raw: u64,
    sign: u8,
    exponent: u16,
    mantissa: u64,
}

impl FloatBits {
    /// Splits the low `layout.width()` bits of `raw` into fields. Higher bits are ignored.
    pub fn from_raw(raw: u64, layout: FloatLayout) -> Self {
        let width = layout.width();
        // Drop anything above the layout's width
        let raw = if width == 64 {
            raw
        } else {
            raw & ((1 << width) - 1)
        };
        FloatBits {
            layout,
            raw,
            // Sign is the top bit
            sign: ((raw >> (width - 1)) & 1) as u8,
            // Biased exponent sits just above the mantissa
            exponent: ((raw >> layout.mantissa_bits()) & layout.exponent_mask()) as u16,
            // Mantissa is the low bits, without the implicit leading one
            mantissa: raw & layout.mantissa_mask(),
        }
    }

    /// Parses a 32- or 64-digit rendering back into its fields.
    pub fn parse(s: &str) -> Result<Self, ParseBitsError> {
        let raw = parse_bits(s)?;
        let digits = s.chars().count();
        let layout = FloatLayout::from_width(digits).ok_or(ParseBitsError::NotAFloatWidth(digits))?;
        Ok(FloatBits::from_raw(raw, layout))
    }

    pub fn layout(&self) -> FloatLayout {
        self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width()
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn sign(&self) -> u8 {
        self.sign
    }

    pub fn exponent(&self) -> u16 {
        self.exponent
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    /// The exponent field minus the bias. For zeros and subnormals this is
    /// `-bias`, one below the exponent actually applied to them.
    pub fn unbiased_exponent(&self) -> i32 {
        self.exponent as i32 - self.layout.exponent_bias()
    }

    pub fn category(&self) -> FpCategory {
        // An all-ones exponent marks infinities and NaNs
        let all_ones = self.layout.exponent_mask() as u16;
        match (self.exponent, self.mantissa) {
            (0, 0) => FpCategory::Zero,
            (0, _) => FpCategory::Subnormal,
            (e, 0) if e == all_ones => FpCategory::Infinite,
            (e, _) if e == all_ones => FpCategory::Nan,
            _ => FpCategory::Normal,
        }
    }

    /// Rebuilds the float, or `None` if `F` has a different layout.
    pub fn to_float<F: InspectFloat>(&self) -> Option<F> {
        if F::LAYOUT != self.layout {
            return None;
        }
        F::from_raw_u64(self.raw)
    }

    pub fn render(&self) -> String {
        render_bits(self.raw, self.width())
    }
}

impl fmt::Display for FloatBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:0ew$b} {:0mw$b}",
            self.sign,
            self.exponent,
            self.mantissa,
            ew = self.layout.exponent_bits() as usize,
            mw = self.layout.mantissa_bits() as usize,
        )
    }
}

pub fn bits_of<F: InspectFloat>(x: F) -> FloatBits {
    FloatBits::from_raw(x.to_raw().into(), F::LAYOUT)
}

/// Renders the low `width` bits of `raw`, most significant first.
/// Positions past bit 63 render as `0`.
pub fn render_bits(raw: u64, width: u32) -> String {
    (0..width)
        .rev()
        .map(|i| if i < 64 && (raw >> i) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Inverse of [`render_bits`] for strings of 1 to 64 binary digits.
pub fn parse_bits(s: &str) -> Result<u64, ParseBitsError> {
    let digits = s.chars().count();
    if digits == 0 {
        return Err(ParseBitsError::Empty);
    }
    if digits > 64 {
        return Err(ParseBitsError::TooLong(digits));
    }
    s.chars()
        .enumerate()
        .try_fold(0_u64, |acc, (position, digit)| match digit {
            '0' => Ok(acc << 1),
            '1' => Ok((acc << 1) | 1),
            _ => Err(ParseBitsError::InvalidDigit { digit, position }),
        })
}

/// Writes the rendering of `raw` followed by a newline.
pub fn write_bits<W: Write>(mut writer: W, raw: u64, width: u32) -> io::Result<()> {
    writeln!(writer, "{}", render_bits(raw, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_single_precision() {
        let bits = bits_of(1.0_f32);
        assert_eq!((bits.sign(), bits.exponent(), bits.mantissa()), (0, 127, 0));
        assert_eq!(bits.unbiased_exponent(), 0);
        assert_eq!(bits.render(), "00111111100000000000000000000000");
    }

    #[test]
    fn negative_two_and_a_half_single_precision() {
        let bits = bits_of(-2.5_f32);
        assert_eq!(bits.sign(), 1);
        assert_eq!(bits.exponent(), 128);
        assert_eq!(bits.mantissa(), 0x200000);
        assert_eq!(bits.to_string(), "1 10000000 01000000000000000000000");
    }

    #[test]
    fn double_precision_fields() {
        let bits = bits_of(-2.5_f64);
        assert_eq!(bits.width(), 64);
        assert_eq!(bits.sign(), 1);
        assert_eq!(bits.exponent(), 1024);
        assert_eq!(bits.mantissa(), 1 << 50);
        assert_eq!(bits.render().len(), 64);
    }

    #[test]
    fn categories() {
        assert_eq!(bits_of(0.0_f32).category(), FpCategory::Zero);
        assert_eq!(bits_of(-0.0_f64).category(), FpCategory::Zero);
        assert_eq!(bits_of(-0.0_f64).sign(), 1);
        assert_eq!(bits_of(f32::from_bits(1)).category(), FpCategory::Subnormal);
        assert_eq!(bits_of(f64::INFINITY).category(), FpCategory::Infinite);
        assert_eq!(bits_of(f32::NAN).category(), FpCategory::Nan);
        assert_eq!(bits_of(1.5_f64).category(), FpCategory::Normal);
    }

    #[test]
    fn to_float_checks_layout() {
        let bits = bits_of(3.25_f32);
        assert_eq!(bits.to_float::<f32>(), Some(3.25));
        assert_eq!(bits.to_float::<f64>(), None);
    }

    #[test]
    fn render_is_fixed_width() {
        assert_eq!(render_bits(0b101, 8), "00000101");
        assert_eq!(render_bits(0xff, 4), "1111");
        assert_eq!(render_bits(1, 66), format!("{}1", "0".repeat(65)));
        assert_eq!(render_bits(u64::MAX, 0), "");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(parse_bits(""), Err(ParseBitsError::Empty));
        assert_eq!(
            parse_bits("0120"),
            Err(ParseBitsError::InvalidDigit {
                digit: '2',
                position: 2
            })
        );
        assert_eq!(parse_bits(&"1".repeat(65)), Err(ParseBitsError::TooLong(65)));
        assert_eq!(parse_bits(&"1".repeat(64)), Ok(u64::MAX));
        assert_eq!(FloatBits::parse("0101"), Err(ParseBitsError::NotAFloatWidth(4)));
    }

    #[test]
    fn parse_float_rendering() {
        let bits = FloatBits::parse("00111111100000000000000000000000").unwrap();
        assert_eq!(bits.layout(), FloatLayout::Binary32);
        assert_eq!(bits.to_float::<f32>(), Some(1.0));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_becomes_io_error() {
        let result: crate::error::Result<()> =
            write_bits(ClosedPipe, 1.0_f32.to_bits() as u64, 32).map_err(Into::into);
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }

    #[test]
    fn write_bits_appends_newline() {
        let mut out = Vec::new();
        write_bits(&mut out, 1.0_f32.to_bits() as u64, 32).unwrap();
        assert_eq!(out, b"00111111100000000000000000000000\n");
    }
}
