//! Conversion of buffered number text into numeric values.
//!
//! The parser collects the decimal digits of a number (sign excluded) into
//! its scratch buffer; these routines interpret that text. Integer parsing is
//! range-checked so that out-of-range literals can fall through to the double
//! path.

use alloc::string::String;
use core::num::ParseFloatError;

use crate::text::CodeUnit;

/// Parses a run of ASCII digits as a `u64`, `None` on overflow.
pub(crate) fn try_parse_u64<C: CodeUnit>(digits: &[C]) -> Option<u64> {
    let mut n: u64 = 0;
    for &d in digits {
        let x = u64::from(d.as_u32() - u32::from(b'0'));
        n = n.checked_mul(10)?.checked_add(x)?;
    }
    Some(n)
}

/// Parses a run of ASCII digits as a negated `i64`, `None` below `i64::MIN`.
pub(crate) fn try_parse_negative_i64<C: CodeUnit>(digits: &[C]) -> Option<i64> {
    let mut n: i64 = 0;
    for &d in digits {
        let x = i64::from(d.as_u32() - u32::from(b'0'));
        n = n.checked_mul(10)?.checked_sub(x)?;
    }
    Some(n)
}

/// Converts buffered decimal text (digits, optional `.`, optional exponent,
/// no sign) into a double.
pub(crate) fn double_parse<C: CodeUnit>(text: &[C]) -> Result<f64, ParseFloatError> {
    let mut digits = String::with_capacity(text.len());
    C::push_ascii(text, &mut digits);
    digits.parse()
}
