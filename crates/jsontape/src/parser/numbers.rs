//! Number parsing at value boundaries.
//!
//! The grammar scan walks the padded input directly; the byte after the
//! number must be structural or whitespace, which is how a stray NUL after
//! a bare `9` is rejected. Integers are accumulated in a `u64`; anything
//! with a fraction or exponent, and any integer whose magnitude overflows,
//! takes the double path.

use crate::error::Error;
use crate::parser::atoms::is_structural_or_whitespace;

/// Classified number ready for tape emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    /// Anything representable as a signed 64-bit integer.
    I64(i64),
    /// Unsigned integers above `i64::MAX`.
    U64(u64),
    F64(f64),
}

/// Parses one JSON number starting at `src[0]`.
///
/// `src` must extend at least `PADDING` bytes past the number (the padded
/// input contract).
pub(crate) fn parse_number(src: &[u8]) -> Result<Number, Error> {
    let mut i = 0usize;
    let negative = src[0] == b'-';
    if negative {
        i += 1;
    }

    let digits_start = i;
    let mut mantissa: u64 = 0;
    let mut overflow = false;
    if src[i] == b'0' {
        i += 1;
        if src[i].is_ascii_digit() {
            return Err(Error::Number);
        }
    } else {
        if !src[i].is_ascii_digit() {
            return Err(Error::Number);
        }
        while src[i].is_ascii_digit() {
            let d = u64::from(src[i] - b'0');
            mantissa = match mantissa.checked_mul(10).and_then(|m| m.checked_add(d)) {
                Some(m) => m,
                None => {
                    overflow = true;
                    mantissa
                }
            };
            i += 1;
        }
    }
    debug_assert!(i > digits_start);

    let mut is_float = false;
    if src[i] == b'.' {
        is_float = true;
        i += 1;
        if !src[i].is_ascii_digit() {
            return Err(Error::Number);
        }
        while src[i].is_ascii_digit() {
            i += 1;
        }
    }
    if src[i] == b'e' || src[i] == b'E' {
        is_float = true;
        i += 1;
        if src[i] == b'+' || src[i] == b'-' {
            i += 1;
        }
        if !src[i].is_ascii_digit() {
            return Err(Error::Number);
        }
        while src[i].is_ascii_digit() {
            i += 1;
        }
    }

    if !is_structural_or_whitespace(src[i]) {
        return Err(Error::Number);
    }

    if is_float || overflow {
        return parse_double(&src[..i]);
    }

    if negative {
        // i64::MIN has no positive counterpart, hence the off-by-one bound.
        const MIN_MAGNITUDE: u64 = i64::MAX as u64 + 1;
        if mantissa > MIN_MAGNITUDE {
            return parse_double(&src[..i]);
        }
        if mantissa == MIN_MAGNITUDE {
            return Ok(Number::I64(i64::MIN));
        }
        return Ok(Number::I64(-(mantissa as i64)));
    }
    if mantissa <= i64::MAX as u64 {
        Ok(Number::I64(mantissa as i64))
    } else {
        Ok(Number::U64(mantissa))
    }
}

fn parse_double(text: &[u8]) -> Result<Number, Error> {
    // The grammar scan above guarantees ASCII, so the conversion is for the
    // type system, not validation.
    let text = core::str::from_utf8(text).map_err(|_| Error::Number)?;
    let value: f64 = text.parse().map_err(|_| Error::Number)?;
    if !value.is_finite() {
        return Err(Error::Number);
    }
    Ok(Number::F64(value))
}
