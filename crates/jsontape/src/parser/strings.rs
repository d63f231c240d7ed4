//! String unescape into the parser's string buffer.
//!
//! The caller hands over the padded input and the offset of the first
//! content byte (one past the opening quote); the unescaped bytes are
//! appended to `out` and the number of bytes written is returned. The
//! 4-byte length prefix and NUL terminator are the visitor's business,
//! not this module's.

use alloc::vec::Vec;

use crate::error::Error;

/// Unescapes one string. `src` is the whole padded buffer; `from` points
/// one past the opening quote. Scanning is bounded by the padded length,
/// so a quote missing before the end of the allocation is an error rather
/// than a read overrun.
pub(crate) fn unescape(src: &[u8], from: usize, out: &mut Vec<u8>) -> Result<usize, Error> {
    let start_len = out.len();
    let mut i = from;
    loop {
        if i >= src.len() {
            return Err(Error::String("unterminated string"));
        }
        match src[i] {
            b'"' => return Ok(out.len() - start_len),
            b'\\' => i = unescape_sequence(src, i, out)?,
            0x00..=0x1F => return Err(Error::String("unescaped control character in string")),
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
}

/// Handles one backslash escape at `src[i]`; returns the index after it.
fn unescape_sequence(src: &[u8], i: usize, out: &mut Vec<u8>) -> Result<usize, Error> {
    if i + 1 >= src.len() {
        return Err(Error::String("unterminated string"));
    }
    match src[i + 1] {
        b'"' => out.push(b'"'),
        b'\\' => out.push(b'\\'),
        b'/' => out.push(b'/'),
        b'b' => out.push(0x08),
        b'f' => out.push(0x0C),
        b'n' => out.push(b'\n'),
        b'r' => out.push(b'\r'),
        b't' => out.push(b'\t'),
        b'u' => return unescape_unicode(src, i, out),
        _ => return Err(Error::String("invalid escape in string")),
    }
    Ok(i + 2)
}

/// Decodes `\uXXXX` at `src[i]`, pairing surrogates; returns the index
/// after the full escape.
fn unescape_unicode(src: &[u8], i: usize, out: &mut Vec<u8>) -> Result<usize, Error> {
    let high = hex4(src, i + 2)?;
    if (0xDC00..=0xDFFF).contains(&high) {
        return Err(Error::String("unpaired low surrogate"));
    }
    let (code, next) = if (0xD800..=0xDBFF).contains(&high) {
        if src.len() < i + 8 || src[i + 6] != b'\\' || src[i + 7] != b'u' {
            return Err(Error::String("unpaired high surrogate"));
        }
        let low = hex4(src, i + 8)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(Error::String("unpaired high surrogate"));
        }
        (0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00), i + 12)
    } else {
        (high, i + 6)
    };
    // Surrogate ranges were excluded above, so the scalar is valid.
    let ch = char::from_u32(code).ok_or(Error::String("invalid unicode escape"))?;
    let mut utf8 = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    Ok(next)
}

fn hex4(src: &[u8], at: usize) -> Result<u32, Error> {
    if src.len() < at + 4 {
        return Err(Error::String("unterminated string"));
    }
    let mut code = 0u32;
    for &b in &src[at..at + 4] {
        let digit = (b as char)
            .to_digit(16)
            .ok_or(Error::String("invalid unicode escape"))?;
        code = (code << 4) | digit;
    }
    Ok(code)
}
