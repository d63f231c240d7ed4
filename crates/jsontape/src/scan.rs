//! Reference structural scanner (stage 1, scalar).
//!
//! Stage 1 proper is an external, SIMD-accelerated collaborator; this
//! scalar implementation of the same output contract exists so the crate
//! can be driven end-to-end. It records the byte offset of every
//! structural character (`{` `}` `[` `]` `:` `,`), the opening quote of
//! every string, and the first byte of every other scalar. Offsets are
//! strictly increasing.

use alloc::vec::Vec;

use crate::error::Error;
use crate::input::PaddedBytes;
use crate::parser::is_structural_or_whitespace;

/// Scans the input and returns the structural index consumed by
/// [`Parser`](crate::Parser).
///
/// Strings are skipped over with escape tracking so that only the opening
/// quote is recorded; a string still open at the end of input is an error
/// here rather than in stage 2.
pub fn structural_indexes(input: &PaddedBytes) -> Result<Vec<u32>, Error> {
    let bytes = input.input();
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'{' | b'}' | b'[' | b']' | b':' | b',' => {
                out.push(i as u32);
                i += 1;
            }
            b'"' => {
                out.push(i as u32);
                i += 1;
                loop {
                    if i >= bytes.len() {
                        return Err(Error::String("unterminated string"));
                    }
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            _ => {
                // Scalar start: atoms, numbers, or garbage for stage 2 to
                // reject.
                out.push(i as u32);
                i += 1;
                while i < bytes.len() && !is_structural_or_whitespace(bytes[i]) && bytes[i] != b'"'
                {
                    i += 1;
                }
            }
        }
    }
    Ok(out)
}
