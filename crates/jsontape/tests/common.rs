#![allow(missing_docs, dead_code)]

use jsontape::{structural_indexes, Error, PaddedBytes, Parser, ParserOptions, TapeType};

/// Builds a padded input buffer from JSON text.
pub fn padded(src: &str) -> PaddedBytes {
    PaddedBytes::from_slice(src.as_bytes())
}

/// Scans and parses one document, returning owned copies of the tape and
/// string buffer.
pub fn parse_raw(src: &str) -> Result<(Vec<u64>, Vec<u8>), Error> {
    let input = padded(src);
    let structurals = structural_indexes(&input)?;
    let mut parser = Parser::new(ParserOptions::default());
    let doc = parser.parse(&input, &structurals)?;
    Ok((doc.tape().to_vec(), doc.string_buffer().to_vec()))
}

/// Scans and parses one document, returning its tape.
pub fn parse_tape(src: &str) -> Result<Vec<u64>, Error> {
    parse_raw(src).map(|(tape, _)| tape)
}

/// Scans and parses one document, expecting failure.
pub fn parse_err(src: &str) -> Error {
    match parse_raw(src) {
        Ok(_) => panic!("expected {src:?} to fail"),
        Err(err) => err,
    }
}

/// Scans, parses, and re-serializes one document.
pub fn reserialize(src: &str) -> Result<String, Error> {
    let input = padded(src);
    let structurals = structural_indexes(&input)?;
    let mut parser = Parser::new(ParserOptions::default());
    Ok(parser.parse(&input, &structurals)?.to_json())
}

/// Encodes a tape word the way the writer does.
pub fn word(tag: TapeType, payload: u64) -> u64 {
    (payload & jsontape::TAPE_VALUE_MASK) | ((tag as u64) << 56)
}

/// Encodes a container header word: end index plus saturated count.
pub fn header(tag: TapeType, end_index: u64, count: u64) -> u64 {
    word(tag, end_index | (count << 32))
}
