//! Structural-index-to-tape JSON parsing core.
//!
//! This crate implements the second stage of a two-stage JSON pipeline: a
//! pushdown state machine that walks a precomputed index of structural byte
//! positions and emits a compact linear document encoding, the *tape*. The
//! first stage (locating structural bytes) is an external collaborator; a
//! scalar reference scanner is provided in [`scan`] so the crate can be
//! driven end-to-end.
//!
//! ```
//! use jsontape::{PaddedBytes, Parser, ParserOptions};
//!
//! let input = PaddedBytes::from_slice(br#"{"a":[1,2]}"#);
//! let structurals = jsontape::structural_indexes(&input)?;
//! let mut parser = Parser::new(ParserOptions::default());
//! let doc = parser.parse(&input, &structurals)?;
//! assert_eq!(doc.to_json(), r#"{"a":[1,2]}"#);
//! # Ok::<(), jsontape::Error>(())
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod document;
mod error;
mod input;
mod options;
mod parser;
mod scan;
mod tape;

pub use document::Document;
pub use error::Error;
pub use input::{PaddedBytes, PADDING};
pub use options::ParserOptions;
pub use parser::Parser;
pub use scan::structural_indexes;
pub use tape::{tape_payload, tape_tag, TapeType, TAPE_VALUE_MASK};
