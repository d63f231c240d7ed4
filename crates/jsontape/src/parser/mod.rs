//! Stage 2: the structural-to-tape transducer.
//!
//! A pushdown state machine walks the structural index, validating JSON
//! grammar while emitting the tape through the value visitor. The automaton
//! is an explicit [`State`] matched in a loop; value dispatch is a single
//! branch on the first byte of the value.
//!
//! Depth convention: a scope opened at depth `d` stores its record at level
//! `d` (the document at level 0) and `is_array[d]` remembers what kind of
//! scope lives there; a record at level `d` is live iff `depth > d`.

mod atoms;
mod logger;
mod numbers;
mod strings;
mod structurals;
mod visitor;

use alloc::vec;
use alloc::vec::Vec;

use crate::document::Document;
use crate::error::Error;
use crate::input::{PaddedBytes, PADDING};
use crate::options::ParserOptions;
use crate::tape::TapeType;

pub(crate) use atoms::is_structural_or_whitespace;
use structurals::StructuralIterator;
use visitor::{Scope, TapeBuilder};

/// The stage-2 parser: owns the tape, string buffer, and scope stack, all
/// allocated once and reused across documents.
///
/// A parser instance is single-threaded and not reentrant; the
/// [`Document`] returned by a parse borrows the parser's buffers, so the
/// borrow checker enforces that the parser is not reused while a document
/// is alive.
pub struct Parser {
    tape: Vec<u64>,
    strings: Vec<u8>,
    scopes: Vec<Scope>,
    is_array: Vec<bool>,
    max_depth: usize,
    capacity: usize,
    next_structural_index: u32,
}

impl Parser {
    /// Preallocates all buffers from the configured capacity and depth.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        let max_depth = options.max_depth.max(2);
        let capacity = options.capacity;
        Self {
            tape: Vec::with_capacity(capacity + 4),
            strings: Vec::with_capacity(5 * capacity / 3 + PADDING),
            scopes: vec![Scope::default(); max_depth],
            is_array: vec![false; max_depth],
            max_depth,
            capacity,
            next_structural_index: 0,
        }
    }

    /// Parses one whole document.
    ///
    /// `structurals` is the stage-1 output: strictly increasing byte
    /// offsets of the structural characters and scalar starts in `input`.
    /// The walk starts at the first structural and, when the root is an
    /// array, the final structural must be its closing `]`.
    pub fn parse<'p>(
        &'p mut self,
        input: &PaddedBytes,
        structurals: &[u32],
    ) -> Result<Document<'p>, Error> {
        self.run::<false>(input, structurals)
    }

    /// Parses the next document from a buffer holding a sequence of
    /// concatenated documents.
    ///
    /// The structural cursor persists across calls: each call starts where
    /// the previous one stopped and [`Error::Empty`] signals that the
    /// stream is exhausted. All other state is reset per document.
    pub fn parse_streaming<'p>(
        &'p mut self,
        input: &PaddedBytes,
        structurals: &[u32],
    ) -> Result<Document<'p>, Error> {
        self.run::<true>(input, structurals)
    }

    /// Index of the first structural the next streaming parse will consume.
    #[must_use]
    pub fn next_structural_index(&self) -> u32 {
        self.next_structural_index
    }

    /// Rewinds the streaming cursor, e.g. before switching to a new buffer.
    pub fn reset_stream(&mut self) {
        self.next_structural_index = 0;
    }

    fn run<const STREAMING: bool>(
        &mut self,
        input: &PaddedBytes,
        structurals: &[u32],
    ) -> Result<Document<'_>, Error> {
        self.ensure_capacity(input.len());
        self.tape.clear();
        self.strings.clear();

        let start = if STREAMING {
            self.next_structural_index as usize
        } else {
            0
        };

        if !STREAMING {
            // A root array whose ] is not the final structural can leave
            // the tape referencing words that were never written; reject it
            // before walking. Streamed buffers legitimately continue past
            // the array with further documents.
            if let (Some(&first), Some(&last)) = (structurals.first(), structurals.last()) {
                let buf = input.padded();
                if buf.get(first as usize) == Some(&b'[') && buf.get(last as usize) != Some(&b']') {
                    return Err(Error::Tape("root array is not closed by the final structural"));
                }
            }
        }

        let walker = Walker {
            iter: StructuralIterator::new(input, structurals, start),
            visitor: TapeBuilder::new(&mut self.tape, &mut self.strings, &mut self.scopes, input),
            is_array: &mut self.is_array,
            depth: 0,
            max_depth: self.max_depth,
            n_structurals: structurals.len(),
        };
        let next = walker.walk()?;
        self.next_structural_index = next as u32;
        Ok(Document::new(&self.tape, &self.strings))
    }

    fn ensure_capacity(&mut self, len: usize) {
        if len > self.capacity {
            self.tape.reserve(len + 4);
            self.strings.reserve(5 * len / 3 + PADDING);
            self.capacity = len;
        }
    }
}

/// States of the pushdown automaton. States with identical entry work share
/// match arms in the loop below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ObjectBegin,
    ObjectKey,
    ObjectContinue,
    ArrayBegin,
    ArrayValue,
    ArrayContinue,
    ScopeEnd,
    Finish,
}

struct Walker<'w, 'i> {
    iter: StructuralIterator<'i>,
    visitor: TapeBuilder<'w, 'i>,
    is_array: &'w mut [bool],
    depth: usize,
    max_depth: usize,
    n_structurals: usize,
}

impl Walker<'_, '_> {
    fn walk(mut self) -> Result<usize, Error> {
        if self.iter.at_end(self.n_structurals) {
            return Err(Error::Empty);
        }
        logger::log_start();
        self.is_array[0] = false;
        self.visitor.start_document();
        self.depth = 1;

        // The root value: scalars finish immediately, with length-bounded
        // parsing since nothing guarantees what the padding holds.
        let (byte, offset) = self.iter.advance();
        let mut state = match byte {
            b'{' => {
                self.open_scope(false)?;
                State::ObjectBegin
            }
            b'[' => {
                self.open_scope(true)?;
                State::ArrayBegin
            }
            b'"' => {
                logger::log_value("string", self.depth);
                self.visitor.string(offset)?;
                State::Finish
            }
            b't' => {
                logger::log_value("true", self.depth);
                self.visitor
                    .root_true_atom(offset, self.iter.remaining_len())?;
                State::Finish
            }
            b'f' => {
                logger::log_value("false", self.depth);
                self.visitor
                    .root_false_atom(offset, self.iter.remaining_len())?;
                State::Finish
            }
            b'n' => {
                logger::log_value("null", self.depth);
                self.visitor
                    .root_null_atom(offset, self.iter.remaining_len())?;
                State::Finish
            }
            b'-' | b'0'..=b'9' => {
                logger::log_value("number", self.depth);
                self.visitor
                    .root_number(offset, self.iter.remaining_len())?;
                State::Finish
            }
            _ => return Err(Error::Tape("document does not start with a value")),
        };

        loop {
            state = match state {
                State::ObjectBegin => match self.iter.advance() {
                    (b'"', off) => {
                        logger::log_value("key", self.depth);
                        self.visitor.key(off)?;
                        State::ObjectKey
                    }
                    (b'}', _) => {
                        self.close_object();
                        State::ScopeEnd
                    }
                    (0, _) => return Err(Error::Tape("unclosed objects or arrays")),
                    _ => return Err(Error::Tape("object does not start with a key")),
                },

                State::ObjectKey => {
                    match self.iter.advance_char() {
                        b':' => {}
                        0 => return Err(Error::Tape("unclosed objects or arrays")),
                        _ => return Err(Error::Tape("missing colon after object key")),
                    }
                    self.parse_value(false)?
                }

                State::ObjectContinue => match self.iter.advance() {
                    (b',', _) => match self.iter.advance() {
                        (b'"', off) => {
                            logger::log_value("key", self.depth);
                            self.visitor.key(off)?;
                            State::ObjectKey
                        }
                        _ => return Err(Error::Tape("expected key string after comma")),
                    },
                    (b'}', _) => {
                        self.close_object();
                        State::ScopeEnd
                    }
                    (0, _) => return Err(Error::Tape("unclosed objects or arrays")),
                    _ => return Err(Error::Tape("missing comma between object fields")),
                },

                State::ArrayBegin => {
                    if self.iter.current_char() == b']' {
                        let _ = self.iter.advance();
                        self.close_array();
                        State::ScopeEnd
                    } else {
                        State::ArrayValue
                    }
                }

                State::ArrayValue => self.parse_value(true)?,

                State::ArrayContinue => match self.iter.advance() {
                    (b',', _) => State::ArrayValue,
                    (b']', _) => {
                        self.close_array();
                        State::ScopeEnd
                    }
                    (0, _) => return Err(Error::Tape("unclosed objects or arrays")),
                    _ => return Err(Error::Tape("missing comma between array values")),
                },

                State::ScopeEnd => {
                    if self.depth == 1 {
                        State::Finish
                    } else {
                        // The scope that just closed is a completed child
                        // of the one we return into.
                        self.visitor.increment_count(self.depth);
                        if self.is_array[self.depth - 1] {
                            State::ArrayContinue
                        } else {
                            State::ObjectContinue
                        }
                    }
                }

                State::Finish => break,
            };
        }

        self.visitor.end_document();
        logger::log_end_value("document", 0);
        let next = self.iter.next_index();
        if self.depth != 1 {
            return Err(Error::Tape("unclosed objects or arrays"));
        }
        Ok(next)
    }

    /// Value dispatch shared by every state that reads a value: one branch
    /// on the first byte.
    fn parse_value(&mut self, in_array: bool) -> Result<State, Error> {
        let (byte, offset) = self.iter.advance();
        match byte {
            b'{' => {
                self.open_scope(false)?;
                Ok(State::ObjectBegin)
            }
            b'[' => {
                self.open_scope(true)?;
                Ok(State::ArrayBegin)
            }
            b'"' => {
                logger::log_value("string", self.depth);
                self.visitor.string(offset)?;
                Ok(self.scalar_done(in_array))
            }
            b't' => {
                logger::log_value("true", self.depth);
                self.visitor.true_atom(offset)?;
                Ok(self.scalar_done(in_array))
            }
            b'f' => {
                logger::log_value("false", self.depth);
                self.visitor.false_atom(offset)?;
                Ok(self.scalar_done(in_array))
            }
            b'n' => {
                logger::log_value("null", self.depth);
                self.visitor.null_atom(offset)?;
                Ok(self.scalar_done(in_array))
            }
            b'-' | b'0'..=b'9' => {
                logger::log_value("number", self.depth);
                self.visitor.number(offset)?;
                Ok(self.scalar_done(in_array))
            }
            0 => Err(Error::Tape("unclosed objects or arrays")),
            _ => Err(Error::Tape("non-value byte where a value was expected")),
        }
    }

    fn scalar_done(&mut self, in_array: bool) -> State {
        self.visitor.increment_count(self.depth);
        if in_array {
            State::ArrayContinue
        } else {
            State::ObjectContinue
        }
    }

    fn open_scope(&mut self, array: bool) -> Result<(), Error> {
        if self.depth == self.max_depth {
            return Err(Error::Depth);
        }
        logger::log_start_value(if array { "array" } else { "object" }, self.depth);
        self.is_array[self.depth] = array;
        self.visitor.start_scope(self.depth);
        self.depth += 1;
        Ok(())
    }

    fn close_object(&mut self) {
        self.depth -= 1;
        self.visitor
            .end_scope(self.depth, TapeType::StartObject, TapeType::EndObject);
        logger::log_end_value("object", self.depth);
    }

    fn close_array(&mut self) {
        self.depth -= 1;
        self.visitor
            .end_scope(self.depth, TapeType::StartArray, TapeType::EndArray);
        logger::log_end_value("array", self.depth);
    }
}
