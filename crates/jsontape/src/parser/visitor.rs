//! The value visitor: turns grammar decisions into tape words, scope
//! records, and string-buffer bytes.
//!
//! Container headers are reserved with a tape `skip()` on scope start and
//! backpatched on scope end, keeping emission single-pass. Counts saturate
//! at 24 bits; a stored `0xFFFFFF` means "unknown, at least that many".

use alloc::vec::Vec;

use crate::error::Error;
use crate::input::{PaddedBytes, PADDING};
use crate::parser::atoms;
use crate::parser::numbers::{self, Number};
use crate::parser::strings;
use crate::tape::{TapeType, TapeWriter};

/// Upper bound on a container's recorded element count.
pub(crate) const COUNT_SATURATION: u32 = 0xFF_FFFF;

/// One open container (or the document) awaiting its header backpatch.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Scope {
    /// Tape index of the reserved header word.
    pub tape_index: u32,
    /// Direct children completed so far.
    pub count: u32,
}

pub(crate) struct TapeBuilder<'p, 'i> {
    tape: TapeWriter<'p>,
    strings: &'p mut Vec<u8>,
    scopes: &'p mut [Scope],
    input: &'i PaddedBytes,
}

impl<'p, 'i> TapeBuilder<'p, 'i> {
    pub fn new(
        tape: &'p mut Vec<u64>,
        strings: &'p mut Vec<u8>,
        scopes: &'p mut [Scope],
        input: &'i PaddedBytes,
    ) -> Self {
        Self {
            tape: TapeWriter::new(tape),
            strings,
            scopes,
            input,
        }
    }

    // ----- scopes -------------------------------------------------------

    /// Records the scope at `level` and reserves its header word.
    pub fn start_scope(&mut self, level: usize) {
        self.scopes[level] = Scope {
            tape_index: self.tape.position(),
            count: 0,
        };
        self.tape.skip();
    }

    /// Appends the end word and backpatches the reserved header:
    /// `end_index | saturated_count << 32` under the start tag.
    pub fn end_scope(&mut self, level: usize, start: TapeType, end: TapeType) {
        let scope = self.scopes[level];
        let end_index = self.tape.position();
        self.tape.append(u64::from(scope.tape_index), end);
        let count = scope.count.min(COUNT_SATURATION);
        self.tape.write(
            scope.tape_index,
            u64::from(end_index) | (u64::from(count) << 32),
            start,
        );
    }

    pub fn start_document(&mut self) {
        self.start_scope(0);
    }

    pub fn end_document(&mut self) {
        self.end_scope(0, TapeType::Root, TapeType::Root);
    }

    /// Bumps the child count of the innermost open scope; `depth` is the
    /// current parse depth, so the scope lives one level below.
    pub fn increment_count(&mut self, depth: usize) {
        let scope = &mut self.scopes[depth - 1];
        scope.count = scope.count.saturating_add(1);
    }

    // ----- values -------------------------------------------------------

    /// Unescapes the string starting one past the quote at `offset` into
    /// the string buffer and appends a STRING tape word referencing its
    /// 4-byte length prefix.
    pub fn string(&mut self, offset: u32) -> Result<(), Error> {
        let start = self.strings.len();
        self.tape.append(start as u64, TapeType::String);
        self.strings.extend_from_slice(&[0u8; 4]);
        let written = strings::unescape(
            self.input.padded(),
            offset as usize + 1,
            self.strings,
        )?;
        let prefix = (written as u32).to_le_bytes();
        self.strings[start..start + 4].copy_from_slice(&prefix);
        self.strings.push(0);
        Ok(())
    }

    /// Keys share the string path; the tape does not distinguish them.
    pub fn key(&mut self, offset: u32) -> Result<(), Error> {
        self.string(offset)
    }

    pub fn number(&mut self, offset: u32) -> Result<(), Error> {
        let parsed = numbers::parse_number(&self.input.padded()[offset as usize..])?;
        self.emit_number(parsed);
        Ok(())
    }

    /// Root-scalar variant: the input may end exactly at the number with
    /// caller-controlled padding behind it, so the tail is copied into a
    /// space-padded scratch buffer first.
    pub fn root_number(&mut self, offset: u32, remaining: usize) -> Result<(), Error> {
        let mut scratch: Vec<u8> = Vec::new();
        scratch
            .try_reserve(remaining + PADDING)
            .map_err(|_| Error::MemAlloc)?;
        let offset = offset as usize;
        scratch.extend_from_slice(&self.input.padded()[offset..offset + remaining]);
        scratch.resize(remaining + PADDING, b' ');
        let parsed = numbers::parse_number(&scratch)?;
        self.emit_number(parsed);
        Ok(())
    }

    fn emit_number(&mut self, parsed: Number) {
        match parsed {
            Number::I64(v) => self.tape.append_double(TapeType::Int64, v as u64),
            Number::U64(v) => self.tape.append_double(TapeType::Uint64, v),
            Number::F64(v) => self.tape.append_double(TapeType::Double, v.to_bits()),
        }
    }

    pub fn true_atom(&mut self, offset: u32) -> Result<(), Error> {
        if !atoms::is_valid_true_atom(&self.input.padded()[offset as usize..]) {
            return Err(Error::TrueAtom);
        }
        self.tape.append(0, TapeType::True);
        Ok(())
    }

    pub fn false_atom(&mut self, offset: u32) -> Result<(), Error> {
        if !atoms::is_valid_false_atom(&self.input.padded()[offset as usize..]) {
            return Err(Error::FalseAtom);
        }
        self.tape.append(0, TapeType::False);
        Ok(())
    }

    pub fn null_atom(&mut self, offset: u32) -> Result<(), Error> {
        if !atoms::is_valid_null_atom(&self.input.padded()[offset as usize..]) {
            return Err(Error::NullAtom);
        }
        self.tape.append(0, TapeType::Null);
        Ok(())
    }

    pub fn root_true_atom(&mut self, offset: u32, remaining: usize) -> Result<(), Error> {
        if !atoms::is_valid_true_atom_bounded(&self.input.padded()[offset as usize..], remaining) {
            return Err(Error::TrueAtom);
        }
        self.tape.append(0, TapeType::True);
        Ok(())
    }

    pub fn root_false_atom(&mut self, offset: u32, remaining: usize) -> Result<(), Error> {
        if !atoms::is_valid_false_atom_bounded(&self.input.padded()[offset as usize..], remaining) {
            return Err(Error::FalseAtom);
        }
        self.tape.append(0, TapeType::False);
        Ok(())
    }

    pub fn root_null_atom(&mut self, offset: u32, remaining: usize) -> Result<(), Error> {
        if !atoms::is_valid_null_atom_bounded(&self.input.padded()[offset as usize..], remaining) {
            return Err(Error::NullAtom);
        }
        self.tape.append(0, TapeType::Null);
        Ok(())
    }
}
