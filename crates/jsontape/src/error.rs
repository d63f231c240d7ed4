use thiserror::Error;

/// Failure taxonomy for stage-2 parsing.
///
/// Every visitor operation and state-machine step surfaces one of these
/// kinds through `Result`. The first failure aborts the parse; the tape
/// must not be read for that document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The structural index contained no entries. In streaming mode this is
    /// also the end-of-stream signal.
    #[error("no structural elements to parse")]
    Empty,
    /// JSON grammar violation while walking the structural index.
    #[error("tape error: {0}")]
    Tape(&'static str),
    /// Nesting exceeded the configured maximum depth.
    #[error("exceeded configured maximum nesting depth")]
    Depth,
    /// Invalid escape, unterminated string, or unescaped control byte.
    #[error("string error: {0}")]
    String(&'static str),
    /// Number outside the JSON grammar or not representable.
    #[error("invalid number")]
    Number,
    /// Malformed `true` literal.
    #[error("malformed `true` literal")]
    TrueAtom,
    /// Malformed `false` literal.
    #[error("malformed `false` literal")]
    FalseAtom,
    /// Malformed `null` literal.
    #[error("malformed `null` literal")]
    NullAtom,
    /// Allocation failure in the isolated-root-scalar fallback.
    #[error("allocation failed")]
    MemAlloc,
}
