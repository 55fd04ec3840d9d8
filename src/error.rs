use thiserror::Error;

use crate::key::Key;

/// Errors that can occur while encoding a value.
///
/// The value grammar is closed by the type system, so the only
/// dynamically reachable failure is a dictionary backing yielding two
/// entries with equal keys while the duplicate-key policy is
/// [`DuplicateKeyPolicy::Error`](crate::DuplicateKeyPolicy::Error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Two dictionary entries share an equal key under the `Error`
    /// policy.
    #[error("duplicate dictionary key: {0:?}")]
    DuplicateKey(Key),
}

/// An error raised while decoding, with the byte offset at which the
/// decoder stopped.
///
/// # Examples
///
/// ```
/// use bencodex::{decode, DecodeErrorKind};
///
/// let err = decode(b"i42").unwrap_err();
/// assert_eq!(err.kind, DecodeErrorKind::NoIntegerSuffix);
/// assert_eq!(err.position, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct DecodeError {
    /// What went wrong.
    pub kind: DecodeErrorKind,
    /// Byte offset at which parsing stopped; never exceeds the input
    /// length.
    pub position: usize,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// The decoder's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// Input ended before a complete value was parsed.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// A byte that cannot start or continue the expected production.
    #[error("unexpected byte 0x{0:02x}")]
    UnexpectedByte(u8),

    /// An integer token with no digits.
    #[error("invalid integer")]
    InvalidInteger,

    /// An integer token missing its `e` suffix.
    #[error("no integer suffix")]
    NoIntegerSuffix,

    /// A list missing its `e` suffix.
    #[error("no list suffix")]
    NoListSuffix,

    /// A dictionary missing its `e` suffix.
    #[error("no dictionary suffix")]
    NoDictionarySuffix,

    /// A dictionary key smaller than its predecessor.
    #[error("unordered dictionary keys")]
    UnorderedDictionaryKeys,

    /// A dictionary key equal to its predecessor.
    #[error("duplicate dictionary keys")]
    DuplicateDictionaryKeys,

    /// A binary token with no length digits.
    #[error("no binary length")]
    NoBinaryLength,

    /// A binary token missing the `:` after its length.
    #[error("no binary delimiter")]
    NoBinaryDelimiter,

    /// A binary length that exceeds the remaining input.
    #[error("binary length overruns input")]
    OverRunBinaryLength,

    /// A text token with no length digits.
    #[error("no text length")]
    NoTextLength,

    /// A text token missing the `:` after its length.
    #[error("no text delimiter")]
    NoTextDelimiter,

    /// A text length that exceeds the remaining input.
    #[error("text length overruns input")]
    OverRunTextLength,

    /// A text payload that is not valid UTF-8.
    #[error("text is not valid utf-8")]
    InvalidUtf8,

    /// Recursion limit exceeded to prevent stack overflow.
    #[error("nesting too deep")]
    NestingTooDeep,
}
