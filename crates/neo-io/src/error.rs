//! Error type for the binary codec.
//!
//! Every variant here is a *format* error in the sense of the wire
//! specification: malformed or adversarial input, never an internal
//! invariant violation. Network-supplied bytes must never panic this crate.

use thiserror::Error;

/// Coarse classification of an [`Error`], useful for deciding whether a peer
/// that sent the offending bytes should be scored down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The message ran past its declared or budgeted length.
    Truncated,
    /// A value was present but outside the protocol's legal range.
    InvalidValue,
    /// A composite exceeded a structural limit (depth, element count).
    LimitExceeded,
}

/// Errors raised while reading or writing the binary wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("read past end of buffer: requested {requested} bytes, {available} available")]
    EndOfStream { requested: usize, available: usize },

    #[error("var_int {value} exceeds caller-supplied maximum {max}")]
    VarIntTooLarge { value: u64, max: u64 },

    #[error("collection length {length} exceeds maximum {max}")]
    CollectionTooLarge { length: usize, max: usize },

    #[error("nesting exceeded: depth budget exhausted")]
    NestingExceeded,

    #[error("unknown tag byte 0x{tag:02x} for {context}")]
    UnknownTag { tag: u8, context: &'static str },

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("trailing bytes after decoding {context}")]
    TrailingBytes { context: &'static str },

    #[error("duplicate entry in {context}")]
    DuplicateEntry { context: &'static str },
}

impl Error {
    pub fn end_of_stream(requested: usize, available: usize) -> Self {
        Error::EndOfStream {
            requested,
            available,
        }
    }

    pub fn var_int_too_large(value: u64, max: u64) -> Self {
        Error::VarIntTooLarge { value, max }
    }

    pub fn collection_too_large(length: usize, max: usize) -> Self {
        Error::CollectionTooLarge { length, max }
    }

    pub fn nesting_exceeded() -> Self {
        Error::NestingExceeded
    }

    pub fn unknown_tag(tag: u8, context: &'static str) -> Self {
        Error::UnknownTag { tag, context }
    }

    pub fn invalid_format<S: Into<String>>(reason: S) -> Self {
        Error::InvalidFormat(reason.into())
    }

    pub fn trailing_bytes(context: &'static str) -> Self {
        Error::TrailingBytes { context }
    }

    pub fn duplicate_entry(context: &'static str) -> Self {
        Error::DuplicateEntry { context }
    }

    /// Classifies the error for peer-scoring decisions. Every variant here is
    /// a format error by construction; this just narrows which kind.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EndOfStream { .. } => ErrorCategory::Truncated,
            Error::VarIntTooLarge { .. } => ErrorCategory::LimitExceeded,
            Error::CollectionTooLarge { .. } => ErrorCategory::LimitExceeded,
            Error::NestingExceeded => ErrorCategory::LimitExceeded,
            Error::UnknownTag { .. } => ErrorCategory::InvalidValue,
            Error::InvalidFormat(_) => ErrorCategory::InvalidValue,
            Error::TrailingBytes { .. } => ErrorCategory::InvalidValue,
            Error::DuplicateEntry { .. } => ErrorCategory::InvalidValue,
        }
    }

    /// Format errors are never retryable: the bytes that caused them will
    /// never parse differently on a retry.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_partition_as_expected() {
        assert_eq!(
            Error::end_of_stream(4, 1).category(),
            ErrorCategory::Truncated
        );
        assert_eq!(
            Error::collection_too_large(17, 16).category(),
            ErrorCategory::LimitExceeded
        );
        assert_eq!(
            Error::unknown_tag(0xff, "WitnessCondition").category(),
            ErrorCategory::InvalidValue
        );
    }

    #[test]
    fn nothing_is_retryable() {
        assert!(!Error::nesting_exceeded().is_retryable());
    }
}
