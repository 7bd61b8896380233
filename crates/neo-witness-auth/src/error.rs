//! Error model for the witness authorization core.
//!
//! Two kinds of failure exist here, and they are deliberately not the same
//! Rust type: a [`CodecError`] means the bytes or JSON were malformed and the
//! containing message must be rejected outright; a [`VerificationResult`]
//! means the bytes were fine but the policy check (scope, attribute) did not
//! hold, which is a boolean outcome, not an error.

use thiserror::Error;

/// Malformed wire or JSON input. Every variant here surfaces as a single
/// rejection class to the peer layer; `category()` tells a caller whether the
/// failure looks like truncation, an out-of-range value, or a structural
/// limit violation, without string-matching the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] neo_io::Error),

    #[error("witness scope byte 0x{0:02x} sets reserved bits")]
    UnknownScopeBits(u8),

    #[error("Global scope cannot be combined with any other flag (got 0x{0:02x})")]
    GlobalCombinedWithOtherFlags(u8),

    #[error("{list} present but its gating scope flag is not set")]
    ListPresentWithoutFlag { list: &'static str },

    #[error("witness rule action byte 0x{0:02x} is neither Allow (0x01) nor Deny (0x00)")]
    InvalidRuleAction(u8),

    #[error("invalid compressed public key: {0}")]
    InvalidPublicKey(#[from] neo_cryptography::PublicKeyError),

    #[error("JSON field '{field}' missing or malformed in {context}")]
    InvalidJson {
        field: &'static str,
        context: &'static str,
    },

    #[error("duplicate {0:?} attribute: type does not allow multiple instances")]
    DuplicateAttribute(u8),
}

impl CodecError {
    pub fn list_present_without_flag(list: &'static str) -> Self {
        CodecError::ListPresentWithoutFlag { list }
    }

    pub fn invalid_json(field: &'static str, context: &'static str) -> Self {
        CodecError::InvalidJson { field, context }
    }

    /// Coarse classification re-exported from the underlying codec error
    /// where one exists, with a best-effort mapping for the domain-specific
    /// variants added here.
    pub fn category(&self) -> neo_io::ErrorCategory {
        match self {
            CodecError::Io(e) => e.category(),
            CodecError::UnknownScopeBits(_) => neo_io::ErrorCategory::InvalidValue,
            CodecError::GlobalCombinedWithOtherFlags(_) => neo_io::ErrorCategory::InvalidValue,
            CodecError::ListPresentWithoutFlag { .. } => neo_io::ErrorCategory::InvalidValue,
            CodecError::InvalidRuleAction(_) => neo_io::ErrorCategory::InvalidValue,
            CodecError::InvalidPublicKey(_) => neo_io::ErrorCategory::InvalidValue,
            CodecError::InvalidJson { .. } => neo_io::ErrorCategory::InvalidValue,
            CodecError::DuplicateAttribute(_) => neo_io::ErrorCategory::InvalidValue,
        }
    }

    pub fn is_retryable(&self) -> bool {
        false
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// The outcome of a semantic (non-format) check: scope authorization or
/// attribute verification. Not an error type - a well-formed transaction can
/// legitimately be `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Valid,
    Invalid(String),
}

impl VerificationResult {
    pub fn invalid<S: Into<String>>(reason: S) -> Self {
        VerificationResult::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid)
    }
}

impl From<bool> for VerificationResult {
    fn from(ok: bool) -> Self {
        if ok {
            VerificationResult::Valid
        } else {
            VerificationResult::invalid("policy check returned false")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_and_classify() {
        let io_err = neo_io::Error::nesting_exceeded();
        let codec_err: CodecError = io_err.into();
        assert_eq!(codec_err.category(), neo_io::ErrorCategory::LimitExceeded);
    }

    #[test]
    fn verification_result_from_bool() {
        assert!(VerificationResult::from(true).is_valid());
        assert!(!VerificationResult::from(false).is_valid());
    }
}
