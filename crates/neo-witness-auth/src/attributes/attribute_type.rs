//! The one-byte type tag that keys the transaction-attribute family, plus a
//! static tag-to-metadata registry so adding an attribute touches exactly
//! one place: the registry row and the matching [`super::TransactionAttribute`]
//! variant.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::CodecError;

/// Discriminant tag for a [`super::TransactionAttribute`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransactionAttributeType {
    HighPriority = 0x01,
    OracleResponse = 0x11,
    NotValidBefore = 0x20,
    Conflicts = 0x21,
    NotaryAssisted = 0x22,
}

impl TransactionAttributeType {
    pub fn from_byte(value: u8) -> Result<Self, CodecError> {
        match value {
            0x01 => Ok(Self::HighPriority),
            0x11 => Ok(Self::OracleResponse),
            0x20 => Ok(Self::NotValidBefore),
            0x21 => Ok(Self::Conflicts),
            0x22 => Ok(Self::NotaryAssisted),
            other => Err(neo_io::Error::unknown_tag(other, "TransactionAttribute").into()),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighPriority => "HighPriority",
            Self::OracleResponse => "OracleResponse",
            Self::NotValidBefore => "NotValidBefore",
            Self::Conflicts => "Conflicts",
            Self::NotaryAssisted => "NotaryAssisted",
        }
    }

    /// Whether a transaction may carry more than one attribute of this type.
    /// Looked up through [`registry`] rather than matched directly so the
    /// registry is the single source of truth for this flag.
    pub fn allow_multiple(self) -> bool {
        registry()
            .get(&self.to_byte())
            .map(|entry| entry.allow_multiple)
            .unwrap_or(false)
    }
}

impl std::fmt::Display for TransactionAttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata row for one attribute type: its tag, display name, and whether
/// a transaction may repeat it.
#[derive(Debug, Clone, Copy)]
pub struct AttributeTypeEntry {
    pub tag: u8,
    pub name: &'static str,
    pub allow_multiple: bool,
}

/// The closed set of attribute types, keyed by tag. Built once behind a
/// `once_cell::sync::Lazy` and never mutated afterwards - the "uninitialized
/// -> initialized once" lifecycle §4.7 describes for the registry.
static REGISTRY: Lazy<HashMap<u8, AttributeTypeEntry>> = Lazy::new(|| {
    use TransactionAttributeType::*;
    [HighPriority, OracleResponse, NotValidBefore, Conflicts, NotaryAssisted]
        .into_iter()
        .map(|ty| {
            (
                ty.to_byte(),
                AttributeTypeEntry {
                    tag: ty.to_byte(),
                    name: ty.as_str(),
                    allow_multiple: matches!(ty, Conflicts),
                },
            )
        })
        .collect()
});

pub fn registry() -> &'static HashMap<u8, AttributeTypeEntry> {
    &REGISTRY
}
