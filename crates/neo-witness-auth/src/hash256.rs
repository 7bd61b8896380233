//! 256-bit transaction/block hash identity.

use std::fmt;
use std::str::FromStr;

use neo_io::{BinaryWriter, MemoryReader, Serializable};

use crate::error::CodecError;

/// A transaction hash: 32 raw bytes in wire (little-endian) order, rendered
/// as `0x`-prefixed big-endian hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derives a transaction hash from its pre-witness serialized bytes.
    pub fn from_data(data: &[u8]) -> Self {
        Hash256(neo_cryptography::hash256(data))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != 32 {
            return Err(CodecError::Io(neo_io::Error::invalid_format(format!(
                "Hash256 requires 32 bytes, got {}",
                bytes.len()
            ))));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Ok(Hash256(out))
    }

    pub fn parse(s: &str) -> Result<Self, CodecError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(s)
            .map_err(|e| CodecError::Io(neo_io::Error::invalid_format(e.to_string())))?;
        if bytes.len() != 32 {
            return Err(CodecError::Io(neo_io::Error::invalid_format(format!(
                "Hash256 hex must decode to 32 bytes, got {}",
                bytes.len()
            ))));
        }
        bytes.reverse();
        Self::from_slice(&bytes)
    }

    pub fn to_hex_string(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        format!("0x{}", hex::encode(reversed))
    }
}

impl Serializable for Hash256 {
    fn size(&self) -> usize {
        32
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> neo_io::Result<Self> {
        let bytes = reader.read_bytes(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Ok(Hash256(out))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex_string())
    }
}

impl FromStr for Hash256 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }
}
