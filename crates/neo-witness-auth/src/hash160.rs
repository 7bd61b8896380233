//! 160-bit script hash identity.

use std::fmt;
use std::str::FromStr;

use neo_io::{BinaryWriter, MemoryReader, Serializable};

use crate::error::CodecError;

/// A script hash: 20 raw bytes in wire (little-endian) order. Rendered as
/// `0x`-prefixed big-endian hex, matching the convention the rest of the
/// protocol uses for addresses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash160([u8; 20]);

impl Hash160 {
    pub const ZERO: Hash160 = Hash160([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Hash160(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derives a script hash from a verification script: `ripemd160(sha256(script))`.
    pub fn from_script(script: &[u8]) -> Self {
        Hash160(neo_cryptography::hash160(script))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != 20 {
            return Err(CodecError::Io(neo_io::Error::invalid_format(format!(
                "Hash160 requires 20 bytes, got {}",
                bytes.len()
            ))));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Hash160(out))
    }

    /// Parses a `0x`-prefixed big-endian hex string (the display format).
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(s)
            .map_err(|e| CodecError::Io(neo_io::Error::invalid_format(e.to_string())))?;
        if bytes.len() != 20 {
            return Err(CodecError::Io(neo_io::Error::invalid_format(format!(
                "Hash160 hex must decode to 20 bytes, got {}",
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

    /// Renders this script hash as a Neo Base58Check address: `version ∥
    /// wire bytes`, followed by a 4-byte checksum (the leading bytes of
    /// `hash256` of the versioned payload), Base58-encoded.
    pub fn to_address(&self, version: u8) -> String {
        let mut data = Vec::with_capacity(21);
        data.push(version);
        data.extend_from_slice(&self.0);
        let checksum = neo_cryptography::hash256(&data);
        data.extend_from_slice(&checksum[..4]);
        bs58::encode(data).into_string()
    }

    /// Parses a Neo Base58Check address, verifying the version byte and the
    /// checksum before accepting the embedded script hash.
    pub fn from_address(address: &str, version: u8) -> Result<Self, CodecError> {
        let decoded = bs58::decode(address)
            .into_vec()
            .map_err(|e| CodecError::Io(neo_io::Error::invalid_format(format!(
                "invalid Base58 address: {e}"
            ))))?;
        if decoded.len() != 21 + 4 {
            return Err(CodecError::Io(neo_io::Error::invalid_format(format!(
                "address must decode to 25 bytes, got {}",
                decoded.len()
            ))));
        }
        if decoded[0] != version {
            return Err(CodecError::Io(neo_io::Error::invalid_format(format!(
                "address version byte 0x{:02x} does not match expected 0x{version:02x}",
                decoded[0]
            ))));
        }
        let (payload, checksum) = decoded.split_at(21);
        let expected_checksum = neo_cryptography::hash256(payload);
        if checksum != &expected_checksum[..4] {
            return Err(CodecError::Io(neo_io::Error::invalid_format(
                "address checksum mismatch",
            )));
        }
        Self::from_slice(&payload[1..])
    }
}

impl Serializable for Hash160 {
    fn size(&self) -> usize {
        20
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn deserialize(reader: &mut MemoryReader) -> neo_io::Result<Self> {
        let bytes = reader.read_bytes(20)?;
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Hash160(out))
    }
}

impl fmt::Display for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl fmt::Debug for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash160({})", self.to_hex_string())
    }
}

impl FromStr for Hash160 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 20]> for Hash160 {
    fn from(bytes: [u8; 20]) -> Self {
        Hash160(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_script_derives_20_bytes() {
        let h = Hash160::from_script(b"some script");
        assert_eq!(h.as_bytes().len(), 20);
    }

    #[test]
    fn hex_round_trip() {
        let h = Hash160::from_script(b"round trip me");
        let s = h.to_hex_string();
        let parsed = Hash160::parse(&s).unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn wire_round_trip() {
        let h = Hash160::from_script(b"wire format");
        let mut w = BinaryWriter::new();
        h.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();
        assert_eq!(bytes.len(), 20);
        let mut r = MemoryReader::new(&bytes);
        let decoded = Hash160::deserialize(&mut r).unwrap();
        assert_eq!(h, decoded);
    }

    #[test]
    fn zero_is_zero() {
        assert!(Hash160::ZERO.is_zero());
    }

    #[test]
    fn address_round_trip() {
        let h = Hash160::from_script(b"address round trip");
        let address = h.to_address(0x35);
        let parsed = Hash160::from_address(&address, 0x35).unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn address_with_wrong_version_is_rejected() {
        let h = Hash160::from_script(b"wrong version");
        let address = h.to_address(0x35);
        assert!(Hash160::from_address(&address, 0x17).is_err());
    }

    #[test]
    fn address_with_tampered_checksum_is_rejected() {
        let h = Hash160::from_script(b"tampered");
        let mut address = h.to_address(0x35);
        address.pop();
        address.push(if address.ends_with('1') { '2' } else { '1' });
        assert!(Hash160::from_address(&address, 0x35).is_err());
    }
}
