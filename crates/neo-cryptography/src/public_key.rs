//! Compressed secp256r1 public key handling.
//!
//! Full elliptic-curve arithmetic is deliberately out of scope for this
//! crate; validity of a decoded point (on-curve membership, correct parity
//! byte) is delegated to `p256`, which the rest of the Neo Rust stack already
//! depends on for ECDSA.

use std::fmt;

use p256::elliptic_curve::sec1::FromEncodedPoint;
use p256::{EncodedPoint, PublicKey as P256PublicKey};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyError {
    #[error("public key must be exactly 33 compressed bytes, got {0}")]
    WrongLength(usize),
    #[error("public key prefix byte must be 0x02 or 0x03, got 0x{0:02x}")]
    InvalidPrefix(u8),
    #[error("compressed bytes do not decode to a point on secp256r1")]
    NotOnCurve,
}

/// A validated, compressed secp256r1 public key: 33 bytes, `0x02`/`0x03`
/// prefix followed by the X coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 33]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PublicKeyError> {
        if bytes.len() != 33 {
            return Err(PublicKeyError::WrongLength(bytes.len()));
        }
        match bytes[0] {
            0x02 | 0x03 => {}
            other => return Err(PublicKeyError::InvalidPrefix(other)),
        }

        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| PublicKeyError::NotOnCurve)?;
        let maybe_point = P256PublicKey::from_encoded_point(&encoded);
        if bool::from(maybe_point.is_none()) {
            return Err(PublicKeyError::NotOnCurve);
        }

        let mut out = [0u8; 33];
        out.copy_from_slice(bytes);
        Ok(PublicKey(out))
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, PublicKeyError> {
        let bytes = hex::decode(s).map_err(|_| PublicKeyError::WrongLength(s.len() / 2))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A real compressed secp256r1 point (generator point G).
    const GENERATOR_HEX: &str =
        "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c29";

    #[test]
    fn generator_point_parses() {
        let pk = PublicKey::from_hex(GENERATOR_HEX).unwrap();
        assert_eq!(pk.to_hex(), GENERATOR_HEX);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = PublicKey::from_bytes(&[0x02; 10]).unwrap_err();
        assert_eq!(err, PublicKeyError::WrongLength(10));
    }

    #[test]
    fn bad_prefix_is_rejected() {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x04;
        let err = PublicKey::from_bytes(&bytes).unwrap_err();
        assert_eq!(err, PublicKeyError::InvalidPrefix(0x04));
    }

    #[test]
    fn malformed_point_never_panics() {
        // Arbitrary bytes with a valid prefix; whether or not the x
        // coordinate happens to be on the curve, decoding must return a
        // `Result`, never panic.
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[1] = 0x01;
        let _ = PublicKey::from_bytes(&bytes);
    }
}
