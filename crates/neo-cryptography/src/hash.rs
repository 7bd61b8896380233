//! Hash primitives the witness authorization core needs: SHA-256 and the
//! SHA-256-then-RIPEMD-160 composition used to derive a script hash.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// `SHA-256(data)`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `SHA-256(data)` run again over its own output, the hash used for
/// transaction and block identity in the Neo wire format.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// `RIPEMD-160(SHA-256(data))`, the script-hash derivation used to turn a
/// verification script into a `Hash160` account identity.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = sha256(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_matches_known_vector() {
        let digest = sha256(b"");
        assert_eq!(
            hex::encode(digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hash160_is_20_bytes() {
        let h = hash160(b"some verification script");
        assert_eq!(h.len(), 20);
    }
}
