//! Hashing and compressed public-key handling consumed by the witness
//! authorization core. Full elliptic-curve arithmetic and signature
//! verification are imported from `p256` rather than reimplemented here.

mod hash;
mod public_key;

pub use hash::{hash160, hash256, sha256};
pub use public_key::{PublicKey, PublicKeyError};
