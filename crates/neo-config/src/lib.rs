//! Protocol constants for the witness authorization core.
//!
//! Keeping these in one flat module means the codec and scope evaluator
//! never carry a magic number that isn't named here.

use serde::{Deserialize, Serialize};

/// Size of a script hash (`Hash160`) in bytes.
pub const ADDRESS_SIZE: usize = 20;
/// Size of a transaction hash (`Hash256`) in bytes.
pub const HASH_SIZE: usize = 32;
/// Size of a compressed secp256r1 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Maximum number of allowed contracts, allowed groups, or rules a single
/// `Signer` may carry.
pub const MAX_SUBITEMS: usize = 16;

/// Maximum nesting depth of a `WitnessCondition` tree. The root counts as
/// depth 0; every child of `And`/`Or`/`Not` counts one more.
pub const MAX_NESTING_DEPTH: usize = 2;

/// Maximum number of child conditions inside a single `And`/`Or` node.
pub const MAX_CONDITION_SUBITEMS: usize = 16;

/// Maximum byte length of a `Witness.invocation_script`.
pub const MAX_INVOCATION_SCRIPT: usize = 1024;
/// Maximum byte length of a `Witness.verification_script`.
pub const MAX_VERIFICATION_SCRIPT: usize = 1024;

/// Maximum byte length of a single compressed group payload read off the wire
/// (the encoding is fixed-width, this only bounds a defensive reader).
pub const ECPOINT_MAX_BYTES: usize = 64;

/// Maximum number of attributes a single transaction may carry.
pub const MAX_TRANSACTION_ATTRIBUTES: usize = 16;

/// Maximum byte length of an `OracleResponse.result` payload.
pub const MAX_ORACLE_RESULT_SIZE: usize = u16::MAX as usize;

/// Base network fee unit (datoshi) used by `Conflicts::calculate_network_fee`.
pub const BASE_FEE: i64 = 1_000_000;
/// Per-key notary service fee (datoshi) used by `NotaryAssisted::calculate_network_fee`.
pub const NOTARY_SERVICE_FEE: i64 = 1_000_000;
/// Maximum `nkeys` a `NotaryAssisted` attribute may declare.
pub const MAX_NOTARY_KEYS: u8 = 255;

/// Network identity, kept narrow: the witness authorization core only needs
/// the address version byte to render Base58Check addresses, and only the
/// magic number ever flows into a transaction hash pre-image computed by a
/// collaborator outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NetworkType {
    MainNet,
    #[default]
    TestNet,
    Private,
}

impl NetworkType {
    /// Gets the network magic number.
    pub fn magic(&self) -> u32 {
        match self {
            NetworkType::MainNet => 0x334f454e,
            NetworkType::TestNet => 0x3254334e,
            NetworkType::Private => 0x0000_0000,
        }
    }

    /// Gets the Base58Check address version byte.
    pub fn address_version(&self) -> u8 {
        0x35
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_match_protocol() {
        assert_eq!(ADDRESS_SIZE, 20);
        assert_eq!(HASH_SIZE, 32);
        assert_eq!(MAX_SUBITEMS, 16);
        assert_eq!(MAX_NESTING_DEPTH, 2);
    }

    #[test]
    fn network_magic_values() {
        assert_eq!(NetworkType::MainNet.magic(), 0x334f454e);
        assert_eq!(NetworkType::default(), NetworkType::TestNet);
    }
}
