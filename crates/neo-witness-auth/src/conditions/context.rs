//! The read-only view the condition and scope evaluators are given at a
//! single call site. Implemented by the VM collaborator in a real node; the
//! test suite implements it directly with fixed values or a small map.

use std::collections::HashSet;

use neo_cryptography::PublicKey;

use crate::hash160::Hash160;
use crate::views::ContractStore;

/// Immutable snapshot of the current call site, as seen by the evaluator.
///
/// Passed explicitly as a parameter rather than held as ambient state, so the
/// evaluator stays a pure function and is directly testable with mock views.
pub trait ConditionContext: Send + Sync {
    /// Script hash of the contract currently executing.
    fn current_script_hash(&self) -> Hash160;

    /// Script hash of the contract that invoked the current one, if any
    /// (`None` at the entry script itself).
    fn calling_script_hash(&self) -> Option<Hash160>;

    /// Script hash of the top-level script the transaction invoked.
    fn entry_script_hash(&self) -> Hash160;

    /// The manifest group public keys declared by the contract at
    /// `script_hash`. An unknown contract yields an empty set, not an error.
    fn groups_of(&self, script_hash: Hash160) -> HashSet<PublicKey>;
}

/// The production [`ConditionContext`]: the VM's three call-site hashes
/// composed with a borrowed [`ContractStore`] for group lookups, matching
/// §6's split between the `ContextView` and `ContractStore` collaborator
/// interfaces rather than folding both into one ad-hoc struct per caller.
pub struct CallSite<'a> {
    pub current_script_hash: Hash160,
    pub calling_script_hash: Option<Hash160>,
    pub entry_script_hash: Hash160,
    pub contracts: &'a dyn ContractStore,
}

impl<'a> CallSite<'a> {
    pub fn new(
        current_script_hash: Hash160,
        calling_script_hash: Option<Hash160>,
        entry_script_hash: Hash160,
        contracts: &'a dyn ContractStore,
    ) -> Self {
        Self {
            current_script_hash,
            calling_script_hash,
            entry_script_hash,
            contracts,
        }
    }
}

impl<'a> ConditionContext for CallSite<'a> {
    fn current_script_hash(&self) -> Hash160 {
        self.current_script_hash
    }

    fn calling_script_hash(&self) -> Option<Hash160> {
        self.calling_script_hash
    }

    fn entry_script_hash(&self) -> Hash160 {
        self.entry_script_hash
    }

    fn groups_of(&self, script_hash: Hash160) -> HashSet<PublicKey> {
        self.contracts.get_groups(script_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::MapContractStore;

    #[test]
    fn call_site_delegates_group_lookup_to_the_contract_store() {
        let pk = PublicKey::from_hex(
            "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c29",
        )
        .unwrap();
        let contract = Hash160::from_script(b"contract");
        let store = MapContractStore::new().with_groups(contract, HashSet::from([pk]));
        let ctx = CallSite::new(contract, None, Hash160::ZERO, &store);

        assert!(ctx.groups_of(contract).contains(&pk));
        assert!(ctx.groups_of(Hash160::ZERO).is_empty());
    }
}
