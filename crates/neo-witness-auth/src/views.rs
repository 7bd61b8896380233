//! Read-only collaborator interfaces the core queries but does not own:
//! the contract store, the ledger, the committee set, pending oracle
//! requests, and the current block height. Every trait here is `Send +
//! Sync` so a verifier pool can share one implementation behind an `Arc`
//! while evaluating different transactions in parallel.

use std::collections::HashMap;
use std::collections::HashSet;

use neo_cryptography::PublicKey;

use crate::hash160::Hash160;
use crate::hash256::Hash256;

/// Looks up the manifest groups a deployed contract declares. An unknown
/// contract yields an empty set rather than an error - the evaluator treats
/// that as "no group membership", never as a failure.
pub trait ContractStore: Send + Sync {
    fn get_groups(&self, script_hash: Hash160) -> HashSet<PublicKey>;
}

/// Whether a given transaction hash is already recorded on chain, consulted
/// by the `Conflicts` attribute.
pub trait LedgerView: Send + Sync {
    fn contains_transaction(&self, hash: Hash256) -> bool;
}

/// Whether an account belongs to the current committee, consulted by the
/// `HighPriority` attribute.
pub trait CommitteeView: Send + Sync {
    fn is_committee_member(&self, account: Hash160) -> bool;
}

/// Whether an oracle request with the given id is still outstanding,
/// consulted by the `OracleResponse` attribute.
pub trait OracleState: Send + Sync {
    fn has_pending_request(&self, id: u64) -> bool;
}

/// The current block height, consulted by the `NotValidBefore` attribute.
pub trait Clock: Send + Sync {
    fn current_height(&self) -> u32;
}

/// Simple in-memory `ContractStore` backed by a map, used by tests and by
/// any caller that wants a read-only snapshot without a real ledger handle.
#[derive(Debug, Clone, Default)]
pub struct MapContractStore {
    groups: HashMap<Hash160, HashSet<PublicKey>>,
}

impl MapContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(mut self, script_hash: Hash160, groups: HashSet<PublicKey>) -> Self {
        self.groups.insert(script_hash, groups);
        self
    }
}

impl ContractStore for MapContractStore {
    fn get_groups(&self, script_hash: Hash160) -> HashSet<PublicKey> {
        self.groups.get(&script_hash).cloned().unwrap_or_default()
    }
}

/// Simple in-memory `LedgerView` backed by a set of known transaction hashes.
#[derive(Debug, Clone, Default)]
pub struct SetLedgerView {
    known: HashSet<Hash256>,
}

impl SetLedgerView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transaction(mut self, hash: Hash256) -> Self {
        self.known.insert(hash);
        self
    }
}

impl LedgerView for SetLedgerView {
    fn contains_transaction(&self, hash: Hash256) -> bool {
        self.known.contains(&hash)
    }
}

/// Simple in-memory `CommitteeView` backed by a set of committee accounts.
#[derive(Debug, Clone, Default)]
pub struct SetCommitteeView {
    members: HashSet<Hash160>,
}

impl SetCommitteeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, account: Hash160) -> Self {
        self.members.insert(account);
        self
    }
}

impl CommitteeView for SetCommitteeView {
    fn is_committee_member(&self, account: Hash160) -> bool {
        self.members.contains(&account)
    }
}

/// Simple in-memory `OracleState` backed by a set of pending request ids.
#[derive(Debug, Clone, Default)]
pub struct SetOracleState {
    pending: HashSet<u64>,
}

impl SetOracleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pending(mut self, id: u64) -> Self {
        self.pending.insert(id);
        self
    }
}

impl OracleState for SetOracleState {
    fn has_pending_request(&self, id: u64) -> bool {
        self.pending.contains(&id)
    }
}

/// A fixed-height `Clock`, as used by tests that pin a block height.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock {
    height: u32,
}

impl FixedClock {
    pub fn new(height: u32) -> Self {
        Self { height }
    }
}

impl Clock for FixedClock {
    fn current_height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_contract_store_returns_empty_set_for_unknown_contract() {
        let store = MapContractStore::new();
        assert!(store.get_groups(Hash160::ZERO).is_empty());
    }

    #[test]
    fn set_ledger_view_reports_known_transactions() {
        let hash = Hash256::from_data(b"tx");
        let ledger = SetLedgerView::new().with_transaction(hash);
        assert!(ledger.contains_transaction(hash));
        assert!(!ledger.contains_transaction(Hash256::ZERO));
    }

    #[test]
    fn fixed_clock_reports_configured_height() {
        let clock = FixedClock::new(42);
        assert_eq!(clock.current_height(), 42);
    }
}
