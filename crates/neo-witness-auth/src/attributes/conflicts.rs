//! `Conflicts`: declares that this transaction supersedes another by hash.
//! Unlike every other attribute, a transaction may carry more than one.

use neo_config::BASE_FEE;
use neo_io::{BinaryWriter, MemoryReader, Serializable};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::hash256::Hash256;

use super::{AttributeContext, AttributeViews};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictsAttribute {
    pub hash: Hash256,
}

impl ConflictsAttribute {
    pub fn new(hash: Hash256) -> Self {
        Self { hash }
    }

    /// Only the referenced transaction's chain membership matters; it is
    /// fine if the referenced transaction itself also names a Conflicts
    /// attribute pointing elsewhere.
    pub fn verify(&self, _ctx: &AttributeContext<'_>, views: &AttributeViews<'_>) -> bool {
        !views.ledger.contains_transaction(self.hash)
    }

    pub fn calculate_network_fee(
        &self,
        ctx: &AttributeContext<'_>,
        _views: &AttributeViews<'_>,
    ) -> i64 {
        ctx.signers.len() as i64 * BASE_FEE
    }

    pub fn size(&self) -> usize {
        32
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        self.hash.serialize(writer)
    }

    pub fn deserialize(reader: &mut MemoryReader) -> neo_io::Result<Self> {
        Ok(Self {
            hash: Hash256::deserialize(reader)?,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("hash".into(), Value::String(self.hash.to_hex_string()));
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let hash = value
            .get("hash")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("hash", "Conflicts"))?;
        Ok(Self {
            hash: Hash256::parse(hash)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash160::Hash160;
    use crate::signer::Signer;
    use crate::views::{FixedClock, SetCommitteeView, SetLedgerView, SetOracleState};
    use crate::witness_scope::WitnessScope;

    #[test]
    fn scenario_6_fee_and_verify_with_no_referenced_hash_on_chain() {
        let signers = vec![
            Signer::new(Hash160::from_script(b"s1"), WitnessScope::CALLED_BY_ENTRY),
            Signer::new(Hash160::from_script(b"s2"), WitnessScope::CALLED_BY_ENTRY),
        ];
        let ctx = AttributeContext::new(&signers);
        let ledger = SetLedgerView::new();
        let committee = SetCommitteeView::new();
        let oracle = SetOracleState::new();
        let clock = FixedClock::new(0);
        let views = AttributeViews::new(&ledger, &committee, &oracle, &clock, false);

        let attrs = [
            ConflictsAttribute::new(Hash256::from_data(b"a")),
            ConflictsAttribute::new(Hash256::from_data(b"b")),
            ConflictsAttribute::new(Hash256::from_data(b"c")),
        ];
        for a in &attrs {
            assert!(a.verify(&ctx, &views));
        }
        let total: i64 = attrs.iter().map(|a| a.calculate_network_fee(&ctx, &views)).sum();
        assert_eq!(total, 3 * (2 * BASE_FEE));
    }

    #[test]
    fn verify_false_when_referenced_hash_is_on_chain() {
        let hash = Hash256::from_data(b"onchain");
        let ctx = AttributeContext::new(&[]);
        let ledger = SetLedgerView::new().with_transaction(hash);
        let committee = SetCommitteeView::new();
        let oracle = SetOracleState::new();
        let clock = FixedClock::new(0);
        let views = AttributeViews::new(&ledger, &committee, &oracle, &clock, false);

        assert!(!ConflictsAttribute::new(hash).verify(&ctx, &views));
    }

    #[test]
    fn round_trips_binary() {
        let attr = ConflictsAttribute::new(Hash256::from_data(b"x"));
        let mut w = BinaryWriter::new();
        attr.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        assert_eq!(ConflictsAttribute::deserialize(&mut r).unwrap(), attr);
    }
}
