//! `HighPriority`: no payload; verifies that the fee payer is a committee
//! account.

use neo_io::{BinaryWriter, MemoryReader};
use serde_json::{Map, Value};

use crate::error::CodecError;

use super::{AttributeContext, AttributeViews};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighPriorityAttribute;

impl HighPriorityAttribute {
    pub fn new() -> Self {
        Self
    }

    pub fn verify(&self, ctx: &AttributeContext<'_>, views: &AttributeViews<'_>) -> bool {
        match ctx.fee_payer() {
            Some(payer) => views.committee.is_committee_member(payer),
            None => false,
        }
    }

    pub fn calculate_network_fee(
        &self,
        _ctx: &AttributeContext<'_>,
        _views: &AttributeViews<'_>,
    ) -> i64 {
        0
    }

    pub fn size(&self) -> usize {
        0
    }

    pub fn serialize(&self, _writer: &mut BinaryWriter) -> neo_io::Result<()> {
        Ok(())
    }

    pub fn deserialize(_reader: &mut MemoryReader) -> neo_io::Result<Self> {
        Ok(Self)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(Map::new())
    }

    pub fn from_json(_value: &Value) -> Result<Self, CodecError> {
        Ok(Self)
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
    fn verify_true_when_fee_payer_is_committee_member() {
        let payer = Hash160::from_script(b"payer");
        let signers = vec![Signer::new(payer, WitnessScope::CALLED_BY_ENTRY)];
        let ctx = AttributeContext::new(&signers);
        let ledger = SetLedgerView::new();
        let committee = SetCommitteeView::new().with_member(payer);
        let oracle = SetOracleState::new();
        let clock = FixedClock::new(0);
        let views = AttributeViews::new(&ledger, &committee, &oracle, &clock, false);

        assert!(HighPriorityAttribute::new().verify(&ctx, &views));
    }

    #[test]
    fn verify_false_when_fee_payer_is_not_committee_member() {
        let payer = Hash160::from_script(b"payer");
        let signers = vec![Signer::new(payer, WitnessScope::CALLED_BY_ENTRY)];
        let ctx = AttributeContext::new(&signers);
        let ledger = SetLedgerView::new();
        let committee = SetCommitteeView::new();
        let oracle = SetOracleState::new();
        let clock = FixedClock::new(0);
        let views = AttributeViews::new(&ledger, &committee, &oracle, &clock, false);

        assert!(!HighPriorityAttribute::new().verify(&ctx, &views));
    }

    #[test]
    fn round_trips_binary() {
        let attr = HighPriorityAttribute::new();
        let mut w = BinaryWriter::new();
        attr.serialize(&mut w).unwrap();
        assert!(w.to_bytes().is_empty());
        let mut r = MemoryReader::new(&[]);
        assert_eq!(HighPriorityAttribute::deserialize(&mut r).unwrap(), attr);
    }
}
