//! `NotaryAssisted`: declares how many keys participate in the notary's
//! assisted signing process, and pays the notary service fee for them.

use neo_config::{MAX_NOTARY_KEYS, NOTARY_SERVICE_FEE};
use neo_io::{BinaryWriter, MemoryReader};
use serde_json::{Map, Value};

use crate::error::CodecError;

use super::{AttributeContext, AttributeViews};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotaryAssistedAttribute {
    pub nkeys: u8,
}

impl NotaryAssistedAttribute {
    pub fn new(nkeys: u8) -> Self {
        Self { nkeys }
    }

    /// Requires the notary feature to be active network-wide and `nkeys` to
    /// stay within the protocol's per-transaction cap.
    pub fn verify(&self, _ctx: &AttributeContext<'_>, views: &AttributeViews<'_>) -> bool {
        views.notary_enabled && self.nkeys <= MAX_NOTARY_KEYS
    }

    pub fn calculate_network_fee(
        &self,
        _ctx: &AttributeContext<'_>,
        _views: &AttributeViews<'_>,
    ) -> i64 {
        (self.nkeys as i64 + 1) * NOTARY_SERVICE_FEE
    }

    pub fn size(&self) -> usize {
        1
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        writer.write_byte(self.nkeys);
        Ok(())
    }

    pub fn deserialize(reader: &mut MemoryReader) -> neo_io::Result<Self> {
        Ok(Self {
            nkeys: reader.read_byte()?,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("nkeys".into(), Value::Number(self.nkeys.into()));
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let nkeys = value
            .get("nkeys")
            .and_then(Value::as_u64)
            .ok_or_else(|| CodecError::invalid_json("nkeys", "NotaryAssisted"))?;
        if nkeys > u8::MAX as u64 {
            return Err(CodecError::invalid_json("nkeys", "NotaryAssisted"));
        }
        Ok(Self { nkeys: nkeys as u8 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{FixedClock, SetCommitteeView, SetLedgerView, SetOracleState};

    #[test]
    fn verify_requires_notary_feature_active() {
        let ctx = AttributeContext::new(&[]);
        let ledger = SetLedgerView::new();
        let committee = SetCommitteeView::new();
        let oracle = SetOracleState::new();
        let clock = FixedClock::new(0);

        let enabled = AttributeViews::new(&ledger, &committee, &oracle, &clock, true);
        let disabled = AttributeViews::new(&ledger, &committee, &oracle, &clock, false);

        let attr = NotaryAssistedAttribute::new(3);
        assert!(attr.verify(&ctx, &enabled));
        assert!(!attr.verify(&ctx, &disabled));
    }

    #[test]
    fn fee_is_nkeys_plus_one_times_service_fee() {
        let ctx = AttributeContext::new(&[]);
        let ledger = SetLedgerView::new();
        let committee = SetCommitteeView::new();
        let oracle = SetOracleState::new();
        let clock = FixedClock::new(0);
        let views = AttributeViews::new(&ledger, &committee, &oracle, &clock, true);

        let attr = NotaryAssistedAttribute::new(2);
        assert_eq!(
            attr.calculate_network_fee(&ctx, &views),
            3 * NOTARY_SERVICE_FEE
        );
    }

    #[test]
    fn round_trips_binary() {
        let attr = NotaryAssistedAttribute::new(5);
        let mut w = BinaryWriter::new();
        attr.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        assert_eq!(NotaryAssistedAttribute::deserialize(&mut r).unwrap(), attr);
    }
}
