//! Open-set, tagged transaction-attribute family. Deserialization reads the
//! one-byte type tag, looks up the variant through
//! [`attribute_type::TransactionAttributeType`], and delegates payload
//! parsing to that variant. Adding a new attribute means adding a tag to
//! the registry and a variant here - nothing else in the crate knows
//! attribute internals.

mod attribute_type;
mod conflicts;
mod high_priority;
mod not_valid_before;
mod notary_assisted;
mod oracle_response;

pub use attribute_type::TransactionAttributeType;
pub use conflicts::ConflictsAttribute;
pub use high_priority::HighPriorityAttribute;
pub use not_valid_before::NotValidBeforeAttribute;
pub use notary_assisted::NotaryAssistedAttribute;
pub use oracle_response::{OracleResponseAttribute, OracleResponseCode};

use neo_config::MAX_TRANSACTION_ATTRIBUTES;
use neo_io::{BinaryWriter, MemoryReader};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{CodecError, VerificationResult};
use crate::hash160::Hash160;
use crate::signer::Signer;
use crate::views::{Clock, CommitteeView, LedgerView, OracleState};

/// The read-only slice of transaction state an attribute's `verify`/
/// `calculate_network_fee` needs: its signers, in transaction order. The
/// fee payer is the first signer (§3).
#[derive(Debug, Clone, Copy)]
pub struct AttributeContext<'a> {
    pub signers: &'a [Signer],
}

impl<'a> AttributeContext<'a> {
    pub fn new(signers: &'a [Signer]) -> Self {
        Self { signers }
    }

    pub fn fee_payer(&self) -> Option<Hash160> {
        self.signers.first().map(|s| s.account)
    }
}

/// Bundle of the read-only collaborators an attribute's verification hooks
/// may need, borrowed for the duration of one check. `notary_enabled`
/// stands in for the network's notary-feature activation flag, which in a
/// real node comes from policy/hardfork state outside this crate's scope.
pub struct AttributeViews<'a> {
    pub ledger: &'a dyn LedgerView,
    pub committee: &'a dyn CommitteeView,
    pub oracle: &'a dyn OracleState,
    pub clock: &'a dyn Clock,
    pub notary_enabled: bool,
}

impl<'a> AttributeViews<'a> {
    pub fn new(
        ledger: &'a dyn LedgerView,
        committee: &'a dyn CommitteeView,
        oracle: &'a dyn OracleState,
        clock: &'a dyn Clock,
        notary_enabled: bool,
    ) -> Self {
        Self {
            ledger,
            committee,
            oracle,
            clock,
            notary_enabled,
        }
    }
}

/// A single transaction attribute. Closed tagged union over the five
/// protocol-defined variants; dispatch is a match on the tag, never
/// reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAttribute {
    HighPriority(HighPriorityAttribute),
    OracleResponse(OracleResponseAttribute),
    NotValidBefore(NotValidBeforeAttribute),
    Conflicts(ConflictsAttribute),
    NotaryAssisted(NotaryAssistedAttribute),
}

impl TransactionAttribute {
    pub fn attribute_type(&self) -> TransactionAttributeType {
        match self {
            Self::HighPriority(_) => TransactionAttributeType::HighPriority,
            Self::OracleResponse(_) => TransactionAttributeType::OracleResponse,
            Self::NotValidBefore(_) => TransactionAttributeType::NotValidBefore,
            Self::Conflicts(_) => TransactionAttributeType::Conflicts,
            Self::NotaryAssisted(_) => TransactionAttributeType::NotaryAssisted,
        }
    }

    pub fn allow_multiple(&self) -> bool {
        self.attribute_type().allow_multiple()
    }

    pub fn verify(&self, ctx: &AttributeContext<'_>, views: &AttributeViews<'_>) -> bool {
        match self {
            Self::HighPriority(a) => a.verify(ctx, views),
            Self::OracleResponse(a) => a.verify(ctx, views),
            Self::NotValidBefore(a) => a.verify(ctx, views),
            Self::Conflicts(a) => a.verify(ctx, views),
            Self::NotaryAssisted(a) => a.verify(ctx, views),
        }
    }

    pub fn calculate_network_fee(
        &self,
        ctx: &AttributeContext<'_>,
        views: &AttributeViews<'_>,
    ) -> i64 {
        match self {
            Self::HighPriority(a) => a.calculate_network_fee(ctx, views),
            Self::OracleResponse(a) => a.calculate_network_fee(ctx, views),
            Self::NotValidBefore(a) => a.calculate_network_fee(ctx, views),
            Self::Conflicts(a) => a.calculate_network_fee(ctx, views),
            Self::NotaryAssisted(a) => a.calculate_network_fee(ctx, views),
        }
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        writer.write_byte(self.attribute_type().to_byte());
        match self {
            Self::HighPriority(a) => a.serialize(writer),
            Self::OracleResponse(a) => a.serialize(writer),
            Self::NotValidBefore(a) => a.serialize(writer),
            Self::Conflicts(a) => a.serialize(writer),
            Self::NotaryAssisted(a) => a.serialize(writer),
        }
    }

    pub fn deserialize(reader: &mut MemoryReader) -> Result<Self, CodecError> {
        let tag = reader.read_byte()?;
        let ty = TransactionAttributeType::from_byte(tag)?;
        Ok(match ty {
            TransactionAttributeType::HighPriority => {
                Self::HighPriority(HighPriorityAttribute::deserialize(reader)?)
            }
            TransactionAttributeType::OracleResponse => {
                Self::OracleResponse(OracleResponseAttribute::deserialize(reader)?)
            }
            TransactionAttributeType::NotValidBefore => {
                Self::NotValidBefore(NotValidBeforeAttribute::deserialize(reader)?)
            }
            TransactionAttributeType::Conflicts => {
                Self::Conflicts(ConflictsAttribute::deserialize(reader)?)
            }
            TransactionAttributeType::NotaryAssisted => {
                Self::NotaryAssisted(NotaryAssistedAttribute::deserialize(reader)?)
            }
        })
    }

    pub fn to_json(&self) -> Value {
        let mut json = match self {
            Self::HighPriority(a) => a.to_json(),
            Self::OracleResponse(a) => a.to_json(),
            Self::NotValidBefore(a) => a.to_json(),
            Self::Conflicts(a) => a.to_json(),
            Self::NotaryAssisted(a) => a.to_json(),
        };
        json.as_object_mut().expect("attribute to_json always returns an object").insert(
            "type".into(),
            Value::String(self.attribute_type().as_str().into()),
        );
        json
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let type_name = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("type", "TransactionAttribute"))?;
        Ok(match type_name {
            "HighPriority" => Self::HighPriority(HighPriorityAttribute::from_json(value)?),
            "OracleResponse" => Self::OracleResponse(OracleResponseAttribute::from_json(value)?),
            "NotValidBefore" => Self::NotValidBefore(NotValidBeforeAttribute::from_json(value)?),
            "Conflicts" => Self::Conflicts(ConflictsAttribute::from_json(value)?),
            "NotaryAssisted" => Self::NotaryAssisted(NotaryAssistedAttribute::from_json(value)?),
            other => {
                return Err(neo_io::Error::invalid_format(format!(
                    "unknown TransactionAttribute type '{other}'"
                ))
                .into())
            }
        })
    }
}

/// Reads a `var_int`-prefixed attribute list, enforcing the element cap
/// before allocating and rejecting a second instance of a type that does
/// not allow multiple, all before returning to the caller.
pub fn deserialize_attributes(
    reader: &mut MemoryReader,
) -> Result<Vec<TransactionAttribute>, CodecError> {
    let count = reader.read_var_int(MAX_TRANSACTION_ATTRIBUTES as u64)? as usize;
    let mut attributes = Vec::with_capacity(count);
    let mut seen_single: HashMap<u8, ()> = HashMap::new();
    for _ in 0..count {
        let attr = TransactionAttribute::deserialize(reader)?;
        let tag = attr.attribute_type().to_byte();
        if !attr.allow_multiple() && seen_single.insert(tag, ()).is_some() {
            tracing::warn!(tag, "duplicate attribute of a single-instance type");
            return Err(CodecError::DuplicateAttribute(tag));
        }
        attributes.push(attr);
    }
    Ok(attributes)
}

pub fn serialize_attributes(
    attributes: &[TransactionAttribute],
    writer: &mut BinaryWriter,
) -> neo_io::Result<()> {
    writer.write_var_int(attributes.len() as u64);
    for attr in attributes {
        attr.serialize(writer)?;
    }
    Ok(())
}

/// Runs every attribute's `verify` hook, short-circuiting on the first
/// rejection. An empty attribute list is trivially valid.
pub fn verify_attributes(
    attributes: &[TransactionAttribute],
    ctx: &AttributeContext<'_>,
    views: &AttributeViews<'_>,
) -> VerificationResult {
    for attr in attributes {
        if !attr.verify(ctx, views) {
            let reason = format!("{} attribute failed verification", attr.attribute_type());
            tracing::warn!(attribute = %attr.attribute_type(), "attribute verification failed");
            return VerificationResult::invalid(reason);
        }
    }
    VerificationResult::Valid
}

/// Sums every attribute's additive network-fee contribution.
pub fn compute_network_fee_contribution(
    attributes: &[TransactionAttribute],
    ctx: &AttributeContext<'_>,
    views: &AttributeViews<'_>,
) -> i64 {
    attributes
        .iter()
        .map(|attr| attr.calculate_network_fee(ctx, views))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash160::Hash160;
    use crate::signer::Signer;
    use crate::views::{FixedClock, SetCommitteeView, SetLedgerView, SetOracleState};
    use crate::witness_scope::WitnessScope;

    fn default_views() -> (SetLedgerView, SetCommitteeView, SetOracleState, FixedClock) {
        (
            SetLedgerView::new(),
            SetCommitteeView::new(),
            SetOracleState::new(),
            FixedClock::new(0),
        )
    }

    #[test]
    fn duplicate_single_instance_attribute_is_rejected() {
        let mut w = BinaryWriter::new();
        w.write_var_int(2);
        TransactionAttribute::HighPriority(HighPriorityAttribute::new())
            .serialize(&mut w)
            .unwrap();
        TransactionAttribute::HighPriority(HighPriorityAttribute::new())
            .serialize(&mut w)
            .unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        let err = deserialize_attributes(&mut r).unwrap_err();
        assert!(matches!(err, CodecError::DuplicateAttribute(0x01)));
    }

    #[test]
    fn multiple_conflicts_attributes_are_accepted() {
        let mut w = BinaryWriter::new();
        w.write_var_int(2);
        TransactionAttribute::Conflicts(ConflictsAttribute::new(crate::hash256::Hash256::from_data(
            b"a",
        )))
        .serialize(&mut w)
        .unwrap();
        TransactionAttribute::Conflicts(ConflictsAttribute::new(crate::hash256::Hash256::from_data(
            b"b",
        )))
        .serialize(&mut w)
        .unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        let attrs = deserialize_attributes(&mut r).unwrap();
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn verify_attributes_short_circuits_on_first_failure() {
        let signers = vec![Signer::new(Hash160::ZERO, WitnessScope::CALLED_BY_ENTRY)];
        let ctx = AttributeContext::new(&signers);
        let (ledger, committee, oracle, clock) = default_views();
        let views = AttributeViews::new(&ledger, &committee, &oracle, &clock, false);

        let attrs = vec![TransactionAttribute::HighPriority(HighPriorityAttribute::new())];
        let result = verify_attributes(&attrs, &ctx, &views);
        assert!(!result.is_valid());
    }

    #[test]
    fn empty_attribute_list_is_valid_and_free() {
        let ctx = AttributeContext::new(&[]);
        let (ledger, committee, oracle, clock) = default_views();
        let views = AttributeViews::new(&ledger, &committee, &oracle, &clock, false);

        assert!(verify_attributes(&[], &ctx, &views).is_valid());
        assert_eq!(compute_network_fee_contribution(&[], &ctx, &views), 0);
    }

    #[test]
    fn binary_round_trip_through_the_enum() {
        let attr = TransactionAttribute::NotValidBefore(NotValidBeforeAttribute::new(99));
        let mut w = BinaryWriter::new();
        attr.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        assert_eq!(TransactionAttribute::deserialize(&mut r).unwrap(), attr);
    }

    #[test]
    fn json_round_trip_through_the_enum() {
        let attr = TransactionAttribute::Conflicts(ConflictsAttribute::new(
            crate::hash256::Hash256::from_data(b"json"),
        ));
        let json = attr.to_json();
        assert_eq!(json["type"], "Conflicts");
        assert_eq!(TransactionAttribute::from_json(&json).unwrap(), attr);
    }
}
