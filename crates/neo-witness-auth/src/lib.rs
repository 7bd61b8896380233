//! The witness authorization core of a Neo N3 style node: the signer model,
//! the witness-condition predicate language, the witness-scope evaluator,
//! the transaction-attribute framework, and their binary/JSON codecs.
//!
//! Everything here is pure with respect to its inputs - no I/O, no shared
//! mutable state beyond the once-initialized attribute-type registry. The
//! VM call stack, the ledger, the committee set, oracle state, and the
//! clock are consumed only through the read-only traits in [`views`].

pub mod attributes;
pub mod conditions;
mod error;
mod hash160;
mod hash256;
mod signer;
pub mod views;
mod witness;
mod witness_rule;
mod witness_scope;

pub use attributes::{
    compute_network_fee_contribution, deserialize_attributes, serialize_attributes,
    verify_attributes, AttributeContext, AttributeViews, ConflictsAttribute,
    HighPriorityAttribute, NotValidBeforeAttribute, NotaryAssistedAttribute,
    OracleResponseAttribute, OracleResponseCode, TransactionAttribute, TransactionAttributeType,
};
pub use conditions::{
    condition_from_json, deserialize_condition, CallSite, ConditionContext, WitnessCondition,
};
pub use error::{CodecError, Result, VerificationResult};
pub use hash160::Hash160;
pub use hash256::Hash256;
pub use signer::Signer;
pub use witness::Witness;
pub use witness_rule::{WitnessRule, WitnessRuleAction};
pub use witness_scope::WitnessScope;

use neo_io::{BinaryWriter, MemoryReader};

/// Binary-deserializes a [`Signer`], pinning nothing beyond what
/// [`Signer::deserialize`] itself already enforces.
pub fn deserialize_signer(reader: &mut MemoryReader) -> Result<Signer> {
    Signer::deserialize(reader)
}

/// Binary-serializes a [`Signer`] in wire field order.
pub fn serialize_signer(signer: &Signer, writer: &mut BinaryWriter) -> neo_io::Result<()> {
    signer.serialize(writer)
}

/// Decides whether `signer` authorizes the call site described by `ctx`,
/// per the scope algebra in the witness-scope evaluator (§4.3): the logical
/// OR of `Global`, `CalledByEntry`, `CustomContracts`, `CustomGroups`, and
/// `WitnessRules`, where a `Deny`-matching rule only denies within the
/// `WitnessRules` clause and never revokes an earlier-authorizing flag.
pub fn authorizes(signer: &Signer, ctx: &dyn ConditionContext) -> bool {
    signer.authorizes(ctx)
}
