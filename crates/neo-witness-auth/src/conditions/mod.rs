//! The witness condition predicate tree: a small, closed recursive language
//! evaluated against the live execution context to decide whether a
//! `WitnessRules` scope rule matches.

mod context;

pub use context::{CallSite, ConditionContext};

use neo_config::{MAX_CONDITION_SUBITEMS, MAX_NESTING_DEPTH};
use neo_cryptography::PublicKey;
use neo_io::{BinaryWriter, MemoryReader, Serializable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::hash160::Hash160;

const TAG_BOOLEAN: u8 = 0x00;
const TAG_NOT: u8 = 0x01;
const TAG_AND: u8 = 0x02;
const TAG_OR: u8 = 0x03;
const TAG_SCRIPT_HASH: u8 = 0x18;
const TAG_GROUP: u8 = 0x19;
const TAG_CALLED_BY_ENTRY: u8 = 0x20;
const TAG_CALLED_BY_CONTRACT: u8 = 0x28;
const TAG_CALLED_BY_GROUP: u8 = 0x29;

/// A node in the witness condition tree.
///
/// Nesting is bounded at construction time by [`WitnessCondition::deserialize`]
/// via an explicit depth budget threaded through the recursive calls - there
/// is no ambient or thread-local recursion counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WitnessCondition {
    Boolean(bool),
    Not(Box<WitnessCondition>),
    And(Vec<WitnessCondition>),
    Or(Vec<WitnessCondition>),
    ScriptHash(Hash160),
    Group(PublicKey),
    CalledByEntry,
    CalledByContract(Hash160),
    CalledByGroup(PublicKey),
}

impl WitnessCondition {
    pub fn tag(&self) -> u8 {
        match self {
            WitnessCondition::Boolean(_) => TAG_BOOLEAN,
            WitnessCondition::Not(_) => TAG_NOT,
            WitnessCondition::And(_) => TAG_AND,
            WitnessCondition::Or(_) => TAG_OR,
            WitnessCondition::ScriptHash(_) => TAG_SCRIPT_HASH,
            WitnessCondition::Group(_) => TAG_GROUP,
            WitnessCondition::CalledByEntry => TAG_CALLED_BY_ENTRY,
            WitnessCondition::CalledByContract(_) => TAG_CALLED_BY_CONTRACT,
            WitnessCondition::CalledByGroup(_) => TAG_CALLED_BY_GROUP,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            WitnessCondition::Boolean(_) => "Boolean",
            WitnessCondition::Not(_) => "Not",
            WitnessCondition::And(_) => "And",
            WitnessCondition::Or(_) => "Or",
            WitnessCondition::ScriptHash(_) => "ScriptHash",
            WitnessCondition::Group(_) => "Group",
            WitnessCondition::CalledByEntry => "CalledByEntry",
            WitnessCondition::CalledByContract(_) => "CalledByContract",
            WitnessCondition::CalledByGroup(_) => "CalledByGroup",
        }
    }

    /// Evaluates this condition against `ctx`. Never panics or errors for a
    /// well-formed tree; a contract with no declared manifest groups yields
    /// an empty set, which only ever makes `Group`/`CalledByGroup` false.
    pub fn evaluate(&self, ctx: &dyn ConditionContext) -> bool {
        let result = match self {
            WitnessCondition::Boolean(b) => *b,
            WitnessCondition::Not(c) => !c.evaluate(ctx),
            WitnessCondition::And(cs) => cs.iter().all(|c| c.evaluate(ctx)),
            WitnessCondition::Or(cs) => cs.iter().any(|c| c.evaluate(ctx)),
            WitnessCondition::ScriptHash(h) => ctx.current_script_hash() == *h,
            WitnessCondition::CalledByEntry => {
                ctx.current_script_hash() == ctx.entry_script_hash()
                    || ctx.calling_script_hash() == Some(ctx.entry_script_hash())
            }
            WitnessCondition::CalledByContract(h) => ctx.calling_script_hash() == Some(*h),
            WitnessCondition::Group(pk) => ctx.groups_of(ctx.current_script_hash()).contains(pk),
            WitnessCondition::CalledByGroup(pk) => match ctx.calling_script_hash() {
                Some(calling) => ctx.groups_of(calling).contains(pk),
                None => false,
            },
        };
        tracing::trace!(
            condition = self.type_name(),
            result,
            "witness condition evaluated"
        );
        result
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        writer.write_byte(self.tag());
        match self {
            WitnessCondition::Boolean(b) => writer.write_bool(*b),
            WitnessCondition::Not(c) => c.serialize(writer)?,
            WitnessCondition::And(cs) | WitnessCondition::Or(cs) => {
                writer.write_var_int(cs.len() as u64);
                for c in cs {
                    c.serialize(writer)?;
                }
            }
            WitnessCondition::ScriptHash(h) | WitnessCondition::CalledByContract(h) => {
                h.serialize(writer)?;
            }
            WitnessCondition::Group(pk) | WitnessCondition::CalledByGroup(pk) => {
                writer.write_bytes(pk.as_bytes());
            }
            WitnessCondition::CalledByEntry => {}
        }
        Ok(())
    }

    /// Reads one condition tree, enforcing the nesting-depth budget and the
    /// per-composite child-count cap before ever allocating a child vector.
    ///
    /// `max_depth` is how many additional levels of children are still
    /// allowed below the node about to be read; the top-level call passes
    /// [`neo_config::MAX_NESTING_DEPTH`].
    pub fn deserialize(reader: &mut MemoryReader, max_depth: usize) -> Result<Self, CodecError> {
        let tag = reader.read_byte()?;
        match tag {
            TAG_BOOLEAN => Ok(WitnessCondition::Boolean(reader.read_bool()?)),
            TAG_NOT => {
                if max_depth == 0 {
                    return Err(neo_io::Error::nesting_exceeded().into());
                }
                let child = WitnessCondition::deserialize(reader, max_depth - 1)?;
                Ok(WitnessCondition::Not(Box::new(child)))
            }
            TAG_AND | TAG_OR => {
                if max_depth == 0 {
                    return Err(neo_io::Error::nesting_exceeded().into());
                }
                let count = reader.read_var_int(MAX_CONDITION_SUBITEMS as u64)? as usize;
                if count == 0 {
                    return Err(neo_io::Error::invalid_format(
                        "And/Or condition must have at least one child",
                    )
                    .into());
                }
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(WitnessCondition::deserialize(reader, max_depth - 1)?);
                }
                if tag == TAG_AND {
                    Ok(WitnessCondition::And(children))
                } else {
                    Ok(WitnessCondition::Or(children))
                }
            }
            TAG_SCRIPT_HASH => Ok(WitnessCondition::ScriptHash(Hash160::deserialize(reader)?)),
            TAG_CALLED_BY_CONTRACT => {
                Ok(WitnessCondition::CalledByContract(Hash160::deserialize(reader)?))
            }
            TAG_GROUP => {
                let bytes = reader.read_bytes(neo_config::PUBLIC_KEY_SIZE)?;
                Ok(WitnessCondition::Group(PublicKey::from_bytes(bytes)?))
            }
            TAG_CALLED_BY_GROUP => {
                let bytes = reader.read_bytes(neo_config::PUBLIC_KEY_SIZE)?;
                Ok(WitnessCondition::CalledByGroup(PublicKey::from_bytes(bytes)?))
            }
            TAG_CALLED_BY_ENTRY => Ok(WitnessCondition::CalledByEntry),
            other => Err(neo_io::Error::unknown_tag(other, "WitnessCondition").into()),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(self.type_name().into()));
        match self {
            WitnessCondition::Boolean(b) => {
                map.insert("expression".into(), Value::String(b.to_string()));
            }
            WitnessCondition::Not(c) => {
                map.insert("expression".into(), c.to_json());
            }
            WitnessCondition::And(cs) | WitnessCondition::Or(cs) => {
                map.insert(
                    "expressions".into(),
                    Value::Array(cs.iter().map(WitnessCondition::to_json).collect()),
                );
            }
            WitnessCondition::ScriptHash(h) | WitnessCondition::CalledByContract(h) => {
                map.insert("hash".into(), Value::String(h.to_hex_string()));
            }
            WitnessCondition::Group(pk) | WitnessCondition::CalledByGroup(pk) => {
                map.insert("group".into(), Value::String(pk.to_hex()));
            }
            WitnessCondition::CalledByEntry => {}
        }
        Value::Object(map)
    }

    pub fn from_json(value: &Value, max_depth: usize) -> Result<Self, CodecError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CodecError::invalid_json("type", "WitnessCondition"))?;
        let type_name = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("type", "WitnessCondition"))?;

        match type_name {
            "Boolean" => {
                let expr = obj
                    .get("expression")
                    .and_then(Value::as_str)
                    .ok_or_else(|| CodecError::invalid_json("expression", "Boolean"))?;
                let b: bool = expr
                    .parse()
                    .map_err(|_| CodecError::invalid_json("expression", "Boolean"))?;
                Ok(WitnessCondition::Boolean(b))
            }
            "Not" => {
                if max_depth == 0 {
                    return Err(neo_io::Error::nesting_exceeded().into());
                }
                let expr = obj
                    .get("expression")
                    .ok_or_else(|| CodecError::invalid_json("expression", "Not"))?;
                Ok(WitnessCondition::Not(Box::new(Self::from_json(
                    expr,
                    max_depth - 1,
                )?)))
            }
            "And" | "Or" => {
                if max_depth == 0 {
                    return Err(neo_io::Error::nesting_exceeded().into());
                }
                let items = obj
                    .get("expressions")
                    .and_then(Value::as_array)
                    .ok_or_else(|| CodecError::invalid_json("expressions", type_name))?;
                if items.is_empty() || items.len() > MAX_CONDITION_SUBITEMS {
                    return Err(neo_io::Error::collection_too_large(
                        items.len(),
                        MAX_CONDITION_SUBITEMS,
                    )
                    .into());
                }
                let children = items
                    .iter()
                    .map(|v| Self::from_json(v, max_depth - 1))
                    .collect::<Result<Vec<_>, _>>()?;
                if type_name == "And" {
                    Ok(WitnessCondition::And(children))
                } else {
                    Ok(WitnessCondition::Or(children))
                }
            }
            "ScriptHash" | "CalledByContract" => {
                let hash = obj
                    .get("hash")
                    .and_then(Value::as_str)
                    .ok_or_else(|| CodecError::invalid_json("hash", type_name))?;
                let h = Hash160::parse(hash)?;
                if type_name == "ScriptHash" {
                    Ok(WitnessCondition::ScriptHash(h))
                } else {
                    Ok(WitnessCondition::CalledByContract(h))
                }
            }
            "Group" | "CalledByGroup" => {
                let group = obj
                    .get("group")
                    .and_then(Value::as_str)
                    .ok_or_else(|| CodecError::invalid_json("group", type_name))?;
                let pk = PublicKey::from_hex(group)?;
                if type_name == "Group" {
                    Ok(WitnessCondition::Group(pk))
                } else {
                    Ok(WitnessCondition::CalledByGroup(pk))
                }
            }
            "CalledByEntry" => Ok(WitnessCondition::CalledByEntry),
            other => Err(neo_io::Error::invalid_format(format!(
                "unknown WitnessCondition type '{other}'"
            ))
            .into()),
        }
    }
}

/// Top-level entry points used outside this module, always pinning the
/// protocol's nesting budget.
pub fn deserialize_condition(reader: &mut MemoryReader) -> Result<WitnessCondition, CodecError> {
    WitnessCondition::deserialize(reader, MAX_NESTING_DEPTH)
}

pub fn condition_from_json(value: &Value) -> Result<WitnessCondition, CodecError> {
    WitnessCondition::from_json(value, MAX_NESTING_DEPTH)
}

impl Serialize for WitnessCondition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WitnessCondition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        condition_from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_io::BinaryWriter;
    use std::collections::HashSet;

    struct FixedContext {
        current: Hash160,
        calling: Option<Hash160>,
        entry: Hash160,
    }

    impl ConditionContext for FixedContext {
        fn current_script_hash(&self) -> Hash160 {
            self.current
        }
        fn calling_script_hash(&self) -> Option<Hash160> {
            self.calling
        }
        fn entry_script_hash(&self) -> Hash160 {
            self.entry
        }
        fn groups_of(&self, _script_hash: Hash160) -> HashSet<PublicKey> {
            HashSet::new()
        }
    }

    #[test]
    fn scenario_1_witness_rule_condition_bytes() {
        let condition = WitnessCondition::Boolean(true);
        let mut w = BinaryWriter::new();
        condition.serialize(&mut w).unwrap();
        assert_eq!(w.to_bytes(), vec![0x00, 0x01]);
    }

    #[test]
    fn depth_budget_rejects_condition_nested_past_the_limit() {
        // Build And[ Not[ And[ Boolean(true) ] ] ] directly, bypassing the
        // depth check that only `deserialize` enforces, to get self-consistent
        // bytes for a tree of nominal depth 3.
        let too_deep = WitnessCondition::And(vec![WitnessCondition::Not(Box::new(
            WitnessCondition::And(vec![WitnessCondition::Boolean(true)]),
        ))]);
        let mut w = BinaryWriter::new();
        too_deep.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();

        let mut r = MemoryReader::new(&bytes);
        let err = WitnessCondition::deserialize(&mut r, MAX_NESTING_DEPTH).unwrap_err();
        assert!(matches!(err, CodecError::Io(neo_io::Error::NestingExceeded)));
    }

    #[test]
    fn depth_exactly_at_budget_is_accepted() {
        // And[ Boolean(true) ] is depth 1, well within budget 2.
        let ok = WitnessCondition::And(vec![WitnessCondition::Boolean(true)]);
        let mut w = BinaryWriter::new();
        ok.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        let decoded = WitnessCondition::deserialize(&mut r, MAX_NESTING_DEPTH).unwrap();
        assert_eq!(decoded, ok);
    }

    #[test]
    fn called_by_entry_positive() {
        let entry = Hash160::from_script(b"entry");
        let other = Hash160::from_script(b"other");
        let ctx = FixedContext {
            current: other,
            calling: Some(entry),
            entry,
        };
        assert!(WitnessCondition::CalledByEntry.evaluate(&ctx));
    }

    #[test]
    fn called_by_entry_negative() {
        let entry = Hash160::from_script(b"entry");
        let current = Hash160::from_script(b"current");
        let calling = Hash160::from_script(b"calling");
        let ctx = FixedContext {
            current,
            calling: Some(calling),
            entry,
        };
        assert!(!WitnessCondition::CalledByEntry.evaluate(&ctx));
    }

    #[test]
    fn json_round_trip_boolean() {
        let condition = WitnessCondition::Boolean(true);
        let json = condition.to_json();
        let decoded = condition_from_json(&json).unwrap();
        assert_eq!(condition, decoded);
    }

    #[test]
    fn json_round_trip_and_of_called_by_entry_and_boolean() {
        let condition = WitnessCondition::And(vec![
            WitnessCondition::CalledByEntry,
            WitnessCondition::Boolean(false),
        ]);
        let json = condition.to_json();
        assert_eq!(json["type"], "And");
        let decoded = condition_from_json(&json).unwrap();
        assert_eq!(condition, decoded);
    }

    #[test]
    fn and_with_zero_children_is_rejected() {
        let mut w = BinaryWriter::new();
        w.write_byte(TAG_AND);
        w.write_var_int(0);
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        assert!(WitnessCondition::deserialize(&mut r, MAX_NESTING_DEPTH).is_err());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut r = MemoryReader::new(&[0xaa]);
        let err = WitnessCondition::deserialize(&mut r, MAX_NESTING_DEPTH).unwrap_err();
        assert!(matches!(err, CodecError::Io(neo_io::Error::UnknownTag { .. })));
    }
}
