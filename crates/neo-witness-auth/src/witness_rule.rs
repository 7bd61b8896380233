//! `(action, condition)` pair: the allow/deny wrapper over a witness
//! condition tree.

use neo_io::{BinaryWriter, MemoryReader};
use serde_json::{Map, Value};

use crate::conditions::{condition_from_json, deserialize_condition, WitnessCondition};
use crate::error::CodecError;

/// Whether a matching rule grants or denies the scope it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WitnessRuleAction {
    Deny = 0x00,
    Allow = 0x01,
}

impl WitnessRuleAction {
    pub fn from_byte(value: u8) -> Result<Self, CodecError> {
        match value {
            0x00 => Ok(WitnessRuleAction::Deny),
            0x01 => Ok(WitnessRuleAction::Allow),
            other => Err(CodecError::InvalidRuleAction(other)),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WitnessRuleAction::Deny => "Deny",
            WitnessRuleAction::Allow => "Allow",
        }
    }
}

impl std::fmt::Display for WitnessRuleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry in a signer's `WitnessRules` scope: grant or deny if
/// `condition` evaluates true at the current call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessRule {
    pub action: WitnessRuleAction,
    pub condition: WitnessCondition,
}

impl WitnessRule {
    pub fn new(action: WitnessRuleAction, condition: WitnessCondition) -> Self {
        Self { action, condition }
    }

    pub fn size(&self) -> usize {
        // action byte accounted for by caller; condition size is variable and
        // only meaningful once serialized, so we just serialize to measure.
        1 + self.condition_byte_len()
    }

    fn condition_byte_len(&self) -> usize {
        let mut w = BinaryWriter::new();
        let _ = self.condition.serialize(&mut w);
        w.len()
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        writer.write_byte(self.action.to_byte());
        self.condition.serialize(writer)
    }

    pub fn deserialize(reader: &mut MemoryReader) -> Result<Self, CodecError> {
        let action_byte = reader.read_byte()?;
        let action = WitnessRuleAction::from_byte(action_byte)?;
        let condition = deserialize_condition(reader)?;
        Ok(WitnessRule { action, condition })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("action".into(), Value::String(self.action.as_str().into()));
        map.insert("condition".into(), self.condition.to_json());
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CodecError::invalid_json("action", "WitnessRule"))?;
        let action_str = obj
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("action", "WitnessRule"))?;
        let action = match action_str {
            "Allow" => WitnessRuleAction::Allow,
            "Deny" => WitnessRuleAction::Deny,
            _ => return Err(CodecError::invalid_json("action", "WitnessRule")),
        };
        let condition_json = obj
            .get("condition")
            .ok_or_else(|| CodecError::invalid_json("condition", "WitnessRule"))?;
        let condition = condition_from_json(condition_json)?;
        Ok(WitnessRule { action, condition })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_byte_values_match_protocol() {
        assert_eq!(WitnessRuleAction::Deny.to_byte(), 0x00);
        assert_eq!(WitnessRuleAction::Allow.to_byte(), 0x01);
    }

    #[test]
    fn invalid_action_byte_is_rejected() {
        assert!(WitnessRuleAction::from_byte(0x02).is_err());
    }

    #[test]
    fn scenario_1_allow_boolean_true_serializes_exactly() {
        let rule = WitnessRule::new(WitnessRuleAction::Allow, WitnessCondition::Boolean(true));
        let mut w = BinaryWriter::new();
        rule.serialize(&mut w).unwrap();
        assert_eq!(w.to_bytes(), vec![0x01, 0x00, 0x01]);
    }

    #[test]
    fn scenario_1_round_trips() {
        let rule = WitnessRule::new(WitnessRuleAction::Allow, WitnessCondition::Boolean(true));
        let mut w = BinaryWriter::new();
        rule.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        let decoded = WitnessRule::deserialize(&mut r).unwrap();
        assert_eq!(decoded, rule);
    }

    #[test]
    fn json_round_trip() {
        let rule = WitnessRule::new(
            WitnessRuleAction::Deny,
            WitnessCondition::CalledByContract(crate::hash160::Hash160::from_script(b"x")),
        );
        let json = rule.to_json();
        assert_eq!(json["action"], "Deny");
        let decoded = WitnessRule::from_json(&json).unwrap();
        assert_eq!(decoded, rule);
    }
}
