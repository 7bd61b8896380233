//! Witness scope bitmask.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CodecError;

bitflags! {
    /// Narrows which call sites a signer's witness authorizes.
    ///
    /// `Global` is mutually exclusive with every other flag; the remaining
    /// four flags combine with OR semantics. [`WitnessScope::validate`]
    /// enforces both rules in one place so the rest of the codebase can
    /// assume any `WitnessScope` value in hand is already legal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WitnessScope: u8 {
        const NONE = 0x00;
        const CALLED_BY_ENTRY = 0x01;
        const CUSTOM_CONTRACTS = 0x10;
        const CUSTOM_GROUPS = 0x20;
        const WITNESS_RULES = 0x40;
        const GLOBAL = 0x80;
    }
}

impl WitnessScope {
    /// Parses a scope byte, rejecting reserved bits and an illegal
    /// `Global`-plus-other-flags combination.
    pub fn from_byte(value: u8) -> Result<Self, CodecError> {
        let scope =
            WitnessScope::from_bits(value).ok_or(CodecError::UnknownScopeBits(value))?;
        scope.validate()?;
        Ok(scope)
    }

    pub fn to_byte(self) -> u8 {
        self.bits()
    }

    pub fn validate(self) -> Result<(), CodecError> {
        if self.contains(WitnessScope::GLOBAL) && self != WitnessScope::GLOBAL {
            return Err(CodecError::GlobalCombinedWithOtherFlags(self.bits()));
        }
        Ok(())
    }
}

impl Default for WitnessScope {
    fn default() -> Self {
        WitnessScope::NONE
    }
}

impl fmt::Display for WitnessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        if *self == WitnessScope::GLOBAL {
            return write!(f, "Global");
        }
        let mut parts = Vec::new();
        if self.contains(WitnessScope::CALLED_BY_ENTRY) {
            parts.push("CalledByEntry");
        }
        if self.contains(WitnessScope::CUSTOM_CONTRACTS) {
            parts.push("CustomContracts");
        }
        if self.contains(WitnessScope::CUSTOM_GROUPS) {
            parts.push("CustomGroups");
        }
        if self.contains(WitnessScope::WITNESS_RULES) {
            parts.push("WitnessRules");
        }
        write!(f, "{}", parts.join(","))
    }
}

impl Serialize for WitnessScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WitnessScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut scope = WitnessScope::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let flag = match part {
                "None" => WitnessScope::NONE,
                "CalledByEntry" => WitnessScope::CALLED_BY_ENTRY,
                "CustomContracts" => WitnessScope::CUSTOM_CONTRACTS,
                "CustomGroups" => WitnessScope::CUSTOM_GROUPS,
                "WitnessRules" => WitnessScope::WITNESS_RULES,
                "Global" => WitnessScope::GLOBAL,
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "unknown witness scope name '{other}'"
                    )))
                }
            };
            scope |= flag;
        }
        scope
            .validate()
            .map_err(|e| serde::de::Error::custom(e.to_string()))?;
        Ok(scope)
    }
}
