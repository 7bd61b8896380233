//! Transaction party whose witness authorizes some scope of calls.

use std::collections::HashSet;

use neo_config::MAX_SUBITEMS;
use neo_cryptography::PublicKey;
use neo_io::{BinaryWriter, MemoryReader, Serializable};
use serde_json::{Map, Value};

use crate::conditions::{ConditionContext, WitnessCondition};
use crate::error::CodecError;
use crate::hash160::Hash160;
use crate::witness_rule::{WitnessRule, WitnessRuleAction};
use crate::witness_scope::WitnessScope;

/// Account + scope flags + optional allow-lists + rule list. Deserialized
/// signers are immutable; every collection here is capped at
/// [`neo_config::MAX_SUBITEMS`] entries and rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    pub account: Hash160,
    pub scope: WitnessScope,
    pub allowed_contracts: Vec<Hash160>,
    pub allowed_groups: Vec<PublicKey>,
    pub rules: Vec<WitnessRule>,
}

impl Signer {
    pub fn new(account: Hash160, scope: WitnessScope) -> Self {
        Self {
            account,
            scope,
            allowed_contracts: Vec::new(),
            allowed_groups: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Expands the scope flags into a single ordered list of effective
    /// rules, in the same clause order the scope evaluator walks:
    /// `Global` collapses to one unconditional `Allow`, `CalledByEntry` to
    /// one `Allow(CalledByEntry)`, each allowed contract/group to its own
    /// `Allow` rule, followed by the signer's own explicit rules.
    pub fn get_all_rules(&self) -> Vec<WitnessRule> {
        let mut rules = Vec::new();

        if self.scope.contains(WitnessScope::GLOBAL) {
            rules.push(WitnessRule::new(
                WitnessRuleAction::Allow,
                WitnessCondition::Boolean(true),
            ));
            return rules;
        }

        if self.scope.contains(WitnessScope::CALLED_BY_ENTRY) {
            rules.push(WitnessRule::new(
                WitnessRuleAction::Allow,
                WitnessCondition::CalledByEntry,
            ));
        }

        if self.scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
            for contract in &self.allowed_contracts {
                rules.push(WitnessRule::new(
                    WitnessRuleAction::Allow,
                    WitnessCondition::ScriptHash(*contract),
                ));
            }
        }

        if self.scope.contains(WitnessScope::CUSTOM_GROUPS) {
            for group in &self.allowed_groups {
                rules.push(WitnessRule::new(
                    WitnessRuleAction::Allow,
                    WitnessCondition::Group(*group),
                ));
            }
        }

        if self.scope.contains(WitnessScope::WITNESS_RULES) {
            rules.extend(self.rules.iter().cloned());
        }

        rules
    }

    /// Decides whether this signer authorizes the current call site, per the
    /// scope algebra: the logical OR of clauses 1-5, where the `WitnessRules`
    /// clause returns the action of the first matching rule and a `Deny`
    /// match there denies only within that clause - it never revokes an
    /// earlier-authorizing flag.
    pub fn authorizes(&self, ctx: &dyn ConditionContext) -> bool {
        if self.scope.contains(WitnessScope::GLOBAL) {
            tracing::trace!(account = %self.account, "authorized via Global scope");
            return true;
        }

        if self.scope.contains(WitnessScope::CALLED_BY_ENTRY)
            && WitnessCondition::CalledByEntry.evaluate(ctx)
        {
            tracing::trace!(account = %self.account, "authorized via CalledByEntry scope");
            return true;
        }

        if self.scope.contains(WitnessScope::CUSTOM_CONTRACTS)
            && self.allowed_contracts.contains(&ctx.current_script_hash())
        {
            tracing::trace!(account = %self.account, "authorized via CustomContracts scope");
            return true;
        }

        if self.scope.contains(WitnessScope::CUSTOM_GROUPS) {
            let groups = ctx.groups_of(ctx.current_script_hash());
            if self.allowed_groups.iter().any(|g| groups.contains(g)) {
                tracing::trace!(account = %self.account, "authorized via CustomGroups scope");
                return true;
            }
        }

        if self.scope.contains(WitnessScope::WITNESS_RULES) {
            for rule in &self.rules {
                if rule.condition.evaluate(ctx) {
                    let allowed = rule.action == WitnessRuleAction::Allow;
                    tracing::trace!(
                        account = %self.account,
                        allowed,
                        "WitnessRules scope matched a rule"
                    );
                    return allowed;
                }
            }
        }

        tracing::debug!(account = %self.account, scope = %self.scope, "signer does not authorize call site");
        false
    }

    /// Mirrors the VM's `CheckWitness(self)` self-check path for test-vector
    /// purposes: every signer, regardless of scope, authorizes a call site
    /// whose currently executing script hash equals its own account. This
    /// is not one of the five scope clauses [`Signer::authorizes`] walks -
    /// the VM performs it directly against the account - but is exposed
    /// here so a `None`-scope signer's only authorization path is still
    /// pinned by a test.
    pub fn authorizes_self_check(&self, current_script_hash: Hash160) -> bool {
        self.account == current_script_hash
    }

    pub fn size(&self) -> usize {
        self.to_array().len()
    }

    fn to_array(&self) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        let _ = self.serialize(&mut w);
        w.to_bytes()
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        self.account.serialize(writer)?;
        writer.write_byte(self.scope.to_byte());

        if self.scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
            writer.write_var_int(self.allowed_contracts.len() as u64);
            for contract in &self.allowed_contracts {
                contract.serialize(writer)?;
            }
        }

        if self.scope.contains(WitnessScope::CUSTOM_GROUPS) {
            writer.write_var_int(self.allowed_groups.len() as u64);
            for group in &self.allowed_groups {
                writer.write_bytes(group.as_bytes());
            }
        }

        if self.scope.contains(WitnessScope::WITNESS_RULES) {
            writer.write_var_int(self.rules.len() as u64);
            for rule in &self.rules {
                rule.serialize(writer)?;
            }
        }

        Ok(())
    }

    pub fn deserialize(reader: &mut MemoryReader) -> Result<Self, CodecError> {
        let account = Hash160::deserialize(reader)?;
        let scope_byte = reader.read_byte()?;
        let scope = WitnessScope::from_byte(scope_byte)?;

        let allowed_contracts = if scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
            let contracts =
                read_capped_list(reader, |r| Hash160::deserialize(r).map_err(CodecError::from))?;
            reject_duplicate_contracts(&contracts)?;
            contracts
        } else {
            Vec::new()
        };

        let allowed_groups = if scope.contains(WitnessScope::CUSTOM_GROUPS) {
            let groups = read_capped_list(reader, |r| {
                let bytes = r.read_bytes(neo_config::PUBLIC_KEY_SIZE)?;
                Ok(PublicKey::from_bytes(bytes)?)
            })?;
            reject_duplicate_groups(&groups)?;
            groups
        } else {
            Vec::new()
        };

        let rules = if scope.contains(WitnessScope::WITNESS_RULES) {
            read_capped_list(reader, |r| WitnessRule::deserialize(r))?
        } else {
            Vec::new()
        };

        Ok(Signer {
            account,
            scope,
            allowed_contracts,
            allowed_groups,
            rules,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("account".into(), Value::String(self.account.to_hex_string()));
        map.insert("scopes".into(), Value::String(self.scope.to_string()));
        if self.scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
            map.insert(
                "allowedcontracts".into(),
                Value::Array(
                    self.allowed_contracts
                        .iter()
                        .map(|h| Value::String(h.to_hex_string()))
                        .collect(),
                ),
            );
        }
        if self.scope.contains(WitnessScope::CUSTOM_GROUPS) {
            map.insert(
                "allowedgroups".into(),
                Value::Array(
                    self.allowed_groups
                        .iter()
                        .map(|g| Value::String(g.to_hex()))
                        .collect(),
                ),
            );
        }
        if self.scope.contains(WitnessScope::WITNESS_RULES) {
            map.insert(
                "rules".into(),
                Value::Array(self.rules.iter().map(WitnessRule::to_json).collect()),
            );
        }
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CodecError::invalid_json("account", "Signer"))?;

        let account_str = obj
            .get("account")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("account", "Signer"))?;
        let account = Hash160::parse(account_str)?;

        let scopes_str = obj
            .get("scopes")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("scopes", "Signer"))?;
        let scope = parse_scopes_string(scopes_str)?;

        let allowed_contracts = match obj.get("allowedcontracts") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .ok_or_else(|| CodecError::invalid_json("allowedcontracts", "Signer"))
                        .and_then(Hash160::parse)
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        let allowed_groups = match obj.get("allowedgroups") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .ok_or_else(|| CodecError::invalid_json("allowedgroups", "Signer"))
                        .and_then(|s| PublicKey::from_hex(s).map_err(CodecError::from))
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        let rules = match obj.get("rules") {
            Some(Value::Array(items)) => items
                .iter()
                .map(WitnessRule::from_json)
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        validate_lists(&scope, allowed_contracts.len(), allowed_groups.len(), rules.len())?;
        reject_duplicate_contracts(&allowed_contracts)?;
        reject_duplicate_groups(&allowed_groups)?;

        Ok(Signer {
            account,
            scope,
            allowed_contracts,
            allowed_groups,
            rules,
        })
    }
}

fn parse_scopes_string(s: &str) -> Result<WitnessScope, CodecError> {
    let mut scope = WitnessScope::NONE;
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        scope |= match part {
            "None" => WitnessScope::NONE,
            "CalledByEntry" => WitnessScope::CALLED_BY_ENTRY,
            "CustomContracts" => WitnessScope::CUSTOM_CONTRACTS,
            "CustomGroups" => WitnessScope::CUSTOM_GROUPS,
            "WitnessRules" => WitnessScope::WITNESS_RULES,
            "Global" => WitnessScope::GLOBAL,
            other => {
                return Err(neo_io::Error::invalid_format(format!(
                    "unknown scope name '{other}'"
                ))
                .into())
            }
        };
    }
    scope.validate()?;
    Ok(scope)
}

fn validate_lists(
    scope: &WitnessScope,
    contracts: usize,
    groups: usize,
    rules: usize,
) -> Result<(), CodecError> {
    if contracts > 0 && !scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
        return Err(CodecError::list_present_without_flag("allowedcontracts"));
    }
    if groups > 0 && !scope.contains(WitnessScope::CUSTOM_GROUPS) {
        return Err(CodecError::list_present_without_flag("allowedgroups"));
    }
    if rules > 0 && !scope.contains(WitnessScope::WITNESS_RULES) {
        return Err(CodecError::list_present_without_flag("rules"));
    }
    if contracts > MAX_SUBITEMS || groups > MAX_SUBITEMS || rules > MAX_SUBITEMS {
        return Err(neo_io::Error::collection_too_large(
            contracts.max(groups).max(rules),
            MAX_SUBITEMS,
        )
        .into());
    }
    Ok(())
}

fn reject_duplicate_contracts(contracts: &[Hash160]) -> Result<(), CodecError> {
    let mut seen = HashSet::new();
    for c in contracts {
        if !seen.insert(*c) {
            return Err(neo_io::Error::duplicate_entry("allowedcontracts").into());
        }
    }
    Ok(())
}

fn reject_duplicate_groups(groups: &[PublicKey]) -> Result<(), CodecError> {
    let mut seen = HashSet::new();
    for g in groups {
        if !seen.insert(*g) {
            return Err(neo_io::Error::duplicate_entry("allowedgroups").into());
        }
    }
    Ok(())
}

fn read_capped_list<T>(
    reader: &mut MemoryReader,
    read_one: impl Fn(&mut MemoryReader) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    let count = reader.read_var_int(MAX_SUBITEMS as u64)? as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(read_one(reader)?);
    }
    Ok(out)
}
