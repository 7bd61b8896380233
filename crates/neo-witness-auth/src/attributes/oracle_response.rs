//! `OracleResponse`: carries the result of a previously issued oracle
//! request. Verification only checks that the request is still outstanding
//! and that the signer set is the closed self-check scope an oracle
//! response transaction is built with; running the fixed response script
//! is a VM concern outside this crate.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use neo_config::MAX_ORACLE_RESULT_SIZE;
use neo_io::{BinaryWriter, MemoryReader};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::witness_scope::WitnessScope;

use super::{AttributeContext, AttributeViews};

/// Outcome of an oracle request, mirroring the protocol's closed set of
/// response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OracleResponseCode {
    Success = 0x00,
    ProtocolNotSupported = 0x10,
    ConsensusUnreachable = 0x12,
    NotFound = 0x14,
    Timeout = 0x16,
    Forbidden = 0x18,
    ResponseTooLarge = 0x1a,
    InsufficientFunds = 0x1c,
    ContentTypeNotSupported = 0x1f,
    Error = 0xff,
}

impl OracleResponseCode {
    pub fn from_byte(value: u8) -> Result<Self, CodecError> {
        match value {
            0x00 => Ok(Self::Success),
            0x10 => Ok(Self::ProtocolNotSupported),
            0x12 => Ok(Self::ConsensusUnreachable),
            0x14 => Ok(Self::NotFound),
            0x16 => Ok(Self::Timeout),
            0x18 => Ok(Self::Forbidden),
            0x1a => Ok(Self::ResponseTooLarge),
            0x1c => Ok(Self::InsufficientFunds),
            0x1f => Ok(Self::ContentTypeNotSupported),
            0xff => Ok(Self::Error),
            other => Err(neo_io::Error::unknown_tag(other, "OracleResponseCode").into()),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResponseAttribute {
    pub id: u64,
    pub code: OracleResponseCode,
    pub result: Vec<u8>,
}

impl OracleResponseAttribute {
    pub fn new(id: u64, code: OracleResponseCode, result: Vec<u8>) -> Self {
        Self { id, code, result }
    }

    /// An oracle-response transaction's signers are all scoped `None` (the
    /// oracle node's own witness only satisfies the self-check); anything
    /// broader would let the response carry unrelated authorization.
    pub fn verify(&self, ctx: &AttributeContext<'_>, views: &AttributeViews<'_>) -> bool {
        if ctx.signers.iter().any(|s| s.scope != WitnessScope::NONE) {
            return false;
        }
        views.oracle.has_pending_request(self.id)
    }

    pub fn calculate_network_fee(
        &self,
        _ctx: &AttributeContext<'_>,
        _views: &AttributeViews<'_>,
    ) -> i64 {
        0
    }

    pub fn size(&self) -> usize {
        8 + 1 + var_size(self.result.len()) + self.result.len()
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        if self.result.len() > MAX_ORACLE_RESULT_SIZE {
            return Err(neo_io::Error::collection_too_large(
                self.result.len(),
                MAX_ORACLE_RESULT_SIZE,
            ));
        }
        writer.write_u64(self.id);
        writer.write_byte(self.code.to_byte());
        writer.write_var_bytes(&self.result);
        Ok(())
    }

    pub fn deserialize(reader: &mut MemoryReader) -> Result<Self, CodecError> {
        let id = reader.read_u64()?;
        let code = OracleResponseCode::from_byte(reader.read_byte()?)?;
        let result = reader.read_var_bytes(MAX_ORACLE_RESULT_SIZE)?.to_vec();
        if !result.is_empty() && code != OracleResponseCode::Success {
            return Err(
                neo_io::Error::invalid_format("non-success oracle response carries a result")
                    .into(),
            );
        }
        Ok(Self { id, code, result })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), Value::Number(self.id.into()));
        map.insert("code".into(), Value::Number(self.code.to_byte().into()));
        map.insert("result".into(), Value::String(BASE64.encode(&self.result)));
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let id = value
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| CodecError::invalid_json("id", "OracleResponse"))?;
        let code_byte = value
            .get("code")
            .and_then(Value::as_u64)
            .ok_or_else(|| CodecError::invalid_json("code", "OracleResponse"))?;
        let code = OracleResponseCode::from_byte(code_byte as u8)?;
        let result_str = value
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("result", "OracleResponse"))?;
        let result = BASE64
            .decode(result_str)
            .map_err(|_| CodecError::invalid_json("result", "OracleResponse"))?;
        Ok(Self { id, code, result })
    }
}

fn var_size(length: usize) -> usize {
    if length < 0xfd {
        1
    } else if length <= 0xffff {
        3
    } else if length <= 0xffff_ffff {
        5
    } else {
        9
    }
}
