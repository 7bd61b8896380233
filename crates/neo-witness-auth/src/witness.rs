//! Invocation/verification script pair proving a signer authorized a
//! transaction.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use neo_config::{MAX_INVOCATION_SCRIPT, MAX_VERIFICATION_SCRIPT};
use neo_io::{BinaryWriter, MemoryReader};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::hash160::Hash160;

/// `invocationScript` supplies runtime arguments (usually a signature);
/// `verificationScript` is the program whose hash binds the signer's account.
/// The pair is opaque to the scope evaluator - actually running the
/// verification script is delegated to the VM collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Witness {
    pub invocation_script: Vec<u8>,
    pub verification_script: Vec<u8>,
}

impl Witness {
    pub fn new(invocation_script: Vec<u8>, verification_script: Vec<u8>) -> Self {
        Self {
            invocation_script,
            verification_script,
        }
    }

    /// `Hash160` of the verification script: the account identity this
    /// witness proves authorization for.
    pub fn script_hash(&self) -> Hash160 {
        Hash160::from_script(&self.verification_script)
    }

    pub fn size(&self) -> usize {
        var_size(self.invocation_script.len())
            + self.invocation_script.len()
            + var_size(self.verification_script.len())
            + self.verification_script.len()
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        if self.invocation_script.len() > MAX_INVOCATION_SCRIPT {
            return Err(neo_io::Error::collection_too_large(
                self.invocation_script.len(),
                MAX_INVOCATION_SCRIPT,
            ));
        }
        if self.verification_script.len() > MAX_VERIFICATION_SCRIPT {
            return Err(neo_io::Error::collection_too_large(
                self.verification_script.len(),
                MAX_VERIFICATION_SCRIPT,
            ));
        }
        writer.write_var_bytes(&self.invocation_script);
        writer.write_var_bytes(&self.verification_script);
        Ok(())
    }

    pub fn deserialize(reader: &mut MemoryReader) -> neo_io::Result<Self> {
        let invocation_script = reader.read_var_bytes(MAX_INVOCATION_SCRIPT)?.to_vec();
        let verification_script = reader.read_var_bytes(MAX_VERIFICATION_SCRIPT)?.to_vec();
        Ok(Witness {
            invocation_script,
            verification_script,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "invocation".into(),
            Value::String(BASE64.encode(&self.invocation_script)),
        );
        map.insert(
            "verification".into(),
            Value::String(BASE64.encode(&self.verification_script)),
        );
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CodecError::invalid_json("invocation", "Witness"))?;
        let invocation = obj
            .get("invocation")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("invocation", "Witness"))?;
        let verification = obj
            .get("verification")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::invalid_json("verification", "Witness"))?;
        let invocation_script = BASE64
            .decode(invocation)
            .map_err(|_| CodecError::invalid_json("invocation", "Witness"))?;
        let verification_script = BASE64
            .decode(verification)
            .map_err(|_| CodecError::invalid_json("verification", "Witness"))?;
        Ok(Witness {
            invocation_script,
            verification_script,
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_binary() {
        let witness = Witness::new(vec![0x01, 0x02, 0x03], vec![0x0c, 0x21, 0xaa]);
        let mut w = BinaryWriter::new();
        witness.serialize(&mut w).unwrap();
        let bytes = w.to_bytes();
        let mut r = MemoryReader::new(&bytes);
        let decoded = Witness::deserialize(&mut r).unwrap();
        assert_eq!(decoded, witness);
    }

    #[test]
    fn oversize_invocation_script_is_rejected() {
        let witness = Witness::new(vec![0u8; MAX_INVOCATION_SCRIPT + 1], vec![]);
        let mut w = BinaryWriter::new();
        assert!(witness.serialize(&mut w).is_err());
    }

    #[test]
    fn script_hash_matches_hash160_of_verification_script() {
        let witness = Witness::new(vec![], vec![0x0c, 0x21, 0xbb]);
        assert_eq!(
            witness.script_hash(),
            Hash160::from_script(&witness.verification_script)
        );
    }

    #[test]
    fn json_round_trip() {
        let witness = Witness::new(vec![0xde, 0xad], vec![0xbe, 0xef]);
        let json = witness.to_json();
        let decoded = Witness::from_json(&json).unwrap();
        assert_eq!(decoded, witness);
    }
}
