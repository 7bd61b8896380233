//! `NotValidBefore`: the transaction is invalid until the chain reaches the
//! declared height.

use neo_io::{BinaryWriter, MemoryReader};
use serde_json::{Map, Value};

use crate::error::CodecError;

use super::{AttributeContext, AttributeViews};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotValidBeforeAttribute {
    pub height: u32,
}

impl NotValidBeforeAttribute {
    pub fn new(height: u32) -> Self {
        Self { height }
    }

    pub fn verify(&self, _ctx: &AttributeContext<'_>, views: &AttributeViews<'_>) -> bool {
        views.clock.current_height() >= self.height
    }

    pub fn calculate_network_fee(
        &self,
        _ctx: &AttributeContext<'_>,
        _views: &AttributeViews<'_>,
    ) -> i64 {
        0
    }

    pub fn size(&self) -> usize {
        4
    }

    pub fn serialize(&self, writer: &mut BinaryWriter) -> neo_io::Result<()> {
        writer.write_u32(self.height);
        Ok(())
    }

    pub fn deserialize(reader: &mut MemoryReader) -> neo_io::Result<Self> {
        Ok(Self {
            height: reader.read_u32()?,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("height".into(), Value::Number(self.height.into()));
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, CodecError> {
        let height = value
            .get("height")
            .and_then(Value::as_u64)
            .ok_or_else(|| CodecError::invalid_json("height", "NotValidBefore"))?;
        Ok(Self {
            height: height as u32,
        })
    }
}
