//! Binary writer for the Neo wire format.

use crate::Serializable;
use bytes::{BufMut, BytesMut};

/// A little-endian writer for the consensus-critical binary encoding.
pub struct BinaryWriter {
    buffer: BytesMut,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_byte(if value { 1 } else { 0 });
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.put_u16_le(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.put_u32_le(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buffer.put_u64_le(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buffer.put_i64_le(value);
    }

    /// Writes a variable-length integer using the 1/3/5/9-byte prefix
    /// convention: values below `0xfd` are a single byte, otherwise a prefix
    /// byte (`0xfd`/`0xfe`/`0xff`) selects a 16/32/64-bit little-endian body.
    pub fn write_var_int(&mut self, value: u64) {
        if value < 0xfd {
            self.write_byte(value as u8);
        } else if value <= 0xffff {
            self.write_byte(0xfd);
            self.write_u16(value as u16);
        } else if value <= 0xffff_ffff {
            self.write_byte(0xfe);
            self.write_u32(value as u32);
        } else {
            self.write_byte(0xff);
            self.write_u64(value);
        }
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.buffer.put_slice(value);
    }

    pub fn write_var_bytes(&mut self, value: &[u8]) {
        self.write_var_int(value.len() as u64);
        self.write_bytes(value);
    }

    pub fn write_var_string(&mut self, value: &str) {
        self.write_var_bytes(value.as_bytes());
    }

    pub fn write_serializable<T: Serializable>(&mut self, value: &T) -> crate::Result<()> {
        value.serialize(self)
    }

    pub fn write_serializable_list<T: Serializable>(
        &mut self,
        value: &[T],
    ) -> crate::Result<()> {
        self.write_var_int(value.len() as u64);
        for item in value {
            self.write_serializable(item)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_int_prefix_convention() {
        let mut w = BinaryWriter::new();
        w.write_var_int(0xfc);
        assert_eq!(w.to_bytes(), vec![0xfc]);

        let mut w = BinaryWriter::new();
        w.write_var_int(0x1_0000);
        assert_eq!(w.to_bytes(), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn scenario_1_witness_rule_bytes() {
        // Allow=0x01, Boolean tag=0x00, true=0x01
        let mut w = BinaryWriter::new();
        w.write_byte(0x01);
        w.write_byte(0x00);
        w.write_bool(true);
        assert_eq!(w.to_bytes(), vec![0x01, 0x00, 0x01]);
    }
}
