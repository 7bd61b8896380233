use crate::{BinaryWriter, MemoryReader, Result};

/// Types with a fixed, consensus-critical binary encoding.
///
/// `size()` must equal the number of bytes `serialize` writes; callers rely
/// on this to pre-size buffers without a dry-run serialize pass.
pub trait Serializable: Sized {
    fn size(&self) -> usize;

    fn serialize(&self, writer: &mut BinaryWriter) -> Result<()>;

    fn deserialize(reader: &mut MemoryReader) -> Result<Self>;

    fn to_array(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(self.size());
        // Only fails on writer-side allocation failure, which `BinaryWriter`
        // never surfaces as an `Err` - `to_array` is infallible in practice.
        self.serialize(&mut writer).expect("in-memory write cannot fail");
        writer.to_bytes()
    }
}
