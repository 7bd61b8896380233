//! Bounded little-endian binary codec used by the witness authorization wire
//! format. Every reader here takes an explicit maximum and refuses to read
//! or allocate past it - fully adversarial peers must never cause a panic or
//! an over-allocation through this crate.

mod binary_writer;
mod error;
mod memory_reader;
mod serializable;

pub use binary_writer::BinaryWriter;
pub use error::{Error, ErrorCategory, Result};
pub use memory_reader::MemoryReader;
pub use serializable::Serializable;
