//! `buf`: raw bytes. Memory-mapped sources are exposed without copying.

use std::io::Write;

use super::unexpected;
use crate::error::FdfError;
use crate::registry::{Backend, ByteSource};
use crate::types::FdfValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct RawBufferBackend;

impl Backend for RawBufferBackend {
    fn name(&self) -> &str {
        "buf"
    }

    fn decode(&self, source: ByteSource, _descriptor: &str) -> Result<FdfValue, FdfError> {
        Ok(FdfValue::Bytes(source.into_buffer()?))
    }

    fn encode(
        &self,
        value: &FdfValue,
        sink: &mut dyn Write,
        descriptor: &str,
    ) -> Result<(), FdfError> {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| unexpected(descriptor, "bytes", value))?;
        sink.write_all(bytes.as_slice())?;
        Ok(())
    }
}
