//! `npy`: recognized so that such files parse, but not readable or writable yet.

use std::io::Write;

use crate::error::FdfError;
use crate::registry::{Backend, ByteSource};
use crate::types::FdfValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct NpyBackend;

impl Backend for NpyBackend {
    fn name(&self) -> &str {
        "npy"
    }

    fn decode(&self, _source: ByteSource, descriptor: &str) -> Result<FdfValue, FdfError> {
        Err(FdfError::NotImplemented(format!(
            "npy backend cannot decode '{}'",
            descriptor
        )))
    }

    fn encode(
        &self,
        _value: &FdfValue,
        _sink: &mut dyn Write,
        descriptor: &str,
    ) -> Result<(), FdfError> {
        Err(FdfError::NotImplemented(format!(
            "npy backend cannot encode '{}'",
            descriptor
        )))
    }
}
