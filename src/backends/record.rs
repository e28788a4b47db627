//! `json`: a single structured record.

use std::io::Write;

use super::unexpected;
use crate::error::FdfError;
use crate::registry::{Backend, ByteSource};
use crate::types::FdfValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl Backend for JsonBackend {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, source: ByteSource, _descriptor: &str) -> Result<FdfValue, FdfError> {
        let record = match source {
            ByteSource::Mapped(map) => serde_json::from_slice(&map)?,
            ByteSource::Stream(reader) => serde_json::from_reader(reader)?,
        };
        Ok(FdfValue::Record(record))
    }

    fn encode(
        &self,
        value: &FdfValue,
        sink: &mut dyn Write,
        descriptor: &str,
    ) -> Result<(), FdfError> {
        let record = value
            .as_record()
            .ok_or_else(|| unexpected(descriptor, "record", value))?;
        serde_json::to_writer_pretty(&mut *sink, record)?;
        sink.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_roundtrip() {
        let record = json!({"a": "alpha", "n": 3});
        let mut out = Vec::new();
        JsonBackend
            .encode(&FdfValue::Record(record.clone()), &mut out, "m.json")
            .unwrap();
        let source = ByteSource::from_reader(std::io::Cursor::new(out));
        let decoded = JsonBackend.decode(source, "m.json").unwrap();
        assert_eq!(decoded.as_record(), Some(&record));
    }

    #[test]
    fn test_malformed_json() {
        let source = ByteSource::from_reader(std::io::Cursor::new(b"{oops".to_vec()));
        assert!(matches!(
            JsonBackend.decode(source, "m.json"),
            Err(FdfError::SerdeJson(_))
        ));
    }
}
