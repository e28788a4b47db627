//! `txt`: one literal per line.
//!
//! Decoding infers the narrowest of Int64, Float64 and Utf8 that fits every
//! non-empty line. Empty lines are nulls, so empty strings do not survive a
//! round trip.

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::util::display::array_value_to_string;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use super::unexpected;
use crate::error::FdfError;
use crate::registry::{Backend, ByteSource};
use crate::types::FdfValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl Backend for TextBackend {
    fn name(&self) -> &str {
        "txt"
    }

    fn decode(&self, source: ByteSource, _descriptor: &str) -> Result<FdfValue, FdfError> {
        let text = source.read_to_string()?;
        Ok(FdfValue::Array(parse_lines(&text)))
    }

    fn encode(
        &self,
        value: &FdfValue,
        sink: &mut dyn Write,
        descriptor: &str,
    ) -> Result<(), FdfError> {
        let array = value
            .as_array()
            .ok_or_else(|| unexpected(descriptor, "array", value))?;
        for i in 0..array.len() {
            if array.is_valid(i) {
                let literal = array_value_to_string(array, i)?;
                if literal.contains(['\n', '\r']) {
                    return Err(FdfError::NotImplemented(format!(
                        "txt backend cannot store line breaks (row {} of '{}')",
                        i, descriptor
                    )));
                }
                sink.write_all(literal.as_bytes())?;
            }
            sink.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Parses every line as `T`, or returns `None` if any non-empty line does not parse.
fn parse_all<T: FromStr>(lines: &[Option<&str>]) -> Option<Vec<Option<T>>> {
    lines
        .iter()
        .map(|line| line.map(str::parse::<T>).transpose())
        .collect::<Result<_, _>>()
        .ok()
}

fn parse_lines(text: &str) -> ArrayRef {
    let lines: Vec<Option<&str>> = text
        .lines()
        .map(|line| (!line.is_empty()).then_some(line))
        .collect();

    if lines.iter().any(Option::is_some) {
        if let Some(ints) = parse_all::<i64>(&lines) {
            return Arc::new(Int64Array::from(ints));
        }
        if let Some(floats) = parse_all::<f64>(&lines) {
            return Arc::new(Float64Array::from(floats));
        }
    }
    Arc::new(StringArray::from(lines))
}
