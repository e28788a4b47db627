// In: src/bridge/format.rs

//! Defines the on-disk structures and constants of the fdf buffer layout.
//! This is the single source of truth for the `meta` record written next to the
//! buffer files of an extracted array, and for the field names of those files.

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

use crate::error::FdfError;

//==================================================================================
// I. Buffer Field Names
//==================================================================================

/// The current version of the buffer layout record.
pub const BUFFER_LAYOUT_VERSION: u16 = 1;

pub const META_FIELD: &str = "meta";
pub const NULL_BITMAP_FIELD: &str = "null_bitmap";
pub const OFFSETS_FIELD: &str = "offsets";
pub const DATA_FIELD: &str = "data";

/// Backend tag of the buffer files.
pub const BUFFER_BACKEND: &str = "buf";
/// Backend tag of the layout record.
pub const META_BACKEND: &str = "json";
/// Compression tag of the buffer files when memory mapping is enabled.
pub const MMAP_COMPRESSION: &str = "mmap";

/// Field names by buffer count, where the count is one validity slot plus the
/// Arrow data buffers of the array.
pub fn fields_for_buffer_count(count: usize) -> Option<&'static [&'static str]> {
    match count {
        2 => Some(&[NULL_BITMAP_FIELD, DATA_FIELD]),
        3 => Some(&[NULL_BITMAP_FIELD, OFFSETS_FIELD, DATA_FIELD]),
        _ => None,
    }
}

//==================================================================================
// II. Layout Record
//==================================================================================

/// Everything needed, besides the buffer bytes, to rebuild an Arrow array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BufferLayout {
    pub format_version: u16,
    /// Human-readable type name, e.g. `Int32`.
    pub type_name: String,
    /// The full logical type, serialized as its name plus constructor arguments.
    pub logical_type: DataType,
    pub length: usize,
    pub null_count: usize,
    /// File field names in buffer order, starting with the validity slot.
    pub buffer_fields: Vec<String>,
}

impl BufferLayout {
    pub fn new(logical_type: DataType, length: usize, null_count: usize, fields: &[&str]) -> Self {
        Self {
            format_version: BUFFER_LAYOUT_VERSION,
            type_name: logical_type.to_string(),
            logical_type,
            length,
            null_count,
            buffer_fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn to_record(&self) -> Result<serde_json::Value, FdfError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parses and validates a layout record.
    pub fn from_record(record: &serde_json::Value, descriptor: &str) -> Result<Self, FdfError> {
        let layout: BufferLayout = serde_json::from_value(record.clone())?;
        if layout.format_version != BUFFER_LAYOUT_VERSION {
            return Err(FdfError::NotImplemented(format!(
                "buffer layout version {} in '{}' (supported: {})",
                layout.format_version, descriptor, BUFFER_LAYOUT_VERSION
            )));
        }
        if fields_for_buffer_count(layout.buffer_fields.len())
            .map_or(true, |expected| expected != layout.buffer_fields.as_slice())
        {
            return Err(FdfError::syntax(
                descriptor,
                format!("unsupported buffer fields {:?}", layout.buffer_fields),
            ));
        }
        Ok(layout)
    }
}
