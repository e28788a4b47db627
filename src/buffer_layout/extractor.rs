// In: src/buffer_layout/extractor.rs

//! Decomposes an Arrow array into a `__buffers__` descriptor subtree.
//!
//! The returned node is virtual. Its children carry their payload in memory and a
//! target path under the output directory; nothing touches the disk until the
//! subtree is dumped.

use arrow::array::{Array, ArrayData, MutableArrayData};
use std::path::Path;

use crate::bridge::format::{
    fields_for_buffer_count, BufferLayout, BUFFER_BACKEND, META_BACKEND, META_FIELD,
    MMAP_COMPRESSION,
};
use crate::config::FdfConfig;
use crate::descriptor::ArrayDescriptor;
use crate::error::FdfError;
use crate::null_handling::bitmap;
use crate::types::array_role::BUFFERS_MARKER;
use crate::types::FdfValue;

#[derive(Debug, Clone, Copy)]
pub struct BufferExtractor {
    mmap_buffers: bool,
}

impl BufferExtractor {
    pub fn new(config: &FdfConfig) -> Self {
        Self {
            mmap_buffers: config.mmap_buffers,
        }
    }

    /// Returns the `target.prefixes + __buffers__` node for `array`, with one child
    /// per present buffer and a `meta` child, each targeted at
    /// `dir/<canonical name>`.
    pub fn extract(
        &self,
        array: &dyn Array,
        target: &ArrayDescriptor,
        dir: &Path,
    ) -> Result<ArrayDescriptor, FdfError> {
        let mut prefixes = target.prefixes().to_vec();
        prefixes.push(BUFFERS_MARKER.to_string());
        let label = prefixes.join(".");

        let data = compacted(array);
        if !data.child_data().is_empty() {
            return Err(FdfError::NotImplemented(format!(
                "extracting {} arrays with child data ('{}')",
                data.data_type(),
                label
            )));
        }
        let buffer_count = 1 + data.buffers().len();
        let fields = fields_for_buffer_count(buffer_count).ok_or_else(|| {
            FdfError::NotImplemented(format!(
                "extracting {} arrays with {} buffers ('{}')",
                data.data_type(),
                buffer_count,
                label
            ))
        })?;

        let mut node = ArrayDescriptor::virtual_node(prefixes.clone())?;
        let compression = self.mmap_buffers.then_some(MMAP_COMPRESSION);

        // An absent validity bitmap produces no file.
        let payloads = std::iter::once(bitmap::validity_to_buffer(data.nulls()))
            .chain(data.buffers().iter().cloned().map(Some));
        for (field, payload) in fields.iter().zip(payloads) {
            if let Some(bytes) = payload {
                let child = leaf(&prefixes, field, BUFFER_BACKEND, compression, bytes.into(), dir)?;
                node.add_child(child)?;
            }
        }

        let layout = BufferLayout::new(
            data.data_type().clone(),
            data.len(),
            data.null_count(),
            fields,
        );
        let meta = leaf(
            &prefixes,
            META_FIELD,
            META_BACKEND,
            None,
            layout.to_record()?.into(),
            dir,
        )?;
        node.add_child(meta)?;
        node.sort_children();

        log_event!(
            "event" = "extract_buffers",
            "array" = label,
            "type" = data.data_type(),
            "length" = data.len(),
            "files" = node.children().len()
        );
        Ok(node)
    }
}

/// The array's data with a zero offset, copying only when the array is sliced.
/// Bit-packed values (booleans) keep their offset in `ArrayData`, so the copy
/// goes through `MutableArrayData` to rebase them to bit 0.
fn compacted(array: &dyn Array) -> ArrayData {
    let data = array.to_data();
    if data.offset() == 0 {
        return data;
    }
    let len = data.len();
    let mut mutable = MutableArrayData::new(vec![&data], false, len);
    mutable.extend(0, 0, len);
    mutable.freeze()
}

fn leaf(
    parent: &[String],
    field: &str,
    backend: &str,
    compression: Option<&str>,
    payload: FdfValue,
    dir: &Path,
) -> Result<ArrayDescriptor, FdfError> {
    let mut prefixes = parent.to_vec();
    prefixes.push(field.to_string());
    let descriptor = ArrayDescriptor::new(
        prefixes,
        Some(backend.to_string()),
        compression.map(str::to_string),
    )?;
    let path = dir.join(descriptor.canonical_name());
    Ok(descriptor.with_path(path).with_data(payload))
}
