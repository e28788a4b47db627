// In: src/buffer_layout/reassemble.rs

use arrow::array::{make_array, ArrayData, ArrayRef};
use arrow::buffer::Buffer;
use std::collections::BTreeMap;

use crate::bridge::format::{BufferLayout, META_FIELD, NULL_BITMAP_FIELD};
use crate::error::FdfError;
use crate::null_handling::bitmap;
use crate::types::FdfValue;

/// Rebuilds an array from the resolved members of a `__buffers__` node.
pub(crate) fn reassemble(
    mut members: BTreeMap<String, FdfValue>,
    descriptor: &str,
) -> Result<ArrayRef, FdfError> {
    let meta = members
        .remove(META_FIELD)
        .ok_or_else(|| FdfError::syntax(descriptor, "missing the 'meta' layout record"))?;
    let record = meta.as_record().ok_or_else(|| FdfError::UnexpectedValue {
        descriptor: format!("{}.{}", descriptor, META_FIELD),
        expected: "record",
        found: meta.kind(),
    })?;
    let layout = BufferLayout::from_record(record, descriptor)?;

    let mut take = |field: &str| -> Result<Option<Buffer>, FdfError> {
        match members.remove(field) {
            None => Ok(None),
            Some(FdfValue::Bytes(bytes)) => Ok(Some(bytes)),
            Some(other) => Err(FdfError::UnexpectedValue {
                descriptor: format!("{}.{}", descriptor, field),
                expected: "bytes",
                found: other.kind(),
            }),
        }
    };

    // The validity slot is always first and may be absent.
    let null_bitmap = take(NULL_BITMAP_FIELD)?;
    let mut buffers = Vec::with_capacity(layout.buffer_fields.len() - 1);
    for field in &layout.buffer_fields[1..] {
        let bytes = take(field)?.ok_or_else(|| {
            FdfError::syntax(descriptor, format!("missing buffer file '{}'", field))
        })?;
        buffers.push(bytes);
    }

    if let Some(extra) = members.keys().next() {
        return Err(FdfError::syntax(
            descriptor,
            format!("unexpected member '{}' next to the buffer files", extra),
        ));
    }

    let null_count = match &null_bitmap {
        Some(bytes) => bitmap::null_count(bytes, layout.length)?,
        None => 0,
    };
    if null_count != layout.null_count {
        return Err(FdfError::syntax(
            descriptor,
            format!(
                "layout records {} nulls but the bitmap holds {}",
                layout.null_count, null_count
            ),
        ));
    }

    let data = ArrayData::builder(layout.logical_type)
        .len(layout.length)
        .null_bit_buffer(null_bitmap)
        .buffers(buffers)
        .build_aligned()?;
    Ok(make_array(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::format::DATA_FIELD;
    use arrow::array::{Array, Int32Array};
    use arrow::datatypes::DataType;

    fn members_for(array: &Int32Array) -> BTreeMap<String, FdfValue> {
        let data = array.to_data();
        let layout = BufferLayout::new(
            DataType::Int32,
            array.len(),
            array.null_count(),
            &[NULL_BITMAP_FIELD, DATA_FIELD],
        );
        let mut members = BTreeMap::new();
        members.insert(META_FIELD.to_string(), FdfValue::Record(layout.to_record().unwrap()));
        members.insert(DATA_FIELD.to_string(), FdfValue::Bytes(data.buffers()[0].clone()));
        if let Some(bytes) = bitmap::validity_to_buffer(array.nulls()) {
            members.insert(NULL_BITMAP_FIELD.to_string(), FdfValue::Bytes(bytes));
        }
        members
    }

    #[test]
    fn test_reassemble_primitive_with_nulls() {
        let array = Int32Array::from(vec![Some(1), None, Some(3)]);
        let rebuilt = reassemble(members_for(&array), "c.__buffers__").unwrap();
        assert_eq!(rebuilt.as_any().downcast_ref::<Int32Array>().unwrap(), &array);
    }

    #[test]
    fn test_unaligned_buffers_are_realigned() {
        let array = Int32Array::from(vec![7, 8]);
        let mut members = members_for(&array);
        // A one-byte offset into a larger allocation is never 4-byte aligned.
        let mut raw = vec![0u8];
        raw.extend_from_slice(array.to_data().buffers()[0].as_slice());
        let unaligned = Buffer::from_vec(raw).slice(1);
        members.insert(DATA_FIELD.to_string(), FdfValue::Bytes(unaligned));
        let rebuilt = reassemble(members, "c.__buffers__").unwrap();
        assert_eq!(rebuilt.as_any().downcast_ref::<Int32Array>().unwrap(), &array);
    }

    #[test]
    fn test_missing_pieces_are_reported() {
        let array = Int32Array::from(vec![Some(1), None]);

        let mut members = members_for(&array);
        members.remove(META_FIELD);
        assert!(matches!(
            reassemble(members, "c"),
            Err(FdfError::ArrayFileNameSyntax { .. })
        ));

        let mut members = members_for(&array);
        members.remove(DATA_FIELD);
        assert!(reassemble(members, "c").is_err());

        let mut members = members_for(&array);
        members.remove(NULL_BITMAP_FIELD);
        let err = reassemble(members, "c").unwrap_err();
        assert!(err.to_string().contains("nulls"));
    }
}
