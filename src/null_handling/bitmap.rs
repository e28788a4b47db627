// In: src/null_handling/bitmap.rs

//! Pure helpers for moving Arrow validity bitmaps to and from standalone byte
//! buffers, the form in which they are stored as `null_bitmap` files.

use arrow::buffer::{BooleanBuffer, Buffer, NullBuffer};
use arrow::error::ArrowError;

use crate::error::FdfError;

/// Number of bytes a validity bitmap for `len` slots occupies.
pub fn bitmap_byte_len(len: usize) -> usize {
    len.div_ceil(8)
}

/// Returns the validity bitmap as a byte buffer starting at bit 0, or `None` when
/// the array has no nulls and therefore needs no bitmap file.
pub fn validity_to_buffer(nulls: Option<&NullBuffer>) -> Option<Buffer> {
    let nulls = nulls.filter(|n| n.null_count() > 0)?;
    Some(nulls.inner().sliced())
}

/// Rebuilds a `NullBuffer` for `len` slots from bitmap bytes.
pub fn buffer_to_validity(bytes: Buffer, len: usize) -> Result<NullBuffer, FdfError> {
    let needed = bitmap_byte_len(len);
    if bytes.len() < needed {
        return Err(ArrowError::InvalidArgumentError(format!(
            "validity bitmap of {} bytes is too short for {} slots (need {})",
            bytes.len(),
            len,
            needed
        ))
        .into());
    }
    Ok(NullBuffer::new(BooleanBuffer::new(bytes, 0, len)))
}

/// Counts the null slots described by a bitmap of `len` slots.
pub fn null_count(bytes: &Buffer, len: usize) -> Result<usize, FdfError> {
    Ok(buffer_to_validity(bytes.clone(), len)?.null_count())
}
