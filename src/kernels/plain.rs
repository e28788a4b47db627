//! The identity strategy, used when a file name has no compression tag.

use std::io::Write;
use std::path::Path;

use super::{create_writer, open_reader, with_path};
use crate::error::FdfError;
use crate::registry::ByteSource;

pub fn open(path: &Path) -> Result<ByteSource, FdfError> {
    Ok(ByteSource::from_reader(open_reader(path)?))
}

pub fn write(path: &Path, bytes: &[u8]) -> Result<(), FdfError> {
    let mut writer = create_writer(path)?;
    writer.write_all(bytes).map_err(|e| with_path(path, e))?;
    writer.flush().map_err(|e| with_path(path, e))
}
