//! The read side handed from a compression strategy to a backend.

use arrow::buffer::Buffer;
use memmap2::Mmap;
use std::io::{self, Read};
use std::ptr::NonNull;
use std::sync::Arc;

/// Bytes ready to be decoded: either a stream or a shared read-only memory map.
pub enum ByteSource {
    Stream(Box<dyn Read>),
    Mapped(Arc<Mmap>),
}

impl ByteSource {
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        ByteSource::Stream(Box::new(reader))
    }

    /// Reads everything into an owned vector.
    pub fn read_to_vec(self) -> io::Result<Vec<u8>> {
        match self {
            ByteSource::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
            ByteSource::Mapped(map) => Ok(map.to_vec()),
        }
    }

    pub fn read_to_string(self) -> io::Result<String> {
        String::from_utf8(self.read_to_vec()?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Converts into an Arrow buffer. A memory map is wrapped without copying and
    /// stays alive for as long as the buffer (or any slice of it) does.
    pub fn into_buffer(self) -> io::Result<Buffer> {
        match self {
            ByteSource::Mapped(map) => Ok(mapped_buffer(map)),
            stream => Ok(Buffer::from_vec(stream.read_to_vec()?)),
        }
    }
}

fn mapped_buffer(map: Arc<Mmap>) -> Buffer {
    let len = map.len();
    match NonNull::new(map.as_ptr() as *mut u8) {
        // SAFETY: the pointer and length describe the read-only mapping owned by `map`,
        // which is moved into the buffer as its allocation owner and therefore outlives
        // every view. Arrow never writes through an immutable `Buffer`.
        Some(ptr) if len > 0 => unsafe { Buffer::from_custom_allocation(ptr, len, map) },
        _ => Buffer::from_vec(Vec::<u8>::new()),
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteSource::Stream(_) => write!(f, "ByteSource::Stream"),
            ByteSource::Mapped(map) => write!(f, "ByteSource::Mapped({} bytes)", map.len()),
        }
    }
}
