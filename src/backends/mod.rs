//! The default backends registered by `BackendRegistry::with_defaults`.

mod npy;
mod raw_buffer;
mod record;
mod text;

pub use npy::NpyBackend;
pub use raw_buffer::RawBufferBackend;
pub use record::JsonBackend;
pub use text::TextBackend;

use crate::error::FdfError;
use crate::types::FdfValue;

fn unexpected(descriptor: &str, expected: &'static str, found: &FdfValue) -> FdfError {
    FdfError::UnexpectedValue {
        descriptor: descriptor.to_string(),
        expected,
        found: found.kind(),
    }
}
