//! Arrow arrays as directories of buffer files.
//!
//! `extractor` decomposes an array into one descriptor per buffer plus a `meta`
//! layout record; `reassemble` is its inverse and backs the `__buffers__` marker.

pub mod extractor;
mod reassemble;

pub use extractor::BufferExtractor;
pub(crate) use reassemble::reassemble;
