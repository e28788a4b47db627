//! Backend and compression lookup tables.
//!
//! Both registries are plain values owned by an `FdfContext`; there is no global
//! state. Lookups of unknown tags fail with an error that names the tag and the
//! descriptor that asked for it.

pub mod backend;
pub mod compression;
mod source;

pub use backend::{Backend, BackendRegistry};
pub use compression::{Compression, CompressionRegistry};
pub use source::ByteSource;
