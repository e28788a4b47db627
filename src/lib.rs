//! This file is the root of the `fdf` Rust crate: the filesystem-based data frame.
//!
//! A directory of array files is a data frame. Each file name encodes where its
//! array belongs (`column.sub.__marker__...`), how it is serialized (the backend
//! tag) and, optionally, how it is compressed. This crate parses those names,
//! assembles them into one tree per column and resolves each tree into Arrow data.
//!
//! Its responsibilities at this level are limited to declaring the modules and
//! re-exporting the public API.
//!
//! ```no_run
//! let roots = fdf::parse_tree(["frame/price.txt", "frame/price.__valuemap__.json"])?;
//! let value = fdf::resolve(&roots[0])?;
//! # Ok::<(), fdf::FdfError>(())
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod backends;
pub mod bridge;
pub mod buffer_layout;
pub mod config;
pub mod descriptor;
pub mod kernels;
pub mod naming;
pub mod registry;
pub mod resolve;
pub mod types;

mod error;
mod null_handling;

//==================================================================================
// 2. Public API
//==================================================================================
pub use bridge::{parse_tree, resolve, FdfContext};
pub use config::FdfConfig;
pub use descriptor::{ArrayDescriptor, TreeAssembler};
pub use error::FdfError;
pub use naming::{NameFilter, NameGrammar};
pub use registry::{Backend, BackendRegistry, ByteSource, Compression, CompressionRegistry};
pub use resolve::Resolver;
pub use types::{ArrayRole, FdfValue};
