// In: src/resolve/mod.rs

//! Resolution: turning an assembled descriptor tree into in-memory values.
//!
//! `check_syntax` validates combinations of reserved names that are individually
//! valid but jointly meaningless. `Resolver::resolve` then walks the tree
//! depth-first, loading each node through its compression and backend and
//! folding its children over the result in canonical order.

mod resolver;
pub(crate) mod transforms;

#[cfg(test)]
mod resolver_tests;

pub use resolver::{check_syntax, Resolver};
