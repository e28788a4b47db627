//! This module defines the core, strongly-typed representations used throughout
//! the fdf resolver.
//!
//! It includes the closed `ArrayRole` enum, which replaces string comparisons
//! against reserved marker names, and the `FdfValue` enum every node resolves to.

pub mod array_role;
pub mod fdf_value;

// Re-export the main type(s) for easier access.
pub use array_role::{ArrayRole, ExtensionKind, MultiChildKind, RowParserKind, TransformerKind};
pub use fdf_value::{FdfValue, UnaryTransform};
