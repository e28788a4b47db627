//! Array descriptors and the tree they form.

pub mod array_descriptor;
pub mod tree;

#[cfg(test)]
mod tree_tests;

pub use array_descriptor::ArrayDescriptor;
pub use tree::{assemble_tree, TreeAssembler};
