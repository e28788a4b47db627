// In: src/descriptor/tree.rs

//! Turns a flat set of descriptors into the nesting tree implied by their prefixes.
//!
//! Every proper ancestor prefix chain that has no file of its own is synthesized as
//! a virtual node. Construction is a single pass over the distinct prefix tuples
//! followed by a deepest-first attachment, so it never iterates to a fixed point.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use super::ArrayDescriptor;
use crate::error::FdfError;

/// Collects descriptors keyed by prefix chain, then assembles them into trees.
#[derive(Debug, Default)]
pub struct TreeAssembler {
    nodes: HashMap<Vec<String>, ArrayDescriptor>,
    inserted: usize,
    duplicates: usize,
}

impl TreeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one descriptor, flattening any children it already carries.
    ///
    /// An equal descriptor is ignored. A virtual node never displaces a real one and
    /// is itself replaced when a real file or an in-memory payload arrives. Anything else claiming the same
    /// prefixes is a `StructuralConflict`.
    pub fn insert(&mut self, mut descriptor: ArrayDescriptor) -> Result<(), FdfError> {
        let children = descriptor.take_children();
        self.inserted += 1;

        match self.nodes.entry(descriptor.prefixes().to_vec()) {
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get();
                if descriptor.is_virtual() {
                    self.duplicates += 1;
                    log::debug!("ignoring virtual duplicate '{}'", descriptor.label());
                } else if existing.is_virtual() {
                    slot.insert(descriptor);
                } else if *existing == descriptor {
                    self.duplicates += 1;
                    log::debug!("ignoring duplicate descriptor '{}'", descriptor.label());
                } else {
                    return Err(FdfError::StructuralConflict {
                        prefixes: descriptor.prefixes().join("."),
                        existing: existing.label(),
                        incoming: descriptor.label(),
                    });
                }
            }
        }

        for child in children {
            self.insert(child)?;
        }
        Ok(())
    }

    pub fn extend<I>(&mut self, descriptors: I) -> Result<(), FdfError>
    where
        I: IntoIterator<Item = ArrayDescriptor>,
    {
        descriptors.into_iter().try_for_each(|d| self.insert(d))
    }

    /// Number of distinct prefix chains collected so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds the forest. Roots are returned sorted by column name and every node's
    /// children are in canonical order.
    pub fn assemble(mut self) -> Result<Vec<ArrayDescriptor>, FdfError> {
        let real_nodes = self.nodes.len();

        // --- 1. Synthesize missing ancestors ---
        let keys: Vec<Vec<String>> = self.nodes.keys().cloned().collect();
        for key in &keys {
            for depth in 1..key.len() {
                if let Entry::Vacant(slot) = self.nodes.entry(key[..depth].to_vec()) {
                    let node = ArrayDescriptor::virtual_node(slot.key().clone())?;
                    slot.insert(node);
                }
            }
        }
        let virtual_nodes = self.nodes.len() - real_nodes;

        // --- 2. Attach deepest-first ---
        // A node is complete once every deeper key has been processed, so its
        // children can be sorted before it is moved into its parent.
        let mut keys: Vec<Vec<String>> = self.nodes.keys().cloned().collect();
        keys.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut roots = Vec::new();
        for key in keys {
            let Some(mut node) = self.nodes.remove(&key) else {
                continue;
            };
            node.sort_children();
            let Some(parent_key) = node.parent_prefixes().map(<[String]>::to_vec) else {
                roots.push(node);
                continue;
            };
            let parent = self.nodes.get_mut(&parent_key).ok_or_else(|| {
                FdfError::InternalError(format!(
                    "parent of '{}' was not synthesized",
                    node.canonical_name()
                ))
            })?;
            parent.add_child(node)?;
        }

        roots.sort_by(|a, b| a.column_name().cmp(b.column_name()));

        log::info!(
            "assembled {} root(s) from {} descriptor(s)",
            roots.len(),
            self.inserted
        );
        log_event!(
            "event" = "assemble_tree",
            "inserted" = self.inserted,
            "duplicates" = self.duplicates,
            "virtual_nodes" = virtual_nodes,
            "roots" = roots.len()
        );
        Ok(roots)
    }
}

/// Convenience wrapper: insert everything, then assemble.
pub fn assemble_tree<I>(descriptors: I) -> Result<Vec<ArrayDescriptor>, FdfError>
where
    I: IntoIterator<Item = ArrayDescriptor>,
{
    let mut assembler = TreeAssembler::new();
    assembler.extend(descriptors)?;
    assembler.assemble()
}
