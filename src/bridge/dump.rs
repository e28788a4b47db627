// In: src/bridge/dump.rs

use std::fs;

use crate::descriptor::ArrayDescriptor;
use crate::error::FdfError;
use crate::kernels::with_path;
use crate::registry::{BackendRegistry, CompressionRegistry};

/// Encodes and writes every descriptor in the subtree that has a backend and an
/// in-memory payload. Returns the number of files written.
pub(crate) fn dump_tree(
    node: &ArrayDescriptor,
    backends: &BackendRegistry,
    compressions: &CompressionRegistry,
) -> Result<usize, FdfError> {
    let mut written = 0;
    if let (Some(tag), Some(data)) = (node.backend(), node.data()) {
        let label = node.label();
        let path = node
            .path()
            .ok_or_else(|| FdfError::DescriptorNotMaterialized(label.clone()))?;

        let mut bytes = Vec::new();
        backends.get(tag, &label)?.encode(data, &mut bytes, &label)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| with_path(parent, e))?;
        }
        compressions.write(node.compression(), path, &bytes, &label)?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        written += 1;
    }

    for child in node.children() {
        written += dump_tree(child, backends, compressions)?;
    }
    Ok(written)
}
