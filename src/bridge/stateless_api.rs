// In: src/bridge/stateless_api.rs

use std::path::Path;

use crate::bridge::FdfContext;
use crate::descriptor::ArrayDescriptor;
use crate::error::FdfError;
use crate::types::FdfValue;

/// Parses and assembles file paths with the default configuration.
pub fn parse_tree<I, P>(paths: I) -> Result<Vec<ArrayDescriptor>, FdfError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    // Since this is a stateless API, we don't have a user-provided config.
    FdfContext::default().parse_tree(paths)
}

/// Checks and resolves one tree with the default registries.
pub fn resolve(node: &ArrayDescriptor) -> Result<FdfValue, FdfError> {
    FdfContext::default().resolve(node)
}
