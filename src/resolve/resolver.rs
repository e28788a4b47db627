// In: src/resolve/resolver.rs

use std::collections::BTreeMap;

use super::transforms;
use crate::descriptor::ArrayDescriptor;
use crate::error::FdfError;
use crate::registry::{BackendRegistry, CompressionRegistry};
use crate::types::{ArrayRole, FdfValue};

//==================================================================================
// 1. Syntax Check
//==================================================================================

/// Validates a tree before resolution.
pub fn check_syntax(node: &ArrayDescriptor) -> Result<(), FdfError> {
    if node.is_root() && node.role().is_marker() {
        return Err(FdfError::syntax(
            node.label(),
            format!("a column cannot be a {}", node.role()),
        ));
    }

    let transformers: Vec<&str> = node
        .children()
        .iter()
        .filter(|c| c.role().is_column_transformer())
        .map(|c| c.array_name())
        .collect();
    if transformers.len() > 1 {
        return Err(FdfError::syntax(
            node.label(),
            format!("cannot apply multiple column transformers {:?}", transformers),
        ));
    }

    let base_providers: Vec<&str> = node
        .children()
        .iter()
        .filter(|c| c.role().is_multi_child())
        .map(|c| c.array_name())
        .collect();
    if base_providers.len() > 1 {
        return Err(FdfError::syntax(
            node.label(),
            format!("cannot combine multi-child transforms {:?}", base_providers),
        ));
    }
    if let (Some(backend), Some(provider)) = (node.backend(), base_providers.first()) {
        return Err(FdfError::syntax(
            node.label(),
            format!(
                "has its own '{}' file and also a '{}' base provider",
                backend, provider
            ),
        ));
    }

    node.children().iter().try_for_each(check_syntax)
}

//==================================================================================
// 2. Resolver
//==================================================================================

/// Resolves descriptor trees against a pair of registries.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    backends: &'a BackendRegistry,
    compressions: &'a CompressionRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(backends: &'a BackendRegistry, compressions: &'a CompressionRegistry) -> Self {
        Self {
            backends,
            compressions,
        }
    }

    pub fn check_syntax(&self, node: &ArrayDescriptor) -> Result<(), FdfError> {
        check_syntax(node)
    }

    /// Resolves `node` and its subtree. Any error aborts the whole subtree.
    ///
    /// `check_syntax` must have accepted the tree first.
    pub fn resolve(&self, node: &ArrayDescriptor) -> Result<FdfValue, FdfError> {
        match node.role() {
            ArrayRole::RowParser(kind) => {
                return Err(FdfError::NotImplemented(format!(
                    "row parser {:?} ('{}')",
                    kind,
                    node.label()
                )))
            }
            ArrayRole::Reserved(name) => {
                return Err(FdfError::NotImplemented(format!(
                    "reserved marker '{}' ('{}')",
                    name,
                    node.label()
                )))
            }
            _ => {}
        }

        log::trace!("resolving '{}'", node.label());
        let own = self.load_own(node)?;

        let value = match node.role() {
            ArrayRole::MultiChild(kind) => {
                let mut members = BTreeMap::new();
                for child in node.children() {
                    members.insert(child.array_name().to_string(), self.resolve(child)?);
                }
                transforms::apply_multi_child(*kind, own, members, &node.label())?
            }
            _ => node
                .children()
                .iter()
                .try_fold(own, |acc, child| self.fold_child(node, acc, child))?,
        };

        let value = wrap_by_role(node, value)?;
        log::debug!("resolved '{}' to {}", node.label(), value.kind());
        Ok(value)
    }

    /// Step 1: the node's own value, before any child is applied.
    fn load_own(&self, node: &ArrayDescriptor) -> Result<FdfValue, FdfError> {
        let Some(tag) = node.backend() else {
            return Ok(node.data().cloned().unwrap_or(FdfValue::Empty));
        };
        let label = node.label();
        let backend = self.backends.get(tag, &label)?;

        // In-memory payloads take precedence over the file.
        match (node.data(), node.path()) {
            (Some(data), _) => Ok(data.clone()),
            (None, Some(path)) => {
                let source = self.compressions.open(node.compression(), path, &label)?;
                backend.decode(source, &label)
            }
            (None, None) => Err(FdfError::DescriptorNotMaterialized(label)),
        }
    }

    /// Step 3: applies one resolved child to the accumulator.
    fn fold_child(
        &self,
        node: &ArrayDescriptor,
        acc: FdfValue,
        child: &ArrayDescriptor,
    ) -> Result<FdfValue, FdfError> {
        match self.resolve(child)? {
            FdfValue::Transform(step) => step(acc),
            base if child.role().is_multi_child() => {
                if acc.is_empty() {
                    Ok(base)
                } else {
                    Err(FdfError::syntax(
                        child.label(),
                        format!(
                            "supplies a base value but '{}' already holds {}",
                            node.canonical_name(),
                            acc.kind()
                        ),
                    ))
                }
            }
            member if *child.role() == ArrayRole::Plain => {
                attach_member(node, acc, child.array_name(), member)
            }
            other => Err(FdfError::InternalError(format!(
                "{} '{}' resolved to {}",
                child.role(),
                child.label(),
                other.kind()
            ))),
        }
    }
}

fn attach_member(
    node: &ArrayDescriptor,
    acc: FdfValue,
    name: &str,
    member: FdfValue,
) -> Result<FdfValue, FdfError> {
    match acc {
        FdfValue::Empty => Ok(FdfValue::Members(BTreeMap::from([(
            name.to_string(),
            member,
        )]))),
        FdfValue::Members(mut members) => {
            members.insert(name.to_string(), member);
            Ok(FdfValue::Members(members))
        }
        other => Err(FdfError::syntax(
            node.label(),
            format!("cannot attach member '{}' to {} value", name, other.kind()),
        )),
    }
}

/// Step 4: transformer and extension nodes become unary steps for their parent.
fn wrap_by_role(node: &ArrayDescriptor, value: FdfValue) -> Result<FdfValue, FdfError> {
    let step = match node.role() {
        ArrayRole::ColumnTransformer(kind) => {
            transforms::column_transformer(*kind, value, &node.label())?
        }
        ArrayRole::ArrayExtension(kind) => {
            transforms::array_extension(*kind, value, &node.label())?
        }
        _ => return Ok(value),
    };
    Ok(FdfValue::Transform(step))
}
