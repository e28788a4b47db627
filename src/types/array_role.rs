//! Defines the closed, type-safe meaning of a node's local name.
//!
//! Reserved names begin and end with a double underscore. They are resolved into an
//! `ArrayRole` exactly once, when a descriptor is created, so the resolver never
//! compares marker strings.

use std::cmp::Ordering;
use std::fmt;

/// Transforms that consume every child of their node at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiChildKind {
    /// Rebuilds an Arrow array from its buffer files plus a layout record.
    ArrowBuffers,
}

/// Column transformers; at most one may be attached to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformerKind {
    Categories,
    Tokenize,
    Transform,
}

/// Array extensions; any number may be attached to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    ValueMap,
    ForeignKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowParserKind {
    Block,
}

/// What a node's array name (last prefix) means.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayRole {
    /// A user-chosen column or sub-array name.
    Plain,
    MultiChild(MultiChildKind),
    ColumnTransformer(TransformerKind),
    ArrayExtension(ExtensionKind),
    RowParser(RowParserKind),
    /// A double-underscore name with no known meaning.
    Reserved(String),
}

pub const BUFFERS_MARKER: &str = "__buffers__";
pub const CATEGORIES_MARKER: &str = "__categories__";
pub const TOKENIZE_MARKER: &str = "__tokenize__";
pub const TRANSFORM_MARKER: &str = "__transform__";
pub const VALUEMAP_MARKER: &str = "__valuemap__";
pub const FOREIGNKEY_MARKER: &str = "__foreignkey__";
pub const BLOCK_MARKER: &str = "__block__";

/// Returns `true` if `name` has the reserved `__name__` shape.
pub fn is_reserved_name(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

impl ArrayRole {
    /// Classifies an array name.
    pub fn from_array_name(name: &str) -> Self {
        match name {
            BUFFERS_MARKER => Self::MultiChild(MultiChildKind::ArrowBuffers),
            CATEGORIES_MARKER => Self::ColumnTransformer(TransformerKind::Categories),
            TOKENIZE_MARKER => Self::ColumnTransformer(TransformerKind::Tokenize),
            TRANSFORM_MARKER => Self::ColumnTransformer(TransformerKind::Transform),
            VALUEMAP_MARKER => Self::ArrayExtension(ExtensionKind::ValueMap),
            FOREIGNKEY_MARKER => Self::ArrayExtension(ExtensionKind::ForeignKey),
            BLOCK_MARKER => Self::RowParser(RowParserKind::Block),
            other if is_reserved_name(other) => Self::Reserved(other.to_string()),
            _ => Self::Plain,
        }
    }

    pub fn is_marker(&self) -> bool {
        !matches!(self, Self::Plain)
    }

    pub fn is_column_transformer(&self) -> bool {
        matches!(self, Self::ColumnTransformer(_))
    }

    pub fn is_multi_child(&self) -> bool {
        matches!(self, Self::MultiChild(_))
    }

    /// Position of this role in the canonical child order.
    fn rank(&self) -> u8 {
        match self {
            Self::MultiChild(_) => 0,
            Self::Plain => 1,
            Self::ColumnTransformer(_) => 2,
            Self::ArrayExtension(_) => 3,
            Self::RowParser(_) => 4,
            Self::Reserved(_) => 5,
        }
    }

    /// Orders two children: base providers first, then members, transformers,
    /// extensions and row parsers.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for ArrayRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain array"),
            Self::MultiChild(kind) => write!(f, "multi-child transform {:?}", kind),
            Self::ColumnTransformer(kind) => write!(f, "column transformer {:?}", kind),
            Self::ArrayExtension(kind) => write!(f, "array extension {:?}", kind),
            Self::RowParser(kind) => write!(f, "row parser {:?}", kind),
            Self::Reserved(name) => write!(f, "reserved marker {}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_markers_are_classified() {
        assert_eq!(
            ArrayRole::from_array_name("__categories__"),
            ArrayRole::ColumnTransformer(TransformerKind::Categories)
        );
        assert_eq!(
            ArrayRole::from_array_name("__buffers__"),
            ArrayRole::MultiChild(MultiChildKind::ArrowBuffers)
        );
        assert_eq!(
            ArrayRole::from_array_name("__valuemap__"),
            ArrayRole::ArrayExtension(ExtensionKind::ValueMap)
        );
        assert_eq!(
            ArrayRole::from_array_name("__block__"),
            ArrayRole::RowParser(RowParserKind::Block)
        );
    }

    #[test]
    fn test_plain_and_reserved_names() {
        assert_eq!(ArrayRole::from_array_name("price"), ArrayRole::Plain);
        assert_eq!(ArrayRole::from_array_name("_x_"), ArrayRole::Plain);
        assert_eq!(ArrayRole::from_array_name("____"), ArrayRole::Plain);
        assert_eq!(
            ArrayRole::from_array_name("__mystery__"),
            ArrayRole::Reserved("__mystery__".into())
        );
    }

    #[test]
    fn test_canonical_order_puts_base_providers_first() {
        let buffers = ArrayRole::from_array_name("__buffers__");
        let plain = ArrayRole::Plain;
        let cats = ArrayRole::from_array_name("__categories__");
        let vmap = ArrayRole::from_array_name("__valuemap__");
        assert_eq!(buffers.canonical_cmp(&plain), Ordering::Less);
        assert_eq!(plain.canonical_cmp(&cats), Ordering::Less);
        assert_eq!(cats.canonical_cmp(&vmap), Ordering::Less);
    }
}
