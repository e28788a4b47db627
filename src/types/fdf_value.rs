//! The materialized, in-memory value of a resolved node.

use arrow::array::{Array, ArrayRef};
use arrow::buffer::Buffer;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::FdfError;

/// A unary step produced by transformer and extension nodes.
pub type UnaryTransform = Arc<dyn Fn(FdfValue) -> Result<FdfValue, FdfError> + Send + Sync>;

/// Every kind of value a backend, transform or node resolution can produce.
#[derive(Clone)]
pub enum FdfValue {
    /// A structural node that has no data yet.
    Empty,
    /// Raw bytes; may be a zero-copy view over a memory-mapped file.
    Bytes(Buffer),
    /// A structured record, e.g. a buffer layout or a value map.
    Record(serde_json::Value),
    /// A columnar array.
    Array(ArrayRef),
    /// Named plain sub-arrays owned by a node.
    Members(BTreeMap<String, FdfValue>),
    Transform(UnaryTransform),
}

impl FdfValue {
    /// A short, stable name for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FdfValue::Empty => "empty",
            FdfValue::Bytes(_) => "bytes",
            FdfValue::Record(_) => "record",
            FdfValue::Array(_) => "array",
            FdfValue::Members(_) => "members",
            FdfValue::Transform(_) => "transform",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FdfValue::Empty)
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            FdfValue::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Buffer> {
        match self {
            FdfValue::Bytes(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&serde_json::Value> {
        match self {
            FdfValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_members(&self) -> Option<&BTreeMap<String, FdfValue>> {
        match self {
            FdfValue::Members(members) => Some(members),
            _ => None,
        }
    }

    /// Looks up a member by name.
    pub fn member(&self, name: &str) -> Option<&FdfValue> {
        self.as_members().and_then(|members| members.get(name))
    }

    /// Consumes the value, returning the array or an `UnexpectedValue` error
    /// attributed to `descriptor`.
    pub fn into_array(self, descriptor: &str) -> Result<ArrayRef, FdfError> {
        match self {
            FdfValue::Array(array) => Ok(array),
            other => Err(FdfError::UnexpectedValue {
                descriptor: descriptor.to_string(),
                expected: "array",
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Debug for FdfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FdfValue::Empty => write!(f, "Empty"),
            FdfValue::Bytes(buffer) => write!(f, "Bytes({} bytes)", buffer.len()),
            FdfValue::Record(record) => write!(f, "Record({})", record),
            FdfValue::Array(array) => {
                write!(f, "Array({}, len={})", array.data_type(), array.len())
            }
            FdfValue::Members(members) => f.debug_map().entries(members.iter()).finish(),
            FdfValue::Transform(_) => write!(f, "Transform(..)"),
        }
    }
}

impl From<ArrayRef> for FdfValue {
    fn from(array: ArrayRef) -> Self {
        FdfValue::Array(array)
    }
}

impl From<Buffer> for FdfValue {
    fn from(buffer: Buffer) -> Self {
        FdfValue::Bytes(buffer)
    }
}

impl From<serde_json::Value> for FdfValue {
    fn from(record: serde_json::Value) -> Self {
        FdfValue::Record(record)
    }
}
