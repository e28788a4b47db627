// In: src/resolve/transforms.rs

//! Built-in transforms behind the reserved array names.
//!
//! Column transformers and array extensions are built from their node's resolved
//! value and returned as a `UnaryTransform` that the parent applies to its
//! accumulator. Multi-child transforms consume all children of their node at once.

use arrow::array::{Array, ArrayRef, AsArray, DictionaryArray, StringArray};
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Int32Type};
use hashbrown::HashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::buffer_layout;
use crate::error::FdfError;
use crate::types::{ExtensionKind, FdfValue, MultiChildKind, TransformerKind, UnaryTransform};

//==================================================================================
// 1. Dispatch
//==================================================================================

pub(crate) fn column_transformer(
    kind: TransformerKind,
    value: FdfValue,
    descriptor: &str,
) -> Result<UnaryTransform, FdfError> {
    match kind {
        TransformerKind::Categories => categories(value.into_array(descriptor)?, descriptor),
        TransformerKind::Tokenize | TransformerKind::Transform => Err(
            FdfError::NotImplemented(format!("column transformer {:?} ('{}')", kind, descriptor)),
        ),
    }
}

pub(crate) fn array_extension(
    kind: ExtensionKind,
    value: FdfValue,
    descriptor: &str,
) -> Result<UnaryTransform, FdfError> {
    match kind {
        ExtensionKind::ValueMap => value_map(value, descriptor),
        ExtensionKind::ForeignKey => Err(FdfError::NotImplemented(format!(
            "array extension {:?} ('{}')",
            kind, descriptor
        ))),
    }
}

pub(crate) fn apply_multi_child(
    kind: MultiChildKind,
    own: FdfValue,
    members: BTreeMap<String, FdfValue>,
    descriptor: &str,
) -> Result<FdfValue, FdfError> {
    match kind {
        MultiChildKind::ArrowBuffers => {
            if !own.is_empty() {
                return Err(FdfError::UnexpectedValue {
                    descriptor: descriptor.to_string(),
                    expected: "no value of its own",
                    found: own.kind(),
                });
            }
            buffer_layout::reassemble(members, descriptor).map(FdfValue::Array)
        }
    }
}

//==================================================================================
// 2. Column Transformers
//==================================================================================

/// Integer codes -> `DictionaryArray<Int32>` over the node's labels.
fn categories(labels: ArrayRef, descriptor: &str) -> Result<UnaryTransform, FdfError> {
    let descriptor = descriptor.to_string();
    Ok(Arc::new(move |codes: FdfValue| -> Result<FdfValue, FdfError> {
        let codes = codes.into_array(&descriptor)?;
        if !codes.data_type().is_integer() {
            return Err(FdfError::UnexpectedValue {
                descriptor: descriptor.clone(),
                expected: "integer category codes",
                found: "non-integer array",
            });
        }
        // Unsafe cast so that codes outside the Int32 range fail instead of becoming null.
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };
        let keys = cast_with_options(&codes, &DataType::Int32, &options)?;
        let keys = keys.as_primitive::<Int32Type>().clone();
        let dictionary = DictionaryArray::<Int32Type>::try_new(keys, labels.clone())?;
        Ok(FdfValue::Array(Arc::new(dictionary)))
    }))
}

//==================================================================================
// 3. Array Extensions
//==================================================================================

/// Replaces values found in a JSON object; everything else passes through as text.
fn value_map(value: FdfValue, descriptor: &str) -> Result<UnaryTransform, FdfError> {
    let mapping: HashMap<String, String> = match value {
        FdfValue::Record(serde_json::Value::Object(object)) => object
            .into_iter()
            .map(|(from, to)| (from, json_text(to)))
            .collect(),
        other => {
            return Err(FdfError::UnexpectedValue {
                descriptor: descriptor.to_string(),
                expected: "JSON object record",
                found: other.kind(),
            })
        }
    };

    let descriptor = descriptor.to_string();
    Ok(Arc::new(move |target: FdfValue| -> Result<FdfValue, FdfError> {
        let array = target.into_array(&descriptor)?;
        let text = cast(&array, &DataType::Utf8)?;
        let mapped: StringArray = text
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(|s| mapping.get(s).map_or(s, String::as_str)))
            .collect();
        Ok(FdfValue::Array(Arc::new(mapped)))
    }))
}

fn json_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
