use crate::descriptor::{assemble_tree, ArrayDescriptor};
use crate::error::FdfError;
use crate::registry::{BackendRegistry, CompressionRegistry};
use crate::resolve::{check_syntax, Resolver};
use crate::types::FdfValue;

use arrow::array::{Array, ArrayRef, AsArray, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Int32Type};
use serde_json::json;
use std::sync::Arc;

// Test Helpers
/// An in-memory leaf: `dotted` is the prefix chain, e.g. `"col.__categories__"`.
fn leaf(dotted: &str, backend: &str, data: FdfValue) -> ArrayDescriptor {
    let prefixes = dotted.split('.').map(str::to_string).collect();
    ArrayDescriptor::new(prefixes, Some(backend.to_string()), None)
        .unwrap()
        .with_data(data)
}

fn ints(values: Vec<Option<i64>>) -> FdfValue {
    let array: ArrayRef = Arc::new(Int64Array::from(values));
    array.into()
}

fn strings(values: Vec<&str>) -> FdfValue {
    let array: ArrayRef = Arc::new(StringArray::from(values));
    array.into()
}

fn single_tree(leaves: Vec<ArrayDescriptor>) -> ArrayDescriptor {
    let mut roots = assemble_tree(leaves).unwrap();
    assert_eq!(roots.len(), 1);
    roots.remove(0)
}

fn resolve(root: &ArrayDescriptor) -> Result<FdfValue, FdfError> {
    let backends = BackendRegistry::with_defaults();
    let compressions = CompressionRegistry::with_defaults();
    check_syntax(root)?;
    Resolver::new(&backends, &compressions).resolve(root)
}

#[test]
fn test_plain_leaf_resolves_to_its_data() {
    let root = single_tree(vec![leaf("col", "txt", ints(vec![Some(1), None]))]);
    let value = resolve(&root).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[test]
fn test_transformer_then_extension_pipeline() {
    let root = single_tree(vec![
        leaf("col.__valuemap__", "json", json!({"lo": "low"}).into()),
        leaf("col", "txt", ints(vec![Some(0), Some(1), Some(0), None])),
        leaf("col.__categories__", "txt", strings(vec!["lo", "hi"])),
    ]);
    let array = resolve(&root).unwrap().into_array("col").unwrap();
    assert_eq!(array.data_type(), &DataType::Utf8);
    assert_eq!(
        array.as_string::<i32>(),
        &StringArray::from(vec![Some("low"), Some("hi"), Some("low"), None])
    );
}

#[test]
fn test_extension_nested_under_transformer_applies_to_labels() {
    let root = single_tree(vec![
        leaf("col", "txt", ints(vec![Some(1), Some(0)])),
        leaf("col.__categories__", "txt", strings(vec!["lo", "hi"])),
        leaf("col.__categories__.__valuemap__", "json", json!({"hi": "high"}).into()),
    ]);
    let array = resolve(&root).unwrap().into_array("col").unwrap();
    let dict = array.as_dictionary::<Int32Type>();
    assert_eq!(
        dict.values().as_string::<i32>(),
        &StringArray::from(vec!["lo", "high"])
    );
    assert_eq!(dict.keys(), &Int32Array::from(vec![1, 0]));
}

#[test]
fn test_plain_children_become_members() {
    let root = single_tree(vec![
        leaf("frame.price", "txt", ints(vec![Some(3)])),
        leaf("frame.meta", "json", json!({"source": "x"}).into()),
    ]);
    let value = resolve(&root).unwrap();
    let members = value.as_members().unwrap();
    assert_eq!(members.keys().collect::<Vec<_>>(), vec!["meta", "price"]);
    assert!(value.member("price").unwrap().as_array().is_some());
}

#[test]
fn test_member_cannot_attach_to_array() {
    let root = single_tree(vec![
        leaf("col", "txt", ints(vec![Some(3)])),
        leaf("col.extra", "txt", ints(vec![Some(4)])),
    ]);
    assert!(matches!(
        resolve(&root),
        Err(FdfError::ArrayFileNameSyntax { .. })
    ));
}

#[test]
fn test_two_column_transformers_fail_syntax_check() {
    let root = single_tree(vec![
        leaf("col", "txt", ints(vec![Some(0)])),
        leaf("col.__categories__", "txt", strings(vec!["a"])),
        leaf("col.__tokenize__", "txt", strings(vec!["b"])),
    ]);
    let err = check_syntax(&root).unwrap_err();
    match err {
        FdfError::ArrayFileNameSyntax { descriptor, reason } => {
            assert_eq!(descriptor, "col.txt");
            assert!(reason.contains("__categories__"));
            assert!(reason.contains("__tokenize__"));
        }
        other => panic!("expected ArrayFileNameSyntax, got {:?}", other),
    }
}

#[test]
fn test_transformer_and_extension_may_coexist() {
    let root = single_tree(vec![
        leaf("col", "txt", ints(vec![Some(0)])),
        leaf("col.__categories__", "txt", strings(vec!["a"])),
        leaf("col.__valuemap__", "json", json!({}).into()),
        leaf("col.__foreignkey__", "json", json!({}).into()),
    ]);
    assert!(check_syntax(&root).is_ok());
}

#[test]
fn test_marker_root_and_double_base_are_rejected() {
    let root = single_tree(vec![leaf("__categories__", "txt", strings(vec!["a"]))]);
    assert!(check_syntax(&root).is_err());

    let root = single_tree(vec![
        leaf("col", "txt", ints(vec![Some(0)])),
        leaf("col.__buffers__.meta", "json", json!({}).into()),
    ]);
    let err = check_syntax(&root).unwrap_err();
    assert!(err.to_string().contains("base provider"));
}

#[test]
fn test_unknown_backend_names_tag_and_descriptor() {
    let root = single_tree(vec![leaf("col", "parquet", FdfValue::Empty)]);
    match resolve(&root).unwrap_err() {
        FdfError::UnknownBackend { tag, descriptor } => {
            assert_eq!(tag, "parquet");
            assert_eq!(descriptor, "col.parquet");
        }
        other => panic!("expected UnknownBackend, got {:?}", other),
    }
}

#[test]
fn test_unsupported_markers_are_not_implemented() {
    for (marker, backend) in [
        ("col.__tokenize__", "txt"),
        ("col.__foreignkey__", "json"),
        ("col.__block__", "txt"),
        ("col.__mystery__", "txt"),
    ] {
        let root = single_tree(vec![
            leaf("col", "txt", ints(vec![Some(0)])),
            leaf(marker, backend, strings(vec!["a"])),
        ]);
        assert!(
            matches!(resolve(&root), Err(FdfError::NotImplemented(_))),
            "{} should not be implemented",
            marker
        );
    }
}

#[test]
fn test_error_in_child_aborts_whole_tree() {
    let root = single_tree(vec![
        leaf("frame.ok", "txt", ints(vec![Some(1)])),
        leaf("frame.bad", "parquet", FdfValue::Empty),
    ]);
    assert!(resolve(&root).is_err());
}

#[test]
fn test_backend_without_path_or_data_is_not_materialized() {
    let root = ArrayDescriptor::new(vec!["col".into()], Some("txt".into()), None).unwrap();
    assert!(matches!(
        resolve(&root),
        Err(FdfError::DescriptorNotMaterialized(_))
    ));
}
