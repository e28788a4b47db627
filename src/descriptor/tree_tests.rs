use crate::descriptor::tree::{assemble_tree, TreeAssembler};
use crate::descriptor::ArrayDescriptor;
use crate::error::FdfError;
use crate::naming::{NameFilter, NameGrammar};
use crate::types::FdfValue;

use rand::seq::SliceRandom;

// Test Helpers
fn parse_all(paths: &[&str]) -> Vec<ArrayDescriptor> {
    let grammar = NameGrammar::new(["gz", "bz2", "lzma", "zst", "mmap"]);
    let filter = NameFilter::default();
    paths
        .iter()
        .map(|p| ArrayDescriptor::from_path(p, &filter, &grammar).unwrap())
        .collect()
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Renders a forest as indented canonical names, one node per line.
fn render(roots: &[ArrayDescriptor]) -> String {
    let mut out = String::new();
    for root in roots {
        root.visit(&mut |node| {
            out.push_str(&"  ".repeat(node.prefixes().len() - 1));
            out.push_str(&node.canonical_name());
            out.push('\n');
        });
    }
    out
}

#[test]
fn test_virtual_parents_are_synthesized() {
    let roots = assemble_tree(parse_all(&["a.b.c.txt", "a.b.d.txt"])).unwrap();
    assert_eq!(roots.len(), 1);

    let a = &roots[0];
    assert_eq!(a.prefixes(), names(&["a"]).as_slice());
    assert!(a.is_virtual());
    assert_eq!(a.children().len(), 1);

    let b = &a.children()[0];
    assert_eq!(b.prefixes(), names(&["a", "b"]).as_slice());
    assert!(b.is_virtual());

    let leaves: Vec<String> = b.children().iter().map(|c| c.canonical_name()).collect();
    assert_eq!(leaves, vec!["a.b.c.txt", "a.b.d.txt"]);
    assert!(b.children().iter().all(|c| c.backend() == Some("txt")));
}

#[test]
fn test_real_file_becomes_parent() {
    let roots = assemble_tree(parse_all(&["col.txt", "col.__categories__.txt"])).unwrap();
    assert_eq!(roots.len(), 1);
    assert!(!roots[0].is_virtual());
    assert_eq!(roots[0].backend(), Some("txt"));
    assert_eq!(
        roots[0].children()[0].canonical_name(),
        "col.__categories__.txt"
    );
}

#[test]
fn test_two_backends_for_one_array_conflict() {
    let err = assemble_tree(parse_all(&["a.b.txt", "a.b.npy"])).unwrap_err();
    match err {
        FdfError::StructuralConflict {
            prefixes,
            existing,
            incoming,
        } => {
            assert_eq!(prefixes, "a.b");
            assert_eq!(existing, "a.b.txt");
            assert_eq!(incoming, "a.b.npy");
        }
        other => panic!("expected StructuralConflict, got {:?}", other),
    }
}

#[test]
fn test_identical_inputs_are_deduplicated() {
    let roots = assemble_tree(parse_all(&["a.b.txt", "a.b.txt", "a.c.txt"])).unwrap();
    assert_eq!(roots[0].children().len(), 2);
}

#[test]
fn test_output_is_independent_of_input_order() {
    let paths = [
        "z.txt",
        "a.b.c.txt",
        "a.b.d.txt",
        "a.__categories__.txt",
        "a.__valuemap__.json",
        "a.__buffers__.data.buf.mmap",
        "a.__buffers__.meta.json",
        "m.x.y.z.txt.gz",
    ];
    let expected = render(&assemble_tree(parse_all(&paths)).unwrap());

    let mut rng = rand::rng();
    for _ in 0..10 {
        let mut shuffled = paths.to_vec();
        shuffled.shuffle(&mut rng);
        let actual = render(&assemble_tree(parse_all(&shuffled)).unwrap());
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_children_are_in_canonical_order() {
    let roots = assemble_tree(parse_all(&[
        "a.__valuemap__.json",
        "a.zeta.txt",
        "a.__categories__.txt",
        "a.__buffers__.data.buf",
        "a.alpha.txt",
    ]))
    .unwrap();
    let order: Vec<&str> = roots[0].children().iter().map(|c| c.array_name()).collect();
    assert_eq!(
        order,
        vec!["__buffers__", "alpha", "zeta", "__categories__", "__valuemap__"]
    );
}

#[test]
fn test_roots_sorted_by_column_name() {
    let roots = assemble_tree(parse_all(&["c.txt", "a.txt", "b.x.txt"])).unwrap();
    let columns: Vec<&str> = roots.iter().map(|r| r.column_name()).collect();
    assert_eq!(columns, vec!["a", "b", "c"]);
}

#[test]
fn test_insert_flattens_prebuilt_subtrees() {
    let mut buffers = ArrayDescriptor::virtual_node(names(&["a", "__buffers__"])).unwrap();
    buffers
        .add_child(
            ArrayDescriptor::new(names(&["a", "__buffers__", "data"]), Some("buf".into()), None)
                .unwrap(),
        )
        .unwrap();

    let mut assembler = TreeAssembler::new();
    assembler.insert(buffers).unwrap();
    // A virtual duplicate does not displace the real node.
    assembler
        .insert(ArrayDescriptor::virtual_node(names(&["a", "__buffers__", "data"])).unwrap())
        .unwrap();
    assert_eq!(assembler.len(), 2);

    let roots = assembler.assemble().unwrap();
    let data = roots[0].descendant(&["__buffers__", "data"]).unwrap();
    assert_eq!(data.backend(), Some("buf"));
}

#[test]
fn test_real_file_replaces_explicit_virtual_node() {
    let mut assembler = TreeAssembler::new();
    assembler
        .insert(ArrayDescriptor::virtual_node(names(&["a"])).unwrap())
        .unwrap();
    assembler.extend(parse_all(&["a.txt"])).unwrap();
    let roots = assembler.assemble().unwrap();
    assert_eq!(roots[0].backend(), Some("txt"));
}

#[test]
fn test_payload_node_is_not_dropped_as_virtual() {
    let payload = || {
        ArrayDescriptor::virtual_node(names(&["a", "note"]))
            .unwrap()
            .with_data(FdfValue::Record(serde_json::json!({"k": 1})))
    };
    let bare = || ArrayDescriptor::virtual_node(names(&["a", "note"])).unwrap();

    for inputs in [vec![bare(), payload()], vec![payload(), bare()]] {
        let roots = assemble_tree(inputs).unwrap();
        let note = roots[0].child("note").unwrap();
        assert!(!note.is_virtual());
        assert_eq!(
            note.data().and_then(FdfValue::as_record),
            Some(&serde_json::json!({"k": 1}))
        );
    }
}

#[test]
fn test_empty_input_gives_empty_forest() {
    assert!(TreeAssembler::new().is_empty());
    assert!(assemble_tree(Vec::new()).unwrap().is_empty());
}
