#![allow(missing_docs)]

use fieldmap::{Mapper, Record};

#[derive(Clone, Default, Record)]
struct Src {
    #[map("path=b,c")]
    a: i64,
    #[map("path=b,a;negate")]
    c: bool,
    #[map("top")]
    top: u8,
}

#[derive(Clone, Default, Record)]
struct Leafs {
    a: bool,
    c: i64,
}

#[derive(Clone, Default, Record)]
struct Dst {
    b: Leafs,
    top: u8,
}

#[test]
fn test_report_layout() -> fieldmap::Result<()> {
    let mapper = Mapper::builder().transform("negate", |b: &bool| !b).build();
    let report = mapper.decoder::<Src, Dst>()?.inspect();

    assert_eq!(report.source_type, "Src");
    assert_eq!(report.destination_type, "Dst");
    assert_eq!(report.node_count, 2);
    assert_eq!(report.leaf_count, 3);

    let root = &report.tree.root;
    assert_eq!(root.leaves.len(), 1);
    assert_eq!(root.leaves[0].source_field, "top");
    assert_eq!(root.children.len(), 1);

    let b = &root.children[0];
    assert_eq!(b.destination_field.as_deref(), Some("b"));
    let negated = b
        .leaves
        .iter()
        .find(|l| l.source_field == "c")
        .expect("leaf for c");
    assert_eq!(negated.path, vec!["b", "a"]);
    assert_eq!(negated.transform.as_deref(), Some("negate"));
    Ok(())
}

#[test]
fn test_report_renders_and_serializes() -> fieldmap::Result<()> {
    let mapper = Mapper::builder().transform("negate", |b: &bool| !b).build();
    let report = mapper.decoder::<Src, Dst>()?.inspect();

    let text = report.to_string();
    assert!(text.contains("=== FIELDMAP DECODER REPORT ==="));
    assert!(text.contains("Src -> Dst"));
    assert!(text.contains("c -> a via negate"));

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["node_count"], 2);
    assert_eq!(json["tree"]["root"]["children"][0]["destination_field"], "b");
    Ok(())
}
