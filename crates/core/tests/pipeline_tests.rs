use crossbeam_channel::unbounded;
use diskmap_core::human::human_bytes;
use diskmap_core::treemap;
use diskmap_core::{build_tree, display_path, DataSource, LoadMsg, Loader, NodeKind};

fn write_assets(dir: &std::path::Path) {
    std::fs::write(
        dir.join("size_tree.json"),
        r#"{"a": 100, "b": {"c": 50, "d": 0}}"#,
    )
    .expect("write size tree");
    std::fs::write(dir.join("info.json"), r#"{"sep": "/"}"#).expect("write info");
}

#[test]
fn payload_to_laid_out_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_assets(dir.path());

    let (tx, rx) = unbounded();
    Loader::new(DataSource::Local {
        dir: dir.path().to_path_buf(),
    })
    .load(tx);

    let (raw, info) = match rx.recv().expect("terminal message") {
        LoadMsg::Done { raw, info } => (raw, info),
        LoadMsg::Error(e) => panic!("load failed: {e}"),
    };
    assert_eq!(info.sep, "/");

    let tree = build_tree(&raw);

    // d is a zero-size leaf and never becomes a node.
    let root = tree.node(tree.root);
    assert_eq!(root.size, 150);
    assert_eq!(root.children.len(), 2);
    let a = tree.node(root.children[0]);
    let b = tree.node(root.children[1]);
    assert_eq!((a.name.as_str(), a.size, a.kind), ("a", 100, NodeKind::File));
    assert_eq!((b.name.as_str(), b.size, b.kind), ("b", 50, NodeKind::Dir));
    assert_eq!(b.children.len(), 1);
    let c = tree.node(b.children[0]);
    assert_eq!((c.name.as_str(), c.size), ("c", 50));

    let layout = treemap::compute(&tree, 300.0, 200.0);
    let total_area = 300.0 * 200.0;
    assert!((layout.rect(a.id).area() - total_area * 100.0 / 150.0).abs() < 1e-9);
    assert!((layout.rect(b.id).area() - total_area * 50.0 / 150.0).abs() < 1e-9);
    assert_eq!(layout.rect(c.id), layout.rect(b.id));

    assert_eq!(display_path(&tree, c.id, &info.sep), "b/c");
    assert_eq!(human_bytes(c.size), "50 B");
    assert_eq!(human_bytes(root.size), "150 B");
}

#[test]
fn mount_style_payload_collapses_the_leading_separator() {
    let raw: diskmap_core::RawSizeMap =
        serde_json::from_str(r#"{"/": {"usr": 10, "var": 5}}"#).expect("payload");
    let tree = build_tree(&raw);

    let slash = tree.node(tree.root).children[0];
    let usr = tree.node(slash).children[0];
    assert_eq!(display_path(&tree, slash, "/"), "/");
    assert_eq!(display_path(&tree, usr, "/"), "usr");
}
