use crate::model::*;
use crate::tree::display_path;
use crate::treemap::Layout;

pub fn to_csv(tree: &Tree, layout: &Layout, sep: &str, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer
        .write_record(["path", "name", "kind", "depth", "size", "x0", "y0", "x1", "y1"])
        .ok();
    for n in &tree.nodes {
        let kind: String = match n.kind {
            NodeKind::File => "file",
            NodeKind::Dir => "dir",
        }
        .to_string();
        let r = layout.rect(n.id);
        writer.write_record([
            display_path(tree, n.id, sep),
            n.name.clone(),
            kind,
            n.depth.to_string(),
            n.size.to_string(),
            r.x0.to_string(),
            r.y0.to_string(),
            r.x1.to_string(),
            r.y1.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(tree: &Tree, layout: &Layout, sep: &str) -> serde_json::Value {
    serde_json::json!({
        "sep": sep,
        "width": layout.width,
        "height": layout.height,
        "root": tree.root.0,
        "nodes": tree.nodes.iter().map(|n| {
            let r = layout.rect(n.id);
            serde_json::json!({
                "id": n.id.0,
                "parent": n.parent.as_ref().map(|p| p.0),
                "path": display_path(tree, n.id, sep),
                "name": n.name,
                "kind": match n.kind { NodeKind::File => "file", NodeKind::Dir => "dir" },
                "depth": n.depth,
                "size": n.size,
                "children": n.children.iter().map(|c| c.0).collect::<Vec<_>>(),
                "x0": r.x0, "y0": r.y0, "x1": r.x1, "y1": r.y1
            })
        }).collect::<Vec<_>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use crate::treemap;

    fn fixture() -> (Tree, Layout) {
        let raw = serde_json::from_str(r#"{"a": 100, "b": {"c": 50, "d": 0}}"#).unwrap();
        let tree = build_tree(&raw);
        let layout = treemap::compute(&tree, 300.0, 200.0);
        (tree, layout)
    }

    #[test]
    fn csv_lists_every_node_with_geometry() {
        let (tree, layout) = fixture();
        let mut buf = Vec::new();
        to_csv(&tree, &layout, "/", &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "path,name,kind,depth,size,x0,y0,x1,y1"
        );
        assert_eq!(lines.count(), tree.len());
        assert!(text.contains("b/c,c,file,2,50,200,0,300,200"));
    }

    #[test]
    fn json_carries_layout_dimensions_and_paths() {
        let (tree, layout) = fixture();
        let v = to_json(&tree, &layout, "/");

        assert_eq!(v["sep"], "/");
        assert_eq!(v["width"], 300.0);
        assert_eq!(v["height"], 200.0);
        let nodes = v["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), tree.len());
        let c = nodes.iter().find(|n| n["name"] == "c").unwrap();
        assert_eq!(c["path"], "b/c");
        assert_eq!(c["kind"], "file");
        assert_eq!(c["x0"], 200.0);
    }
}
