use crate::model::*;

/// Normalize a raw size map into the arena tree rooted at a synthetic
/// unnamed directory.
///
/// Zero-size files are dropped; empty directories are kept as childless `Dir`
/// nodes. Directory sizes are the sum of descendant file sizes, and every
/// node's children end up sorted largest first, equal sizes keeping the
/// payload's entry order.
pub fn build_tree(raw: &RawSizeMap) -> Tree {
    let mut nodes: Vec<Node> = Vec::with_capacity(raw.len() + 1);
    let root = NodeId(0);
    nodes.push(Node {
        id: root,
        parent: None,
        name: String::new(),
        kind: NodeKind::Dir,
        size: 0,
        children: Vec::new(),
        depth: 0,
    });

    fn add_entries(
        entries: &RawSizeMap,
        parent: NodeId,
        depth: u16,
        nodes: &mut Vec<Node>,
    ) -> u128 {
        let mut total: u128 = 0;
        for (name, entry) in entries {
            match entry {
                RawEntry::Size(0) => {}
                RawEntry::Size(bytes) => {
                    let id = NodeId(nodes.len() as u64);
                    nodes.push(Node {
                        id,
                        parent: Some(parent),
                        name: name.clone(),
                        kind: NodeKind::File,
                        size: u128::from(*bytes),
                        children: Vec::new(),
                        depth,
                    });
                    nodes[parent.index()].children.push(id);
                    total = total.saturating_add(u128::from(*bytes));
                }
                RawEntry::Dir(nested) => {
                    let id = NodeId(nodes.len() as u64);
                    nodes.push(Node {
                        id,
                        parent: Some(parent),
                        name: name.clone(),
                        kind: NodeKind::Dir,
                        size: 0,
                        children: Vec::new(),
                        depth,
                    });
                    nodes[parent.index()].children.push(id);
                    let sum = add_entries(nested, id, depth + 1, nodes);
                    nodes[id.index()].size = sum;
                    total = total.saturating_add(sum);
                }
            }
        }
        total
    }

    let total = add_entries(raw, root, 1, &mut nodes);
    nodes[root.index()].size = total;

    // Largest first at every level; sort_by is stable so equal sizes keep
    // their payload order.
    for i in 0..nodes.len() {
        let mut children = std::mem::take(&mut nodes[i].children);
        children.sort_by(|a, b| nodes[b.index()].size.cmp(&nodes[a.index()].size));
        nodes[i].children = children;
    }

    Tree { root, nodes }
}

/// Full display path of a node: ancestor names from the root down, joined by
/// the separator. The root's empty name is dropped, and a first segment that
/// is itself the separator (a mount-style root entry) is dropped too unless it
/// is the whole path.
pub fn display_path(tree: &Tree, id: NodeId, sep: &str) -> String {
    let mut names: Vec<&str> = Vec::new();
    let mut cursor = Some(id);
    while let Some(node_id) = cursor {
        let node = tree.node(node_id);
        if !node.name.is_empty() {
            names.push(node.name.as_str());
        }
        cursor = node.parent;
    }
    names.reverse();
    if names.len() > 1 && names[0] == sep {
        names.remove(0);
    }
    names.join(sep)
}
