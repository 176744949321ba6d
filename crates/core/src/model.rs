use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Nested size map exactly as the backend serves it. Entry order is the
/// backend's order, which normalization must preserve for tie-breaking.
pub type RawSizeMap = IndexMap<String, RawEntry>;

/// One value in a [`RawSizeMap`]: a leaf byte count or a nested directory.
/// Anything else in the payload fails to decode instead of being guessed at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Size(u64),
    Dir(RawSizeMap),
}

/// Sidecar metadata served next to the size tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// Path separator used when joining ancestor names for display.
    pub sep: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Dir,
}

/// Normalized tree node. Files carry their payload size; directories carry the
/// sum of descendant file sizes. `children` is empty for files and for empty
/// directories alike; `kind` tells them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub kind: NodeKind,
    pub size: u128,
    pub children: Vec<NodeId>,
    pub depth: u16,
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Dir)
    }
}

/// Arena tree: nodes indexed by `NodeId`, root first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub root: NodeId,
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
