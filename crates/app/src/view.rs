use diskmap_core::treemap::{Layout, Scale};
use diskmap_core::{display_path, Info, NodeId, Tree};

/// Strip reserved at the top of the canvas for the breadcrumb bar.
pub const HEADER_HEIGHT: f32 = 30.0;
/// At most this many child tiles are drawn per frame; the header bar is
/// always drawn on top of that.
pub const MAX_TILES: usize = 1000;

const ZOOM_IN_SECS: f64 = 0.75;
const ZOOM_OUT_SECS: f64 = 0.5;

/// Screen-space rectangle, in egui points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PxRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PxRect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        PxRect { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    fn lerp(a: PxRect, b: PxRect, t: f32) -> PxRect {
        let l = |a: f32, b: f32| a + (b - a) * t;
        PxRect::new(l(a.x0, b.x0), l(a.y0, b.y0), l(a.x1, b.x1), l(a.y1, b.y1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TileKind {
    /// Breadcrumb bar for the group's root; click zooms out.
    Header,
    /// Direct child of the group's root; click zooms in when it has children.
    Cell,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub id: NodeId,
    pub kind: TileKind,
    pub rect: PxRect,
    pub clickable: bool,
}

/// One view group: the tiles of a single root, drawn at one opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupPlan {
    pub alpha: f32,
    pub interactive: bool,
    pub tiles: Vec<Tile>,
}

/// Everything one frame draws, bottom group first.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub groups: Vec<GroupPlan>,
    pub animating: bool,
}

#[derive(Clone, Copy)]
enum ZoomKind {
    In,
    Out,
}

#[derive(Clone, Copy)]
struct Transition {
    kind: ZoomKind,
    from: NodeId,
    to: NodeId,
    started: f64,
    duration: f64,
}

/// Zoomable treemap view: a settled root plus at most one live transition.
/// Layout geometry is frozen at load time; only the pixel ranges follow the
/// live canvas, so the window can resize without re-tiling.
pub struct TreemapView {
    tree: Tree,
    layout: Layout,
    info: Info,
    root: NodeId,
    transition: Option<Transition>,
}

impl TreemapView {
    pub fn new(tree: Tree, layout: Layout, info: Info) -> Self {
        let root = tree.root;
        Self {
            tree,
            layout,
            info,
            root,
            transition: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn current_root(&self) -> NodeId {
        self.root
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn path_of(&self, id: NodeId) -> String {
        display_path(&self.tree, id, &self.info.sep)
    }

    /// Re-root at a direct child of the current root. Ignored while a
    /// transition is live, and for nodes without children.
    pub fn zoom_in(&mut self, id: NodeId, now: f64) {
        if self.transition.is_some() {
            return;
        }
        let node = self.tree.node(id);
        if node.parent != Some(self.root) || node.children.is_empty() {
            return;
        }
        tracing::debug!(node = %node.name, "zoom in");
        self.transition = Some(Transition {
            kind: ZoomKind::In,
            from: self.root,
            to: id,
            started: now,
            duration: ZOOM_IN_SECS,
        });
    }

    /// Re-root at the current root's parent. Ignored while a transition is
    /// live and at the absolute root.
    pub fn zoom_out(&mut self, now: f64) {
        if self.transition.is_some() {
            return;
        }
        let Some(parent) = self.tree.node(self.root).parent else {
            return;
        };
        tracing::debug!(node = %self.tree.node(self.root).name, "zoom out");
        self.transition = Some(Transition {
            kind: ZoomKind::Out,
            from: self.root,
            to: parent,
            started: now,
            duration: ZOOM_OUT_SECS,
        });
    }

    /// Plan one frame for the given canvas. Finalizes a transition whose time
    /// is up, so the caller only ever sees settled or mid-flight geometry.
    pub fn plan(&mut self, now: f64, canvas: PxRect) -> FramePlan {
        let header = PxRect::new(canvas.x0, canvas.y0, canvas.x1, canvas.y0 + HEADER_HEIGHT);
        let map = PxRect::new(canvas.x0, canvas.y0 + HEADER_HEIGHT, canvas.x1, canvas.y1);

        match self.advance(now) {
            None => FramePlan {
                groups: vec![self.group(self.root, self.root, self.root, 0.0, 1.0, true, map, header)],
                animating: false,
            },
            Some((tr, eased)) => {
                let groups = match tr.kind {
                    // New group fades in on top while the old one fades away.
                    ZoomKind::In => vec![
                        self.group(tr.from, tr.from, tr.to, eased, 1.0 - eased, false, map, header),
                        self.group(tr.to, tr.from, tr.to, eased, eased, false, map, header),
                    ],
                    // New group sits beneath at full opacity; the old one
                    // fades out above it.
                    ZoomKind::Out => vec![
                        self.group(tr.to, tr.from, tr.to, eased, 1.0, false, map, header),
                        self.group(tr.from, tr.from, tr.to, eased, 1.0 - eased, false, map, header),
                    ],
                };
                FramePlan {
                    groups,
                    animating: true,
                }
            }
        }
    }

    fn advance(&mut self, now: f64) -> Option<(Transition, f32)> {
        let tr = self.transition?;
        let t = ((now - tr.started) / tr.duration).clamp(0.0, 1.0);
        if t >= 1.0 {
            self.root = tr.to;
            self.transition = None;
            return None;
        }
        Some((tr, ease_cubic_in_out(t) as f32))
    }

    /// Tiles for `render_root`'s children plus its header bar, positioned by
    /// interpolating between the pixel mappings under the `dom_from` and
    /// `dom_to` scale domains.
    #[allow(clippy::too_many_arguments)]
    fn group(
        &self,
        render_root: NodeId,
        dom_from: NodeId,
        dom_to: NodeId,
        t: f32,
        alpha: f32,
        interactive: bool,
        map: PxRect,
        header: PxRect,
    ) -> GroupPlan {
        let from = self.scales(dom_from, map);
        let to = self.scales(dom_to, map);

        let children = &self.tree.node(render_root).children;
        let mut tiles = Vec::with_capacity(children.len().min(MAX_TILES) + 1);
        for &child in children.iter().take(MAX_TILES) {
            let px = PxRect::lerp(self.project(child, &from), self.project(child, &to), t);
            if px.width() <= 1.0 || px.height() <= 1.0 {
                continue;
            }
            let has_children = !self.tree.node(child).children.is_empty();
            tiles.push(Tile {
                id: child,
                kind: TileKind::Cell,
                rect: px,
                clickable: interactive && has_children,
            });
        }
        tiles.push(Tile {
            id: render_root,
            kind: TileKind::Header,
            rect: header,
            clickable: interactive && self.tree.node(render_root).parent.is_some(),
        });

        GroupPlan {
            alpha,
            interactive,
            tiles,
        }
    }

    fn scales(&self, domain_root: NodeId, map: PxRect) -> (Scale, Scale) {
        let d = self.layout.rect(domain_root);
        (
            Scale::new((d.x0, d.x1), (map.x0 as f64, map.x1 as f64)),
            Scale::new((d.y0, d.y1), (map.y0 as f64, map.y1 as f64)),
        )
    }

    fn project(&self, id: NodeId, (x, y): &(Scale, Scale)) -> PxRect {
        let r = self.layout.rect(id);
        PxRect::new(
            x.map(r.x0) as f32,
            y.map(r.y0) as f32,
            x.map(r.x1) as f32,
            y.map(r.y1) as f32,
        )
    }
}

fn ease_cubic_in_out(mut t: f64) -> f64 {
    t *= 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        t -= 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
