use crate::model::{NodeId, Tree};

/// Rectangle bounds in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: 0.0,
        y1: 0.0,
    };

    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Linear domain→range mapping with rounded output, the rounded pixel scale
/// the viewer drives zooming with. A collapsed domain maps everything to the
/// range start instead of dividing by zero.
#[derive(Clone, Copy, Debug)]
pub struct Scale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl Scale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Scale { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        let t = (v - self.domain.0) / span;
        (self.range.0 + t * (self.range.1 - self.range.0)).round()
    }
}

/// Rectangle geometry for a whole tree, parallel to the node arena, in the
/// coordinate space of the reference viewport captured at layout time.
#[derive(Clone, Debug)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    rects: Vec<Rect>,
}

impl Layout {
    pub fn rect(&self, id: NodeId) -> Rect {
        self.rects[id.index()]
    }
}

/// Lay out the whole tree. The root covers `[0,width]×[0,height]`; every
/// child list is tiled by binary partition against the full reference
/// rectangle and then rescaled into its parent's actual bounds, so aspect
/// ratios stay viewport-shaped at any depth.
pub fn compute(tree: &Tree, width: f64, height: f64) -> Layout {
    let mut rects = vec![Rect::ZERO; tree.len()];
    rects[tree.root.index()] = Rect::new(0.0, 0.0, width, height);
    layout_children(tree, tree.root, width, height, &mut rects);
    tracing::debug!(nodes = tree.len(), width, height, "treemap layout computed");
    Layout {
        width,
        height,
        rects,
    }
}

fn layout_children(tree: &Tree, parent: NodeId, width: f64, height: f64, rects: &mut [Rect]) {
    let children = &tree.node(parent).children;
    if children.is_empty() {
        return;
    }

    let values: Vec<f64> = children.iter().map(|id| tree.node(*id).size as f64).collect();
    let mut cells = vec![Rect::ZERO; children.len()];
    binary_tile(&values, Rect::new(0.0, 0.0, width, height), &mut cells);

    let target = rects[parent.index()];
    for (child, cell) in children.iter().zip(cells) {
        rects[child.index()] = Rect::new(
            target.x0 + cell.x0 / width * target.width(),
            target.y0 + cell.y0 / height * target.height(),
            target.x0 + cell.x1 / width * target.width(),
            target.y0 + cell.y1 / height * target.height(),
        );
        layout_children(tree, *child, width, height, rects);
    }
}

/// Binary-partition tiling: split the value run near its weighted midpoint
/// and slice the rectangle along its longer axis, recursing into both halves.
/// Values must already be in render order.
pub fn binary_tile(values: &[f64], rect: Rect, out: &mut [Rect]) {
    debug_assert_eq!(values.len(), out.len());
    if values.is_empty() {
        return;
    }
    let mut sums = Vec::with_capacity(values.len() + 1);
    let mut total = 0.0;
    sums.push(0.0);
    for v in values {
        total += v;
        sums.push(total);
    }
    partition(&sums, 0, values.len(), total, rect, out);
}

fn partition(sums: &[f64], lo: usize, hi: usize, value: f64, rect: Rect, out: &mut [Rect]) {
    if lo + 1 >= hi {
        out[lo] = rect;
        return;
    }

    // Binary-search the prefix sums for the value midpoint, then nudge down
    // one slot when that lands closer to the target.
    let offset = sums[lo];
    let target = value / 2.0 + offset;
    let mut k = lo + 1;
    let mut top = hi - 1;
    while k < top {
        let mid = (k + top) >> 1;
        if sums[mid] < target {
            k = mid + 1;
        } else {
            top = mid;
        }
    }
    if (target - sums[k - 1]) < (sums[k] - target) && lo + 1 < k {
        k -= 1;
    }

    let left = sums[k] - offset;
    let right = value - left;
    let Rect { x0, y0, x1, y1 } = rect;

    if (x1 - x0) > (y1 - y0) {
        // A zero total cannot place a weighted split; collapse the right half.
        let xk = if value > 0.0 {
            (x0 * right + x1 * left) / value
        } else {
            x1
        };
        partition(sums, lo, k, left, Rect::new(x0, y0, xk, y1), out);
        partition(sums, k, hi, right, Rect::new(xk, y0, x1, y1), out);
    } else {
        let yk = if value > 0.0 {
            (y0 * right + y1 * left) / value
        } else {
            y1
        };
        partition(sums, lo, k, left, Rect::new(x0, y0, x1, yk), out);
        partition(sums, k, hi, right, Rect::new(x0, yk, x1, y1), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    const EPS: f64 = 1e-9;

    fn tiles(values: &[f64], rect: Rect) -> Vec<Rect> {
        let mut out = vec![Rect::ZERO; values.len()];
        binary_tile(values, rect, &mut out);
        out
    }

    fn overlap(a: Rect, b: Rect) -> f64 {
        let w = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
        let h = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
        w * h
    }

    #[test]
    fn equal_pair_splits_along_the_longer_axis() {
        let out = tiles(&[1.0, 1.0], Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(out[0], Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(out[1], Rect::new(50.0, 0.0, 100.0, 50.0));

        let out = tiles(&[1.0, 1.0], Rect::new(0.0, 0.0, 50.0, 100.0));
        assert_eq!(out[0], Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(out[1], Rect::new(0.0, 50.0, 50.0, 100.0));
    }

    #[test]
    fn single_value_fills_the_rectangle() {
        let out = tiles(&[42.0], Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(out[0], Rect::new(10.0, 20.0, 110.0, 70.0));
    }

    #[test]
    fn areas_are_value_proportional_with_no_gaps_or_overlap() {
        let values = [500.0, 300.0, 120.0, 60.0, 15.0, 5.0];
        let rect = Rect::new(0.0, 0.0, 640.0, 480.0);
        let out = tiles(&values, rect);

        let total: f64 = values.iter().sum();
        for (v, r) in values.iter().zip(&out) {
            let expected = v / total * rect.area();
            assert!((r.area() - expected).abs() < 1e-6, "{v}: {}", r.area());
            assert!(r.x0 >= -EPS && r.y0 >= -EPS && r.x1 <= 640.0 + EPS && r.y1 <= 480.0 + EPS);
        }
        for i in 0..out.len() {
            for j in i + 1..out.len() {
                assert!(overlap(out[i], out[j]) < 1e-6, "tiles {i} and {j} overlap");
            }
        }
    }

    #[test]
    fn zero_total_degenerates_without_nan() {
        let out = tiles(&[0.0, 0.0, 0.0], Rect::new(0.0, 0.0, 100.0, 100.0));
        for r in out {
            assert!(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite());
        }
    }

    #[test]
    fn children_tile_their_parent_exactly() {
        let raw = serde_json::from_str(
            r#"{"a": 100, "b": {"c": 30, "d": 20, "e": {"f": 10}}, "g": 40}"#,
        )
        .expect("payload");
        let tree = build_tree(&raw);
        let layout = compute(&tree, 800.0, 600.0);

        assert_eq!(layout.rect(tree.root), Rect::new(0.0, 0.0, 800.0, 600.0));
        for node in &tree.nodes {
            if node.children.is_empty() {
                continue;
            }
            let parent_rect = layout.rect(node.id);
            let child_area: f64 = node.children.iter().map(|c| layout.rect(*c).area()).sum();
            assert!(
                (child_area - parent_rect.area()).abs() < 1e-6,
                "children of {} leave gaps",
                node.name
            );
            for (i, a) in node.children.iter().enumerate() {
                for b in &node.children[i + 1..] {
                    assert!(overlap(layout.rect(*a), layout.rect(*b)) < 1e-6);
                }
            }
        }
    }

    #[test]
    fn nested_sizes_share_the_viewport_by_value() {
        let raw = serde_json::from_str(r#"{"a": 100, "b": {"c": 50, "d": 0}}"#).expect("payload");
        let tree = build_tree(&raw);
        let layout = compute(&tree, 300.0, 200.0);

        let a = tree.node(tree.root).children[0];
        let b = tree.node(tree.root).children[1];
        assert_eq!(tree.node(a).name, "a");
        assert!((layout.rect(a).area() - 40_000.0).abs() < EPS);
        assert!((layout.rect(b).area() - 20_000.0).abs() < EPS);

        // The lone grandchild gets all of b's rectangle.
        let c = tree.node(b).children[0];
        assert_eq!(layout.rect(c), layout.rect(b));
    }

    #[test]
    fn scale_maps_domain_to_rounded_range() {
        let x = Scale::new((0.0, 300.0), (0.0, 1000.0));
        assert_eq!(x.map(0.0), 0.0);
        assert_eq!(x.map(300.0), 1000.0);
        assert_eq!(x.map(100.0), 333.0);

        let collapsed = Scale::new((5.0, 5.0), (10.0, 20.0));
        assert_eq!(collapsed.map(5.0), 10.0);
    }
}
