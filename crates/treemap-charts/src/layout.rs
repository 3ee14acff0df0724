//! Squarified treemap layout with inner padding.
//!
//! Rows are grown while the worst aspect ratio does not get worse, against a
//! golden-ratio target (Bruls, Huizing & van Wijk). Every node is inset by half
//! the inner padding and every parent grows its tiling box by the same amount,
//! so siblings end up exactly `padding_inner` apart while the outermost tiles
//! still touch the canvas edge.

use crate::hierarchy::{Hierarchy, NodeId};
use treemap_common::Point;
use treemap_config::LayoutConfig;

/// Target aspect ratio of squarified rows.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Canvas size and padding of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Gap between siblings.
    pub padding_inner: f64,
}

impl From<&LayoutConfig> for LayoutOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            width: f64::from(config.width),
            height: f64::from(config.height),
            padding_inner: config.padding_inner,
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

/// A positioned box, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    /// Left edge.
    pub x0: f64,
    /// Top edge.
    pub y0: f64,
    /// Right edge.
    pub x1: f64,
    /// Bottom edge.
    pub y1: f64,
}

impl LayoutRect {
    /// Creates a rect from its edges.
    #[must_use]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Half-open containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x < self.x1 && p.y >= self.y0 && p.y < self.y1
    }

    /// Shrinks every side by `p`, collapsing to the centre line if it inverts.
    fn inset(self, p: f64) -> Self {
        let (mut x0, mut y0, mut x1, mut y1) = (self.x0 + p, self.y0 + p, self.x1 - p, self.y1 - p);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Self { x0, y0, x1, y1 }
    }
}

/// Rects of every node of a hierarchy after layout.
#[derive(Debug, Clone)]
pub struct Treemap {
    rects: Vec<LayoutRect>,
    leaves: Vec<NodeId>,
    options: LayoutOptions,
}

impl Treemap {
    /// Lays the hierarchy out on the canvas described by `options`.
    #[must_use]
    pub fn layout(hierarchy: &Hierarchy, options: LayoutOptions) -> Self {
        let mut rects = vec![LayoutRect::default(); hierarchy.len()];
        rects[Hierarchy::ROOT.0] = LayoutRect::new(0.0, 0.0, options.width, options.height);
        let half = options.padding_inner / 2.0;

        // pre-order: a parent tiles its children before they are visited
        for id in hierarchy.pre_order() {
            let node = &hierarchy[id];
            let inset = if node.depth == 0 { 0.0 } else { half };
            let rect = rects[id.0].inset(inset);
            rects[id.0] = rect;

            if !node.is_leaf() {
                let area = rect.inset(-half);
                let values: Vec<f64> = node.children.iter().map(|c| hierarchy[*c].value).collect();
                let boxes = squarify(&values, node.value, area);
                for (child, b) in node.children.iter().zip(boxes) {
                    rects[child.0] = b;
                }
            }
        }

        tracing::debug!(
            nodes = hierarchy.len(),
            width = options.width,
            height = options.height,
            "Treemap layout computed"
        );

        Self {
            rects,
            leaves: hierarchy.leaves(),
            options,
        }
    }

    /// Rect of a node.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> LayoutRect {
        self.rects[id.0]
    }

    /// Leaves in pre-order.
    #[must_use]
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Options the layout was computed with.
    #[must_use]
    pub const fn options(&self) -> LayoutOptions {
        self.options
    }

    /// The leaf under a canvas point, if any. Points in padding gaps hit nothing.
    #[must_use]
    pub fn leaf_at(&self, p: Point) -> Option<NodeId> {
        self.leaves
            .iter()
            .copied()
            .find(|id| self.rects[id.0].contains(p))
    }
}

/// Tiles `values` (already sorted descending) into `area` by squarified rows.
///
/// Leading zero values are absorbed into the following row. Returns one rect
/// per input value, in input order.
fn squarify(values: &[f64], total: f64, area: LayoutRect) -> Vec<LayoutRect> {
    let mut out = vec![LayoutRect::default(); values.len()];
    let n = values.len();
    let LayoutRect {
        mut x0,
        mut y0,
        x1,
        y1,
    } = area;
    let mut remaining = total;
    let mut i0 = 0;
    let mut i1 = 0;

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        let mut row_sum;
        loop {
            row_sum = values[i1];
            i1 += 1;
            if row_sum != 0.0 || i1 >= n {
                break;
            }
        }
        let mut row_min = row_sum;
        let mut row_max = row_sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * GOLDEN_RATIO);
        let mut beta = row_sum * row_sum * alpha;
        let mut min_ratio = worst_ratio(row_min, row_max, beta);

        while i1 < n {
            let v = values[i1];
            row_sum += v;
            row_min = row_min.min(v);
            row_max = row_max.max(v);
            beta = row_sum * row_sum * alpha;
            let ratio = worst_ratio(row_min, row_max, beta);
            if ratio > min_ratio {
                row_sum -= v;
                break;
            }
            min_ratio = ratio;
            i1 += 1;
        }

        let row = i0..i1;
        if dx < dy {
            let y_end = if remaining == 0.0 {
                y1
            } else {
                y0 + dy * row_sum / remaining
            };
            layout_row(&values[row.clone()], row_sum, true, LayoutRect::new(x0, y0, x1, y_end), &mut out[row]);
            if remaining != 0.0 {
                y0 = y_end;
            }
        } else {
            let x_end = if remaining == 0.0 {
                x1
            } else {
                x0 + dx * row_sum / remaining
            };
            layout_row(&values[row.clone()], row_sum, false, LayoutRect::new(x0, y0, x_end, y1), &mut out[row]);
            if remaining != 0.0 {
                x0 = x_end;
            }
        }

        remaining -= row_sum;
        i0 = i1;
    }

    out
}

/// Worst aspect ratio of a row given its extreme values and scaled square sum.
fn worst_ratio(min: f64, max: f64, beta: f64) -> f64 {
    (max / beta).max(beta / min)
}

/// Places one row. Horizontal rows split their box left to right, vertical rows top to bottom.
fn layout_row(values: &[f64], row_sum: f64, horizontal: bool, bounds: LayoutRect, out: &mut [LayoutRect]) {
    if horizontal {
        let k = if row_sum == 0.0 { 0.0 } else { bounds.width() / row_sum };
        let mut x = bounds.x0;
        for (v, slot) in values.iter().zip(out.iter_mut()) {
            let next = x + v * k;
            *slot = LayoutRect::new(x, bounds.y0, next, bounds.y1);
            x = next;
        }
    } else {
        let k = if row_sum == 0.0 { 0.0 } else { bounds.height() / row_sum };
        let mut y = bounds.y0;
        for (v, slot) in values.iter().zip(out.iter_mut()) {
            let next = y + v * k;
            *slot = LayoutRect::new(bounds.x0, y, bounds.x1, next);
            y = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemap_common::test_utils::{assert_approx_eq, dataset_fixtures};

    fn unpadded(width: f64, height: f64) -> LayoutOptions {
        LayoutOptions {
            width,
            height,
            padding_inner: 0.0,
        }
    }

    #[test]
    fn test_single_value_fills_area() {
        let rects = squarify(&[5.0], 5.0, LayoutRect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rects, vec![LayoutRect::new(0.0, 0.0, 100.0, 50.0)]);
    }

    #[test]
    fn test_squarify_preserves_total_area() {
        let values = [400.0, 300.0, 200.0, 100.0];
        let rects = squarify(&values, 1000.0, LayoutRect::new(0.0, 0.0, 50.0, 20.0));
        let total: f64 = rects.iter().map(LayoutRect::area).sum();
        assert_approx_eq(total, 1000.0, 1e-9);
        for (v, r) in values.iter().zip(&rects) {
            assert_approx_eq(r.area(), *v, 1e-9);
        }
    }

    #[test]
    fn test_leading_zero_values_join_the_next_row() {
        let rects = squarify(&[0.0, 0.0, 10.0], 10.0, LayoutRect::new(0.0, 0.0, 10.0, 10.0));
        assert_approx_eq(rects[2].area(), 100.0, 1e-9);
        assert_approx_eq(rects[0].area(), 0.0, 1e-9);
    }

    #[test]
    fn test_all_zero_values_collapse_without_nan() {
        let rects = squarify(&[0.0, 0.0], 0.0, LayoutRect::new(0.0, 0.0, 10.0, 20.0));
        for r in rects {
            assert!(r.x0.is_finite() && r.x1.is_finite() && r.y0.is_finite() && r.y1.is_finite());
            assert_approx_eq(r.area(), 0.0, 1e-9);
        }
    }

    #[test]
    fn test_leaf_areas_are_proportional_without_padding() {
        let h = Hierarchy::from_json("games", dataset_fixtures::games_json().as_bytes()).unwrap();
        let t = Treemap::layout(&h, unpadded(1100.0, 520.0));
        let canvas = 1100.0 * 520.0;
        for id in t.leaves() {
            let expected = h[*id].value / h.root().value * canvas;
            assert_approx_eq(t.rect(*id).area(), expected, 1e-6);
        }
    }

    #[test]
    fn test_padded_leaves_stay_in_bounds_and_do_not_overlap() {
        let h = Hierarchy::from_json("movies", dataset_fixtures::movies_json().as_bytes()).unwrap();
        let t = Treemap::layout(&h, LayoutOptions::default());
        let rects: Vec<LayoutRect> = t.leaves().iter().map(|id| t.rect(*id)).collect();

        for r in &rects {
            assert!(r.x0 >= -1e-9 && r.y0 >= -1e-9);
            assert!(r.x1 <= 1100.0 + 1e-9 && r.y1 <= 520.0 + 1e-9);
            assert!(r.x0 <= r.x1 && r.y0 <= r.y1);
        }
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let overlap_w = a.x1.min(b.x1) - a.x0.max(b.x0);
                let overlap_h = a.y1.min(b.y1) - a.y0.max(b.y0);
                assert!(overlap_w <= 1e-9 || overlap_h <= 1e-9, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_leaf_at_hits_tiles_and_misses_gaps() {
        let h = Hierarchy::from_json("games", dataset_fixtures::games_json().as_bytes()).unwrap();
        let t = Treemap::layout(&h, LayoutOptions::default());
        let first = t.leaves()[0];
        assert_eq!(t.leaf_at(t.rect(first).center()), Some(first));
        assert_eq!(t.leaf_at(Point::new(-5.0, -5.0)), None);
    }
}
