use crate::model::{Node, NodeId, Point, Rect};
use crate::tree::FamilyTree;
use crate::viewport::Viewport;

/// Rendered geometry as reported by the drawing surface, in screen pixels.
pub trait GeometryProvider {
    /// Box of a node as last drawn, or `None` when it has not been rendered.
    fn node_box(&self, id: &NodeId) -> Option<Rect>;

    /// Box of the drawing container; its origin anchors the transform.
    fn container_box(&self) -> Rect;

    fn container_origin(&self) -> Point {
        self.container_box().origin()
    }
}

/// Provider for a surface that has not drawn anything yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl GeometryProvider for NoGeometry {
    fn node_box(&self, _id: &NodeId) -> Option<Rect> {
        None
    }

    fn container_box(&self) -> Rect {
        Rect::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// S-curve between two anchors, bending at their vertical midpoint.
    pub fn s_curve(start: Point, end: Point) -> Self {
        let mid_y = (start.y + end.y) / 2.0;
        Self {
            start,
            c1: Point::new(start.x, mid_y),
            c2: Point::new(end.x, mid_y),
            end,
        }
    }

    /// Straight segment drawn with the curve machinery.
    pub fn line(start: Point, end: Point) -> Self {
        let third = Point::new((end.x - start.x) / 3.0, (end.y - start.y) / 3.0);
        Self {
            start,
            c1: start + third,
            c2: end - third,
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x,
            a * self.start.y + b * self.c1.y + c * self.c2.y + d * self.end.y,
        )
    }

    /// Applies `f` to every control point. Exact for affine maps such as the
    /// viewport transform.
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            start: f(self.start),
            c1: f(self.c1),
            c2: f(self.c2),
            end: f(self.end),
        }
    }

    /// De Casteljau split at `t`; the halves trace the same path.
    pub fn split(&self, t: f64) -> (Self, Self) {
        let lerp = |a: Point, b: Point| Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        let ab = lerp(self.start, self.c1);
        let bc = lerp(self.c1, self.c2);
        let cd = lerp(self.c2, self.end);
        let abc = lerp(ab, bc);
        let bcd = lerp(bc, cd);
        let mid = lerp(abc, bcd);
        (
            Self {
                start: self.start,
                c1: ab,
                c2: abc,
                end: mid,
            },
            Self {
                start: mid,
                c1: bcd,
                c2: cd,
                end: self.end,
            },
        )
    }

    /// Box around the control polygon. The curve never leaves it.
    pub fn hull_bounds(&self) -> Rect {
        let xs = [self.start.x, self.c1.x, self.c2.x, self.end.x];
        let ys = [self.start.y, self.c1.y, self.c2.y, self.end.y];
        let left = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let right = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let top = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let bottom = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Rect::new(left, top, right - left, bottom - top)
    }

    /// `segments + 1` points along the curve, endpoints included.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.end.x,
            self.end.y
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub key: String,
    pub parent: NodeId,
    pub child: NodeId,
    pub path: CubicBezier,
    pub color: String,
}

pub fn connector_key(parent: &NodeId, child: &NodeId) -> String {
    format!("{}-{}", parent, child)
}

/// World-space footprint of a node: its stored coordinates when present,
/// otherwise the rendered box projected back through the transform.
pub fn world_box(
    node: &Node,
    viewport: &Viewport,
    geometry: &dyn GeometryProvider,
) -> Option<Rect> {
    node.footprint()
        .or_else(|| rendered_world_box(&node.id, viewport, geometry))
}

pub fn rendered_world_box(
    id: &NodeId,
    viewport: &Viewport,
    geometry: &dyn GeometryProvider,
) -> Option<Rect> {
    let rect = geometry.node_box(id)?;
    Some(viewport.screen_rect_to_world(rect, geometry.container_origin()))
}

fn anchors(
    parent: &Node,
    child: &Node,
    viewport: &Viewport,
    geometry: &dyn GeometryProvider,
) -> Option<(Point, Point)> {
    if let (Some(p), Some(c)) = (parent.footprint(), child.footprint()) {
        return Some((p.bottom_center(), c.top_center()));
    }

    let p = rendered_world_box(&parent.id, viewport, geometry)?;
    let c = rendered_world_box(&child.id, viewport, geometry)?;
    Some((p.bottom_center(), c.top_center()))
}

/// Derives one connector per resolvable parent/child pair.
///
/// Pairs whose parent is missing or whose geometry is not yet available are
/// left out of this pass; they show up again once the data resolves.
pub fn resolve_connectors(
    tree: &FamilyTree,
    viewport: &Viewport,
    geometry: &dyn GeometryProvider,
) -> Vec<Connector> {
    tree.nodes()
        .into_iter()
        .filter_map(|child| {
            let parent = tree.get(child.parent.as_ref()?)?;
            let (start, end) = anchors(parent, child, viewport, geometry)?;
            Some(Connector {
                key: connector_key(&parent.id, &child.id),
                parent: parent.id.clone(),
                child: child.id.clone(),
                path: CubicBezier::s_curve(start, end),
                color: child.color.clone(),
            })
        })
        .collect()
}

/// Rubber-band line from a source node's bottom anchor to the pointer.
pub fn preview_line(
    tree: &FamilyTree,
    source: &NodeId,
    pointer: Point,
    viewport: &Viewport,
    geometry: &dyn GeometryProvider,
) -> Option<(Point, Point)> {
    let node = tree.get(source)?;
    let rect = world_box(node, viewport, geometry)?;
    Some((rect.bottom_center(), pointer))
}
