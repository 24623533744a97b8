use crate::connectors::GeometryProvider;
use crate::interaction::HitTarget;
use crate::model::{NodeId, Point, Rect, NODE_HEIGHT, NODE_WIDTH};
use crate::tree::FamilyTree;
use crate::viewport::Viewport;
use std::collections::HashMap;

// Cell coordinates are clamped to this range so box arithmetic stays in i32.
const MAX_CELL_COORD: f64 = 1_000_000.0;

// Nodes without stored coordinates are stacked down the left edge.
const FLOW_MARGIN_CELLS: f64 = 1.0;
const FLOW_GAP_CELLS: f64 = 1.0;

/// Size of one terminal cell in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the cell at (`column`, `row`), in pixels.
    pub fn cell_center(&self, column: u16, row: u16) -> Point {
        Point::new(
            (column as f64 + 0.5) * self.width,
            (row as f64 + 0.5) * self.height,
        )
    }

    /// Pixel box of a cell rectangle.
    pub fn to_pixels(&self, cells: CellRect) -> Rect {
        Rect::new(
            cells.x as f64 * self.width,
            cells.y as f64 * self.height,
            cells.width as f64 * self.width,
            cells.height as f64 * self.height,
        )
    }
}

/// Cell-aligned box; may extend past the visible area, hence signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn intersects(&self, other: &CellRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, column: i32, row: i32) -> bool {
        column >= self.x && column < self.right() && row >= self.y && row < self.bottom()
    }

    /// Column of the delete glyph on the top border.
    pub fn delete_column(&self) -> i32 {
        self.right().saturating_sub(2)
    }

    /// Column of the connect handle on the bottom border.
    pub fn handle_column(&self) -> i32 {
        self.x.saturating_add(self.width / 2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: NodeId,
    pub cells: CellRect,
    /// Rendered box in screen pixels (the cell box scaled up).
    pub bounds: Rect,
}

/// Where everything landed on the last drawn frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub cell: CellSize,
    pub container: Rect,
    /// Draw order; later entries are on top.
    pub nodes: Vec<NodeLayout>,
    index: HashMap<NodeId, usize>,
}

impl FrameLayout {
    pub fn empty(cell: CellSize) -> Self {
        Self {
            cell,
            container: Rect::default(),
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn compute(
        tree: &FamilyTree,
        viewport: &Viewport,
        container: CellRect,
        cell: CellSize,
    ) -> Self {
        let container_px = cell.to_pixels(container);
        let origin = container_px.origin();
        let mut layout = Self::empty(cell);
        layout.container = container_px;

        let flow_size = Rect::new(0.0, 0.0, NODE_WIDTH, NODE_HEIGHT);
        let mut flow_top = container_px.top + FLOW_MARGIN_CELLS * cell.height;

        for node in tree.nodes() {
            let screen = match node.footprint() {
                Some(world) => viewport.world_rect_to_screen(world, origin),
                None => {
                    let rect = Rect::new(
                        container_px.left + FLOW_MARGIN_CELLS * cell.width,
                        flow_top,
                        flow_size.width,
                        flow_size.height,
                    );
                    flow_top += flow_size.height + FLOW_GAP_CELLS * cell.height;
                    rect
                }
            };

            let cells = snap_to_cells(screen, cell);
            layout.index.insert(node.id.clone(), layout.nodes.len());
            layout.nodes.push(NodeLayout {
                id: node.id.clone(),
                cells,
                bounds: cell.to_pixels(cells),
            });
        }

        layout
    }

    pub fn get(&self, id: &NodeId) -> Option<&NodeLayout> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Resolves what sits under a screen point, topmost node first.
    pub fn hit_test(&self, point: Point) -> HitTarget {
        let column = (point.x / self.cell.width).floor() as i32;
        let row = (point.y / self.cell.height).floor() as i32;

        for node in self.nodes.iter().rev() {
            let c = node.cells;
            if !c.contains(column, row) {
                continue;
            }
            let id = node.id.clone();
            if row == c.y && column >= c.delete_column() - 1 && column < c.right() - 1 {
                return HitTarget::DeleteButton(id);
            }
            if row == c.bottom() - 1 && (column - c.handle_column()).abs() <= 1 {
                return HitTarget::ConnectHandle(id);
            }
            if row > c.y && row < c.bottom() - 1 && column > c.x && column < c.right() - 1 {
                return HitTarget::NodeText(id);
            }
            return HitTarget::NodeBody(id);
        }
        HitTarget::Canvas
    }
}

fn snap_to_cells(rect: Rect, cell: CellSize) -> CellRect {
    let coord = |v: f64| v.round().clamp(-MAX_CELL_COORD, MAX_CELL_COORD) as i32;
    let extent = |v: f64| v.round().clamp(1.0, MAX_CELL_COORD) as i32;
    CellRect {
        x: coord(rect.left / cell.width),
        y: coord(rect.top / cell.height),
        width: extent(rect.width / cell.width),
        height: extent(rect.height / cell.height),
    }
}

impl GeometryProvider for FrameLayout {
    fn node_box(&self, id: &NodeId) -> Option<Rect> {
        self.get(id).map(|n| n.bounds)
    }

    fn container_box(&self) -> Rect {
        self.container
    }
}
