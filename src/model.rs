use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use uuid::Uuid;

// Nominal node footprint in world units.
pub const NODE_WIDTH: f64 = 160.0;
pub const NODE_HEIGHT: f64 = 48.0;
pub const NODE_HALF_WIDTH: f64 = NODE_WIDTH / 2.0;

/// Vertical distance between a parent and a freshly created child.
pub const CHILD_OFFSET_Y: f64 = 100.0;

pub const DEFAULT_PALETTE: [&str; 8] = [
    "#4f46e5", "#059669", "#d97706", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned box, in whichever space the caller is working in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x < self.left + self.width
            && p.y >= self.top
            && p.y < self.top + self.height
    }

    /// Closed-edge overlap test. Boxes with NaN edges never intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.left + other.width
            && other.left <= self.left + self.width
            && self.top <= other.top + other.height
            && other.top <= self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub level: u32,
    pub color: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl Node {
    pub fn root(color: String) -> Self {
        Self {
            id: NodeId::fresh(),
            name: "Root".to_string(),
            parent: None,
            level: 0,
            color,
            x: Some(0.0),
            y: Some(0.0),
        }
    }

    /// The stored anchor, only when both coordinates are present.
    pub fn position(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = Some(p.x);
        self.y = Some(p.y);
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Nominal world-space footprint, when the node has stored coordinates.
    pub fn footprint(&self) -> Option<Rect> {
        self.position()
            .map(|p| Rect::new(p.x, p.y, NODE_WIDTH, NODE_HEIGHT))
    }
}

/// Ordered set of colors nodes are tinted with.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    pub fn first(&self) -> &str {
        &self.colors[0]
    }

    pub fn get(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn index_of(&self, color: &str) -> Option<usize> {
        self.colors.iter().position(|c| c.eq_ignore_ascii_case(color))
    }

    /// Color following `color` in the palette; unknown colors wrap to the first entry.
    pub fn next_after(&self, color: &str) -> &str {
        match self.index_of(color) {
            Some(i) => self.get(i + 1),
            None => self.first(),
        }
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}
