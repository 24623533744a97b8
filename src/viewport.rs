use crate::model::{Point, Rect};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 2.0;

/// Pan/zoom state mapping screen pixels onto world coordinates.
///
/// `position` is the pan offset in screen pixels and is never clamped;
/// only `scale` is kept inside [`MIN_SCALE`, `MAX_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    pub position: Point,
}

impl Viewport {
    pub fn new(scale: f64) -> Self {
        Self {
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
            position: Point::ORIGIN,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn screen_to_world(&self, screen: Point, container_origin: Point) -> Point {
        Point::new(
            (screen.x - container_origin.x - self.position.x) / self.scale,
            (screen.y - container_origin.y - self.position.y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, world: Point, container_origin: Point) -> Point {
        Point::new(
            world.x * self.scale + self.position.x + container_origin.x,
            world.y * self.scale + self.position.y + container_origin.y,
        )
    }

    pub fn screen_rect_to_world(&self, rect: Rect, container_origin: Point) -> Rect {
        let origin = self.screen_to_world(rect.origin(), container_origin);
        Rect::new(
            origin.x,
            origin.y,
            rect.width / self.scale,
            rect.height / self.scale,
        )
    }

    pub fn world_rect_to_screen(&self, rect: Rect, container_origin: Point) -> Rect {
        let origin = self.world_to_screen(rect.origin(), container_origin);
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.scale,
            rect.height * self.scale,
        )
    }

    /// Adds `delta` to the scale and clamps the result. Returns the new scale.
    pub fn zoom(&mut self, delta: f64) -> f64 {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
        self.scale
    }

    pub fn pan(&mut self, delta: Point) {
        self.position = self.position + delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0)
    }
}
