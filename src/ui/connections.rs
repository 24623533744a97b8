use crate::app::AppState;
use crate::connectors::{preview_line, resolve_connectors, CubicBezier, GeometryProvider};
use crate::interaction::Interaction;
use crate::layout::{CellRect, CellSize};
use crate::model::Point;
use crate::ui::canvas::BufferCanvas;
use crate::ui::constants::{
    stroke, CURVE_PIECE_CELLS, CURVE_SAMPLES_PER_CELL, MAX_CURVE_SEGMENTS, MAX_CURVE_SPLITS,
    MIN_CURVE_SEGMENTS, PREVIEW_GLYPH,
};
use crate::ui::node_color;
use ratatui::style::{Color, Style};

// Draws parent/child curves and the connect preview onto a canvas
pub struct ConnectionRenderer<'a> {
    canvas: &'a mut BufferCanvas,
    cell: CellSize,
    area: CellRect,
}

impl<'a> ConnectionRenderer<'a> {
    pub fn new(canvas: &'a mut BufferCanvas, cell: CellSize, area: CellRect) -> Self {
        Self { canvas, cell, area }
    }

    pub fn draw_all(&mut self, app: &AppState) {
        let origin = app.layout.container_origin();
        let to_screen = |p: Point| app.viewport.world_to_screen(p, origin);

        for connector in resolve_connectors(&app.tree, &app.viewport, &app.layout) {
            let style = Style::default().fg(node_color(&connector.color));
            self.draw_curve(&connector.path.map(to_screen), style);
        }

        if let Interaction::Connecting { source, pointer } = &app.interaction {
            if let Some((start, end)) =
                preview_line(&app.tree, source, *pointer, &app.viewport, &app.layout)
            {
                self.draw_preview(to_screen(start), to_screen(end));
            }
        }
    }

    /// Plots a screen-space curve, choosing a stroke per cell by direction.
    pub fn draw_curve(&mut self, curve: &CubicBezier, style: Style) {
        for points in self.visible_runs(curve) {
            let mut last_cell = None;
            for i in 0..points.len() {
                let cell = self.to_cell(points[i]);
                if last_cell == Some(cell) {
                    continue;
                }
                last_cell = Some(cell);

                let before = points[i.saturating_sub(1)];
                let after = points[(i + 1).min(points.len() - 1)];
                let glyph = self.stroke_for(after.x - before.x, after.y - before.y);
                self.canvas.put(cell.0, cell.1, glyph, style);
            }
        }
    }

    fn draw_preview(&mut self, start: Point, end: Point) {
        let style = Style::default().fg(Color::DarkGray);
        for points in self.visible_runs(&CubicBezier::line(start, end)) {
            for p in points {
                let (x, y) = self.to_cell(p);
                self.canvas.put(x, y, PREVIEW_GLYPH, style);
            }
        }
    }

    /// Sample runs for the parts of `curve` near the drawing area, in path
    /// order. Pieces whose hull misses the area are dropped unsampled.
    fn visible_runs(&self, curve: &CubicBezier) -> Vec<Vec<Point>> {
        let view = self.cell.to_pixels(CellRect {
            x: self.area.x - 1,
            y: self.area.y - 1,
            width: self.area.width + 2,
            height: self.area.height + 2,
        });

        let mut runs = Vec::new();
        let mut pending = vec![(*curve, 0)];
        while let Some((piece, depth)) = pending.pop() {
            if !piece.hull_bounds().intersects(&view) {
                continue;
            }
            let length = self.hull_length(&piece);
            if length > CURVE_PIECE_CELLS && depth < MAX_CURVE_SPLITS {
                let (head, tail) = piece.split(0.5);
                pending.push((tail, depth + 1));
                pending.push((head, depth + 1));
                continue;
            }
            let segments = ((length * CURVE_SAMPLES_PER_CELL).ceil() as usize)
                .clamp(MIN_CURVE_SEGMENTS, MAX_CURVE_SEGMENTS);
            runs.push(piece.sample(segments));
        }
        runs
    }

    // Control polygon length in cells; bounds the arc length.
    fn hull_length(&self, curve: &CubicBezier) -> f64 {
        let hull = [curve.start, curve.c1, curve.c2, curve.end];
        hull.windows(2).map(|w| self.cell_distance(w[0], w[1])).sum()
    }

    // Screen pixels to canvas-relative cell coordinates
    fn to_cell(&self, p: Point) -> (i32, i32) {
        (
            ((p.x / self.cell.width).floor() as i32).saturating_sub(self.area.x),
            ((p.y / self.cell.height).floor() as i32).saturating_sub(self.area.y),
        )
    }

    fn cell_distance(&self, a: Point, b: Point) -> f64 {
        ((b.x - a.x) / self.cell.width).abs() + ((b.y - a.y) / self.cell.height).abs()
    }

    fn stroke_for(&self, dx: f64, dy: f64) -> char {
        let cols = (dx / self.cell.width).abs();
        let rows = (dy / self.cell.height).abs();
        if rows >= 2.0 * cols {
            stroke::VERTICAL
        } else if cols >= 2.0 * rows {
            stroke::HORIZONTAL
        } else if (dx > 0.0) == (dy > 0.0) {
            stroke::FALLING
        } else {
            stroke::RISING
        }
    }
}
