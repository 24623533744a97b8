mod canvas;
mod connections;
mod constants;
mod nodes;
mod status_line;
mod text;


use crate::app::AppState;
use crate::layout::{CellRect, FrameLayout};
use canvas::BufferCanvas;
use connections::ConnectionRenderer;
use nodes::NodeRenderer;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Color,
    widgets::Paragraph,
    Frame,
};
use status_line::StatusLineRenderer;

/// Draws one frame and records where every node landed in `app.layout`.
pub fn render(frame: &mut Frame, app: &mut AppState) {
    let [canvas_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let container = cell_rect(canvas_area);
    app.layout = FrameLayout::compute(&app.tree, &app.viewport, container, app.cell_size());

    let mut canvas = BufferCanvas::new(canvas_area.width as usize, canvas_area.height as usize);
    ConnectionRenderer::new(&mut canvas, app.cell_size(), container).draw_all(app);
    NodeRenderer::new(app, container).draw_all(&mut canvas);
    frame.render_widget(Paragraph::new(canvas.to_lines()), canvas_area);

    StatusLineRenderer::render(frame, app, status_area);
}

fn cell_rect(area: Rect) -> CellRect {
    CellRect {
        x: area.x as i32,
        y: area.y as i32,
        width: area.width as i32,
        height: area.height as i32,
    }
}

/// Parses `#rrggbb`; anything else draws in a neutral color.
pub fn node_color(hex: &str) -> Color {
    let parsed = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
        .and_then(|h| u32::from_str_radix(h, 16).ok());
    match parsed {
        Some(rgb) => Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8),
        None => constants::FALLBACK_COLOR,
    }
}
