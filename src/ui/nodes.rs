use crate::app::{AppMode, AppState};
use crate::layout::{CellRect, NodeLayout};
use crate::model::Node;
use crate::ui::canvas::BufferCanvas;
use crate::ui::constants::{border, CURSOR_INDICATOR, DELETE_GLYPH, HANDLE_GLYPH};
use crate::ui::node_color;
use crate::ui::text::TextWrapper;
use ratatui::style::{Color, Modifier, Style};

const UNNAMED: &str = "unnamed";

// Node box renderer
pub struct NodeRenderer<'a> {
    app: &'a AppState,
    area: CellRect,
}

impl<'a> NodeRenderer<'a> {
    pub fn new(app: &'a AppState, area: CellRect) -> Self {
        Self { app, area }
    }

    /// Draws every laid-out node that overlaps the area; later boxes cover
    /// earlier ones.
    pub fn draw_all(&self, canvas: &mut BufferCanvas) {
        for layout in &self.app.layout.nodes {
            if !layout.cells.intersects(&self.area) {
                continue;
            }
            if let Some(node) = self.app.tree.get(&layout.id) {
                self.draw_node(canvas, node, layout);
            }
        }
    }

    fn draw_node(&self, canvas: &mut BufferCanvas, node: &Node, layout: &NodeLayout) {
        let cells = layout.cells;
        let x = cells.x.saturating_sub(self.area.x);
        let y = cells.y.saturating_sub(self.area.y);
        let (w, h) = (cells.width, cells.height);
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);

        let color = node_color(&node.color);
        let mut frame_style = Style::default().fg(color);
        if self.app.selected.as_ref() == Some(&node.id) {
            frame_style = frame_style.add_modifier(Modifier::BOLD);
        }

        canvas.fill(x, y, w, h, Style::default());

        if w >= 2 && h >= 2 {
            for col in x + 1..right {
                canvas.put(col, y, border::HORIZONTAL, frame_style);
                canvas.put(col, bottom, border::HORIZONTAL, frame_style);
            }
            for row in y + 1..bottom {
                canvas.put(x, row, border::VERTICAL, frame_style);
                canvas.put(right, row, border::VERTICAL, frame_style);
            }
            canvas.put(x, y, border::TOP_LEFT, frame_style);
            canvas.put(right, y, border::TOP_RIGHT, frame_style);
            canvas.put(x, bottom, border::BOTTOM_LEFT, frame_style);
            canvas.put(right, bottom, border::BOTTOM_RIGHT, frame_style);
        } else {
            for col in x..=right {
                canvas.put(col, y, border::HORIZONTAL, frame_style);
            }
        }

        if w >= 4 {
            let delete_col = cells.delete_column().saturating_sub(self.area.x);
            canvas.put(delete_col, y, DELETE_GLYPH, Style::default().fg(Color::Red));
        }
        let handle_col = cells.handle_column().saturating_sub(self.area.x);
        canvas.put(handle_col, bottom, HANDLE_GLYPH, Style::default().fg(color));

        let inner_w = (w - 2).max(0);
        let inner_h = (h - 2).max(0);
        if inner_w == 0 || inner_h == 0 {
            return;
        }

        match &self.app.mode {
            AppMode::Editing {
                node: editing,
                buffer,
                cursor_pos,
            } if *editing == node.id => {
                let row = y + 1 + (inner_h - 1) / 2;
                self.draw_edit_buffer(canvas, buffer, *cursor_pos, x + 1, row, inner_w);
            }
            _ => self.draw_label(canvas, &node.name, x + 1, y + 1, inner_w, inner_h),
        }
    }

    fn draw_label(
        &self,
        canvas: &mut BufferCanvas,
        name: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        let (text, style) = if name.trim().is_empty() {
            (UNNAMED, Style::default().fg(Color::DarkGray))
        } else {
            (name, Style::default())
        };

        let lines = TextWrapper::wrap(text, width as usize, height as usize);
        let top = y + (height - lines.len() as i32) / 2;
        for (i, line) in lines.iter().enumerate() {
            let line_width = unicode_width::UnicodeWidthStr::width(line.as_str()) as i32;
            let left = x + (width - line_width).max(0) / 2;
            canvas.draw_styled_text(left, top + i as i32, line, style, x + width);
        }
    }

    fn draw_edit_buffer(
        &self,
        canvas: &mut BufferCanvas,
        buffer: &str,
        cursor_pos: usize,
        x: i32,
        y: i32,
        width: i32,
    ) {
        let (start, visible) = TextWrapper::window(buffer, cursor_pos, width as usize);
        let split = cursor_pos.saturating_sub(start);
        let mut display: String = visible.chars().take(split).collect();
        display.push(CURSOR_INDICATOR);
        display.extend(visible.chars().skip(split));

        let style = Style::default().fg(Color::Black).bg(Color::Cyan);
        canvas.fill(x, y, width, 1, style);
        canvas.draw_styled_text(x, y, &display, style, x + width);
    }
}
