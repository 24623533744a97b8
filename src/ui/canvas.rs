use crate::ui::constants::{CharBuffer, StyleBuffer};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

// Marks the second cell of a double-width glyph; skipped when emitting lines.
const WIDE_TAIL: char = '\0';

/// Character grid covering the drawing area. Coordinates are signed and
/// relative to the area; anything outside is clipped.
pub struct BufferCanvas {
    pub char_buffer: CharBuffer,
    pub style_buffer: StyleBuffer,
    pub width: usize,
    pub height: usize,
}

impl BufferCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            char_buffer: vec![vec![' '; width]; height],
            style_buffer: vec![vec![Style::default(); width]; height],
            width,
            height,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (y as usize) < self.height && (x as usize) < self.width
    }

    pub fn put(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if self.in_bounds(x, y) {
            self.char_buffer[y as usize][x as usize] = ch;
            self.style_buffer[y as usize][x as usize] = style;
        }
    }

    /// Writes `text` from (`x`, `y`), stopping before column `limit`.
    pub fn draw_styled_text(&mut self, x: i32, y: i32, text: &str, style: Style, limit: i32) {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as i32;
            if w == 0 {
                continue;
            }
            if col + w > limit {
                break;
            }
            self.put(col, y, ch, style);
            if w == 2 {
                self.put(col + 1, y, WIDE_TAIL, style);
            }
            col += w;
        }
    }

    /// Blanks a box, clipped to the canvas.
    pub fn fill(&mut self, x: i32, y: i32, width: i32, height: i32, style: Style) {
        let cols = x.max(0)..x.saturating_add(width).min(self.width as i32);
        let rows = y.max(0)..y.saturating_add(height).min(self.height as i32);
        for row in rows {
            for col in cols.clone() {
                self.put(col, row, ' ', style);
            }
        }
    }

    #[cfg(test)]
    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        self.in_bounds(x, y)
            .then(|| self.char_buffer[y as usize][x as usize])
    }

    pub fn to_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();

        for (y, row) in self.char_buffer.iter().enumerate() {
            let mut spans = Vec::new();
            let mut current_style = Style::default();
            let mut current_text = String::new();

            for (x, &ch) in row.iter().enumerate() {
                if ch == WIDE_TAIL {
                    continue;
                }
                let style = self.style_buffer[y][x];
                if style != current_style {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(current_text.clone(), current_style));
                        current_text.clear();
                    }
                    current_style = style;
                }
                current_text.push(ch);
            }

            if !current_text.is_empty() {
                spans.push(Span::styled(current_text, current_style));
            }

            lines.push(Line::from(spans));
        }

        lines
    }
}
