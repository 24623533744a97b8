use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

// Label fitting for node boxes
pub struct TextWrapper;

impl TextWrapper {
    /// Word-wraps `text` into at most `max_lines` lines of `max_width`
    /// columns. Words longer than a line are split; overflow ends in `…`.
    pub fn wrap(text: &str, max_width: usize, max_lines: usize) -> Vec<String> {
        if max_width == 0 || max_lines == 0 {
            return Vec::new();
        }

        let mut lines = Vec::new();
        let mut current_line = String::new();
        let mut current_width = 0;

        for word in text.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);

            if current_width > 0 && current_width + 1 + word_width <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if current_width > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current_width > 0 && current_width + w > max_width {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }
                current_line.push(ch);
                current_width += w;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }

        if lines.len() > max_lines {
            lines.truncate(max_lines);
            if let Some(last) = lines.last_mut() {
                *last = Self::ellipsize(last, max_width);
            }
        }
        lines
    }

    /// Cuts `line` so that it plus a trailing `…` fits in `max_width`.
    fn ellipsize(line: &str, max_width: usize) -> String {
        let mut out = String::new();
        let mut width = 0;
        for ch in line.chars() {
            let w = ch.width().unwrap_or(0);
            if width + w + 1 > max_width {
                break;
            }
            out.push(ch);
            width += w;
        }
        out.push(ELLIPSIS);
        out
    }

    /// The tail of `text` that fits in `max_width` columns with `cursor`
    /// (a char index) still visible. Returns the slice start and the text.
    pub fn window(text: &str, cursor: usize, max_width: usize) -> (usize, String) {
        let chars: Vec<char> = text.chars().collect();
        let cursor = cursor.min(chars.len());
        let mut start = 0;
        loop {
            let width: usize = chars[start..cursor]
                .iter()
                .map(|c| c.width().unwrap_or(0))
                .sum();
            // One column is reserved for the cursor itself.
            if width < max_width || start >= cursor {
                break;
            }
            start += 1;
        }
        (start, chars[start..].iter().collect())
    }
}
