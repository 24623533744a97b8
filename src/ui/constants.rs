use ratatui::style::{Color, Style};

// Type aliases for clarity
pub type CharBuffer = Vec<Vec<char>>;
pub type StyleBuffer = Vec<Vec<Style>>;

// Constants for rendering
pub const CURSOR_INDICATOR: char = '▌';
pub const STATUS_EDIT_PREFIX: &str = "Edit: ";
pub const DELETE_GLYPH: char = '×';
pub const HANDLE_GLYPH: char = '●';
pub const PREVIEW_GLYPH: char = '·';
pub const FALLBACK_COLOR: Color = Color::Gray;

// Curve samples per cell of chord length
pub const CURVE_SAMPLES_PER_CELL: f64 = 2.0;
pub const MIN_CURVE_SEGMENTS: usize = 4;
pub const MAX_CURVE_SEGMENTS: usize = 512;

// Curves longer than this are halved until the visible pieces are short
pub const CURVE_PIECE_CELLS: f64 = 64.0;
pub const MAX_CURVE_SPLITS: u32 = 48;

// Node box borders
pub mod border {
    pub const TOP_LEFT: char = '╭';
    pub const TOP_RIGHT: char = '╮';
    pub const BOTTOM_LEFT: char = '╰';
    pub const BOTTOM_RIGHT: char = '╯';
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
}

// Connector strokes, picked by local direction
pub mod stroke {
    pub const VERTICAL: char = '│';
    pub const HORIZONTAL: char = '─';
    pub const RISING: char = '╱';
    pub const FALLING: char = '╲';
}
