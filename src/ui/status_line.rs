use crate::app::{AppMode, AppState};
use crate::interaction::Interaction;
use crate::ui::constants::{CURSOR_INDICATOR, STATUS_EDIT_PREFIX};
use crate::ui::text::TextWrapper;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app, area);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    fn get_content_and_style(app: &AppState, area: Rect) -> (String, Style) {
        match &app.mode {
            AppMode::Normal => Self::render_normal_mode(app),
            AppMode::Editing {
                buffer, cursor_pos, ..
            } => Self::render_edit_mode(buffer, *cursor_pos, area.width),
        }
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        if let Some(ref msg) = app.message {
            let style = Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD);
            return (msg.clone(), style);
        }

        let file = app
            .filename
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[new]".to_string());
        let mut content = format!(
            "kintree | {}{} | {} nodes | {}%",
            file,
            if app.is_dirty { " *" } else { "" },
            app.tree.len(),
            (app.viewport.scale() * 100.0).round()
        );
        match app.interaction {
            Interaction::Idle => {}
            Interaction::Panning { .. } => content.push_str(" | panning"),
            Interaction::MovingNode { .. } => content.push_str(" | moving"),
            Interaction::Connecting { .. } => content.push_str(" | release to add a child"),
        }

        (content, Style::default().fg(Color::Gray).bg(Color::Black))
    }

    fn render_edit_mode(buffer: &str, cursor_pos: usize, width: u16) -> (String, Style) {
        let prefix_width = STATUS_EDIT_PREFIX.chars().count();
        let available = (width as usize).saturating_sub(prefix_width);
        let (start, visible) = TextWrapper::window(buffer, cursor_pos, available);
        let split = cursor_pos.saturating_sub(start);

        let mut display = String::from(STATUS_EDIT_PREFIX);
        display.extend(visible.chars().take(split));
        display.push(CURSOR_INDICATOR);
        display.extend(visible.chars().skip(split));

        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        (display, style)
    }
}
