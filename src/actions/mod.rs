mod editing;
mod file;
mod node;
mod view;

use crate::app::AppState;
use crate::interaction::{PointerEvent, PointerKind};
use anyhow::Result;

// Re-export all public functions from submodules
pub use editing::*;
pub use file::*;
pub use node::*;
pub use view::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application control
    Quit,
    ForceQuit,

    // Pointer
    Pointer(PointerEvent),
    Scroll { direction: ScrollDirection, modifier: bool },
    CancelInteraction,

    // View control
    ZoomIn,
    ZoomOut,
    ResetView,

    // Tree
    ResetTree,
    DeleteSelected,
    EditSelected,

    // Editing
    TypeChar(char),
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    ConfirmEdit,
    CancelEdit,

    // File operations
    Save,
    Reload,
}

impl Action {
    // Pointer motion arrives continuously and must not wipe the status line.
    fn clears_message(&self) -> bool {
        !matches!(self, Action::Pointer(ev) if ev.kind == PointerKind::Move)
    }
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    if action.clears_message() {
        app.clear_message();
    }

    match action {
        Action::Quit => {
            if app.is_dirty {
                app.set_message("Unsaved changes! Press Shift+Q to force quit or 's' to save");
            } else {
                app.running = false;
            }
        }
        Action::ForceQuit => {
            app.running = false;
        }

        // Pointer
        Action::Pointer(event) => node::handle_pointer(app, event),
        Action::Scroll {
            direction,
            modifier,
        } => view::scroll(app, direction, modifier),
        Action::CancelInteraction => node::cancel_interaction(app),

        // View control
        Action::ZoomIn => view::zoom_in(app),
        Action::ZoomOut => view::zoom_out(app),
        Action::ResetView => view::reset_view(app),

        // Tree
        Action::ResetTree => node::reset_tree(app),
        Action::DeleteSelected => node::delete_selected(app),
        Action::EditSelected => {
            if let Some(id) = app.selected.clone() {
                editing::start_editing(app, id);
            }
        }

        // Editing
        Action::TypeChar(c) => editing::type_char(app, c),
        Action::Backspace => editing::backspace(app),
        Action::Delete => editing::delete_char(app),
        Action::MoveCursorLeft => editing::move_cursor_left(app),
        Action::MoveCursorRight => editing::move_cursor_right(app),
        Action::MoveCursorHome => editing::move_cursor_home(app),
        Action::MoveCursorEnd => editing::move_cursor_end(app),
        Action::ConfirmEdit => editing::confirm_edit(app),
        Action::CancelEdit => editing::cancel_edit(app),

        // File operations
        Action::Save => file::save(app)?,
        Action::Reload => file::reload(app)?,
    }
    Ok(())
}
