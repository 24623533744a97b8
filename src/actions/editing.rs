use crate::app::{AppMode, AppState};
use crate::model::NodeId;

// Cursor positions count chars; String methods want byte offsets.
fn byte_index(buffer: &str, cursor_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(cursor_pos)
        .map(|(i, _)| i)
        .unwrap_or(buffer.len())
}

pub fn start_editing(app: &mut AppState, id: NodeId) {
    let Some(node) = app.tree.get(&id) else {
        return;
    };
    let buffer = node.name.clone();
    let cursor_pos = buffer.chars().count();

    app.selected = Some(id.clone());
    app.mode = AppMode::Editing {
        node: id,
        buffer,
        cursor_pos,
    };
}

pub fn type_char(app: &mut AppState, c: char) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        let at = byte_index(buffer, *cursor_pos);
        buffer.insert(at, c);
        *cursor_pos += 1;
    }
}

pub fn backspace(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos > 0 {
            *cursor_pos -= 1;
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn delete_char(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn move_cursor_left(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = cursor_pos.saturating_sub(1);
    }
}

pub fn move_cursor_right(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            *cursor_pos += 1;
        }
    }
}

pub fn move_cursor_home(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = 0;
    }
}

pub fn move_cursor_end(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        *cursor_pos = buffer.chars().count();
    }
}

pub fn confirm_edit(app: &mut AppState) {
    let mode = std::mem::replace(&mut app.mode, AppMode::Normal);
    if let AppMode::Editing { node, buffer, .. } = mode {
        let changed = app.tree.get(&node).is_some_and(|n| n.name != buffer);
        if changed && app.tree.rename(&node, buffer) {
            app.is_dirty = true;
        }
    }
}

pub fn cancel_edit(app: &mut AppState) {
    app.mode = AppMode::Normal;
}
