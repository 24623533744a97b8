use crate::actions::{Action, ScrollDirection};
use crate::app::{AppMode, AppState};
use crate::interaction::{PointerButton, PointerEvent, PointerKind};
use crate::layout::CellSize;
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

pub fn handle_events(app: &mut AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(10))? {
        return Ok(translate(app, event::read()?));
    }
    Ok(None)
}

pub fn translate(app: &AppState, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app.cell_size(), mouse),
        Event::FocusLost => Some(Action::CancelInteraction),
        _ => None,
    }
}

fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Editing { .. } => handle_editing_mode(key),
    }
}

fn handle_normal_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        // Quit
        (Char('q'), KeyModifiers::NONE) => Some(Action::Quit),
        (Char('Q'), KeyModifiers::SHIFT) => Some(Action::ForceQuit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        // View control
        (Char('+'), _) | (Char('='), KeyModifiers::NONE) => Some(Action::ZoomIn),
        (Char('-'), KeyModifiers::NONE) => Some(Action::ZoomOut),
        (Char('0'), KeyModifiers::NONE) => Some(Action::ResetView),

        // Tree
        (Char('r'), KeyModifiers::NONE) => Some(Action::ResetTree),
        (Delete, _) | (Char('d'), KeyModifiers::NONE) => Some(Action::DeleteSelected),
        (Enter, KeyModifiers::NONE) | (Char('e'), KeyModifiers::NONE) => {
            Some(Action::EditSelected)
        }
        (Esc, _) => Some(Action::CancelInteraction),

        // File operations
        (Char('s'), KeyModifiers::NONE) => Some(Action::Save),
        (Char('o'), KeyModifiers::NONE) => Some(Action::Reload),

        _ => None,
    }
}

fn handle_editing_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::CancelEdit),
        (Enter, _) => Some(Action::ConfirmEdit),
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),

        (Backspace, _) => Some(Action::Backspace),
        (Delete, _) => Some(Action::Delete),

        (Left, _) => Some(Action::MoveCursorLeft),
        (Right, _) => Some(Action::MoveCursorRight),
        (Home, _) => Some(Action::MoveCursorHome),
        (End, _) => Some(Action::MoveCursorEnd),
        (Char('a'), KeyModifiers::CONTROL) => Some(Action::MoveCursorHome),
        (Char('e'), KeyModifiers::CONTROL) => Some(Action::MoveCursorEnd),

        _ => None,
    }
}

fn handle_mouse_event(cell: CellSize, mouse: MouseEvent) -> Option<Action> {
    // Ctrl or Alt turns a primary drag into a pan.
    let modifier = mouse
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    let (kind, button) = match mouse.kind {
        MouseEventKind::Down(b) => (PointerKind::Down, pointer_button(b)),
        MouseEventKind::Up(b) => (PointerKind::Up, pointer_button(b)),
        MouseEventKind::Drag(b) => (PointerKind::Move, pointer_button(b)),
        MouseEventKind::Moved => (PointerKind::Move, PointerButton::Primary),
        MouseEventKind::ScrollUp => {
            return Some(Action::Scroll {
                direction: ScrollDirection::Up,
                modifier: mouse.modifiers.contains(KeyModifiers::CONTROL),
            })
        }
        MouseEventKind::ScrollDown => {
            return Some(Action::Scroll {
                direction: ScrollDirection::Down,
                modifier: mouse.modifiers.contains(KeyModifiers::CONTROL),
            })
        }
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => return None,
    };

    let position = cell.cell_center(mouse.column, mouse.row);
    Some(Action::Pointer(
        PointerEvent::new(kind, position, button).with_modifier(modifier),
    ))
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Right => PointerButton::Secondary,
    }
}
