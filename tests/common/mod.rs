// Shared by several test binaries; each uses a different subset.
#![allow(dead_code)]

use kintree::{
    actions::{execute_action, Action},
    app::AppState,
    config::AppConfig,
    interaction::{PointerButton, PointerEvent, PointerKind},
    model::{Node, NodeId, Point},
    ui,
};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

/// Fresh app that has drawn one 80x24 frame, so hit-testing works.
pub fn drawn_app() -> AppState {
    let mut app = AppState::new(AppConfig::default());
    draw(&mut app, 80, 24);
    app
}

/// Renders a frame of the given size and returns its buffer.
pub fn draw(app: &mut AppState, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    terminal.backend().buffer().clone()
}

/// Sends a primary-button pointer event at a screen pixel position.
pub fn press(app: &mut AppState, kind: PointerKind, x: f64, y: f64) {
    let event = PointerEvent::new(kind, Point::new(x, y), PointerButton::Primary);
    execute_action(Action::Pointer(event), app).unwrap();
}

/// Down, move, up along a straight path.
pub fn drag(app: &mut AppState, from: (f64, f64), to: (f64, f64)) {
    press(app, PointerKind::Down, from.0, from.1);
    press(app, PointerKind::Move, to.0, to.1);
    press(app, PointerKind::Up, to.0, to.1);
}

/// A node record with fixed id, for deterministic fixtures.
pub fn fixed_node(
    id: &str,
    name: &str,
    parent: Option<&str>,
    level: u32,
    at: (f64, f64),
) -> Node {
    Node {
        id: NodeId::from(id),
        name: name.to_string(),
        parent: parent.map(NodeId::from),
        level,
        color: if level == 0 { "#4f46e5" } else { "#059669" }.to_string(),
        x: Some(at.0),
        y: Some(at.1),
    }
}

/// Every child's parent exists and sits one level up.
pub fn assert_consistent(app: &AppState) {
    for node in app.tree.nodes() {
        if let Some(parent_id) = &node.parent {
            let parent = app
                .tree
                .get(parent_id)
                .unwrap_or_else(|| panic!("{} has a dangling parent", node.id));
            assert_eq!(node.level, parent.level + 1, "level of {}", node.id);
        }
    }
}
