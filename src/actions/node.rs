use crate::app::{AppMode, AppState};
use crate::interaction::{
    HitTarget, Interaction, PointerEvent, PointerKind, PointerOutcome, Surface,
};
use crate::model::NodeId;
use log::info;

use super::editing::{confirm_edit, start_editing};

/// Routes a pointer event through the interaction state machine, then acts on
/// whatever it reports back.
pub fn handle_pointer(app: &mut AppState, event: PointerEvent) {
    if event.kind == PointerKind::Down && matches!(app.mode, AppMode::Editing { .. }) {
        confirm_edit(app);
    }

    let target = app.layout.hit_test(event.position);
    let was_moving = matches!(app.interaction, Interaction::MovingNode { .. });

    let outcome = app.interaction.handle(
        event,
        &target,
        Surface {
            tree: &mut app.tree,
            viewport: &mut app.viewport,
            geometry: &app.layout,
        },
    );

    if event.kind == PointerKind::Down {
        if let Some(id) = target.node() {
            app.selected = Some(id.clone());
        }
    }
    if was_moving && event.kind == PointerKind::Up {
        app.is_dirty = true;
    }

    match outcome {
        PointerOutcome::None => {}
        PointerOutcome::Chrome(HitTarget::NodeText(id)) => start_editing(app, id),
        PointerOutcome::Chrome(HitTarget::DeleteButton(id)) => delete_node(app, &id),
        PointerOutcome::Chrome(_) => {}
        PointerOutcome::Created(id) => {
            app.is_dirty = true;
            app.set_message("Added a child; type a name and press Enter");
            start_editing(app, id);
        }
        PointerOutcome::Dropped => {
            app.set_message("Release on empty canvas to add a child");
        }
    }
}

pub fn cancel_interaction(app: &mut AppState) {
    if !app.interaction.is_idle() {
        app.interaction.cancel();
        app.set_message("Cancelled");
    }
}

pub fn delete_node(app: &mut AppState, id: &NodeId) {
    let parent = app.tree.get(id).and_then(|n| n.parent.clone());
    let removed = app.tree.delete_subtree(id);
    if removed == 0 {
        if app.tree.contains(id) {
            app.set_message("Cannot delete the root node");
        }
        return;
    }

    info!("deleted {} node(s) starting at {}", removed, id);
    app.is_dirty = true;
    app.forget_missing_nodes();
    if app.selected.is_none() {
        app.selected = parent;
    }
    app.set_message(match removed {
        1 => "Deleted 1 node".to_string(),
        n => format!("Deleted {} nodes", n),
    });
}

pub fn delete_selected(app: &mut AppState) {
    match app.selected.clone() {
        Some(id) => delete_node(app, &id),
        None => app.set_message("Nothing selected"),
    }
}

/// Back to a single root with the default view.
pub fn reset_tree(app: &mut AppState) {
    app.tree.reset();
    app.viewport.reset();
    app.interaction.cancel();
    app.mode = AppMode::Normal;
    app.selected = app.tree.root_id();
    app.is_dirty = true;
    info!("tree reset");
    app.set_message("Started a new tree");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{execute_action, Action};
    use crate::config::AppConfig;
    use crate::connectors::NoGeometry;
    use crate::interaction::PointerButton;
    use crate::layout::{CellRect, CellSize, FrameLayout};
    use crate::model::Point;

    fn app_with_layout() -> AppState {
        let mut app = AppState::new(AppConfig::default());
        refresh_layout(&mut app);
        app
    }

    fn refresh_layout(app: &mut AppState) {
        let container = CellRect {
            x: 0,
            y: 0,
            width: 80,
            height: 23,
        };
        app.layout = FrameLayout::compute(
            &app.tree,
            &app.viewport,
            container,
            CellSize::new(8.0, 16.0),
        );
    }

    fn cell(column: u16, row: u16) -> Point {
        CellSize::new(8.0, 16.0).cell_center(column, row)
    }

    fn primary(kind: PointerKind, at: Point) -> Action {
        Action::Pointer(PointerEvent::new(kind, at, PointerButton::Primary))
    }

    #[test]
    fn test_connect_drag_creates_child_and_starts_editing() {
        let mut app = app_with_layout();
        let root = app.tree.root_id().unwrap();

        // Root handle sits on the bottom border, column 10.
        execute_action(primary(PointerKind::Down, cell(10, 2)), &mut app).unwrap();
        execute_action(primary(PointerKind::Move, cell(40, 12)), &mut app).unwrap();
        execute_action(primary(PointerKind::Up, cell(40, 12)), &mut app).unwrap();

        let kids = app.tree.children(&root);
        assert_eq!(kids.len(), 1);
        let child = kids[0].id.clone();
        assert!(app.is_editing(&child));
        assert_eq!(app.selected, Some(child));
        assert!(app.is_dirty);
    }

    #[test]
    fn test_release_on_node_reports_drop() {
        let mut app = app_with_layout();
        execute_action(primary(PointerKind::Down, cell(10, 2)), &mut app).unwrap();
        execute_action(primary(PointerKind::Up, cell(5, 1)), &mut app).unwrap();

        assert_eq!(app.tree.len(), 1);
        assert_eq!(
            app.message.as_deref(),
            Some("Release on empty canvas to add a child")
        );
    }

    #[test]
    fn test_text_click_starts_editing() {
        let mut app = app_with_layout();
        let root = app.tree.root_id().unwrap();
        execute_action(primary(PointerKind::Down, cell(5, 1)), &mut app).unwrap();
        assert!(app.is_editing(&root));
        assert!(app.interaction.is_idle());
    }

    #[test]
    fn test_delete_button_removes_subtree() {
        let mut app = app_with_layout();
        let root = app.tree.root_id().unwrap();
        let child = app
            .tree
            .create_child(&root, Point::ORIGIN, &NoGeometry, &app.viewport)
            .unwrap();
        app.tree
            .create_child(&child, Point::ORIGIN, &NoGeometry, &app.viewport)
            .unwrap();
        refresh_layout(&mut app);

        // Child box spans columns 0..20, rows 6..9; delete glyph at column 18.
        execute_action(primary(PointerKind::Down, cell(18, 6)), &mut app).unwrap();

        assert_eq!(app.tree.len(), 1);
        assert_eq!(app.selected, Some(root));
        assert_eq!(app.message.as_deref(), Some("Deleted 2 nodes"));
    }

    #[test]
    fn test_root_cannot_be_deleted() {
        let mut app = app_with_layout();
        delete_selected(&mut app);
        assert_eq!(app.tree.len(), 1);
        assert_eq!(app.message.as_deref(), Some("Cannot delete the root node"));
    }

    #[test]
    fn test_body_drag_marks_dirty() {
        let mut app = app_with_layout();
        let root = app.tree.root_id().unwrap();
        execute_action(primary(PointerKind::Down, cell(0, 1)), &mut app).unwrap();
        execute_action(primary(PointerKind::Move, cell(2, 2)), &mut app).unwrap();
        execute_action(primary(PointerKind::Up, cell(2, 2)), &mut app).unwrap();

        assert_eq!(
            app.tree.get(&root).unwrap().position(),
            Some(Point::new(16.0, 16.0))
        );
        assert!(app.is_dirty);
    }

    #[test]
    fn test_reset_tree() {
        let mut app = app_with_layout();
        let old_root = app.tree.root_id().unwrap();
        app.viewport.zoom(0.5);
        reset_tree(&mut app);

        assert_eq!(app.tree.len(), 1);
        assert_ne!(app.tree.root_id(), Some(old_root));
        assert_eq!(app.selected, app.tree.root_id());
        assert_eq!(app.viewport.scale(), 1.0);
    }
}
