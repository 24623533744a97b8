use crate::connectors::{rendered_world_box, GeometryProvider};
use crate::model::{NodeId, Point};
use crate::tree::FamilyTree;
use crate::viewport::Viewport;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Screen-space position in pixels.
    pub position: Point,
    pub button: PointerButton,
    pub modifier: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Point, button: PointerButton) -> Self {
        Self {
            kind,
            position,
            button,
            modifier: false,
        }
    }

    pub fn with_modifier(mut self, modifier: bool) -> Self {
        self.modifier = modifier;
        self
    }
}

/// What sits under the pointer, as reported by the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Canvas,
    NodeBody(NodeId),
    NodeText(NodeId),
    DeleteButton(NodeId),
    ConnectHandle(NodeId),
}

impl HitTarget {
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            HitTarget::Canvas => None,
            HitTarget::NodeBody(id)
            | HitTarget::NodeText(id)
            | HitTarget::DeleteButton(id)
            | HitTarget::ConnectHandle(id) => Some(id),
        }
    }

    /// Interactive parts of a node that never start a drag.
    pub fn is_chrome(&self) -> bool {
        matches!(self, HitTarget::NodeText(_) | HitTarget::DeleteButton(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    MovingNode {
        id: NodeId,
        /// Pointer position relative to the node anchor, in world units.
        grab: Point,
    },
    Connecting {
        source: NodeId,
        /// Live pointer in world units, for the preview line.
        pointer: Point,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    None,
    /// A click on node chrome, left to the caller to act on.
    Chrome(HitTarget),
    Created(NodeId),
    /// A connect drag released over an existing node.
    Dropped,
}

/// Mutable pieces a pointer event may touch.
pub struct Surface<'a> {
    pub tree: &'a mut FamilyTree,
    pub viewport: &'a mut Viewport,
    pub geometry: &'a dyn GeometryProvider,
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn cancel(&mut self) {
        *self = Interaction::Idle;
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        target: &HitTarget,
        surface: Surface<'_>,
    ) -> PointerOutcome {
        match event.kind {
            PointerKind::Down => self.pointer_down(event, target, surface),
            PointerKind::Move => {
                self.pointer_move(event, surface);
                PointerOutcome::None
            }
            PointerKind::Up => self.pointer_up(event, target, surface),
        }
    }

    fn pointer_down(
        &mut self,
        event: PointerEvent,
        target: &HitTarget,
        surface: Surface<'_>,
    ) -> PointerOutcome {
        if !self.is_idle() {
            return PointerOutcome::None;
        }

        let panning = event.button == PointerButton::Middle
            || (event.button == PointerButton::Primary && event.modifier);
        if panning {
            *self = Interaction::Panning {
                last: event.position,
            };
            return PointerOutcome::None;
        }
        if event.button != PointerButton::Primary {
            return PointerOutcome::None;
        }

        let origin = surface.geometry.container_origin();
        let world = surface.viewport.screen_to_world(event.position, origin);

        match target {
            HitTarget::NodeBody(id) => {
                let anchor = surface.tree.get(id).and_then(|n| {
                    n.position().or_else(|| {
                        rendered_world_box(id, surface.viewport, surface.geometry)
                            .map(|r| r.origin())
                    })
                });
                if let Some(anchor) = anchor {
                    *self = Interaction::MovingNode {
                        id: id.clone(),
                        grab: world - anchor,
                    };
                }
                PointerOutcome::None
            }
            HitTarget::ConnectHandle(id) => {
                if surface.tree.contains(id) {
                    *self = Interaction::Connecting {
                        source: id.clone(),
                        pointer: world,
                    };
                }
                PointerOutcome::None
            }
            HitTarget::NodeText(_) | HitTarget::DeleteButton(_) => {
                PointerOutcome::Chrome(target.clone())
            }
            HitTarget::Canvas => PointerOutcome::None,
        }
    }

    fn pointer_move(&mut self, event: PointerEvent, surface: Surface<'_>) {
        let origin = surface.geometry.container_origin();
        match self {
            Interaction::Idle => {}
            Interaction::Panning { last } => {
                surface.viewport.pan(event.position - *last);
                *last = event.position;
            }
            Interaction::MovingNode { id, grab } => {
                let world = surface.viewport.screen_to_world(event.position, origin);
                surface.tree.move_node(id, world - *grab);
            }
            Interaction::Connecting { pointer, .. } => {
                *pointer = surface.viewport.screen_to_world(event.position, origin);
            }
        }
    }

    fn pointer_up(
        &mut self,
        event: PointerEvent,
        target: &HitTarget,
        surface: Surface<'_>,
    ) -> PointerOutcome {
        let finished = std::mem::take(self);
        match finished {
            Interaction::Idle => PointerOutcome::None,
            Interaction::Panning { last } => {
                surface.viewport.pan(event.position - last);
                PointerOutcome::None
            }
            Interaction::MovingNode { id, grab } => {
                let origin = surface.geometry.container_origin();
                let world = surface.viewport.screen_to_world(event.position, origin);
                surface.tree.move_node(&id, world - grab);
                PointerOutcome::None
            }
            Interaction::Connecting { source, .. } => {
                if target.node().is_some() {
                    debug!("connect from {} released over a node; ignoring", source);
                    return PointerOutcome::Dropped;
                }
                let origin = surface.geometry.container_origin();
                let world = surface.viewport.screen_to_world(event.position, origin);
                match surface
                    .tree
                    .create_child(&source, world, surface.geometry, surface.viewport)
                {
                    Some(id) => PointerOutcome::Created(id),
                    None => PointerOutcome::None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::NoGeometry;
    use crate::model::DEFAULT_PALETTE;

    struct Harness {
        tree: FamilyTree,
        viewport: Viewport,
        state: Interaction,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                tree: FamilyTree::default(),
                viewport: Viewport::default(),
                state: Interaction::Idle,
            }
        }

        fn send(&mut self, event: PointerEvent, target: HitTarget) -> PointerOutcome {
            self.state.handle(
                event,
                &target,
                Surface {
                    tree: &mut self.tree,
                    viewport: &mut self.viewport,
                    geometry: &NoGeometry,
                },
            )
        }

        fn root(&self) -> NodeId {
            self.tree.root_id().unwrap()
        }
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerKind::Down, Point::new(x, y), PointerButton::Primary)
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerKind::Move, Point::new(x, y), PointerButton::Primary)
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerKind::Up, Point::new(x, y), PointerButton::Primary)
    }

    #[test]
    fn test_middle_button_pans() {
        let mut h = Harness::new();
        let press = PointerEvent::new(PointerKind::Down, Point::new(5.0, 5.0), PointerButton::Middle);
        h.send(press, HitTarget::Canvas);
        assert!(matches!(h.state, Interaction::Panning { .. }));

        h.send(moved(15.0, 25.0), HitTarget::Canvas);
        h.send(up(20.0, 25.0), HitTarget::Canvas);
        assert!(h.state.is_idle());
        assert_eq!(h.viewport.position, Point::new(15.0, 20.0));
    }

    #[test]
    fn test_modifier_primary_pans_even_over_node() {
        let mut h = Harness::new();
        let root = h.root();
        h.send(down(10.0, 10.0).with_modifier(true), HitTarget::NodeBody(root.clone()));
        assert!(matches!(h.state, Interaction::Panning { .. }));

        h.send(up(10.0, 10.0), HitTarget::Canvas);
        assert_eq!(h.tree.get(&root).unwrap().position(), Some(Point::ORIGIN));
    }

    #[test]
    fn test_move_node_by_world_delta() {
        let mut h = Harness::new();
        let root = h.root();
        h.send(down(30.0, 12.0), HitTarget::NodeBody(root.clone()));
        h.send(moved(35.0, 22.0), HitTarget::Canvas);
        h.send(up(40.0, 32.0), HitTarget::Canvas);

        assert!(h.state.is_idle());
        assert_eq!(h.tree.get(&root).unwrap().position(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_move_respects_scale() {
        let mut h = Harness::new();
        h.viewport.zoom(1.0);
        let root = h.root();
        h.send(down(0.0, 0.0), HitTarget::NodeBody(root.clone()));
        h.send(up(20.0, 40.0), HitTarget::Canvas);
        assert_eq!(h.tree.get(&root).unwrap().position(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_connect_on_empty_canvas_creates_child() {
        let mut h = Harness::new();
        let root = h.root();
        h.send(down(80.0, 48.0), HitTarget::ConnectHandle(root.clone()));
        h.send(moved(300.0, 300.0), HitTarget::Canvas);

        // The preview never touches the store.
        assert_eq!(h.tree.len(), 1);
        assert_eq!(
            h.state,
            Interaction::Connecting {
                source: root.clone(),
                pointer: Point::new(300.0, 300.0)
            }
        );

        let outcome = h.send(up(300.0, 300.0), HitTarget::Canvas);
        let PointerOutcome::Created(child) = outcome else {
            panic!("expected a new node, got {:?}", outcome);
        };
        let node = h.tree.get(&child).unwrap();
        assert_eq!(node.parent.as_ref(), Some(&root));
        assert_eq!(node.level, 1);
        assert_eq!(node.y, Some(100.0));
        assert_eq!(node.color, DEFAULT_PALETTE[1]);
        assert_eq!(h.tree.len(), 2);
    }

    #[test]
    fn test_connect_released_over_node_is_noop() {
        let mut h = Harness::new();
        let root = h.root();
        h.send(down(80.0, 48.0), HitTarget::ConnectHandle(root.clone()));
        let outcome = h.send(up(10.0, 10.0), HitTarget::NodeBody(root));

        assert_eq!(outcome, PointerOutcome::Dropped);
        assert_eq!(h.tree.len(), 1);
        assert!(h.state.is_idle());
    }

    #[test]
    fn test_chrome_click_does_not_drag() {
        let mut h = Harness::new();
        let root = h.root();
        let outcome = h.send(down(10.0, 10.0), HitTarget::NodeText(root.clone()));
        assert_eq!(outcome, PointerOutcome::Chrome(HitTarget::NodeText(root)));
        assert!(h.state.is_idle());
    }

    #[test]
    fn test_second_down_is_ignored_while_dragging() {
        let mut h = Harness::new();
        let root = h.root();
        h.send(down(0.0, 0.0), HitTarget::NodeBody(root.clone()));
        let press = PointerEvent::new(PointerKind::Down, Point::new(5.0, 5.0), PointerButton::Middle);
        h.send(press, HitTarget::Canvas);
        assert!(matches!(h.state, Interaction::MovingNode { .. }));
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let mut h = Harness::new();
        let root = h.root();
        let press = PointerEvent::new(PointerKind::Down, Point::ORIGIN, PointerButton::Secondary);
        h.send(press, HitTarget::NodeBody(root));
        assert!(h.state.is_idle());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut h = Harness::new();
        let root = h.root();
        h.send(down(0.0, 0.0), HitTarget::ConnectHandle(root));
        h.state.cancel();
        assert!(h.state.is_idle());
        h.send(up(500.0, 500.0), HitTarget::Canvas);
        assert_eq!(h.tree.len(), 1);
    }
}
