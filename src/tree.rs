use crate::connectors::{rendered_world_box, GeometryProvider};
use crate::model::{Node, NodeId, Palette, Point, CHILD_OFFSET_Y, NODE_HALF_WIDTH};
use crate::viewport::Viewport;
use indextree::{Arena, NodeId as ArenaId};
use log::{debug, warn};
use std::collections::HashMap;

/// The node collection plus a parent -> children index.
///
/// Node records keep their own `parent` field (that is what gets exported);
/// the arena mirrors it so subtree walks never rescan the whole collection.
#[derive(Debug, Clone)]
pub struct FamilyTree {
    arena: Arena<Node>,
    index: HashMap<NodeId, ArenaId>,
    root: Option<ArenaId>,
    palette: Palette,
}

impl FamilyTree {
    pub fn new(palette: Palette) -> Self {
        let mut tree = Self {
            arena: Arena::new(),
            index: HashMap::new(),
            root: None,
            palette,
        };
        tree.reset();
        tree
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        let arena_id = self.index.get(id)?;
        self.arena.get(*arena_id).map(|n| n.get())
    }

    pub(crate) fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let arena_id = self.index.get(id)?;
        self.arena.get_mut(*arena_id).map(|n| n.get_mut())
    }

    pub fn root(&self) -> Option<&Node> {
        self.root
            .and_then(|r| self.arena.get(r))
            .map(|n| n.get())
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root().map(|n| n.id.clone())
    }

    /// All nodes, each tree in pre-order with siblings in creation order.
    /// Detached subtrees (dangling or cyclic parents) follow the root's tree.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut tops: Vec<ArenaId> = self.index.values().copied().collect();
        tops.retain(|id| self.arena.get(*id).is_some_and(|n| n.parent().is_none()));
        // Arena slots are allocated in insertion order; keep the root first.
        tops.sort_by_key(|id| (Some(*id) != self.root, *id));

        tops.into_iter()
            .flat_map(|top| top.descendants(&self.arena))
            .filter_map(|id| self.arena.get(id).map(|n| n.get()))
            .collect()
    }

    /// Direct children of `id`, in creation order.
    pub fn children(&self, id: &NodeId) -> Vec<&Node> {
        let Some(arena_id) = self.index.get(id) else {
            return Vec::new();
        };
        arena_id
            .children(&self.arena)
            .filter_map(|c| self.arena.get(c).map(|n| n.get()))
            .collect()
    }

    /// Adds a child under `parent_id`. Returns `None` when the parent is unknown.
    ///
    /// Placement: directly below a parent with stored coordinates; otherwise
    /// centered under the parent's rendered box; otherwise the origin.
    pub fn create_child(
        &mut self,
        parent_id: &NodeId,
        drop_point: Point,
        geometry: &dyn GeometryProvider,
        viewport: &Viewport,
    ) -> Option<NodeId> {
        let Some(&parent_arena) = self.index.get(parent_id) else {
            debug!("create_child: unknown parent {}", parent_id);
            return None;
        };
        let parent = self.arena.get(parent_arena)?.get();

        let position = if let Some(p) = parent.position() {
            Point::new(p.x, p.y + CHILD_OFFSET_Y)
        } else if let Some(rect) = rendered_world_box(parent_id, viewport, geometry) {
            Point::new(
                rect.left + rect.width / 2.0 - NODE_HALF_WIDTH,
                rect.top + CHILD_OFFSET_Y,
            )
        } else {
            Point::ORIGIN
        };

        let color = self.sibling_color(parent_arena, &parent.color);
        let child = Node {
            id: NodeId::fresh(),
            name: String::new(),
            parent: Some(parent_id.clone()),
            level: parent.level + 1,
            color,
            x: Some(position.x),
            y: Some(position.y),
        };
        let child_id = child.id.clone();

        let arena_id = self.arena.new_node(child);
        parent_arena.append(arena_id, &mut self.arena);
        self.index.insert(child_id.clone(), arena_id);

        debug!(
            "created {} under {} at ({}, {}), dropped at ({}, {})",
            child_id, parent_id, position.x, position.y, drop_point.x, drop_point.y
        );
        Some(child_id)
    }

    fn sibling_color(&self, parent: ArenaId, parent_color: &str) -> String {
        parent
            .children(&self.arena)
            .next()
            .and_then(|first| self.arena.get(first))
            .map(|n| n.get().color.clone())
            .unwrap_or_else(|| self.palette.next_after(parent_color).to_string())
    }

    pub fn rename(&mut self, id: &NodeId, name: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn move_node(&mut self, id: &NodeId, world: Point) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.set_position(world);
                true
            }
            None => false,
        }
    }

    /// Removes `id` and all of its descendants. Returns how many nodes were
    /// removed; roots are refused and report 0.
    pub fn delete_subtree(&mut self, id: &NodeId) -> usize {
        let Some(&arena_id) = self.index.get(id) else {
            debug!("delete_subtree: unknown node {}", id);
            return 0;
        };
        if self.get(id).is_some_and(Node::is_root) {
            debug!("delete_subtree: refusing to delete root {}", id);
            return 0;
        }

        let doomed: Vec<NodeId> = arena_id
            .descendants(&self.arena)
            .filter_map(|d| self.arena.get(d).map(|n| n.get().id.clone()))
            .collect();
        for node_id in &doomed {
            self.index.remove(node_id);
        }
        arena_id.remove_subtree(&mut self.arena);

        debug!("deleted {} ({} nodes)", id, doomed.len());
        doomed.len()
    }

    /// Replaces everything with a single fresh root at the origin.
    pub fn reset(&mut self) {
        let root = Node::root(self.palette.first().to_string());
        let root_id = root.id.clone();

        self.arena = Arena::new();
        self.index.clear();
        let arena_id = self.arena.new_node(root);
        self.index.insert(root_id, arena_id);
        self.root = Some(arena_id);
    }

    /// Swaps in a loaded node list.
    ///
    /// The first parentless record becomes the root. Records pointing at a
    /// missing parent, or whose attachment would form a cycle, stay detached.
    pub fn replace_all(&mut self, nodes: Vec<Node>) {
        let mut arena = Arena::new();
        let mut index = HashMap::new();
        let mut order = Vec::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                warn!("replace_all: dropping duplicate id {}", node.id);
                continue;
            }
            let id = node.id.clone();
            let arena_id = arena.new_node(node);
            index.insert(id, arena_id);
            order.push(arena_id);
        }

        let mut root = None;
        for &arena_id in &order {
            let parent = arena.get(arena_id).and_then(|n| n.get().parent.clone());
            match parent {
                None => {
                    if root.is_none() {
                        root = Some(arena_id);
                    }
                }
                Some(parent_id) => match index.get(&parent_id) {
                    Some(&parent_arena) => {
                        if let Err(e) = parent_arena.checked_append(arena_id, &mut arena) {
                            warn!("replace_all: cannot attach under {}: {}", parent_id, e);
                        }
                    }
                    None => warn!("replace_all: parent {} not found", parent_id),
                },
            }
        }

        self.arena = arena;
        self.index = index;
        self.root = root;
    }
}

impl Default for FamilyTree {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}
