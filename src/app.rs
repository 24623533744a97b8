use crate::config::AppConfig;
use crate::interaction::Interaction;
use crate::layout::{CellSize, FrameLayout};
use crate::model::{NodeId, Palette};
use crate::tree::FamilyTree;
use crate::viewport::Viewport;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    /// Inline rename of `node`; `cursor_pos` counts chars, not bytes.
    Editing {
        node: NodeId,
        buffer: String,
        cursor_pos: usize,
    },
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub tree: FamilyTree,
    pub viewport: Viewport,
    pub interaction: Interaction,
    /// Boxes from the last drawn frame.
    pub layout: FrameLayout,
    /// Last node clicked or created; target of keyboard commands.
    pub selected: Option<NodeId>,
    pub config: AppConfig,
    pub filename: Option<PathBuf>,
    pub is_dirty: bool,

    // Message for status line
    pub message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let tree = FamilyTree::new(Palette::new(config.palette.clone()));
        let viewport = Viewport::new(config.initial_scale);
        let cell = CellSize::new(config.cell_width, config.cell_height);

        Self {
            running: true,
            mode: AppMode::Normal,
            selected: tree.root_id(),
            tree,
            viewport,
            interaction: Interaction::Idle,
            layout: FrameLayout::empty(cell),
            config,
            filename: None,
            is_dirty: false,
            message: None,
        }
    }

    pub fn cell_size(&self) -> CellSize {
        self.layout.cell
    }

    /// Drops a selection, edit or drag that points at a node no longer in the tree.
    pub fn forget_missing_nodes(&mut self) {
        if let Some(id) = &self.selected {
            if !self.tree.contains(id) {
                self.selected = None;
            }
        }
        if let AppMode::Editing { node, .. } = &self.mode {
            if !self.tree.contains(node) {
                self.mode = AppMode::Normal;
            }
        }
        let dragged = match &self.interaction {
            Interaction::MovingNode { id, .. } => Some(id),
            Interaction::Connecting { source, .. } => Some(source),
            Interaction::Idle | Interaction::Panning { .. } => None,
        };
        if dragged.is_some_and(|id| !self.tree.contains(id)) {
            self.interaction.cancel();
        }
    }

    pub fn is_editing(&self, id: &NodeId) -> bool {
        matches!(&self.mode, AppMode::Editing { node, .. } if node == id)
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
