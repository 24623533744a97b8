pub mod app;
pub mod config;
pub mod connectors;
pub mod interaction;
pub mod layout;
pub mod logger;
pub mod model;
pub mod snapshot;
pub mod tree;
pub mod ui;
pub mod viewport;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::{AppMode, AppState};
pub use config::AppConfig;
pub use connectors::{Connector, CubicBezier, GeometryProvider};
pub use interaction::{HitTarget, Interaction, PointerEvent, PointerOutcome};
pub use model::{Node, NodeId, Palette, Point, Rect};
pub use tree::FamilyTree;
pub use viewport::Viewport;
