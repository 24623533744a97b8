use crate::app::{AppMode, AppState};
use crate::snapshot::{self, SnapshotError};
use anyhow::Result;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

const DEFAULT_SNAPSHOT: &str = "family-tree.json";

pub fn save(app: &mut AppState) -> Result<()> {
    let path = app
        .filename
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));

    match snapshot::save_file(&app.tree, &path) {
        Ok(()) => {
            info!("saved {} nodes to {}", app.tree.len(), path.display());
            app.set_message(format!("Saved to {}", path.display()));
            app.filename = Some(path);
            app.is_dirty = false;
            Ok(())
        }
        Err(e) => {
            error!("save to {} failed: {:#}", path.display(), e);
            app.set_message(format!("Failed to save: {}", e));
            Err(e)
        }
    }
}

/// Re-reads the current file, discarding unsaved changes.
pub fn reload(app: &mut AppState) -> Result<()> {
    match app.filename.clone() {
        Some(path) => {
            open(app, &path);
            Ok(())
        }
        None => {
            app.set_message("No file to reload");
            Ok(())
        }
    }
}

/// Loads `path` into the app. A bad file leaves the current tree in place and
/// reports it on the status line.
pub fn open(app: &mut AppState, path: &Path) {
    match snapshot::load_file(&mut app.tree, path) {
        Ok(count) => {
            info!("loaded {} records from {}", count, path.display());
            app.filename = Some(path.to_path_buf());
            app.interaction.cancel();
            app.mode = AppMode::Normal;
            app.selected = app.tree.root_id();
            app.is_dirty = false;
            app.set_message(format!("Loaded {} ({} nodes)", path.display(), count));
        }
        Err(e) if e.downcast_ref::<SnapshotError>().is_some() => {
            warn!("rejected {}: {:#}", path.display(), e);
            app.set_message("Invalid file format");
        }
        Err(e) => {
            warn!("could not open {}: {:#}", path.display(), e);
            app.set_message(format!("Could not open {}", path.display()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");

        let mut app = AppState::new(AppConfig::default());
        let root = app.tree.root_id().unwrap();
        app.tree.rename(&root, "Ada");
        app.filename = Some(path.clone());
        app.is_dirty = true;
        save(&mut app).unwrap();
        assert!(!app.is_dirty);

        let mut other = AppState::new(AppConfig::default());
        open(&mut other, &path);
        assert_eq!(other.tree.root_id(), Some(root.clone()));
        assert_eq!(other.tree.get(&root).unwrap().name, "Ada");
        assert_eq!(other.filename, Some(path));
    }

    #[test]
    fn test_open_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"id": "a"}"#).unwrap();

        let mut app = AppState::new(AppConfig::default());
        let root = app.tree.root_id();
        open(&mut app, &path);

        assert_eq!(app.message.as_deref(), Some("Invalid file format"));
        assert_eq!(app.tree.root_id(), root);
        assert_eq!(app.tree.len(), 1);
        assert_eq!(app.filename, None);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let mut app = AppState::new(AppConfig::default());
        open(&mut app, &path);
        assert!(app.message.unwrap().starts_with("Could not open"));
    }

    #[test]
    fn test_reload_without_file() {
        let mut app = AppState::new(AppConfig::default());
        reload(&mut app).unwrap();
        assert_eq!(app.message.as_deref(), Some("No file to reload"));
    }
}
