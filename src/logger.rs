//! File-based logging. The terminal is owned by the editor while it runs, so
//! log records go to `<data dir>/logs/<timestamp>.log` instead of stderr.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::project_dirs;

pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn new(level: LevelFilter, path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }

    /// Default location for this run's log file.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = project_dirs().ok_or_else(|| anyhow!("Could not determine data directory"))?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        Ok(dirs.data_dir().join("logs").join(format!("{}.log", stamp)))
    }

    /// Installs the logger globally. Returns the file it writes to.
    pub fn init(level: LevelFilter) -> Result<PathBuf> {
        let path = Self::default_path()?;
        let logger = Self::new(level, &path)?;

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow!("Failed to set logger: {}", e))?;

        log::info!("Log file: {}", path.display());
        Ok(path)
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            // A failed log write must never take the editor down.
            let _ = writeln!(file, "{}", Self::format(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_enabled_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("run.log");
        let logger = FileLogger::new(LevelFilter::Info, &path).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("kintree::tree")
                .args(format_args!("created node"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("kintree::tree")
                .args(format_args!("hidden detail"))
                .build(),
        );
        logger.flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO [kintree::tree] created node"));
        assert!(!contents.contains("hidden detail"));
    }
}
