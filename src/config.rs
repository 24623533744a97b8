use clap::Parser;
use config::{
    Config as ConfigCrate, // Need this for builder
    ConfigError as ConfigCrateError,
    Environment,
    File,
    Map,
    Source,
    Value,
};
use directories::ProjectDirs;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::DEFAULT_PALETTE;

// Terminal cells are mapped onto screen pixels with these sizes.
const DEFAULT_CELL_WIDTH: f64 = 8.0;
const DEFAULT_CELL_HEIGHT: f64 = 16.0;
const DEFAULT_SCALE: f64 = 1.0;
const DEFAULT_ZOOM_STEP: f64 = 0.1;
const DEFAULT_SCROLL_ZOOM_STEP: f64 = 0.05;
const DEFAULT_SCROLL_PAN_STEP: f64 = 48.0;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about = "Family tree diagram editor for the terminal", long_about = None)]
pub struct CliArgs {
    /// Snapshot file to open
    pub filename: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial zoom factor
    #[arg(long)]
    pub scale: Option<f64>,

    /// Width of a terminal cell in pixels
    #[arg(long)]
    pub cell_width: Option<f64>,

    /// Height of a terminal cell in pixels
    #[arg(long)]
    pub cell_height: Option<f64>,

    /// Log level written to the log file (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,
}

// Optional fields allow for layered config (defaults -> file -> env -> args).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    default_file: Option<String>,
    cell_width: Option<f64>,
    cell_height: Option<f64>,
    initial_scale: Option<f64>,
    zoom_step: Option<f64>,
    scroll_zoom_step: Option<f64>,
    scroll_pan_step: Option<f64>,
    palette: Option<Vec<String>>,
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub default_file: Option<PathBuf>,
    pub cell_width: f64,
    pub cell_height: f64,
    pub initial_scale: f64,
    pub zoom_step: f64,
    pub scroll_zoom_step: f64,
    pub scroll_pan_step: f64,
    pub palette: Vec<String>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_file: None,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            initial_scale: DEFAULT_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            scroll_zoom_step: DEFAULT_SCROLL_ZOOM_STEP,
            scroll_pan_step: DEFAULT_SCROLL_PAN_STEP,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "kintree", "kintree")
}

pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix("KINTREE")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("palette");
    // Missing env vars are fine; anything else falls back to no overrides.
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());

    build_config(args, Some(env_map))
}

// Separate from load_config so tests can inject overrides.
fn build_config(
    args: &CliArgs,
    overrides: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args
        .config
        .clone()
        .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join("config.toml")));

    let mut builder = ConfigCrate::builder();
    if let Some(ref path) = config_file_path {
        builder = builder.add_source(File::from(path.clone()).required(false));
    }
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            builder = builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = builder.build()?.try_deserialize()?;
    let defaults = AppConfig::default();

    // args > overrides > file > defaults
    let config = AppConfig {
        default_file: args
            .filename
            .clone()
            .or(loaded.default_file.map(PathBuf::from)),
        cell_width: args
            .cell_width
            .or(loaded.cell_width)
            .unwrap_or(defaults.cell_width),
        cell_height: args
            .cell_height
            .or(loaded.cell_height)
            .unwrap_or(defaults.cell_height),
        initial_scale: args
            .scale
            .or(loaded.initial_scale)
            .unwrap_or(defaults.initial_scale),
        zoom_step: loaded.zoom_step.unwrap_or(defaults.zoom_step),
        scroll_zoom_step: loaded.scroll_zoom_step.unwrap_or(defaults.scroll_zoom_step),
        scroll_pan_step: loaded.scroll_pan_step.unwrap_or(defaults.scroll_pan_step),
        palette: loaded
            .palette
            .filter(|p| !p.is_empty())
            .unwrap_or(defaults.palette),
        log_level: args
            .log_level
            .clone()
            .or(loaded.log_level)
            .unwrap_or(defaults.log_level),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let positive = [
        ("cell_width", config.cell_width),
        ("cell_height", config.cell_height),
        ("initial_scale", config.initial_scale),
        ("zoom_step", config.zoom_step),
        ("scroll_zoom_step", config.scroll_zoom_step),
        ("scroll_pan_step", config.scroll_pan_step),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a positive number, got {}",
                name, value
            )));
        }
    }

    let hex = Regex::new(r"^#[0-9a-fA-F]{6}$")
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    if let Some(bad) = config.palette.iter().find(|c| !hex.is_match(c)) {
        return Err(ConfigError::ValidationError(format!(
            "palette entry {:?} is not a #rrggbb color",
            bad
        )));
    }

    if config.log_level.parse::<log::LevelFilter>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "unknown log level {:?}",
            config.log_level
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::ValueKind;
    use std::fs;
    use tempfile::TempDir;

    fn args_with_config(dir: &TempDir, contents: Option<&str>) -> CliArgs {
        let path = dir.path().join("config.toml");
        if let Some(contents) = contents {
            fs::write(&path, contents).unwrap();
        }
        CliArgs {
            config: Some(path),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let dir = TempDir::new().unwrap();
        let config = build_config(&args_with_config(&dir, None), None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = TempDir::new().unwrap();
        let args = args_with_config(
            &dir,
            Some("cell_width = 10.0\npalette = [\"#111111\", \"#222222\"]\n"),
        );
        let config = build_config(&args, None).unwrap();
        assert_eq!(config.cell_width, 10.0);
        assert_eq!(config.palette, vec!["#111111", "#222222"]);
    }

    #[test]
    fn test_override_beats_file() {
        let dir = TempDir::new().unwrap();
        let args = args_with_config(&dir, Some("zoom_step = 0.2\n"));
        let mut overrides = Map::new();
        overrides.insert(
            "zoom_step".to_string(),
            Value::new(None, ValueKind::Float(0.25)),
        );

        let config = build_config(&args, Some(overrides)).unwrap();
        assert_eq!(config.zoom_step, 0.25);
        assert_eq!(config.cell_height, DEFAULT_CELL_HEIGHT);
    }

    #[test]
    fn test_args_beat_everything() {
        let dir = TempDir::new().unwrap();
        let mut args = args_with_config(&dir, Some("initial_scale = 0.5\n"));
        args.scale = Some(1.5);
        args.filename = Some(PathBuf::from("family.json"));

        let config = build_config(&args, None).unwrap();
        assert_eq!(config.initial_scale, 1.5);
        assert_eq!(config.default_file, Some(PathBuf::from("family.json")));
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::try_parse_from([
            "kintree",
            "tree.json",
            "--cell-width=9",
            "--log-level=debug",
        ])
        .unwrap();
        assert_eq!(args.filename, Some(PathBuf::from("tree.json")));
        assert_eq!(args.cell_width, Some(9.0));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_rejects_bad_palette_entry() {
        let dir = TempDir::new().unwrap();
        let args = args_with_config(&dir, Some("palette = [\"red\"]\n"));
        assert!(matches!(
            build_config(&args, None),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_cell_size() {
        let dir = TempDir::new().unwrap();
        let mut args = args_with_config(&dir, None);
        args.cell_height = Some(0.0);
        assert!(matches!(
            build_config(&args, None),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let dir = TempDir::new().unwrap();
        let mut args = args_with_config(&dir, None);
        args.log_level = Some("loud".to_string());
        assert!(build_config(&args, None).is_err());
    }
}
