// Viewer settings
// Loaded from ~/.config/windowgrid/settings.json

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    Io(String),
    /// The file is not valid settings JSON.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid
    #[serde(rename = "grid.minColumnWidth")]
    pub min_column_width: f32,

    // Synthetic dataset
    #[serde(rename = "data.rows")]
    pub rows: usize,

    #[serde(rename = "data.cols")]
    pub cols: usize,

    // Terminal viewer
    #[serde(rename = "viewer.pixelsPerChar")]
    pub pixels_per_char: f32,

    #[serde(rename = "viewer.resizeStep")]
    pub resize_step: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_column_width: 20.0,
            rows: 10_000,
            cols: 200,
            pixels_per_char: 8.0,
            resize_step: 8.0,
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Narrowest width a column can be dragged to (pixels)
    "grid.minColumnWidth": 20,

    // Size of the generated dataset
    "data.rows": 10000,
    "data.cols": 200,

    // Terminal viewer: pixels per character cell, pixels per resize key press
    "viewer.pixelsPerChar": 8,
    "viewer.resizeStep": 8
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("windowgrid");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults.
    /// Writes a commented default file on first run.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            if let Err(e) = write_file(&path, DEFAULT_FILE) {
                log::warn!("could not create {}: {}", path.display(), e);
            }
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&contents)
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save settings to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        write_file(path, &json)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
    }
    fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))
}
