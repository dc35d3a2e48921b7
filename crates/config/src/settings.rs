// Engine settings
// Loaded from ~/.config/gridmodel/engine.json

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default maximum length of the undo and redo stacks.
pub const DEFAULT_MAX_UNREDO: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Undo history is discarded once either stack grows past this
    #[serde(rename = "history.maxUnredo")]
    pub max_unredo: usize,

    /// Shape of new documents: rows, columns, tables
    #[serde(rename = "grid.defaultShape")]
    pub default_shape: Vec<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_unredo: DEFAULT_MAX_UNREDO,
            default_shape: vec![1000, 100, 3],
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridmodel");
        config_dir.join("engine.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                warn!("Error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut settings: Self = serde_json::from_str(&cleaned)?;
        if settings.default_shape.is_empty() || settings.default_shape.contains(&0) {
            warn!("grid.defaultShape must list positive bounds, using the default");
            settings.default_shape = Self::default().default_shape;
        }
        Ok(settings)
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }
}
