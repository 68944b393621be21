// src/config/config_load.rs
//
// loading of config.toml

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::config_types::*;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub track: TrackConfig,
    pub trace: TraceConfig,
    pub feed: FeedConfig,
    pub paths: PathConfig,
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        // First try to load from the executable's directory
        if let Some(exe_config) = Self::load_from_exe_dir() {
            return Ok(exe_config);
        }

        // Fallback to loading from the current working directory
        Self::load_from_working_dir()
    }

    /// Loads the config, or the built-in defaults when no usable file exists.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config, config.toml not loaded: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn load_from_exe_dir() -> Option<Self> {
        let exe_dir = Self::exe_dir()?;
        let config_path = exe_dir.join("config.toml");

        if config_path.exists() {
            let content = fs::read_to_string(&config_path).ok()?;
            match Self::from_toml(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("Ignoring {}: {}", config_path.display(), e);
                    None
                }
            }
        } else {
            None
        }
    }

    fn load_from_working_dir() -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string("config.toml")?;
        Ok(Self::from_toml(&content)?)
    }

    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    // relative paths resolve against the executable's directory
    fn resolve(path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            Self::exe_dir()
                .map(|exe_dir| exe_dir.join(path))
                .unwrap_or_else(|| PathBuf::from(path))
        }
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        Self::resolve(&self.paths.output_directory)
    }

    pub fn resolve_reference_image(&self) -> Option<PathBuf> {
        self.trace.reference_image.as_deref().map(Self::resolve)
    }
}
