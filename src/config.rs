use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::engine::EngineOptions;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// Cells per side
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Canvas side in pixels
    #[serde(default = "default_width")]
    pub width: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_mark_visited")]
    pub mark_visited: bool,
    /// Expansions performed between two drawn frames
    #[serde(default = "default_steps_per_frame")]
    pub steps_per_frame: usize,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_show_grid_lines")]
    pub show_grid_lines: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default `env_logger` filter, overridden by RUST_LOG
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_enable_action_log")]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
}

// Default values
fn default_rows() -> usize { 50 }
fn default_width() -> u32 { 800 }
fn default_mark_visited() -> bool { true }
fn default_steps_per_frame() -> usize { 1 }
fn default_window_title() -> String { "A* Path Finding Algorithm Visualization".to_string() }
fn default_bg_r() -> u8 { 255 }
fn default_bg_g() -> u8 { 255 }
fn default_bg_b() -> u8 { 255 }
fn default_show_grid_lines() -> bool { true }
fn default_level() -> String { "info".to_string() }
fn default_enable_action_log() -> bool { true }
fn default_action_log_path() -> String { "action_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            width: default_width(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mark_visited: default_mark_visited(),
            steps_per_frame: default_steps_per_frame(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_grid_lines: default_show_grid_lines(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            enable_action_log: default_enable_action_log(),
            action_log_path: default_action_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            search: SearchConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SearchConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            mark_visited: self.mark_visited,
        }
    }
}

/// Where a loaded configuration came from. Reported by the caller once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    Missing(String),
    Invalid { path: String, reason: String },
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from `path`, or use defaults if it is missing or unparsable
    pub fn load_from(path: impl AsRef<Path>) -> (Self, ConfigSource) {
        let path = path.as_ref();
        let shown = path.display().to_string();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => (config, ConfigSource::File(shown)),
                Err(e) => (
                    Config::default(),
                    ConfigSource::Invalid {
                        path: shown,
                        reason: e.to_string(),
                    },
                ),
            },
            Err(_) => (Config::default(), ConfigSource::Missing(shown)),
        }
    }

    /// Load `config.toml` from the working directory
    pub fn load() -> (Self, ConfigSource) {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }
}
