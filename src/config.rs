use crate::statistics::DEFAULT_TOP_N;
use crate::store::DataPaths;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Write the commented default configuration to config.toml
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version
    pub version: String,
    pub files: FilesConfig,
    pub display: DisplayConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
    pub debug: DebugConfig,
}

/// Overrides for the default file locations. Unset entries keep the
/// defaults from [`DataPaths`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilesConfig {
    pub data: Option<PathBuf>,
    pub cleaned: Option<PathBuf>,
    pub lookup: Option<PathBuf>,
    pub merged: Option<PathBuf>,
    pub search_output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Value the preview row field starts with.
    pub preview_default_rows: usize,
    pub summary_top_n: usize,
    /// Shade every other row of the table view.
    pub alternate_row_colors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub event_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Write logs of the terminal form to the cache directory.
    pub file: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            files: FilesConfig::default(),
            display: DisplayConfig::default(),
            performance: PerformanceConfig::default(),
            logging: LoggingConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_default_rows: 10,
            summary_top_n: DEFAULT_TOP_N,
            alternate_row_colors: true,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            event_poll_interval_ms: 25,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        Self::load_with(&ConfigManager::new(app_name)?)
    }

    /// Load configuration using the config.toml managed by `manager`.
    pub fn load_with(manager: &ConfigManager) -> Result<Self> {
        let mut config = AppConfig::default();
        config.merge(Self::load_user_config(manager)?);
        config.validate()?;
        Ok(config)
    }

    fn load_user_config(manager: &ConfigManager) -> Result<AppConfig> {
        let config_path = manager.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.files.merge(other.files);
        self.display.merge(other.display);
        self.performance.merge(other.performance);
        self.logging.merge(other.logging);
        self.debug.merge(other.debug);
    }

    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if self.display.preview_default_rows == 0 {
            return Err(eyre!("preview_default_rows must be greater than 0"));
        }

        if self.display.summary_top_n == 0 {
            return Err(eyre!("summary_top_n must be greater than 0"));
        }

        if self.performance.event_poll_interval_ms == 0 {
            return Err(eyre!("event_poll_interval_ms must be greater than 0"));
        }

        self.logging.level_filter()?;

        Ok(())
    }
}

impl FilesConfig {
    pub fn merge(&mut self, other: Self) {
        if other.data.is_some() {
            self.data = other.data;
        }
        if other.cleaned.is_some() {
            self.cleaned = other.cleaned;
        }
        if other.lookup.is_some() {
            self.lookup = other.lookup;
        }
        if other.merged.is_some() {
            self.merged = other.merged;
        }
        if other.search_output.is_some() {
            self.search_output = other.search_output;
        }
    }

    /// The configured locations, falling back to the defaults.
    pub fn resolve(&self) -> DataPaths {
        let defaults = DataPaths::default();
        DataPaths {
            data: self.data.clone().unwrap_or(defaults.data),
            cleaned: self.cleaned.clone().unwrap_or(defaults.cleaned),
            lookup: self.lookup.clone().unwrap_or(defaults.lookup),
            merged: self.merged.clone().unwrap_or(defaults.merged),
            search_output: self.search_output.clone().unwrap_or(defaults.search_output),
        }
    }
}

impl DisplayConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DisplayConfig::default();
        if other.preview_default_rows != default.preview_default_rows {
            self.preview_default_rows = other.preview_default_rows;
        }
        if other.summary_top_n != default.summary_top_n {
            self.summary_top_n = other.summary_top_n;
        }
        if other.alternate_row_colors != default.alternate_row_colors {
            self.alternate_row_colors = other.alternate_row_colors;
        }
    }
}

impl PerformanceConfig {
    pub fn merge(&mut self, other: Self) {
        let default = PerformanceConfig::default();
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        let default = LoggingConfig::default();
        if other.level != default.level {
            self.level = other.level;
        }
        if other.file != default.file {
            self.file = other.file;
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level.parse::<LevelFilter>().map_err(|_| {
            eyre!(
                "Invalid logging level: {}. Must be one of off, error, warn, info, debug, trace",
                self.level
            )
        })
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        if other.enabled {
            self.enabled = true;
        }
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");
