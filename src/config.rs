use crate::constants;
use crate::error::{HubError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV_VAR: &str = "HUB_NOTES_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Everything the pipeline needs to know about where to read from and
/// write to. Built once in `main` and handed to each component.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub output: OutputConfig,
    pub templates: TemplatesConfig,
    pub labels: LabelsConfig,
    pub categories: CategoriesConfig,
    pub logging: LoggingConfig,
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub plugins_url: String,
    pub themes_url: String,
    pub raw_base: String,
    pub manifest_file: String,
    pub theme_css_files: Vec<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub plugins_dir: PathBuf,
    pub themes_dir: PathBuf,
    pub categories_dir: PathBuf,
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub mobile_compatible: String,
    pub desktop_only: String,
    pub dark_mode: String,
    pub light_mode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Any occurrence of the identifier counts, even inside a longer one.
    #[default]
    Substring,
    /// The identifier must not be flanked by identifier characters.
    Delimited,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoriesConfig {
    pub uncategorized_name: String,
    pub uncategorized_description: String,
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            output: OutputConfig::default(),
            templates: TemplatesConfig::default(),
            labels: LabelsConfig::default(),
            categories: CategoriesConfig::default(),
            logging: LoggingConfig::default(),
            concurrency: constants::DEFAULT_CONCURRENCY,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            plugins_url: constants::releases_url(constants::PLUGINS_JSON_FILE),
            themes_url: constants::releases_url(constants::THEMES_JSON_FILE),
            raw_base: constants::RAW_GITHUB_BASE.to_string(),
            manifest_file: constants::MANIFEST_FILE.to_string(),
            theme_css_files: constants::THEME_CSS_FILES.iter().map(|s| s.to_string()).collect(),
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            user_agent: constants::USER_AGENT.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plugins_dir: PathBuf::from(constants::PLUGINS_DIR),
            themes_dir: PathBuf::from(constants::THEMES_DIR),
            categories_dir: PathBuf::from(constants::CATEGORIES_DIR),
            extension: constants::NOTE_EXTENSION.to_string(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(constants::TEMPLATES_DIR),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            mobile_compatible: constants::MOBILE_COMPATIBLE.to_string(),
            desktop_only: constants::DESKTOP_ONLY.to_string(),
            dark_mode: constants::DARK_MODE_THEMES.to_string(),
            light_mode: constants::LIGHT_MODE_THEMES.to_string(),
        }
    }
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            uncategorized_name: constants::UNCATEGORIZED_NAME.to_string(),
            uncategorized_description: constants::UNCATEGORIZED_DESCRIPTION.to_string(),
            match_mode: MatchMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(constants::LOGS_DIR),
            file_name: "hub_notes.log".to_string(),
        }
    }
}

impl Config {
    /// Resolve the config file (explicit path, then `HUB_NOTES_CONFIG`,
    /// then `./config.toml`) and load it. Falls back to defaults when no
    /// file is found and none was asked for explicitly.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::from_file(Path::new(&path));
            }
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        debug!("No config file found, using defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            HubError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&config_content)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(HubError::Config("concurrency must be at least 1".into()));
        }
        if self.registry.theme_css_files.is_empty() {
            return Err(HubError::Config(
                "registry.theme_css_files must name at least one stylesheet".into(),
            ));
        }
        if self.output.extension.trim().is_empty() {
            return Err(HubError::Config("output.extension must not be empty".into()));
        }
        if self.categories.uncategorized_name.trim().is_empty() {
            return Err(HubError::Config(
                "categories.uncategorized_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Point the three output directories under `root`. Templates and logs
    /// stay relative to the working directory. Used by the `--vault` flag.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.output.plugins_dir = root.join(&self.output.plugins_dir);
        self.output.themes_dir = root.join(&self.output.themes_dir);
        self.output.categories_dir = root.join(&self.output.categories_dir);
        self
    }
}
