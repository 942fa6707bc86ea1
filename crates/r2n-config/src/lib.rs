//! Sync configuration for readme2notion.
//!
//! Parses `.notion.toml` with serde, searching the current directory and its
//! parents when no explicit path is given. The file is also the place where
//! the resolved page ID is stored after a successful sync, so the
//! configuration is written back at the end of a run.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expansion only affects the values used at runtime. When the file is saved
//! the original, unexpanded text is written back, so a token referenced as
//! `${NOTION_TOKEN}` never ends up on disk.
//!
//! ## Example
//!
//! ```toml
//! name = "readme"
//! database_id = "https://www.notion.so/team/Hosts-0123abcd456789abcdef0123456789ab"
//! token = "${NOTION_TOKEN}"
//! chunk_size = 100
//!
//! [properties]
//! title = "Name"
//! hostname = "Hostname"
//! commit = "GitCommit"
//! ```

mod expand;
mod id;

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

pub use id::normalize_id;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = ".notion.toml";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";

/// Default number of blocks sent per append request.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Largest number of blocks the API accepts in one append request.
pub const MAX_CHUNK_SIZE: usize = 100;

/// CLI settings that override configuration file values.
///
/// `name` and `database_id` identify the target page and are persisted when
/// the configuration is saved. The other overrides only apply to the current
/// run.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override logical page name.
    pub name: Option<String>,
    /// Override target database ID.
    pub database_id: Option<String>,
    /// Override API token.
    pub token: Option<String>,
    /// Override blocks per append request.
    pub chunk_size: Option<usize>,
    /// Commit hash recorded on the page.
    pub commit: Option<String>,
    /// Override hostname used in the page identity.
    pub hostname: Option<String>,
}

/// Database property names written on each sync.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PropertyNames {
    /// Title property.
    pub title: String,
    /// Hostname property (rich text).
    pub hostname: String,
    /// Commit hash property (rich text).
    pub commit: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Name".to_owned(),
            hostname: "Hostname".to_owned(),
            commit: "GitCommit".to_owned(),
        }
    }
}

impl PropertyNames {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Configuration as stored in the file (values unexpanded).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
struct RawConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    database_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    page_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(skip_serializing_if = "PropertyNames::is_default")]
    properties: PropertyNames,
}

/// Resolved sync configuration.
#[derive(Debug)]
pub struct SyncConfig {
    raw: RawConfig,
    /// Logical page name; the page title is `{hostname}/{name}`.
    pub name: String,
    /// Target database ID (hyphenated UUID after loading).
    pub database_id: String,
    /// Page ID stored by the last successful sync.
    pub page_id: Option<String>,
    /// API token.
    pub token: String,
    /// Maximum blocks per append request.
    pub chunk_size: usize,
    /// Commit hash recorded on the page (may be empty).
    pub commit: String,
    /// Hostname override. `None` means use the machine's hostname.
    pub hostname: Option<String>,
    /// API base URL.
    pub api_url: String,
    /// Database property names.
    pub properties: PropertyNames,
    /// File the configuration was loaded from and is saved to.
    pub config_path: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field (e.g., "token").
        field: String,
        /// Error message (e.g., "${`NOTION_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl SyncConfig {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `.notion.toml` in the current directory and its parents; when none
    /// exists, starts from an empty configuration that will be saved to
    /// `.notion.toml` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            let cwd = std::env::current_dir().unwrap_or_default();
            Self::resolve(RawConfig::default(), &cwd.join(CONFIG_FILENAME))?
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        config.normalize_ids()?;
        Ok(config)
    }

    /// Logical page name combined with the host: `{hostname}/{name}`.
    #[must_use]
    pub fn page_name(&self, hostname: &str) -> String {
        format!("{hostname}/{}", self.name)
    }

    /// Record the resolved page ID so that it is written on the next save.
    pub fn set_page_id(&mut self, page_id: &str) {
        self.page_id = Some(page_id.to_owned());
        page_id.clone_into(&mut self.raw.page_id);
    }

    /// Write the configuration back to [`config_path`](Self::config_path).
    ///
    /// Values are written as they appeared in the file (unexpanded), plus the
    /// page ID and any persisted CLI overrides. The file is replaced
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.raw)?;

        let dir = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.persist(&self.config_path)
            .map_err(|e| ConfigError::Io(e.error))?;

        info!(path = %self.config_path.display(), "Saved configuration");
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.database_id, "database_id")?;
        require_non_empty(&self.token, "token")?;
        require_non_empty(&self.api_url, "api_url")?;
        require_http_url(&self.api_url, "api_url")?;

        if self.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "chunk_size must be greater than 0".to_owned(),
            ));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Validation(format!(
                "chunk_size cannot exceed {MAX_CHUNK_SIZE}"
            )));
        }

        if let Some(hostname) = &self.hostname {
            require_non_empty(hostname, "hostname")?;
        }

        let names = &self.properties;
        require_non_empty(&names.title, "properties.title")?;
        require_non_empty(&names.hostname, "properties.hostname")?;
        require_non_empty(&names.commit, "properties.commit")?;

        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(name) = &settings.name {
            self.name.clone_from(name);
            self.raw.name.clone_from(name);
        }
        if let Some(database_id) = &settings.database_id {
            self.database_id.clone_from(database_id);
            self.raw.database_id.clone_from(database_id);
        }
        if let Some(token) = &settings.token {
            self.token.clone_from(token);
        }
        if let Some(chunk_size) = settings.chunk_size {
            self.chunk_size = chunk_size;
        }
        if let Some(commit) = &settings.commit {
            self.commit.clone_from(commit);
        }
        if let Some(hostname) = &settings.hostname {
            self.hostname = Some(hostname.clone());
        }
    }

    /// Normalize the database ID to a hyphenated UUID.
    fn normalize_ids(&mut self) -> Result<(), ConfigError> {
        self.database_id = normalize_id(&self.database_id).ok_or_else(|| {
            ConfigError::Validation(format!(
                "database_id is not a valid Notion ID or URL: {}",
                self.database_id
            ))
        })?;
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let raw: RawConfig = toml::from_str(&content)?;
        Self::resolve(raw, path)
    }

    /// Build the runtime configuration from raw values, expanding
    /// environment variables and filling defaults.
    fn resolve(raw: RawConfig, path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            name: expand::expand_env(&raw.name, "name")?,
            database_id: expand::expand_env(&raw.database_id, "database_id")?,
            page_id: Some(raw.page_id.clone()).filter(|id| !id.is_empty()),
            token: expand::expand_env(&raw.token, "token")?,
            chunk_size: raw.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            commit: expand::expand_env_opt(raw.commit.as_deref(), "commit")?.unwrap_or_default(),
            hostname: expand::expand_env_opt(raw.hostname.as_deref(), "hostname")?,
            api_url: expand::expand_env_opt(raw.api_url.as_deref(), "api_url")?
                .unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            properties: raw.properties.clone(),
            config_path: path.to_path_buf(),
            raw,
        })
    }
}
