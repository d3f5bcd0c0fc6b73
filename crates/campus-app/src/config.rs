//! Backoffice configuration, read from a TOML file.
//!
//! ```toml
//! [source]
//! kind = "remote"
//! base_url = "https://api.example.com/api"
//! timeout_secs = 10
//! update_method = "patch"
//!
//! [logging]
//! level = "debug"
//! format = "compact"
//!
//! [resources.courses]
//! search_fields = ["title", "instructor"]
//! default_filters = { status = "all", level = "all" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use campus_model::{DEFAULT_PAGE_SIZE, FieldSpec, ResourceSpec};
use campus_source::{DEFAULT_TIMEOUT, RemoteConfig, UpdateMethod};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{AppError, Result};
use crate::logging::{LogConfig, LogFormat};

/// Which adapter backs every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// REST backend.
    Remote,
    /// In-memory fixtures.
    #[default]
    Mock,
}

/// `[source]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// API base URL; required for `remote`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub update_method: UpdateMethod,
    /// JSON file keyed by resource name, for `mock`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<PathBuf>,
    /// Artificial delay per mock call.
    pub latency_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            update_method: UpdateMethod::default(),
            fixtures: None,
            latency_ms: 0,
        }
    }
}

impl SourceConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Remote connection settings. Fails when `base_url` is missing.
    pub fn remote(&self) -> Result<RemoteConfig> {
        let base_url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::invalid("source.base_url is required for a remote source"))?;
        Ok(RemoteConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            update_method: self.update_method,
        })
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    pub format: LogFormat,
    pub timestamps: bool,
    pub target: bool,
    pub ansi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            timestamps: false,
            target: false,
            ansi: true,
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> Result<LogConfig> {
        let level = Level::from_str(self.level.trim())
            .map_err(|_| AppError::invalid(format!("unknown log level '{}'", self.level)))?;
        Ok(LogConfig {
            level,
            with_timestamps: self.timestamps,
            with_target: self.target,
            with_ansi: self.ansi,
            format: self.format,
            log_file: self.file.clone(),
        })
    }
}

/// `[resources.<name>]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// REST path; the resource name when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub search_fields: Vec<String>,
    pub page_size: usize,
    pub default_filters: BTreeMap<String, String>,
    /// Create/edit form schema.
    pub fields: Vec<FieldSpec>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            search_fields: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            default_filters: BTreeMap::new(),
            fields: Vec::new(),
        }
    }
}

impl ResourceConfig {
    pub fn to_spec(&self, name: &str) -> ResourceSpec {
        ResourceSpec {
            name: name.to_string(),
            path: self.path.clone().unwrap_or_else(|| name.to_string()),
            search_fields: self.search_fields.clone(),
            page_size: self.page_size,
            default_filters: self.default_filters.clone(),
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    pub resources: BTreeMap<String, ResourceConfig>,
}

impl AppConfig {
    /// Read and check a config file.
    ///
    /// A relative `source.fixtures` path is resolved against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| AppError::io(path, source))?;
        let mut config = Self::parse(&content, path)?;
        if let (Some(fixtures), Some(dir)) = (&config.source.fixtures, path.parent())
            && fixtures.is_relative()
        {
            let resolved = dir.join(fixtures);
            config.source.fixtures = Some(resolved);
        }
        Ok(config)
    }

    /// Parse and check TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| AppError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.source.kind == SourceKind::Remote {
            self.source.remote()?;
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::invalid("source.timeout_secs must be positive"));
        }
        for (name, resource) in &self.resources {
            if resource.page_size == 0 {
                return Err(AppError::invalid(format!(
                    "resources.{name}.page_size must be positive"
                )));
            }
        }
        self.logging.to_log_config()?;
        Ok(())
    }

    /// Resource settings for `name`.
    pub fn resource(&self, name: &str) -> Result<ResourceSpec> {
        self.resources
            .get(name)
            .map(|resource| resource.to_spec(name))
            .ok_or_else(|| AppError::UnknownResource {
                name: name.to_string(),
            })
    }

    /// Pretty TOML, e.g. for writing a starter config.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|error| AppError::invalid(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_mock_with_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.source.kind, SourceKind::Mock);
        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.source.update_method, UpdateMethod::Patch);
        assert_eq!(config.logging.level, "info");
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_remote_requires_base_url() {
        let error = AppConfig::from_toml_str("[source]\nkind = \"remote\"\n").unwrap_err();
        assert!(matches!(error, AppError::InvalidConfig { .. }));
        assert!(error.to_string().contains("base_url"));
    }

    #[test]
    fn test_resource_section() {
        let config = AppConfig::from_toml_str(
            r#"
            [resources.courses]
            search_fields = ["title"]
            page_size = 10
            default_filters = { status = "all" }

            [[resources.courses.fields]]
            name = "title"
            kind = "text"
            required = true
            maxLength = 80

            [resources.tutors]
            path = "staff/tutors"
            "#,
        )
        .unwrap();

        let courses = config.resource("courses").unwrap();
        assert_eq!(courses.path, "courses");
        assert_eq!(courses.page_size, 10);
        assert_eq!(courses.default_filters.get("status").map(String::as_str), Some("all"));
        assert_eq!(config.resources["courses"].fields[0].max_length, Some(80));

        let tutors = config.resource("tutors").unwrap();
        assert_eq!(tutors.path, "staff/tutors");
        assert_eq!(tutors.page_size, DEFAULT_PAGE_SIZE);

        assert!(matches!(
            config.resource("students"),
            Err(AppError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").is_err());
        assert!(AppConfig::from_toml_str("[source]\ntimeout_secs = 0\n").is_err());
        assert!(AppConfig::from_toml_str("[resources.x]\npage_size = 0\n").is_err());
        assert!(matches!(
            AppConfig::from_toml_str("[source\n"),
            Err(AppError::Toml { .. })
        ));
    }
}
