//! Campus admin backoffice wiring.
//!
//! [`Backoffice`] turns an [`AppConfig`] into ready-to-use list screens.
//! Screens ask for an adapter by resource name and never learn whether it
//! talks to the REST backend or to in-memory fixtures.

pub mod config;
pub mod error;
pub mod logging;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use campus_list::ListPage;
use campus_model::{FieldSpec, Fields};
use campus_source::{DataSourceAdapter, MockAdapter, RemoteAdapter, SessionContext};
use campus_validate::{FormValidator, ValidationResult};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub use config::{AppConfig, LoggingConfig, ResourceConfig, SourceConfig, SourceKind};
pub use error::{AppError, Result};
pub use logging::{LogConfig, LogFormat, LoggingError, init_logging};

/// Shared adapter handle.
pub type SharedAdapter = Arc<dyn DataSourceAdapter>;

/// Entry point of the admin backoffice.
pub struct Backoffice {
    config: AppConfig,
    session: Arc<SessionContext>,
    fixtures: Map<String, Value>,
    adapters: Mutex<HashMap<String, SharedAdapter>>,
}

impl Backoffice {
    /// Build from a config, using the process-wide session.
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_session(config, SessionContext::shared())
    }

    /// Load the config file at `path` and build.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::new(AppConfig::load(path)?)
    }

    /// Build with an explicit session.
    pub fn with_session(config: AppConfig, session: Arc<SessionContext>) -> Result<Self> {
        config.validate()?;
        let fixtures = match (config.source.kind, &config.source.fixtures) {
            (SourceKind::Mock, Some(path)) => load_fixtures(path)?,
            _ => Map::new(),
        };
        info!(
            source = ?config.source.kind,
            resources = config.resources.len(),
            "Backoffice configured"
        );
        Ok(Self {
            config,
            session,
            fixtures,
            adapters: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Adapter for `resource`, created on first use and shared afterwards.
    pub fn adapter(&self, resource: &str) -> Result<SharedAdapter> {
        let mut adapters = self.adapters.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(adapter) = adapters.get(resource) {
            return Ok(Arc::clone(adapter));
        }

        let adapter = self.build_adapter(resource)?;
        adapters.insert(resource.to_string(), Arc::clone(&adapter));
        Ok(adapter)
    }

    /// Fresh list screen state for `resource`.
    pub fn list_page(&self, resource: &str) -> Result<ListPage<dyn DataSourceAdapter>> {
        Ok(ListPage::new(self.adapter(resource)?))
    }

    /// Create/edit form schema of `resource`.
    pub fn form_fields(&self, resource: &str) -> Result<&[FieldSpec]> {
        self.config
            .resources
            .get(resource)
            .map(|config| config.fields.as_slice())
            .ok_or_else(|| AppError::UnknownResource {
                name: resource.to_string(),
            })
    }

    /// Validate a create/edit payload against the schema of `resource`.
    pub fn validate_form(
        &self,
        resource: &str,
        validator: &FormValidator,
        payload: &Fields,
    ) -> Result<ValidationResult> {
        Ok(validator.validate_fields(payload, self.form_fields(resource)?))
    }

    fn build_adapter(&self, resource: &str) -> Result<SharedAdapter> {
        let spec = self.config.resource(resource)?;
        match self.config.source.kind {
            SourceKind::Remote => {
                let remote = self.config.source.remote()?;
                debug!(resource, base_url = %remote.base_url, "Creating remote adapter");
                let adapter = RemoteAdapter::new(&remote, spec, Arc::clone(&self.session))?;
                Ok(Arc::new(adapter))
            }
            SourceKind::Mock => {
                let body = self
                    .fixtures
                    .get(resource)
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new()));
                let adapter = MockAdapter::from_json(spec, body)?
                    .with_latency(self.config.source.latency());
                debug!(resource, "Creating mock adapter");
                Ok(Arc::new(adapter))
            }
        }
    }
}

impl std::fmt::Debug for Backoffice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backoffice")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("fixtures", &self.fixtures.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Read a fixture file: a JSON object keyed by resource name.
fn load_fixtures(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path).map_err(|source| AppError::io(path, source))?;
    let value: Value = serde_json::from_str(&content).map_err(|source| AppError::Fixtures {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AppError::invalid(format!(
            "fixtures in {} must be an object keyed by resource, found {}",
            path.display(),
            campus_model::item::json_type_name(&other)
        ))),
    }
}
