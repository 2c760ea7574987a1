//! Shared context threaded into every model and repository: settings, schema registry, transport.

use crate::config::{resolve, ResolvedSchema, RestConfig, SchemaDefinition};
use crate::error::{RestError, SchemaError};
use crate::model::Model;
use crate::registry::SchemaRegistry;
use crate::repository::Repository;
use crate::transport::Transport;
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct RestState {
    /// Written rarely (usually at startup); every read takes a snapshot.
    config: Arc<RwLock<RestConfig>>,
    schemas: Arc<SchemaRegistry>,
    transport: Arc<dyn Transport>,
}

impl RestState {
    pub fn new(config: RestConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            schemas: Arc::new(SchemaRegistry::new()),
            transport,
        }
    }

    pub fn config(&self) -> RestConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn configure<F>(&self, f: F)
    where
        F: FnOnce(&mut RestConfig),
    {
        let mut guard = self.config.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Look up `name`, merge `overrides` and complete it from the current settings.
    pub fn resolve(&self, name: &str, overrides: Option<&SchemaDefinition>) -> Result<ResolvedSchema, SchemaError> {
        let definition = self.schemas.get(name, overrides)?;
        let config = self.config();
        let registered = if config.strict_mode {
            self.schemas.names()
        } else {
            Default::default()
        };
        resolve(name, definition, &config, &registered)
    }

    pub fn model(
        &self,
        resource: &str,
        initial: Map<String, Value>,
        remote: bool,
        overrides: Option<&SchemaDefinition>,
    ) -> Result<Model, RestError> {
        Model::new(self, resource, initial, remote, overrides)
    }

    pub fn repository(&self, resource: &str, overrides: Option<SchemaDefinition>) -> Result<Repository, RestError> {
        Repository::new(self, resource, overrides)
    }
}
