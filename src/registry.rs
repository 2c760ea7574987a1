//! Schema registry: named definitions, resolved on demand against overrides.

use crate::config::SchemaDefinition;
use crate::error::SchemaError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, SchemaDefinition>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition` under `name`, replacing any earlier definition.
    pub fn add(&self, name: impl Into<String>, definition: SchemaDefinition) {
        let name = name.into();
        tracing::debug!(schema = %name, "schema registered");
        self.schemas
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name, definition);
    }

    pub fn add_all(&self, definitions: BTreeMap<String, SchemaDefinition>) {
        for (name, definition) in definitions {
            self.add(name, definition);
        }
    }

    /// Registered definition deep-merged with `overrides`. The result is a fresh
    /// value; mutating it never reaches the registration.
    pub fn get(&self, name: &str, overrides: Option<&SchemaDefinition>) -> Result<SchemaDefinition, SchemaError> {
        let schemas = self.schemas.read().unwrap_or_else(|e| e.into_inner());
        let registered = schemas
            .get(name)
            .ok_or_else(|| SchemaError::Unknown(name.to_string()))?;
        Ok(match overrides {
            Some(o) => registered.merged(o),
            None => registered.clone(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    pub fn names(&self) -> HashSet<String> {
        self.schemas
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}
