//! Load schema declarations from JSON: an object mapping schema name to definition.

use crate::config::SchemaDefinition;
use crate::error::SchemaError;
use std::collections::BTreeMap;
use std::path::Path;

pub fn parse_schemas(json: &str) -> Result<BTreeMap<String, SchemaDefinition>, SchemaError> {
    serde_json::from_str(json).map_err(|e| SchemaError::Load(e.to_string()))
}

/// Read and parse a schema file.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<BTreeMap<String, SchemaDefinition>, SchemaError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading schemas");
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SchemaError::Load(format!("{}: {}", path.display(), e)))?;
    parse_schemas(&raw)
}
