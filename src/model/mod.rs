//! Model engine: a schema-bound property bag with dirty tracking and remote state.
//!
//! Sync and destroy live in [`sync`], relation traversal and nested routes in [`relation`].

pub mod relation;
pub mod sync;

use crate::config::{ResolvedSchema, SchemaDefinition};
use crate::error::{RestError, SchemaError};
use crate::state::RestState;
use serde_json::{Map, Value};
use std::fmt;

/// One resource record.
///
/// The schema is bound at construction and never changes for the lifetime of
/// the instance. `data` only ever holds keys the schema declares.
pub struct Model {
    state: RestState,
    schema: ResolvedSchema,
    data: Map<String, Value>,
    /// In order of first mutation.
    dirty: Vec<String>,
    remote: bool,
    /// One-shot: taken by the next `get_relation` call.
    force_is_array: Option<bool>,
}

impl Model {
    /// Resolve `resource` (merged with `overrides`) and build a model from `initial`.
    ///
    /// The model is remote only when `remote` is set *and* `initial` carries a
    /// non-empty id. A local model starts with every supplied property dirty.
    pub fn new(
        state: &RestState,
        resource: &str,
        initial: Map<String, Value>,
        remote: bool,
        overrides: Option<&SchemaDefinition>,
    ) -> Result<Self, RestError> {
        let schema = state.resolve(resource, overrides)?;
        Ok(Self::with_schema(state.clone(), schema, initial, remote))
    }

    pub(crate) fn with_schema(state: RestState, schema: ResolvedSchema, initial: Map<String, Value>, remote: bool) -> Self {
        let data = declared_only(&schema, initial);
        let remote = remote && data.get(&schema.id_property).and_then(id_segment).is_some();
        let dirty = if remote { Vec::new() } else { data.keys().cloned().collect() };
        Self {
            state,
            schema,
            data,
            dirty,
            remote,
            force_is_array: None,
        }
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    pub fn resource_name(&self) -> &str {
        &self.schema.name
    }

    /// Always fails: a model's schema is bound once, at construction.
    pub fn set_schema(&mut self, _schema: SchemaDefinition) -> Result<(), SchemaError> {
        Err(SchemaError::AlreadySet)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Store `value` under a declared `key`; undeclared keys are ignored.
    /// A changed value marks the key dirty.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if !self.schema.is_property(key) {
            tracing::debug!(schema = %self.schema.name, key = %key, "ignoring undeclared property");
            return self;
        }
        if self.data.get(key) != Some(&value) {
            self.mark_dirty(key);
        }
        self.data.insert(key.to_string(), value);
        self
    }

    /// Merge `values` into the data, key by key, as [`set`](Self::set) does.
    pub fn set_all(&mut self, values: Map<String, Value>) -> &mut Self {
        for (key, value) in values {
            self.set(&key, value);
        }
        self
    }

    pub fn is_property(&self, key: &str) -> bool {
        self.schema.is_property(key)
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_properties(&self) -> &[String] {
        &self.dirty
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }

    pub fn id(&self) -> Option<&Value> {
        self.data.get(&self.schema.id_property)
    }

    pub fn to_json(&self) -> Map<String, Value> {
        self.data.clone()
    }

    /// Schema route, plus `/<id>` when remote, prefixed with the base url when `include_base`.
    pub fn self_route(&self, include_base: bool) -> String {
        let mut route = self.schema.route.clone();
        if self.remote {
            if let Some(id) = self.id().and_then(id_segment) {
                route = join_id(&route, &id);
            }
        }
        if include_base {
            format!("{}{}", self.state.config().base_url, route)
        } else {
            route
        }
    }

    /// Read the next relation response as a list (`true`) or single item (`false`),
    /// whatever the route suggests. Consumed by the next `get_relation`.
    pub fn force_is_array(&mut self, value: bool) -> &mut Self {
        self.force_is_array = Some(value);
        self
    }

    pub(crate) fn state(&self) -> &RestState {
        &self.state
    }

    /// Take server data as truth: merge declared keys without dirtying them.
    pub(crate) fn absorb(&mut self, values: Map<String, Value>) {
        let values = declared_only(&self.schema, values);
        self.data.extend(values);
    }

    fn mark_dirty(&mut self, key: &str) {
        if !self.dirty.iter().any(|k| k == key) {
            self.dirty.push(key.to_string());
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("schema", &self.schema.name)
            .field("data", &self.data)
            .field("dirty", &self.dirty)
            .field("remote", &self.remote)
            .finish()
    }
}

fn declared_only(schema: &ResolvedSchema, values: Map<String, Value>) -> Map<String, Value> {
    values
        .into_iter()
        .filter(|(k, _)| {
            let keep = schema.is_property(k);
            if !keep {
                tracing::debug!(schema = %schema.name, key = %k, "dropping undeclared property");
            }
            keep
        })
        .collect()
}

/// Text form of an id value for use in a route; `None` for null, empty strings and non-scalars.
pub(crate) fn id_segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn join_id(route: &str, id: &str) -> String {
    format!("{}/{}", route.trim_end_matches('/'), id)
}
