//! Schema declaration types matching the JSON declaration format, plus the typed deep merge.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::transport::Method;

/// Which outgoing payloads a property takes part in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    #[default]
    Always,
    Never,
    /// Only on POST.
    Create,
    /// Only on PUT and PATCH.
    Update,
}

impl SyncPolicy {
    pub fn allows(self, method: Method) -> bool {
        match self {
            SyncPolicy::Always => true,
            SyncPolicy::Never => false,
            SyncPolicy::Create => method == Method::Post,
            SyncPolicy::Update => matches!(method, Method::Put | Method::Patch),
        }
    }
}

impl Serialize for SyncPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SyncPolicy::Always => serializer.serialize_bool(true),
            SyncPolicy::Never => serializer.serialize_bool(false),
            SyncPolicy::Create => serializer.serialize_str("create"),
            SyncPolicy::Update => serializer.serialize_str("update"),
        }
    }
}

impl<'de> Deserialize<'de> for SyncPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        match v {
            Value::Bool(true) => Ok(SyncPolicy::Always),
            Value::Bool(false) => Ok(SyncPolicy::Never),
            Value::String(s) if s == "create" => Ok(SyncPolicy::Create),
            Value::String(s) if s == "update" => Ok(SyncPolicy::Update),
            other => Err(serde::de::Error::custom(format!(
                "sync must be true, false, \"create\" or \"update\"; got {}",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncPolicy>,
    /// Checked on create when validate-on-sync is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl PropertyConfig {
    pub fn sync(policy: SyncPolicy) -> Self {
        Self {
            sync: Some(policy),
            required: None,
        }
    }

    fn merge(&mut self, other: &PropertyConfig) {
        if other.sync.is_some() {
            self.sync = other.sync;
        }
        if other.required.is_some() {
            self.required = other.required;
        }
    }
}

/// Edge to another schema. With `property` it is a foreign-key relation, otherwise a nested collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_array: Option<bool>,
}

impl RelationConfig {
    pub fn nested(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }

    pub fn foreign_key(resource: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            property: Some(property.into()),
            ..Self::default()
        }
    }

    fn merge(&mut self, other: &RelationConfig) {
        if other.resource.is_some() {
            self.resource = other.resource.clone();
        }
        if other.property.is_some() {
            self.property = other.property.clone();
        }
        if other.flatten.is_some() {
            self.flatten = other.flatten;
        }
        if other.is_array.is_some() {
            self.is_array = other.is_array;
        }
    }
}

/// Transforms the filtered model data into the outgoing request body.
#[derive(Clone)]
pub struct RequestFormatter(Arc<dyn Fn(Map<String, Value>) -> Value + Send + Sync>);

impl RequestFormatter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn format(&self, data: Map<String, Value>) -> Value {
        (self.0)(data)
    }
}

impl fmt::Debug for RequestFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestFormatter(..)")
    }
}

/// Per resource-type declaration. Every field is optional so the same type
/// serves as a registered definition and as a per-instance override.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_property: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyConfig>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_array: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatten_item_route: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_list_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_item_location: Option<String>,
    #[serde(skip)]
    pub request_formatter: Option<RequestFormatter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_parse: Option<bool>,
}

impl SchemaDefinition {
    pub fn with_route(route: impl Into<String>) -> Self {
        Self {
            route: Some(route.into()),
            ..Self::default()
        }
    }

    pub fn property(mut self, name: impl Into<String>, config: PropertyConfig) -> Self {
        self.properties.insert(name.into(), config);
        self
    }

    pub fn relation(mut self, name: impl Into<String>, config: RelationConfig) -> Self {
        self.relations.insert(name.into(), config);
        self
    }

    /// Deep merge: `overrides` wins on conflict, property and relation maps merge key-wise
    /// and their entries field-wise, scalars replace wholesale. Returns a fresh value.
    pub fn merged(&self, overrides: &SchemaDefinition) -> SchemaDefinition {
        let mut out = self.clone();
        out.merge(overrides);
        out
    }

    pub fn merge(&mut self, overrides: &SchemaDefinition) {
        merge_option(&mut self.route, &overrides.route);
        merge_option(&mut self.id_property, &overrides.id_property);
        for (name, prop) in &overrides.properties {
            self.properties.entry(name.clone()).or_default().merge(prop);
        }
        for (name, rel) in &overrides.relations {
            self.relations.entry(name.clone()).or_default().merge(rel);
        }
        merge_option(&mut self.is_array, &overrides.is_array);
        merge_option(&mut self.flatten_item_route, &overrides.flatten_item_route);
        merge_option(&mut self.data_list_location, &overrides.data_list_location);
        merge_option(&mut self.data_item_location, &overrides.data_item_location);
        merge_option(&mut self.request_formatter, &overrides.request_formatter);
        merge_option(&mut self.auto_parse, &overrides.auto_parse);
    }
}

fn merge_option<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> SchemaDefinition {
        SchemaDefinition::with_route("/users")
            .property("id", PropertyConfig::sync(SyncPolicy::Never))
            .property("firstName", PropertyConfig::default())
            .relation("job", RelationConfig::nested("project"))
    }

    #[test]
    fn sync_policy_accepts_declaration_forms() {
        let props: BTreeMap<String, PropertyConfig> = serde_json::from_value(json!({
            "a": {},
            "b": { "sync": false },
            "c": { "sync": "create" },
            "d": { "sync": "update" },
            "e": { "sync": true }
        }))
        .unwrap();
        assert_eq!(props["a"].sync, None);
        assert_eq!(props["b"].sync, Some(SyncPolicy::Never));
        assert_eq!(props["c"].sync, Some(SyncPolicy::Create));
        assert_eq!(props["d"].sync, Some(SyncPolicy::Update));
        assert_eq!(props["e"].sync, Some(SyncPolicy::Always));

        let bad: Result<PropertyConfig, _> = serde_json::from_value(json!({ "sync": "sometimes" }));
        assert!(bad.is_err());
    }

    #[test]
    fn sync_policy_by_method() {
        assert!(SyncPolicy::Create.allows(Method::Post));
        assert!(!SyncPolicy::Create.allows(Method::Put));
        assert!(SyncPolicy::Update.allows(Method::Patch));
        assert!(!SyncPolicy::Update.allows(Method::Post));
        assert!(!SyncPolicy::Never.allows(Method::Post));
        assert!(SyncPolicy::Always.allows(Method::Delete));
    }

    #[test]
    fn merge_is_key_wise_for_maps() {
        let overrides = SchemaDefinition::default()
            .property("lastName", PropertyConfig::sync(SyncPolicy::Update))
            .relation(
                "job",
                RelationConfig {
                    flatten: Some(true),
                    ..RelationConfig::default()
                },
            );
        let merged = user().merged(&overrides);

        assert_eq!(merged.route.as_deref(), Some("/users"));
        assert_eq!(merged.properties.len(), 3);
        assert_eq!(merged.properties["id"].sync, Some(SyncPolicy::Never));
        assert_eq!(merged.properties["lastName"].sync, Some(SyncPolicy::Update));
        assert_eq!(merged.relations["job"].resource.as_deref(), Some("project"));
        assert_eq!(merged.relations["job"].flatten, Some(true));
    }

    #[test]
    fn merge_replaces_scalars_and_leaves_source_untouched() {
        let base = user();
        let merged = base.merged(&SchemaDefinition {
            route: Some("/v1/users".into()),
            is_array: Some(false),
            ..SchemaDefinition::default()
        });
        assert_eq!(merged.route.as_deref(), Some("/v1/users"));
        assert_eq!(merged.is_array, Some(false));
        assert_eq!(base.route.as_deref(), Some("/users"));
        assert_eq!(base.is_array, None);
    }

    #[test]
    fn declaration_uses_camel_case() {
        let def: SchemaDefinition = serde_json::from_value(json!({
            "route": "/projects",
            "idProperty": "projectId",
            "flattenItemRoute": true,
            "dataListLocation": "response.data.projects",
            "relations": { "team": { "resource": "team", "flatten": false } }
        }))
        .unwrap();
        assert_eq!(def.id_property.as_deref(), Some("projectId"));
        assert_eq!(def.flatten_item_route, Some(true));
        assert_eq!(def.data_list_location.as_deref(), Some("response.data.projects"));
        assert_eq!(def.relations["team"].flatten, Some(false));
    }
}
