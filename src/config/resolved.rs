//! Resolved schema: a definition merged with overrides and completed from the settings.

use crate::config::{validate, PropertyConfig, RelationConfig, RequestFormatter, RestConfig, SchemaDefinition, SyncPolicy};
use crate::error::SchemaError;
use std::collections::{BTreeMap, HashSet};

/// Instance-bound snapshot. Nothing here changes after resolution.
#[derive(Clone, Debug)]
pub struct ResolvedSchema {
    pub name: String,
    pub route: String,
    pub id_property: String,
    pub properties: BTreeMap<String, PropertyConfig>,
    pub relations: BTreeMap<String, RelationConfig>,
    pub is_array: Option<bool>,
    pub flatten_item_route: bool,
    pub data_list_location: String,
    pub data_item_location: String,
    pub request_formatter: Option<RequestFormatter>,
    pub auto_parse: bool,
}

impl ResolvedSchema {
    pub fn is_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn sync_policy(&self, key: &str) -> SyncPolicy {
        self.properties
            .get(key)
            .and_then(|p| p.sync)
            .unwrap_or_default()
    }

    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, p)| p.required == Some(true))
            .map(|(k, _)| k.as_str())
    }

    pub fn relation(&self, name: &str) -> Option<&RelationConfig> {
        self.relations.get(name)
    }
}

/// Complete `definition` from `config`. `registered` is the set of known schema
/// names, consulted only in strict mode.
pub fn resolve(
    name: &str,
    definition: SchemaDefinition,
    config: &RestConfig,
    registered: &HashSet<String>,
) -> Result<ResolvedSchema, SchemaError> {
    validate(name, &definition, config.strict_mode, registered)?;
    let SchemaDefinition {
        route,
        id_property,
        properties,
        relations,
        is_array,
        flatten_item_route,
        data_list_location,
        data_item_location,
        request_formatter,
        auto_parse,
    } = definition;

    Ok(ResolvedSchema {
        name: name.to_string(),
        route: route.unwrap_or_default(),
        id_property: id_property.unwrap_or_else(|| config.id_property.clone()),
        properties,
        relations,
        is_array,
        flatten_item_route: flatten_item_route.unwrap_or(config.flatten_item_route),
        data_list_location: data_list_location.unwrap_or_else(|| config.response_data_location.clone()),
        data_item_location: data_item_location.unwrap_or_else(|| config.response_data_location.clone()),
        request_formatter: request_formatter.or_else(|| config.request_formatter.clone()),
        auto_parse: auto_parse.unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn definition() -> SchemaDefinition {
        SchemaDefinition::with_route("/users")
            .property("id", PropertyConfig::sync(SyncPolicy::Never))
            .property("name", PropertyConfig::default())
    }

    #[test]
    fn fills_defaults_from_config() {
        let config = RestConfig {
            id_property: "uid".into(),
            flatten_item_route: true,
            response_data_location: "response.data".into(),
            ..RestConfig::default()
        };
        let schema = resolve("user", definition(), &config, &HashSet::new()).unwrap();
        assert_eq!(schema.name, "user");
        assert_eq!(schema.id_property, "uid");
        assert!(schema.flatten_item_route);
        assert_eq!(schema.data_list_location, "response.data");
        assert_eq!(schema.data_item_location, "response.data");
        assert!(schema.auto_parse);
        assert_eq!(schema.is_array, None);
    }

    #[test]
    fn declared_values_beat_config() {
        let mut def = definition();
        def.id_property = Some("userId".into());
        def.flatten_item_route = Some(false);
        def.auto_parse = Some(false);
        let config = RestConfig {
            flatten_item_route: true,
            ..RestConfig::default()
        };
        let schema = resolve("user", def, &config, &HashSet::new()).unwrap();
        assert_eq!(schema.id_property, "userId");
        assert!(!schema.flatten_item_route);
        assert!(!schema.auto_parse);
    }

    #[test]
    fn formatter_falls_back_to_config() {
        let config = RestConfig {
            request_formatter: Some(RequestFormatter::new(|data| json!({ "request": data }))),
            ..RestConfig::default()
        };
        let schema = resolve("user", definition(), &config, &HashSet::new()).unwrap();
        let formatted = schema
            .request_formatter
            .as_ref()
            .map(|f| f.format(Map::new()))
            .unwrap_or(Value::Null);
        assert_eq!(formatted, json!({ "request": {} }));
    }

    #[test]
    fn sync_policy_defaults_to_always() {
        let schema = resolve("user", definition(), &RestConfig::default(), &HashSet::new()).unwrap();
        assert_eq!(schema.sync_policy("id"), SyncPolicy::Never);
        assert_eq!(schema.sync_policy("name"), SyncPolicy::Always);
        assert!(schema.is_property("name"));
        assert!(!schema.is_property("nope"));
    }
}
