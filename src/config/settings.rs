//! Process-wide settings consulted when schemas are resolved and models are built.

use crate::config::RequestFormatter;
use crate::error::SchemaError;
use crate::transport::Method;

#[derive(Clone, Debug)]
pub struct RestConfig {
    /// Prefix for every remote route.
    pub base_url: String,
    /// Default dotted path of the payload inside a response envelope.
    pub response_data_location: String,
    /// Default `idProperty` for schemas that don't declare one.
    pub id_property: String,
    /// Verb used by `sync()` for remote models.
    pub update_method: Method,
    pub flatten_item_route: bool,
    pub strict_mode: bool,
    /// Applied to outgoing payloads when a schema has no formatter of its own.
    pub request_formatter: Option<RequestFormatter>,
    pub validate_on_sync: bool,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            response_data_location: String::new(),
            id_property: "id".into(),
            update_method: Method::Put,
            flatten_item_route: false,
            strict_mode: false,
            request_formatter: None,
            validate_on_sync: true,
        }
    }
}

impl RestConfig {
    /// Defaults overlaid with `REST_*` environment variables.
    pub fn from_env() -> Result<Self, SchemaError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SchemaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup("REST_BASE_URL") {
            config.base_url = v;
        }
        if let Some(v) = lookup("REST_RESPONSE_DATA_LOCATION") {
            config.response_data_location = v;
        }
        if let Some(v) = lookup("REST_ID_PROPERTY") {
            config.id_property = v;
        }
        if let Some(v) = lookup("REST_UPDATE_METHOD") {
            config.update_method = v.parse().map_err(|_| SchemaError::Setting {
                key: "REST_UPDATE_METHOD",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("REST_FLATTEN_ITEM_ROUTE") {
            config.flatten_item_route = parse_flag("REST_FLATTEN_ITEM_ROUTE", &v)?;
        }
        if let Some(v) = lookup("REST_STRICT_MODE") {
            config.strict_mode = parse_flag("REST_STRICT_MODE", &v)?;
        }
        if let Some(v) = lookup("REST_VALIDATE_ON_SYNC") {
            config.validate_on_sync = parse_flag("REST_VALIDATE_ON_SYNC", &v)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, SchemaError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SchemaError::Setting {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = RestConfig::default();
        assert_eq!(config.base_url, "");
        assert_eq!(config.id_property, "id");
        assert_eq!(config.update_method, Method::Put);
        assert!(!config.flatten_item_route);
        assert!(!config.strict_mode);
        assert!(config.validate_on_sync);
    }

    #[test]
    fn reads_overrides() {
        let env: HashMap<&str, &str> = [
            ("REST_BASE_URL", "/api"),
            ("REST_ID_PROPERTY", "uid"),
            ("REST_UPDATE_METHOD", "patch"),
            ("REST_FLATTEN_ITEM_ROUTE", "true"),
            ("REST_STRICT_MODE", "1"),
        ]
        .into_iter()
        .collect();
        let config = RestConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url, "/api");
        assert_eq!(config.id_property, "uid");
        assert_eq!(config.update_method, Method::Patch);
        assert!(config.flatten_item_route);
        assert!(config.strict_mode);
    }

    #[test]
    fn rejects_bad_values() {
        let err = RestConfig::from_lookup(|k| (k == "REST_UPDATE_METHOD").then(|| "FETCH".to_string()))
            .unwrap_err();
        assert!(matches!(err, SchemaError::Setting { key: "REST_UPDATE_METHOD", .. }));

        let err = RestConfig::from_lookup(|k| (k == "REST_STRICT_MODE").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, SchemaError::Setting { key: "REST_STRICT_MODE", .. }));
    }
}
