//! Create/update/delete against the model's own route.

use super::Model;
use crate::error::RestError;
use crate::response::lookup_path;
use crate::transport::{HttpRequest, Method};
use serde_json::{Map, Value};

impl Model {
    /// Verb `sync()` would use: explicit wins, else POST for local models and
    /// the configured update verb for remote ones.
    pub fn sync_method(&self, method: Option<Method>) -> Method {
        method.unwrap_or_else(|| {
            if self.is_remote() {
                self.state().config().update_method
            } else {
                Method::Post
            }
        })
    }

    /// Data filtered to the properties whose sync policy allows `method`.
    pub fn sync_payload(&self, method: Method) -> Map<String, Value> {
        self.data
            .iter()
            .filter(|(k, _)| self.schema.sync_policy(k).allows(method))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Push local state to the server. On success the response item is merged
    /// in, dirty tracking is cleared and the model becomes remote. On failure
    /// nothing changes.
    pub async fn sync(&mut self, method: Option<Method>) -> Result<Value, RestError> {
        let method = self.sync_method(method);
        let payload = self.sync_payload(method);
        if method == Method::Post && self.state().config().validate_on_sync {
            self.check_required(&payload)?;
        }
        let body = match &self.schema.request_formatter {
            Some(formatter) => formatter.format(payload),
            None => Value::Object(payload),
        };
        let request = HttpRequest::new(method, self.self_route(true)).with_data(body);
        tracing::debug!(schema = %self.schema.name, method = %method, url = %request.url, "sync");

        let raw = self.state().transport().request(request).await?;

        if self.schema.auto_parse {
            if let Some(Value::Object(item)) = lookup_path(&raw, &self.schema.data_item_location) {
                self.absorb(item.clone());
            }
        }
        self.dirty.clear();
        self.remote = true;
        Ok(raw)
    }

    /// DELETE the remote record. On success the model turns local, keeps its
    /// data minus the id, and has nothing dirty.
    pub async fn destroy(&mut self) -> Result<Value, RestError> {
        if !self.is_remote() && self.state().config().strict_mode {
            tracing::warn!(schema = %self.schema.name, "destroy on a model with no remote record");
            return Err(RestError::NotPersisted);
        }
        let request = HttpRequest::new(Method::Delete, self.self_route(true));
        tracing::debug!(schema = %self.schema.name, url = %request.url, "destroy");

        let raw = self.state().transport().request(request).await?;

        self.remote = false;
        let id_property = self.schema.id_property.clone();
        self.data.remove(&id_property);
        self.dirty.clear();
        Ok(raw)
    }

    fn check_required(&self, payload: &Map<String, Value>) -> Result<(), RestError> {
        for key in self.schema.required_properties() {
            if payload.get(key).map_or(true, Value::is_null) {
                return Err(RestError::Validation(format!("{} is required", key)));
            }
        }
        Ok(())
    }
}
