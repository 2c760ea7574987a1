//! Repository: model factory and collection queries for one schema.

use crate::config::{ResolvedSchema, SchemaDefinition};
use crate::error::RestError;
use crate::fetch::{Fetch, Lookup};
use crate::model::{join_id, Model};
use crate::state::RestState;
use crate::transport::{HttpRequest, Method};
use serde_json::{Map, Value};

pub struct Repository {
    state: RestState,
    schema: ResolvedSchema,
    /// One-shot: taken by the next `find`.
    force_is_array: Option<bool>,
}

impl Repository {
    pub fn new(state: &RestState, resource: &str, overrides: Option<SchemaDefinition>) -> Result<Self, RestError> {
        let schema = state.resolve(resource, overrides.as_ref())?;
        Ok(Self {
            state: state.clone(),
            schema,
            force_is_array: None,
        })
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    pub fn resource_name(&self) -> &str {
        &self.schema.name
    }

    /// Route without the base url, e.g. `/users`.
    pub fn route(&self) -> &str {
        &self.schema.route
    }

    pub fn full_route(&self) -> String {
        format!("{}{}", self.state.config().base_url, self.schema.route)
    }

    /// New model bound to this repository's schema.
    pub fn create(&self, initial: Map<String, Value>, remote: bool) -> Model {
        Model::with_schema(self.state.clone(), self.schema.clone(), initial, remote)
    }

    /// Read the next `find` response as a list (`true`) or single item (`false`).
    pub fn force_is_array(&mut self, value: bool) -> &mut Self {
        self.force_is_array = Some(value);
        self
    }

    /// Prepare a read of the collection. An id reads one record (the route
    /// keeps only its last segment when `flattenItemRoute` is set); parameters
    /// become the query string. Add headers or POST-as-query data on the
    /// returned [`Fetch`].
    pub fn find(&mut self, lookup: impl Into<Lookup>) -> Fetch {
        let lookup = lookup.into();
        let base_url = self.state.config().base_url;

        let url = match lookup.id() {
            Some(id) => {
                let route = if self.schema.flatten_item_route {
                    last_segment(&self.schema.route)
                } else {
                    self.schema.route.as_str()
                };
                format!("{}{}", base_url, join_id(route, id))
            }
            None => format!("{}{}", base_url, self.schema.route),
        };
        let is_array = self
            .force_is_array
            .take()
            .or(self.schema.is_array)
            .unwrap_or(lookup.id().is_none());

        let mut request = HttpRequest::new(Method::Get, url);
        if let Lookup::Params(params) = lookup {
            request.params = params;
        }
        Fetch::new(self.state.clone(), self.schema.clone(), request, is_array)
    }
}

/// `/users/1/projects` → `/projects`.
fn last_segment(route: &str) -> &str {
    let trimmed = route.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i..],
        None => trimmed,
    }
}
