//! Relation traversal: foreign-key lookups and nested collection routes.

use super::{id_segment, join_id, Model};
use crate::config::{RelationConfig, SchemaDefinition};
use crate::error::{RestError, SchemaError};
use crate::fetch::{Fetch, Lookup};
use crate::transport::{HttpRequest, Method};

impl Model {
    /// Prepare a read of `name`. Schema and relation problems fail here;
    /// transport failures surface from [`Fetch::send`].
    ///
    /// A foreign-key relation reads the related record whose id is this
    /// model's `property` value. A nested relation reads
    /// `<self route><related route>[/<id>]`, or just `<related route>[/<id>]`
    /// when flattened. The response is read as a list or a single item by, in
    /// order: `force_is_array`, the relation's `isArray`, the related schema's
    /// `isArray`, and finally whether an id was given.
    pub fn get_relation(&mut self, name: &str, lookup: impl Into<Lookup>) -> Result<Fetch, RestError> {
        let relation = self
            .schema
            .relation(name)
            .cloned()
            .ok_or_else(|| RestError::UndefinedRelation(name.to_string()))?;
        let resource = relation.resource.clone().ok_or_else(|| SchemaError::Invalid {
            schema: self.schema.name.clone(),
            reason: format!("relation '{}' has no resource", name),
        })?;
        let lookup = lookup.into();
        let forced = self.force_is_array.take();

        match &relation.property {
            Some(property) => self.foreign_key_fetch(name, &relation, &resource, property, forced),
            None => self.nested_fetch(&relation, &resource, lookup, forced),
        }
    }

    /// Route the related records of a nested relation live under, before any id.
    pub fn nested_route(&self, relation: &RelationConfig, related_route: &str, related_flatten: bool) -> String {
        if relation.flatten.unwrap_or(related_flatten) {
            related_route.to_string()
        } else {
            format!("{}{}", self.self_route(false), related_route)
        }
    }

    fn foreign_key_fetch(
        &self,
        name: &str,
        relation: &RelationConfig,
        resource: &str,
        property: &str,
        forced: Option<bool>,
    ) -> Result<Fetch, RestError> {
        let id = self
            .data
            .get(property)
            .and_then(id_segment)
            .ok_or_else(|| RestError::MissingForeignKey {
                relation: name.to_string(),
                property: property.to_string(),
            })?;
        let state = self.state().clone();
        let schema = state.resolve(resource, None)?;
        let is_array = forced.or(relation.is_array).or(schema.is_array).unwrap_or(false);
        let url = format!("{}{}", state.config().base_url, join_id(&schema.route, &id));
        Ok(Fetch::new(state, schema, HttpRequest::new(Method::Get, url), is_array))
    }

    fn nested_fetch(
        &self,
        relation: &RelationConfig,
        resource: &str,
        lookup: Lookup,
        forced: Option<bool>,
    ) -> Result<Fetch, RestError> {
        let state = self.state().clone();
        let related = state.resolve(resource, None)?;
        let collection_route = self.nested_route(relation, &related.route, related.flatten_item_route);

        // Records read through the relation keep the nested route as their own.
        let schema = state.resolve(resource, Some(&SchemaDefinition::with_route(collection_route.clone())))?;

        let structural_single = lookup.id().is_some();
        let is_array = forced
            .or(relation.is_array)
            .or(schema.is_array)
            .unwrap_or(!structural_single);

        let route = match lookup.id() {
            Some(id) => join_id(&collection_route, id),
            None => collection_route,
        };
        let mut request = HttpRequest::new(Method::Get, format!("{}{}", state.config().base_url, route));
        if let Lookup::Params(params) = lookup {
            request.params = params;
        }
        Ok(Fetch::new(state, schema, request, is_array))
    }
}
