//! Schema checks run at resolution time.

use crate::config::SchemaDefinition;
use crate::error::SchemaError;
use std::collections::HashSet;

/// A route is always required. In strict mode every relation must also name a
/// registered resource.
pub fn validate(
    name: &str,
    definition: &SchemaDefinition,
    strict: bool,
    registered: &HashSet<String>,
) -> Result<(), SchemaError> {
    let invalid = |reason: String| SchemaError::Invalid {
        schema: name.to_string(),
        reason,
    };

    match definition.route.as_deref() {
        None => return Err(invalid("route is required".into())),
        Some(r) if !r.is_empty() && !r.starts_with('/') => {
            return Err(invalid(format!("route '{}' must start with '/'", r)));
        }
        _ => {}
    }

    if !strict {
        return Ok(());
    }

    for (rel_name, rel) in &definition.relations {
        let resource = rel
            .resource
            .as_deref()
            .ok_or_else(|| invalid(format!("relation '{}' has no resource", rel_name)))?;
        if !registered.contains(resource) {
            tracing::warn!(schema = %name, relation = %rel_name, resource = %resource, "relation to unregistered schema");
            return Err(invalid(format!(
                "relation '{}' references unknown schema '{}'",
                rel_name, resource
            )));
        }
    }
    if let Some(id) = definition.id_property.as_deref() {
        if !definition.properties.is_empty() && !definition.properties.contains_key(id) {
            tracing::warn!(schema = %name, id_property = %id, "id property not among declared properties");
            return Err(invalid(format!("id property '{}' is not declared", id)));
        }
    }
    Ok(())
}
