//! Resource Loader
//!
//! Builds mapper input from a JSON description of ORM records.

use super::model::{Data, Resource, DEFAULT_ID_ATTRIBUTE};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceDef {
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default)]
    id_attribute: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
    #[serde(default)]
    virtuals: Map<String, Value>,
    /// Values are an object, an array of objects, or null
    #[serde(default)]
    relations: Map<String, Value>,
    #[serde(default)]
    visible: Option<Vec<String>>,
    #[serde(default)]
    hidden: Option<Vec<String>>,
}

/// Parse mapper input from a JSON string
pub fn load_data_str(content: &str) -> Result<Option<Data>> {
    let value: Value = serde_json::from_str(content).context("Failed to parse input JSON")?;
    load_data(value)
}

/// Convert a JSON value into mapper input.
/// An array is a collection, an object a single resource, null is absent.
pub fn load_data(value: Value) -> Result<Option<Data>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let resources = items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    load_resource(item).with_context(|| format!("Invalid resource at index {}", idx))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Data::Set(resources)))
        }
        Value::Object(_) => Ok(Some(Data::Single(load_resource(value)?))),
        other => Err(anyhow::anyhow!(
            "Expected an object, an array or null, found: {}",
            other
        )),
    }
}

fn load_resource(value: Value) -> Result<Resource> {
    let def: ResourceDef =
        serde_json::from_value(value).context("Failed to parse resource definition")?;

    let mut resource = Resource::new(Value::Object(def.attributes)).with_id_attribute(
        def.id_attribute
            .as_deref()
            .unwrap_or(DEFAULT_ID_ATTRIBUTE),
    );

    if let Some(table_name) = def.table_name {
        resource = resource.with_table_name(&table_name);
    }
    for (name, value) in def.virtuals {
        resource = resource.with_virtual(&name, value);
    }
    if let Some(visible) = def.visible {
        resource = resource.with_visible(visible);
    }
    if let Some(hidden) = def.hidden {
        resource = resource.with_hidden(hidden);
    }

    for (name, related) in def.relations {
        let related =
            load_data(related).with_context(|| format!("Invalid relation: {}", name))?;
        resource.set_relation(&name, related);
    }

    Ok(resource)
}
