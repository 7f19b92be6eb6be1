//! Document rendering
//!
//! The [`Renderer`] trait is the seam between the mapper and whatever turns
//! a template plus flattened records into the final document.
//! [`JsonApiRenderer`] is the bundled JSON-API 1.0 implementation.

use crate::links::identifier;
use crate::options::KeyFn;
use crate::template::{RelationTemplate, SerializerOptions, Template};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Errors raised while rendering a document
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Expected a resource object at {path}, found {found}")]
    NotAnObject { path: String, found: String },
}

/// Turns a template and flattened records into a document
pub trait Renderer {
    fn render(
        &self,
        type_name: &str,
        options: &SerializerOptions,
        payload: &Value,
    ) -> Result<Value, RenderError>;
}

/// JSON-API 1.0 renderer with a deduplicated `included` array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonApiRenderer;

impl Renderer for JsonApiRenderer {
    fn render(
        &self,
        type_name: &str,
        options: &SerializerOptions,
        payload: &Value,
    ) -> Result<Value, RenderError> {
        let mut state = RenderState::new(options);

        let data = match payload {
            Value::Null => Value::Null,
            Value::Array(records) => Value::Array(
                records
                    .iter()
                    .enumerate()
                    .map(|(idx, record)| state.primary(type_name, record, &format!("data[{}]", idx)))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            record => state.primary(type_name, record, "data")?,
        };

        let mut document = Map::new();
        if let Some(links) = &options.top_level_links {
            document.insert("links".to_string(), Value::Object(links.evaluate()));
        }
        document.insert("data".to_string(), data);
        if !state.included.is_empty() {
            document.insert("included".to_string(), Value::Array(state.included));
        }
        if let Some(meta) = &options.meta {
            document.insert("meta".to_string(), meta.clone());
        }

        tracing::debug!("Rendered {} document", type_name);
        Ok(Value::Object(document))
    }
}

/// Mutable state of one render: the compound document being collected
struct RenderState<'a> {
    options: &'a SerializerOptions,
    included: Vec<Value>,
    /// `(type, id)` -> position in `included`
    index: HashMap<(String, String), usize>,
}

impl<'a> RenderState<'a> {
    fn new(options: &'a SerializerOptions) -> Self {
        Self {
            options,
            included: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn primary(&mut self, type_name: &str, record: &Value, path: &str) -> Result<Value, RenderError> {
        let options = self.options;
        let record_map = as_object(record, path)?;
        let resource_type = (options.type_for_attribute)(type_name);

        let mut resource = self.identity(&resource_type, identifier(record, "id"));
        let attributes = self.attributes(record_map, &options.template);
        if !attributes.is_empty() {
            resource.insert("attributes".to_string(), Value::Object(attributes));
        }

        let relationships = self.relationships(record, &options.template, path)?;
        if !relationships.is_empty() {
            resource.insert("relationships".to_string(), Value::Object(relationships));
        }

        if let Some(data_links) = &options.data_links {
            let links = data_links.evaluate(record);
            if !links.is_empty() {
                resource.insert("links".to_string(), Value::Object(links));
            }
        }

        Ok(Value::Object(resource))
    }

    fn identity(&self, resource_type: &str, id: Option<String>) -> Map<String, Value> {
        let mut resource = Map::new();
        resource.insert("type".to_string(), Value::String(resource_type.to_string()));
        if let Some(id) = id {
            resource.insert("id".to_string(), Value::String(id));
        }
        resource
    }

    /// Template attributes present on the record, keys renamed
    fn attributes(&self, record: &Map<String, Value>, template: &Template) -> Map<String, Value> {
        let key_fn = &self.options.key_for_attribute;
        template
            .attributes
            .iter()
            .filter_map(|attr| {
                record
                    .get(attr)
                    .map(|value| (key_fn(attr), rename_keys(value, key_fn)))
            })
            .collect()
    }

    fn relationships(
        &mut self,
        record: &Value,
        template: &Template,
        path: &str,
    ) -> Result<Map<String, Value>, RenderError> {
        let mut relationships = Map::new();

        for relation in &template.relations {
            // Relations not loaded on this record are left out entirely
            let Some(related) = record.get(&relation.name) else {
                continue;
            };
            let rel_path = format!("{}.{}", path, relation.name);

            let data = match related {
                Value::Null => Value::Null,
                Value::Array(items) => {
                    let mut linkages = Vec::with_capacity(items.len());
                    for (idx, item) in items.iter().enumerate() {
                        let linkage = self.link(relation, item, &format!("{}[{}]", rel_path, idx))?;
                        if !linkage.is_null() {
                            linkages.push(linkage);
                        }
                    }
                    Value::Array(linkages)
                }
                item => self.link(relation, item, &rel_path)?,
            };

            let mut relationship = Map::new();
            relationship.insert("data".to_string(), data);
            if let Some(links) = &relation.relationship_links {
                let links = links.evaluate(record);
                if !links.is_empty() {
                    relationship.insert("links".to_string(), Value::Object(links));
                }
            }

            let key = (self.options.key_for_attribute)(&relation.name);
            relationships.insert(key, Value::Object(relationship));
        }

        Ok(relationships)
    }

    /// Resource linkage for a related record, adding it to `included`
    fn link(
        &mut self,
        relation: &RelationTemplate,
        record: &Value,
        path: &str,
    ) -> Result<Value, RenderError> {
        let record_map = as_object(record, path)?;
        let Some(id) = identifier(record, &relation.reference) else {
            return Ok(Value::Null);
        };
        let resource_type = (self.options.type_for_attribute)(&relation.name);
        let linkage = Value::Object(self.identity(&resource_type, Some(id.clone())));

        if !relation.included {
            return Ok(linkage);
        }

        let mut resource = self.identity(&resource_type, Some(id.clone()));
        let attributes = self.attributes(record_map, &relation.template);
        if !attributes.is_empty() {
            resource.insert("attributes".to_string(), Value::Object(attributes));
        }
        if let Some(included_links) = &relation.included_links {
            let links = included_links.evaluate(record);
            if !links.is_empty() {
                resource.insert("links".to_string(), Value::Object(links));
            }
        }

        // Parent goes in before the records it references
        let position = self.push_included((resource_type, id), resource);
        let relationships = self.relationships(record, &relation.template, path)?;
        if !relationships.is_empty() {
            merge_section(&mut self.included[position], "relationships", relationships);
        }

        Ok(linkage)
    }

    /// Add a resource to `included`, merging into an earlier copy if present
    fn push_included(&mut self, key: (String, String), resource: Map<String, Value>) -> usize {
        if let Some(&position) = self.index.get(&key) {
            let existing = &mut self.included[position];
            for (section, value) in resource {
                match value {
                    Value::Object(fields) if section != "links" => {
                        merge_section(existing, &section, fields);
                    }
                    _ => {}
                }
            }
            return position;
        }

        self.included.push(Value::Object(resource));
        let position = self.included.len() - 1;
        self.index.insert(key, position);
        position
    }
}

/// Insert `fields` into the object stored under `section`
fn merge_section(resource: &mut Value, section: &str, fields: Map<String, Value>) {
    let Value::Object(resource) = resource else {
        return;
    };
    match resource.get_mut(section) {
        Some(Value::Object(existing)) => existing.extend(fields),
        _ => {
            resource.insert(section.to_string(), Value::Object(fields));
        }
    }
}

/// Apply the key function to nested object keys of an attribute value
fn rename_keys(value: &Value, key_fn: &KeyFn) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (key_fn(k), rename_keys(v, key_fn)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| rename_keys(v, key_fn)).collect()),
        other => other.clone(),
    }
}

fn as_object<'v>(record: &'v Value, path: &str) -> Result<&'v Map<String, Value>, RenderError> {
    record.as_object().ok_or_else(|| RenderError::NotAnObject {
        path: path.to_string(),
        found: record.to_string(),
    })
}
