//! Resource Model
//!
//! The read-only view of ORM records consumed by the mapper.

use serde_json::{Map, Value};

/// Default attribute holding the identifier
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Mapper input: one resource or an ordered collection of them
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Single(Resource),
    Set(Vec<Resource>),
}

impl Data {
    /// Number of resources at this level
    pub fn len(&self) -> usize {
        match self {
            Data::Single(_) => 1,
            Data::Set(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Resource> for Data {
    fn from(resource: Resource) -> Self {
        Data::Single(resource)
    }
}

impl From<Vec<Resource>> for Data {
    fn from(items: Vec<Resource>) -> Self {
        Data::Set(items)
    }
}

/// A single ORM record with its loaded relations
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    table_name: Option<String>,
    id_attribute: String,
    attributes: Map<String, Value>,
    virtuals: Map<String, Value>,
    /// Loaded relations in load order. `None` is a relation loaded as empty.
    relations: Vec<(String, Option<Data>)>,
    visible: Option<Vec<String>>,
    hidden: Option<Vec<String>>,
}

impl Resource {
    /// Create a resource from a JSON object of attributes.
    /// Non-object values produce a resource without attributes.
    pub fn new(attributes: Value) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self {
            table_name: None,
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            attributes,
            virtuals: Map::new(),
            relations: Vec::new(),
            visible: None,
            hidden: None,
        }
    }

    pub fn with_table_name(mut self, table_name: &str) -> Self {
        self.table_name = Some(table_name.to_string());
        self
    }

    pub fn with_id_attribute(mut self, id_attribute: &str) -> Self {
        self.id_attribute = id_attribute.to_string();
        self
    }

    pub fn with_virtual(mut self, name: &str, value: Value) -> Self {
        self.virtuals.insert(name.to_string(), value);
        self
    }

    /// Attach a loaded relation, replacing any previous one with the same name
    pub fn with_relation(mut self, name: &str, related: impl Into<Data>) -> Self {
        self.set_relation(name, Some(related.into()));
        self
    }

    /// Attach a relation that was loaded but has no related record
    pub fn with_empty_relation(mut self, name: &str) -> Self {
        self.set_relation(name, None);
        self
    }

    pub fn with_visible(mut self, keys: Vec<String>) -> Self {
        self.visible = Some(keys);
        self
    }

    pub fn with_hidden(mut self, keys: Vec<String>) -> Self {
        self.hidden = Some(keys);
        self
    }

    pub fn set_relation(&mut self, name: &str, related: Option<Data>) {
        if let Some(slot) = self.relations.iter_mut().find(|(n, _)| n == name) {
            slot.1 = related;
        } else {
            self.relations.push((name.to_string(), related));
        }
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// Identifier value, if the record has been saved
    pub fn id(&self) -> Option<&Value> {
        self.attributes
            .get(&self.id_attribute)
            .filter(|v| !v.is_null())
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn virtuals(&self) -> &Map<String, Value> {
        &self.virtuals
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, Option<&Data>)> {
        self.relations.iter().map(|(n, d)| (n.as_str(), d.as_ref()))
    }

    pub fn relation(&self, name: &str) -> Option<Option<&Data>> {
        self.relations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_ref())
    }

    pub fn visible(&self) -> Option<&[String]> {
        self.visible.as_deref()
    }

    pub fn hidden(&self) -> Option<&[String]> {
        self.hidden.as_deref()
    }
}
