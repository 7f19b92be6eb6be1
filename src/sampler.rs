//! Sampler
//!
//! Derives one canonical [`Shape`] from a resource or a collection whose
//! members may have different relations loaded. The shape only records which
//! attributes and relations exist; values always come from the records.

use crate::resource::{Data, Resource};
use std::collections::HashMap;

/// Attribute and relation names observed across sampled resources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shape {
    /// Id attribute of the sampled model, unknown for empty samples
    pub id_attribute: Option<String>,
    /// Attribute names in first-seen order
    pub attributes: Vec<String>,
    /// Relation shapes in first-seen order
    pub relations: Vec<(String, Shape)>,
}

impl Shape {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.relations.is_empty()
    }

    pub fn relation(&self, name: &str) -> Option<&Shape> {
        self.relations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn has_relation(&self, name: &str) -> bool {
        self.relation(name).is_some()
    }

    /// Union `other` into this shape, recursing into relations both define
    pub fn merge(&mut self, other: &Shape) {
        if self.id_attribute.is_none() {
            self.id_attribute = other.id_attribute.clone();
        }

        for attr in &other.attributes {
            if !self.attributes.contains(attr) {
                self.attributes.push(attr.clone());
            }
        }

        for (name, shape) in &other.relations {
            match self.relations.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => existing.merge(shape),
                None => self.relations.push((name.clone(), shape.clone())),
            }
        }
    }

    pub fn merged(mut self, other: &Shape) -> Shape {
        self.merge(other);
        self
    }
}

/// Samples resources for one mapping call.
///
/// Records reached more than once (same table and id) share one shape,
/// the union of everything seen on any of their occurrences.
#[derive(Debug, Default)]
pub struct Sampler {
    include_virtuals: bool,
    memo: HashMap<(String, String), Shape>,
}

impl Sampler {
    pub fn new(include_virtuals: bool) -> Self {
        Self {
            include_virtuals,
            memo: HashMap::new(),
        }
    }

    /// Shape of a single resource or the merged shape of a collection
    pub fn sample(&mut self, data: &Data) -> Shape {
        match data {
            Data::Single(resource) => self.sample_resource(resource),
            Data::Set(items) => {
                let mut iter = items.iter();
                let Some(first) = iter.next() else {
                    return Shape::default();
                };

                let mut shape = self.sample_resource(first);
                for item in iter {
                    let sampled = self.sample_resource(item);
                    shape.merge(&sampled);
                }

                tracing::debug!(
                    "Sampled collection of {} ({} attributes, {} relations)",
                    items.len(),
                    shape.attributes.len(),
                    shape.relations.len()
                );
                shape
            }
        }
    }

    /// Shape of one record, unioned with every earlier occurrence of the
    /// same table and id
    fn sample_resource(&mut self, resource: &Resource) -> Shape {
        let shape = self.observe(resource);
        let Some(key) = memo_key(resource) else {
            return shape;
        };

        let known = self.memo.entry(key).or_default();
        known.merge(&shape);
        known.clone()
    }

    /// Attributes and relations present on this record instance
    fn observe(&mut self, resource: &Resource) -> Shape {
        let mut attributes: Vec<String> = resource.attributes().keys().cloned().collect();
        if self.include_virtuals {
            attributes.extend(
                resource
                    .virtuals()
                    .keys()
                    .filter(|k| !resource.attributes().contains_key(*k))
                    .cloned(),
            );
        }

        let relations = resource
            .relations()
            .map(|(name, related)| {
                let shape = match related {
                    Some(data) => self.sample(data),
                    None => Shape::default(),
                };
                (name.to_string(), shape)
            })
            .collect();

        Shape {
            id_attribute: Some(resource.id_attribute().to_string()),
            attributes,
            relations,
        }
    }
}

/// Memo key for records that can be told apart: table name plus id
fn memo_key(resource: &Resource) -> Option<(String, String)> {
    let table = resource.table_name()?;
    let id = resource.id()?;
    Some((table.to_string(), id.to_string()))
}
