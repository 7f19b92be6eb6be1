//! Serialization template
//!
//! Expands a sampled [`Shape`] into the instructions the renderer follows:
//! which attributes to emit, which relations to walk and which links to
//! attach at every level.

use crate::filter::{allowed_attributes, relation_included, relation_serialized};
use crate::links::{
    included_links, primary_data_links, relationship_links, top_level_links, LinkOptions,
    RelationshipLinks, ResourceLinks, TopLevelLinks,
};
use crate::options::{KeyFn, MappingOptions, TypeFn};
use crate::sampler::Shape;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Attribute used as the relationship pointer
pub const REFERENCE_KEY: &str = "id";

/// What to emit for resources at one level of the graph
#[derive(Debug, Clone, Default)]
pub struct Template {
    /// Attribute names in output order
    pub attributes: Vec<String>,
    pub relations: Vec<RelationTemplate>,
}

impl Template {
    pub fn relation(&self, name: &str) -> Option<&RelationTemplate> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// A serialized relation and its nested template
#[derive(Debug, Clone)]
pub struct RelationTemplate {
    pub name: String,
    pub template: Template,
    /// Key of the related record holding the linkage id
    pub reference: String,
    /// `false` keeps the related records out of `included`
    pub included: bool,
    pub relationship_links: Option<RelationshipLinks>,
    pub included_links: Option<ResourceLinks>,
}

/// Full renderer input for one document
#[derive(Clone)]
pub struct SerializerOptions {
    pub template: Template,
    pub top_level_links: Option<TopLevelLinks>,
    pub data_links: Option<ResourceLinks>,
    pub meta: Option<Value>,
    pub type_for_attribute: TypeFn,
    pub key_for_attribute: KeyFn,
}

impl fmt::Debug for SerializerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerOptions")
            .field("template", &self.template)
            .field("top_level_links", &self.top_level_links)
            .field("data_links", &self.data_links)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Caller-level settings that always win over per-call options
#[derive(Clone, Default)]
pub struct SerializerOverrides {
    pub type_for_attribute: Option<TypeFn>,
    pub key_for_attribute: Option<KeyFn>,
    pub meta: Option<Value>,
}

impl SerializerOverrides {
    pub fn apply(&self, options: &mut SerializerOptions) {
        if let Some(type_fn) = &self.type_for_attribute {
            options.type_for_attribute = Arc::clone(type_fn);
        }
        if let Some(key_fn) = &self.key_for_attribute {
            options.key_for_attribute = Arc::clone(key_fn);
        }
        if let Some(meta) = &self.meta {
            options.meta = Some(meta.clone());
        }
    }
}

impl fmt::Debug for SerializerOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerOverrides")
            .field("type_for_attribute", &self.type_for_attribute.is_some())
            .field("key_for_attribute", &self.key_for_attribute.is_some())
            .field("meta", &self.meta)
            .finish()
    }
}

/// Build the renderer input for a sampled shape
pub fn build_serializer_options(
    shape: &Shape,
    options: &MappingOptions,
    link_opts: &LinkOptions,
) -> SerializerOptions {
    let template = build_template(shape, options, link_opts);

    let (top_level_links, data_links) = if options.enable_links {
        (
            Some(top_level_links(link_opts)),
            Some(primary_data_links(link_opts)),
        )
    } else {
        (None, None)
    };

    SerializerOptions {
        template,
        top_level_links,
        data_links,
        meta: options.meta.clone(),
        type_for_attribute: options.type_fn(),
        key_for_attribute: options.key_fn(),
    }
}

/// Recursively expand a shape, following only relations the options allow
pub fn build_template(shape: &Shape, options: &MappingOptions, link_opts: &LinkOptions) -> Template {
    let attributes = allowed_attributes(shape, options.omit_attrs.as_deref());

    let mut relations = Vec::new();
    for (name, rel_shape) in &shape.relations {
        if !relation_serialized(name, &options.relations) {
            tracing::debug!("Relation {} filtered out of {}", name, link_opts.type_name);
            continue;
        }

        let rel_link_opts = link_opts.for_relation(name);
        let template = build_template(rel_shape, options, &rel_link_opts);

        let (relationship_links, included_links) = if options.enable_links {
            (
                Some(relationship_links(link_opts, name)),
                Some(included_links(&rel_link_opts)),
            )
        } else {
            (None, None)
        };

        relations.push(RelationTemplate {
            name: name.clone(),
            template,
            reference: REFERENCE_KEY.to_string(),
            included: relation_included(name, &options.relations),
            relationship_links,
            included_links,
        });
    }

    Template {
        attributes,
        relations,
    }
}
