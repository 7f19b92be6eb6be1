//! Attribute and relation filters
//!
//! Pure predicates deciding what ends up in `attributes`, `relationships`
//! and the compound document.

use crate::options::{Included, OmitRule, RelationsOption};
use crate::resource::DEFAULT_ID_ATTRIBUTE;
use crate::sampler::Shape;

/// Attribute names of `shape` that survive the omit rules.
///
/// Without rules the model's id attribute is omitted, so the identifier is
/// never repeated inside `attributes`. Relation names are never attributes.
pub fn allowed_attributes(shape: &Shape, omit_rules: Option<&[OmitRule]>) -> Vec<String> {
    let default_rules;
    let rules = match omit_rules {
        Some(rules) => rules,
        None => {
            let id = shape.id_attribute.as_deref().unwrap_or(DEFAULT_ID_ATTRIBUTE);
            default_rules = [OmitRule::exact(id)];
            &default_rules[..]
        }
    };

    shape
        .attributes
        .iter()
        .filter(|attr| !shape.has_relation(attr))
        .filter(|attr| !rules.iter().any(|rule| rule.matches(attr)))
        .cloned()
        .collect()
}

/// Whether a relation is serialized into `relationships`
pub fn relation_serialized(name: &str, relations: &RelationsOption) -> bool {
    match relations {
        RelationsOption::All(enabled) => *enabled,
        RelationsOption::Select { fields, .. } => fields
            .as_ref()
            .map_or(true, |fields| fields.iter().any(|f| f == name)),
    }
}

/// Whether a relation's resources go into the compound document.
///
/// An `included` allow-list is intersected with `fields`, so a relation
/// filtered out of `fields` is never included.
pub fn relation_included(name: &str, relations: &RelationsOption) -> bool {
    match relations {
        RelationsOption::All(enabled) => *enabled,
        RelationsOption::Select { fields, included } => match included {
            None => relation_serialized(name, relations),
            Some(Included::All(enabled)) => *enabled,
            Some(Included::Only(allowed)) => {
                let listed = allowed.iter().any(|a| a == name);
                let in_fields = fields
                    .as_ref()
                    .map_or(true, |fields| fields.iter().any(|f| f == name));
                listed && in_fields
            }
        },
    }
}
