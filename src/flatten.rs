//! Flattener
//!
//! Copies a resource graph into plain JSON for the renderer. Values are
//! copied as-is; attribute selection happens in the renderer through the
//! template.

use crate::options::Extras;
use crate::resource::{Data, Resource};
use serde_json::{Map, Value};

/// ORM-level flags controlling the shallow copy of each record
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainOptions<'a> {
    pub virtuals: bool,
    pub extras: Option<&'a Extras>,
}

/// Flatten optional input; absent input is `null`
pub fn to_plain(data: Option<&Data>, opts: &PlainOptions<'_>) -> Value {
    match data {
        None => Value::Null,
        Some(Data::Single(resource)) => resource_to_plain(resource, opts),
        Some(Data::Set(items)) => {
            Value::Array(items.iter().map(|r| resource_to_plain(r, opts)).collect())
        }
    }
}

fn resource_to_plain(resource: &Resource, opts: &PlainOptions<'_>) -> Value {
    let mut json = shallow(resource, opts);

    if !json.contains_key("id") {
        json.insert(
            "id".to_string(),
            resource.id().cloned().unwrap_or(Value::Null),
        );
    }

    for (name, related) in resource.relations() {
        json.insert(name.to_string(), to_plain(related, opts));
    }

    Value::Object(json)
}

/// Attributes (and virtuals when enabled) after visibility rules
fn shallow(resource: &Resource, opts: &PlainOptions<'_>) -> Map<String, Value> {
    let mut json = resource.attributes().clone();

    if opts.virtuals {
        for (key, value) in resource.virtuals() {
            json.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    let visible = opts
        .extras
        .and_then(|e| e.visible.as_deref())
        .or(resource.visible());
    let hidden = opts
        .extras
        .and_then(|e| e.hidden.as_deref())
        .or(resource.hidden());

    if let Some(visible) = visible {
        json.retain(|key, _| visible.iter().any(|v| v == key));
    }
    if let Some(hidden) = hidden {
        json.retain(|key, _| !hidden.iter().any(|h| h == key));
    }

    json
}
