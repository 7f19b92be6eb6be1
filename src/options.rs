//! Mapping options
//!
//! Everything a caller can tune for one `map` call. Every field has a
//! default; see [`MappingOptions::default`].

use crate::inflect::pluralize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renames an attribute or relationship key in the output
pub type KeyFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Produces the JSON-API `type` for a model or relation name
pub type TypeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Rule excluding attributes from the `attributes` object
#[derive(Debug, Clone)]
pub enum OmitRule {
    /// Matches one attribute name exactly
    Exact(String),
    /// Matches every attribute name the regex finds a match in
    Pattern(Regex),
}

impl OmitRule {
    pub fn exact(name: &str) -> Self {
        OmitRule::Exact(name.to_string())
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(OmitRule::Pattern)
    }

    /// Parse the textual form used in config files: `/.../` is a regex,
    /// anything else an exact name. Invalid regexes yield `None`.
    pub fn parse(rule: &str) -> Option<Self> {
        let pattern = rule
            .strip_prefix('/')
            .and_then(|r| r.strip_suffix('/'))
            .filter(|_| rule.len() > 1);

        let Some(pattern) = pattern else {
            return Some(OmitRule::exact(rule));
        };

        match OmitRule::pattern(pattern) {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::warn!("Ignoring invalid omit pattern {:?}: {}", rule, e);
                None
            }
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            OmitRule::Exact(exact) => exact == name,
            OmitRule::Pattern(re) => re.is_match(name),
        }
    }
}

/// Which relations go into the compound document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Included {
    All(bool),
    Only(Vec<String>),
}

/// Controls relationship serialization and inclusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationsOption {
    /// Applies uniformly to both serialization and inclusion
    All(bool),
    Select {
        /// Allow-list of relations serialized into `relationships`
        #[serde(default)]
        fields: Option<Vec<String>>,
        #[serde(default)]
        included: Option<Included>,
    },
}

impl Default for RelationsOption {
    fn default() -> Self {
        RelationsOption::All(true)
    }
}

/// Per-call type naming, resolved once into a [`TypeFn`]
#[derive(Clone)]
pub enum TypeForModel {
    Uniform(TypeFn),
    /// Lookup table; missing or empty entries fall back to pluralization
    PerRelation(HashMap<String, String>),
}

impl TypeForModel {
    pub fn resolve(&self) -> TypeFn {
        match self {
            TypeForModel::Uniform(f) => Arc::clone(f),
            TypeForModel::PerRelation(table) => {
                let table = table.clone();
                Arc::new(move |name: &str| {
                    table
                        .get(name)
                        .filter(|t| !t.is_empty())
                        .cloned()
                        .unwrap_or_else(|| pluralize(name))
                })
            }
        }
    }
}

impl fmt::Debug for TypeForModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeForModel::Uniform(_) => f.write_str("Uniform(<fn>)"),
            TypeForModel::PerRelation(table) => f.debug_tuple("PerRelation").field(table).finish(),
        }
    }
}

/// Paging information supplied by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    /// Synonym for `total`, as reported by paged ORM fetches
    #[serde(default)]
    pub row_count: Option<u64>,
}

impl Pagination {
    pub fn new(limit: u64, offset: u64, total: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            total: Some(total),
            row_count: None,
        }
    }

    /// Total item count, preferring a non-zero `row_count`
    pub fn effective_total(&self) -> Option<u64> {
        self.row_count.filter(|n| *n > 0).or(self.total)
    }
}

/// ORM serialization flags applied while flattening
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extras {
    /// Overrides each resource's own visible list
    #[serde(default)]
    pub visible: Option<Vec<String>>,
    /// Overrides each resource's own hidden list
    #[serde(default)]
    pub hidden: Option<Vec<String>>,
}

/// Options for one mapping call
#[derive(Clone)]
pub struct MappingOptions {
    /// `None` omits the model's id attribute; an empty list omits nothing
    pub omit_attrs: Option<Vec<OmitRule>>,
    pub key_for_attr: Option<KeyFn>,
    pub relations: RelationsOption,
    pub virtuals: bool,
    pub type_for_model: Option<TypeForModel>,
    pub enable_links: bool,
    pub pagination: Option<Pagination>,
    /// Extra query parameters kept in pagination links
    pub query: Map<String, Value>,
    pub meta: Option<Value>,
    pub extras: Option<Extras>,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            omit_attrs: None,
            key_for_attr: None,
            relations: RelationsOption::default(),
            virtuals: false,
            type_for_model: None,
            enable_links: true,
            pagination: None,
            query: Map::new(),
            meta: None,
            extras: None,
        }
    }
}

impl MappingOptions {
    /// Type function for this call: the caller's choice or pluralization
    pub fn type_fn(&self) -> TypeFn {
        match &self.type_for_model {
            Some(type_for_model) => type_for_model.resolve(),
            None => Arc::new(pluralize),
        }
    }

    /// Key function for this call, identity by default
    pub fn key_fn(&self) -> KeyFn {
        self.key_for_attr
            .clone()
            .unwrap_or_else(|| Arc::new(|key: &str| key.to_string()))
    }
}

impl fmt::Debug for MappingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingOptions")
            .field("omit_attrs", &self.omit_attrs)
            .field("key_for_attr", &self.key_for_attr.as_ref().map(|_| "<fn>"))
            .field("relations", &self.relations)
            .field("virtuals", &self.virtuals)
            .field("type_for_model", &self.type_for_model)
            .field("enable_links", &self.enable_links)
            .field("pagination", &self.pagination)
            .field("query", &self.query)
            .field("meta", &self.meta)
            .field("extras", &self.extras)
            .finish()
    }
}
