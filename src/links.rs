//! Link generation
//!
//! Builds the `links` objects of a JSON-API document. Everything that
//! depends on a concrete record is a closure the renderer evaluates later,
//! so links are never computed for records that are not rendered.

use crate::inflect::pluralize;
use crate::options::Pagination;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Deferred link without inputs (pagination)
pub type Thunk = Arc<dyn Fn() -> String + Send + Sync>;

/// Deferred link evaluated against a flattened record.
/// Returns `None` when the record has no identifier.
pub type RecordLinkFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Query keys that control paging and are always recomputed
const PAGE_KEYS: &[&str] = &["page", "page[limit]", "page[offset]"];

/// Link settings for one mapping call
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOptions {
    pub base_url: String,
    /// Logical type (top level) or relation name (nested)
    pub type_name: String,
    pub pagination: Option<Pagination>,
    pub query: Map<String, Value>,
}

impl LinkOptions {
    pub fn new(base_url: &str, type_name: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            type_name: type_name.to_string(),
            pagination: None,
            query: Map::new(),
        }
    }

    /// Same settings with the type replaced by a relation name
    pub fn for_relation(&self, relation: &str) -> Self {
        Self {
            type_name: relation.to_string(),
            ..self.clone()
        }
    }

    fn type_url(&self) -> String {
        url_concat(&[&self.base_url, &pluralize(&self.type_name)])
    }
}

/// `first`/`prev`/`next`/`last` links; absent entries are not emitted
#[derive(Clone, Default)]
pub struct PaginationLinks {
    pub first: Option<Thunk>,
    pub prev: Option<Thunk>,
    pub next: Option<Thunk>,
    pub last: Option<Thunk>,
}

impl PaginationLinks {
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.prev.is_none() && self.next.is_none() && self.last.is_none()
    }

    pub fn evaluate(&self) -> Map<String, Value> {
        let mut links = Map::new();
        for (name, link) in [
            ("first", &self.first),
            ("prev", &self.prev),
            ("next", &self.next),
            ("last", &self.last),
        ] {
            if let Some(link) = link {
                links.insert(name.to_string(), Value::String(link()));
            }
        }
        links
    }
}

impl fmt::Debug for PaginationLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationLinks")
            .field("first", &self.first.is_some())
            .field("prev", &self.prev.is_some())
            .field("next", &self.next.is_some())
            .field("last", &self.last.is_some())
            .finish()
    }
}

/// Document-level links
#[derive(Debug, Clone)]
pub struct TopLevelLinks {
    pub self_link: String,
    pub pagination: Option<PaginationLinks>,
}

impl TopLevelLinks {
    pub fn evaluate(&self) -> Map<String, Value> {
        let mut links = Map::new();
        links.insert("self".to_string(), Value::String(self.self_link.clone()));
        if let Some(pagination) = &self.pagination {
            links.extend(pagination.evaluate());
        }
        links
    }
}

/// `links.self` of a primary or included resource object
#[derive(Clone)]
pub struct ResourceLinks {
    pub self_link: RecordLinkFn,
}

impl ResourceLinks {
    pub fn evaluate(&self, record: &Value) -> Map<String, Value> {
        let mut links = Map::new();
        if let Some(href) = (self.self_link)(record) {
            links.insert("self".to_string(), Value::String(href));
        }
        links
    }
}

impl fmt::Debug for ResourceLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLinks").finish_non_exhaustive()
    }
}

/// Links of a relationship object, evaluated against the parent record
#[derive(Clone)]
pub struct RelationshipLinks {
    pub self_link: RecordLinkFn,
    pub related: RecordLinkFn,
}

impl RelationshipLinks {
    pub fn evaluate(&self, parent: &Value) -> Map<String, Value> {
        let mut links = Map::new();
        if let Some(href) = (self.self_link)(parent) {
            links.insert("self".to_string(), Value::String(href));
        }
        if let Some(href) = (self.related)(parent) {
            links.insert("related".to_string(), Value::String(href));
        }
        links
    }
}

impl fmt::Debug for RelationshipLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipLinks").finish_non_exhaustive()
    }
}

/// Top-level `self` plus pagination links when there is more than one page
pub fn top_level_links(opts: &LinkOptions) -> TopLevelLinks {
    let more_than_one_page = opts.pagination.as_ref().is_some_and(|pag| {
        match (pag.effective_total(), pag.limit) {
            (Some(total), Some(limit)) => total > 0 && total > limit,
            _ => false,
        }
    });

    let pagination = if more_than_one_page {
        pagination_links(opts)
    } else {
        None
    };

    TopLevelLinks {
        self_link: opts.type_url(),
        pagination,
    }
}

/// Pagination links for the current page.
///
/// The `last` page is shrunk so it never overlaps the page before it when
/// the offset is not a multiple of the limit.
pub fn pagination_links(opts: &LinkOptions) -> Option<PaginationLinks> {
    let pag = opts.pagination.as_ref()?;
    let (Some(limit), Some(offset), Some(total)) = (pag.limit, pag.offset, pag.effective_total())
    else {
        tracing::debug!("Incomplete pagination {:?}, skipping links", pag);
        return None;
    };
    if limit == 0 {
        return None;
    }
    let Some(page_end) = offset.checked_add(limit) else {
        tracing::debug!("Pagination {:?} out of range, skipping links", pag);
        return None;
    };

    let base: Arc<str> = pagination_base(opts).into();
    let page_link = move |limit: u64, offset: u64| -> Thunk {
        let base = Arc::clone(&base);
        Arc::new(move || format!("{}page[limit]={}&page[offset]={}", base, limit, offset))
    };

    let mut links = PaginationLinks::default();

    if offset > 0 {
        links.first = Some(page_link(limit, 0));
        links.prev = Some(page_link(limit, offset.saturating_sub(limit)));
    }

    if page_end < total {
        links.next = Some(page_link(limit, page_end));

        let mut last_limit = (total - offset % limit) % limit;
        if last_limit == 0 {
            last_limit = limit;
        }
        links.last = Some(page_link(last_limit, total - last_limit));
    }

    (!links.is_empty()).then_some(links)
}

/// `self` link of each primary resource
pub fn primary_data_links(opts: &LinkOptions) -> ResourceLinks {
    let base = opts.type_url();
    ResourceLinks {
        self_link: Arc::new(move |record: &Value| {
            record_id(record).map(|id| url_concat(&[&base, &id]))
        }),
    }
}

/// `self` and `related` links of a relationship, under the parent's type
pub fn relationship_links(opts: &LinkOptions, relation: &str) -> RelationshipLinks {
    let base = opts.type_url();
    let self_base = base.clone();
    let self_relation = relation.to_string();
    let related_relation = relation.to_string();

    RelationshipLinks {
        self_link: Arc::new(move |parent: &Value| {
            record_id(parent)
                .map(|id| url_concat(&[&self_base, &id, "relationships", &self_relation]))
        }),
        related: Arc::new(move |parent: &Value| {
            record_id(parent).map(|id| url_concat(&[&base, &id, &related_relation]))
        }),
    }
}

/// `self` link of each included resource; `opts` carries the relation name
pub fn included_links(opts: &LinkOptions) -> ResourceLinks {
    primary_data_links(opts)
}

pub(crate) fn record_id(record: &Value) -> Option<String> {
    identifier(record, "id")
}

/// Identifier stored under `key`, as it appears in documents and URLs
pub(crate) fn identifier(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn url_concat(parts: &[&str]) -> String {
    parts.join("/")
}

/// `<type url>?<caller query>&` ready for the page parameters
fn pagination_base(opts: &LinkOptions) -> String {
    let mut query_parts: Vec<String> = Vec::new();

    for (key, value) in &opts.query {
        if PAGE_KEYS.contains(&key.as_str()) {
            continue;
        }
        push_query_parts(key, value, &mut query_parts);
    }

    if query_parts.is_empty() {
        format!("{}?", opts.type_url())
    } else {
        format!("{}?{}&", opts.type_url(), query_parts.join("&"))
    }
}

/// Bracket-notation query parts: `filter[name]=x`, `ids[0]=1`
fn push_query_parts(key: &str, value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::String(s) => parts.push(format!("{}={}", key, urlencoding::encode(s))),
        Value::Number(n) => parts.push(format!("{}={}", key, n)),
        Value::Bool(b) => parts.push(format!("{}={}", key, b)),
        Value::Null => parts.push(format!("{}=", key)),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                push_query_parts(&format!("{}[{}]", key, idx), item, parts);
            }
        }
        Value::Object(map) => {
            for (sub_key, item) in map {
                push_query_parts(&format!("{}[{}]", key, sub_key), item, parts);
            }
        }
    }
}
