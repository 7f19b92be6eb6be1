//! jsonapi-mapper
//!
//! Maps ORM resource graphs (a record or a collection, with whatever
//! relations happen to be loaded) to JSON-API 1.0 documents: resource
//! objects, relationships, a deduplicated `included` array and the
//! `self`/relationship/pagination links.
//!
//! ```
//! use jsonapi_mapper::{Mapper, MappingOptions, Resource};
//! use serde_json::json;
//!
//! let mapper = Mapper::new("https://api.example.com");
//! let user = Resource::new(json!({"id": 1, "name": "Joe"}))
//!     .with_relation("organization", Resource::new(json!({"id": 7, "name": "Acme"})));
//!
//! let doc = mapper
//!     .map(Some(&user.into()), "user", &MappingOptions::default())
//!     .unwrap();
//!
//! assert_eq!(doc["data"]["type"], "users");
//! assert_eq!(doc["included"][0]["type"], "organizations");
//! assert_eq!(doc["links"]["self"], "https://api.example.com/users");
//! ```

pub mod config;
pub mod filter;
pub mod flatten;
pub mod inflect;
pub mod links;
pub mod mapper;
pub mod options;
pub mod render;
pub mod resource;
pub mod sampler;
pub mod template;

pub use config::{Config, KeyCase, MappingConfig};
pub use mapper::Mapper;
pub use options::{
    Extras, Included, KeyFn, MappingOptions, OmitRule, Pagination, RelationsOption, TypeFn,
    TypeForModel,
};
pub use render::{JsonApiRenderer, RenderError, Renderer};
pub use resource::{Data, Resource};
pub use sampler::{Sampler, Shape};
pub use template::{SerializerOptions, SerializerOverrides};

/// Version injected at compile time via JSONAPI_MAPPER_VERSION env var
/// (set by CI/CD), or "dev" for local builds.
pub const VERSION: &str = match option_env!("JSONAPI_MAPPER_VERSION") {
    Some(v) => v,
    None => "dev",
};
