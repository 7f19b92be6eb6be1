//! Resource abstraction layer
//!
//! This module describes the ORM records handed to the mapper. The mapper
//! only reads them; loading from a database happens elsewhere.
//!
//! # Architecture
//!
//! - [`model`] - Resource and collection types with their loaded relations
//! - [`loader`] - Builds resources from a JSON description (used by the CLI)
//!
//! # Example
//!
//! ```
//! use jsonapi_mapper::resource::{Data, Resource};
//! use serde_json::json;
//!
//! let user = Resource::new(json!({"id": 1, "name": "Joe"}))
//!     .with_relation("organization", Resource::new(json!({"id": 7})));
//! let data = Data::from(vec![user]);
//! assert_eq!(data.len(), 1);
//! ```

mod loader;
mod model;

pub use loader::{load_data, load_data_str};
pub use model::{Data, Resource, DEFAULT_ID_ATTRIBUTE};
