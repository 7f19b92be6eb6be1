//! Mapper orchestration
//!
//! Ties the pipeline together: sample the input, build the serializer
//! template and links, flatten the records and hand both to the renderer.

use crate::flatten::{to_plain, PlainOptions};
use crate::links::LinkOptions;
use crate::options::MappingOptions;
use crate::render::{JsonApiRenderer, RenderError, Renderer};
use crate::resource::Data;
use crate::sampler::Sampler;
use crate::template::{build_serializer_options, SerializerOverrides};
use serde_json::{json, Value};

/// Maps resource graphs to JSON-API documents.
///
/// A mapper holds only immutable configuration, so one instance can serve
/// any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct Mapper<R: Renderer = JsonApiRenderer> {
    base_url: String,
    overrides: SerializerOverrides,
    renderer: R,
}

impl Mapper<JsonApiRenderer> {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            overrides: SerializerOverrides::default(),
            renderer: JsonApiRenderer,
        }
    }
}

impl<R: Renderer> Mapper<R> {
    /// Settings applied last on every call
    pub fn with_overrides(mut self, overrides: SerializerOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_renderer<T: Renderer>(self, renderer: T) -> Mapper<T> {
        Mapper {
            base_url: self.base_url,
            overrides: self.overrides,
            renderer,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map `data` as resources of `type_name`.
    ///
    /// Absent input yields `{"data": null}` without links or meta.
    pub fn map(
        &self,
        data: Option<&Data>,
        type_name: &str,
        options: &MappingOptions,
    ) -> Result<Value, RenderError> {
        let Some(data) = data else {
            tracing::debug!("No data to map for {}", type_name);
            return Ok(json!({ "data": null }));
        };

        let shape = Sampler::new(options.virtuals).sample(data);
        tracing::debug!(
            "Sampled {} record(s) of {}: {} attribute(s), {} relation(s)",
            data.len(),
            type_name,
            shape.attributes.len(),
            shape.relations.len()
        );

        let link_opts = LinkOptions {
            pagination: options.pagination,
            query: options.query.clone(),
            ..LinkOptions::new(&self.base_url, type_name)
        };

        let mut serializer = build_serializer_options(&shape, options, &link_opts);
        self.overrides.apply(&mut serializer);

        let plain = to_plain(
            Some(data),
            &PlainOptions {
                virtuals: options.virtuals,
                extras: options.extras.as_ref(),
            },
        );

        self.renderer.render(type_name, &serializer, &plain)
    }
}
