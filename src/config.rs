//! Configuration Management
//!
//! Handles persistent configuration storage for jsonapi-mapper.

use crate::options::{
    Extras, KeyFn, MappingOptions, OmitRule, Pagination, RelationsOption, TypeForModel,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Base URL used when neither the CLI nor the config names one
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL prefixed to every generated link
    #[serde(default)]
    pub base_url: Option<String>,
    /// Default mapping options
    #[serde(default)]
    pub mapping: MappingConfig,
}

/// Serializable form of [`MappingOptions`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    /// Omit rules; `/.../` is a regex, anything else an exact name
    #[serde(default)]
    pub omit_attrs: Option<Vec<String>>,
    #[serde(default)]
    pub key_case: KeyCase,
    #[serde(default)]
    pub virtuals: bool,
    #[serde(default)]
    pub relations: RelationsOption,
    /// Relation name -> type; missing entries are pluralized
    #[serde(default)]
    pub type_for_model: Option<HashMap<String, String>>,
    #[serde(default = "default_true")]
    pub enable_links: bool,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub query: Map<String, Value>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub extras: Option<Extras>,
}

fn default_true() -> bool {
    true
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            omit_attrs: None,
            key_case: KeyCase::default(),
            virtuals: false,
            relations: RelationsOption::default(),
            type_for_model: None,
            enable_links: true,
            pagination: None,
            query: Map::new(),
            meta: None,
            extras: None,
        }
    }
}

/// Named key transforms usable from config files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    #[default]
    Identity,
    Upper,
    Lower,
    /// `firstName` / `first_name` -> `first-name`
    Kebab,
    /// `firstName` / `first-name` -> `first_name`
    Snake,
}

impl KeyCase {
    /// `None` for identity, which is the mapper's default anyway
    pub fn key_fn(self) -> Option<KeyFn> {
        match self {
            KeyCase::Identity => None,
            KeyCase::Upper => Some(Arc::new(|key: &str| key.to_uppercase())),
            KeyCase::Lower => Some(Arc::new(|key: &str| key.to_lowercase())),
            KeyCase::Kebab => Some(Arc::new(|key: &str| split_words(key, '-'))),
            KeyCase::Snake => Some(Arc::new(|key: &str| split_words(key, '_'))),
        }
    }
}

/// Lowercase `key` with word boundaries joined by `sep`
fn split_words(key: &str, sep: char) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if c == '-' || c == '_' || c == ' ' {
            out.push(sep);
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push(sep);
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

impl From<&MappingConfig> for MappingOptions {
    fn from(config: &MappingConfig) -> Self {
        let omit_attrs = config
            .omit_attrs
            .as_ref()
            .map(|rules| rules.iter().filter_map(|r| OmitRule::parse(r)).collect());

        MappingOptions {
            omit_attrs,
            key_for_attr: config.key_case.key_fn(),
            relations: config.relations.clone(),
            virtuals: config.virtuals,
            type_for_model: config.type_for_model.clone().map(TypeForModel::PerRelation),
            enable_links: config.enable_links,
            pagination: config.pagination,
            query: config.query.clone(),
            meta: config.meta.clone(),
            extras: config.extras.clone(),
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jsonapi-mapper").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }

    /// Load an explicit JSON or YAML (by extension) config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?
        };
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective base URL (CLI > config > default), validated
    pub fn effective_base_url(&self, cli: Option<&str>) -> Result<String> {
        let base_url = cli
            .or(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);
        validate_base_url(base_url)?;
        Ok(base_url.to_string())
    }

    /// Set base URL and save
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        validate_base_url(base_url)?;
        self.base_url = Some(base_url.to_string());
        self.save()
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url).with_context(|| format!("Invalid base URL {:?}", base_url))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Base URL {:?} cannot carry a path", base_url);
    }
    Ok(())
}
