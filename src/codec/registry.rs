//! Content-type to codec lookup table.
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards; shared via `Arc`
//! - The empty key is the default entry and always exists
//! - Registration overwrites by key; there is no removal

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{
    Codec, FormCodec, JsonCodec, XmlCodec, APPLICATION_FORM, APPLICATION_JSON, APPLICATION_XML,
};
use crate::config::CodecConfig;

/// Key of the fallback entry.
pub const DEFAULT_KEY: &str = "";

#[derive(Debug, Clone)]
pub struct Registry {
    codecs: HashMap<String, Arc<dyn Codec>>,
    default: Arc<dyn Codec>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build the registry described by the codec configuration.
    ///
    /// JSON is always registered. The default entry points at the codec of
    /// `default_content_type`, or JSON when that type is not registered.
    pub fn from_config(config: &CodecConfig) -> Self {
        let json: Arc<dyn Codec> = Arc::new(JsonCodec);
        let mut builder = Self::builder().register(APPLICATION_JSON, json.clone());
        if config.xml_enabled {
            builder = builder.register(APPLICATION_XML, Arc::new(XmlCodec));
        }
        if config.form_enabled {
            builder = builder.register(APPLICATION_FORM, Arc::new(FormCodec));
        }

        let default = builder
            .codecs
            .get(config.default_content_type.as_str())
            .cloned()
            .unwrap_or(json);
        builder.register(DEFAULT_KEY, default).build()
    }

    /// Codec registered for `content_type`, falling back to the default entry.
    pub fn lookup(&self, content_type: &str) -> &Arc<dyn Codec> {
        self.codecs.get(content_type).unwrap_or(&self.default)
    }

    /// Exact match only, no fallback.
    pub fn get(&self, content_type: &str) -> Option<&Arc<dyn Codec>> {
        self.codecs.get(content_type)
    }

    pub fn default_codec(&self) -> &Arc<dyn Codec> {
        &self.default
    }

    /// Registered content types, sorted, without the default key.
    pub fn content_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .codecs
            .keys()
            .map(String::as_str)
            .filter(|key| !key.is_empty())
            .collect();
        types.sort_unstable();
        types
    }
}

impl Default for Registry {
    fn default() -> Self {
        let json: Arc<dyn Codec> = Arc::new(JsonCodec);
        Self::builder()
            .register(APPLICATION_FORM, Arc::new(FormCodec))
            .register(APPLICATION_JSON, json.clone())
            .register(APPLICATION_XML, Arc::new(XmlCodec))
            .register(DEFAULT_KEY, json)
            .build()
    }
}

/// Collects registrations before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    codecs: HashMap<String, Arc<dyn Codec>>,
}

impl RegistryBuilder {
    /// Register `codec` under `content_type`; a later registration for the
    /// same key replaces the earlier one.
    pub fn register(mut self, content_type: impl Into<String>, codec: Arc<dyn Codec>) -> Self {
        self.codecs.insert(content_type.into(), codec);
        self
    }

    /// Freeze the table. Inserts JSON as the default when none was registered.
    pub fn build(mut self) -> Registry {
        let default = self
            .codecs
            .entry(DEFAULT_KEY.to_string())
            .or_insert_with(|| Arc::new(JsonCodec) as Arc<dyn Codec>)
            .clone();
        Registry {
            codecs: self.codecs,
            default,
        }
    }
}
