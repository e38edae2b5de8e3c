// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec constants and runtime configuration.
//!
//! - **Static**: wire constants (length fields, null marker, date bias)
//! - **Dynamic**: [`CodecConfig`] for the random value generator, loadable
//!   from JSON/YAML and overridable from the environment

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Size of every length and count field on the wire (big-endian i32).
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Length written in place of a payload for a null element or field.
pub const NULL_LENGTH: i32 = -1;

/// `date` values are unsigned day counts centered on the Unix epoch.
pub const DATE_EPOCH_OFFSET: u32 = 1 << 31;

/// Nanoseconds in a day; upper bound (exclusive) of a `time` value.
pub const NANOS_PER_DAY: i64 = 86_400 * 1_000_000_000;

/// Deepest type nesting accepted from a type name or a binary descriptor.
pub const MAX_TYPE_NESTING: usize = 64;

pub const DEFAULT_MIN_COLLECTION_SIZE: usize = 0;

/// Random collections get `min + rand(0..=MAX_RANDOM_EXTRA_ELEMENTS)` elements.
pub const MAX_RANDOM_EXTRA_ELEMENTS: usize = 5;

pub const MIN_RANDOM_TEXT_LEN: usize = 1;
pub const MAX_RANDOM_TEXT_LEN: usize = 32;

pub const ENV_MIN_COLLECTION_SIZE: &str = "CQLCODEC_MIN_COLLECTION_SIZE";
pub const ENV_SEED: &str = "CQLCODEC_SEED";

/// Random value generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Minimum size of every generated list, set and map, at any depth.
    pub min_collection_size: usize,
    /// Upper bound on elements added on top of the minimum.
    pub max_extra_elements: usize,
    /// Upper bound on generated text/blob length.
    pub max_text_len: usize,
    /// Fixed seed for reproducible runs (None = entropy).
    pub seed: Option<u64>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            min_collection_size: DEFAULT_MIN_COLLECTION_SIZE,
            max_extra_elements: MAX_RANDOM_EXTRA_ELEMENTS,
            max_text_len: MAX_RANDOM_TEXT_LEN,
            seed: None,
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load from a file; `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            #[cfg(feature = "config-loaders")]
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    /// Apply `CQLCODEC_MIN_COLLECTION_SIZE` / `CQLCODEC_SEED` when set and parseable.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(size) = env_parse::<usize>(ENV_MIN_COLLECTION_SIZE) {
            self.min_collection_size = size;
        }
        if let Some(seed) = env_parse::<u64>(ENV_SEED) {
            self.seed = Some(seed);
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

/// Fluent builder for [`CodecConfig`].
#[derive(Debug, Default)]
pub struct CodecConfigBuilder {
    min_collection_size: Option<usize>,
    max_extra_elements: Option<usize>,
    max_text_len: Option<usize>,
    seed: Option<u64>,
}

impl CodecConfigBuilder {
    pub fn min_collection_size(mut self, size: usize) -> Self {
        self.min_collection_size = Some(size);
        self
    }

    pub fn max_extra_elements(mut self, extra: usize) -> Self {
        self.max_extra_elements = Some(extra);
        self
    }

    /// Clamped to at least [`MIN_RANDOM_TEXT_LEN`].
    pub fn max_text_len(mut self, len: usize) -> Self {
        self.max_text_len = Some(len.max(MIN_RANDOM_TEXT_LEN));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> CodecConfig {
        let defaults = CodecConfig::default();
        CodecConfig {
            min_collection_size: self
                .min_collection_size
                .unwrap_or(defaults.min_collection_size),
            max_extra_elements: self
                .max_extra_elements
                .unwrap_or(defaults.max_extra_elements),
            max_text_len: self.max_text_len.unwrap_or(defaults.max_text_len),
            seed: self.seed.or(defaults.seed),
        }
    }
}
