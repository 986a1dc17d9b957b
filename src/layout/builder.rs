// SPDX-License-Identifier: GPL-3.0-only

//! Layout-set builders.
//!
//! The dispatcher treats a builder as a pure function from a
//! [`ConfigurationKey`] to a [`VariantSet`]. [`JsonLayoutSetBuilder`] is the
//! bundled implementation: it keeps raw JSON descriptors keyed by layout name
//! and parses the one named by the key's subtype on every build, so a broken
//! descriptor only fails the keys that need it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rust_embed::RustEmbed;

use crate::layout::descriptor::LayoutSetDescriptor;
use crate::layout::types::{ConfigurationKey, LayoutBuildError, VariantSet};

/// Builds the variant set for a configuration key.
pub trait LayoutSetBuilder {
    fn build(&self, key: &ConfigurationKey) -> Result<VariantSet, LayoutBuildError>;
}

impl<F> LayoutSetBuilder for F
where
    F: Fn(&ConfigurationKey) -> Result<VariantSet, LayoutBuildError>,
{
    fn build(&self, key: &ConfigurationKey) -> Result<VariantSet, LayoutBuildError> {
        self(key)
    }
}

/// Layout descriptors compiled into the crate.
#[derive(RustEmbed)]
#[folder = "resources/layouts/"]
struct BundledLayouts;

/// Builder over JSON layout descriptors.
#[derive(Debug, Clone, Default)]
pub struct JsonLayoutSetBuilder {
    sources: HashMap<String, String>,
}

impl JsonLayoutSetBuilder {
    /// Creates a builder with no descriptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder over the descriptors bundled with the crate.
    pub fn bundled() -> Self {
        let mut builder = Self::new();
        for file in BundledLayouts::iter() {
            let Some(name) = layout_name(&file) else {
                continue;
            };
            let Some(embedded) = BundledLayouts::get(&file) else {
                continue;
            };
            match String::from_utf8(embedded.data.into_owned()) {
                Ok(json) => builder.insert_source(name, json),
                Err(e) => tracing::warn!("Skipping bundled layout '{}': {}", file, e),
            }
        }
        builder
    }

    /// Creates a builder over every `*.json` file in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, LayoutBuildError> {
        let dir = dir.as_ref();
        let dir_name = dir.display().to_string();
        let entries = fs::read_dir(dir).map_err(|e| LayoutBuildError::io(dir_name.as_str(), e))?;

        let mut builder = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|e| LayoutBuildError::io(dir_name.as_str(), e))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.to_str().and_then(layout_name) else {
                continue;
            };
            let json = fs::read_to_string(&path)
                .map_err(|e| LayoutBuildError::io(path.display().to_string(), e))?;
            builder.insert_source(name, json);
        }

        tracing::debug!(
            "Loaded {} layout descriptor(s) from {}",
            builder.sources.len(),
            dir_name
        );
        Ok(builder)
    }

    /// Adds or replaces the descriptor for `name`.
    pub fn with_source(mut self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert_source(name, json);
        self
    }

    pub fn insert_source(&mut self, name: impl Into<String>, json: impl Into<String>) {
        self.sources.insert(name.into(), json.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Names of all known layouts, sorted.
    pub fn layout_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl LayoutSetBuilder for JsonLayoutSetBuilder {
    fn build(&self, key: &ConfigurationKey) -> Result<VariantSet, LayoutBuildError> {
        let json = self
            .sources
            .get(&key.subtype.keyboard_layout)
            .ok_or_else(|| LayoutBuildError::missing_descriptor(key))?;
        let descriptor =
            LayoutSetDescriptor::from_json(json).map_err(|e| LayoutBuildError::malformed(key, e))?;
        descriptor.resolve(key)
    }
}

/// Layout name for a descriptor path: its file stem.
fn layout_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================
