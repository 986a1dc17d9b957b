// SPDX-License-Identifier: GPL-3.0-only

//! JSON layout-set descriptors.
//!
//! A descriptor lists, per variant, the values that vary between variants of
//! one layout. Resolving it against a [`ConfigurationKey`] yields a complete
//! [`VariantSet`]:
//!
//! - a variant without its own entry falls back to the `alphabet` entry;
//! - numeric modes (phone, number, date, time) use the `numeric` entry for all
//!   alphabet variants when the descriptor provides one;
//! - `top_padding` is a fraction of the keyboard height;
//! - per-variant icons override the descriptor-wide icons.
//!
//! ```json
//! {
//!     "name": "qwerty",
//!     "script": "latin",
//!     "supports_split": true,
//!     "icons": { "shift_key": "ic_shift" },
//!     "variants": {
//!         "alphabet": { "top_padding": 0.02 },
//!         "alphabet_shift_locked": { "icons": { "shift_key": "ic_shift_locked" } }
//!     },
//!     "numeric": { "top_padding": 0.05 }
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::layout::types::{
    ConfigurationKey, IconSet, LayoutBuildError, ScriptId, VariantId, VariantSet,
    VariantTemplate,
};

/// Values for one variant of a layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VariantDescriptor {
    /// Top padding as a fraction of the keyboard height.
    #[serde(default)]
    pub top_padding: f32,
    /// Icons overriding the descriptor-wide icons.
    #[serde(default)]
    pub icons: IconSet,
}

/// A layout set as written in a JSON descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutSetDescriptor {
    pub name: String,
    #[serde(default)]
    pub script: ScriptId,
    #[serde(default)]
    pub supports_split: bool,
    #[serde(default)]
    pub icons: IconSet,
    /// Variant entries keyed by variant name.
    #[serde(default)]
    pub variants: BTreeMap<String, VariantDescriptor>,
    /// Entry used for alphabet variants in numeric modes.
    #[serde(default)]
    pub numeric: Option<VariantDescriptor>,
}

impl LayoutSetDescriptor {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolves this descriptor into the variant set for `key`.
    pub fn resolve(&self, key: &ConfigurationKey) -> Result<VariantSet, LayoutBuildError> {
        if let Some(name) = self
            .variants
            .keys()
            .find(|name| VariantId::from_name(name).is_none())
        {
            return Err(LayoutBuildError::unknown_variant(key, name.as_str()));
        }

        let alphabet = self
            .variants
            .get(VariantId::Alphabet.name())
            .ok_or_else(|| LayoutBuildError::missing_alphabet(key))?;
        let numeric = self.numeric.as_ref().filter(|_| key.mode.is_numeric());
        let split = key.split_layout && self.supports_split;
        let height = key.height as f32;

        VariantSet::try_from_fn(key.clone(), self.script, |id| {
            let entry = match numeric {
                Some(numeric) if id.is_alphabet() => numeric,
                _ => self.variants.get(id.name()).unwrap_or(alphabet),
            };
            Ok(VariantTemplate {
                top_padding: (entry.top_padding.max(0.0) * height).round() as u32,
                icons: Arc::new(self.icons.merged(&entry.icons)),
                split,
            })
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{KeyboardMode, Subtype};
    use crate::theme::ThemeId;

    fn key(mode: KeyboardMode, split: bool) -> ConfigurationKey {
        ConfigurationKey {
            theme: ThemeId(3),
            width: 1080,
            height: 400,
            subtype: Subtype::new("en_US", "test"),
            mode,
            voice_input_key: true,
            language_switch_key: false,
            split_layout: split,
        }
    }

    const DESCRIPTOR: &str = r#"{
        "name": "test",
        "script": "latin",
        "supports_split": true,
        "icons": { "shift_key": "ic_shift", "delete_key": "ic_delete" },
        "variants": {
            "alphabet": { "top_padding": 0.02 },
            "alphabet_shift_locked": {
                "top_padding": 0.02,
                "icons": { "shift_key": "ic_shift_locked" }
            },
            "symbols": { "top_padding": 0.05 }
        },
        "numeric": { "top_padding": 0.1 }
    }"#;

    /// Test variants without an entry fall back to the alphabet entry
    #[test]
    fn test_resolve_falls_back_to_alphabet() {
        let descriptor = LayoutSetDescriptor::from_json(DESCRIPTOR).expect("descriptor should parse");
        let set = descriptor
            .resolve(&key(KeyboardMode::Text, false))
            .expect("set should resolve");

        assert_eq!(set.get(VariantId::Alphabet).top_padding, 8);
        assert_eq!(set.get(VariantId::Symbols).top_padding, 20);
        assert_eq!(set.get(VariantId::SymbolsShifted).top_padding, 8);
        assert_eq!(set.get(VariantId::Emoji).top_padding, 8);
        assert_eq!(set.script_id(), ScriptId::Latin);
    }

    /// Test per-variant icons override descriptor icons
    #[test]
    fn test_resolve_icon_overrides() {
        let descriptor = LayoutSetDescriptor::from_json(DESCRIPTOR).expect("descriptor should parse");
        let set = descriptor
            .resolve(&key(KeyboardMode::Text, false))
            .expect("set should resolve");

        let locked = set.get(VariantId::AlphabetShiftLocked);
        assert_eq!(locked.icons.get("shift_key"), Some("ic_shift_locked"));
        assert_eq!(locked.icons.get("delete_key"), Some("ic_delete"));
        assert_eq!(
            set.get(VariantId::Alphabet).icons.get("shift_key"),
            Some("ic_shift")
        );
    }

    /// Test numeric modes use the numeric entry for alphabet variants only
    #[test]
    fn test_resolve_numeric_mode() {
        let descriptor = LayoutSetDescriptor::from_json(DESCRIPTOR).expect("descriptor should parse");
        let set = descriptor
            .resolve(&key(KeyboardMode::Phone, false))
            .expect("set should resolve");

        assert_eq!(set.get(VariantId::Alphabet).top_padding, 40);
        assert_eq!(set.get(VariantId::AlphabetShiftLocked).top_padding, 40);
        assert_eq!(set.get(VariantId::Symbols).top_padding, 20);
    }

    /// Test split requires both the key flag and descriptor support
    #[test]
    fn test_resolve_split() {
        let descriptor = LayoutSetDescriptor::from_json(DESCRIPTOR).expect("descriptor should parse");
        let split = descriptor
            .resolve(&key(KeyboardMode::Text, true))
            .expect("set should resolve");
        assert!(split.iter().all(|v| v.split));

        let mut unsplittable = descriptor.clone();
        unsplittable.supports_split = false;
        let set = unsplittable
            .resolve(&key(KeyboardMode::Text, true))
            .expect("set should resolve");
        assert!(set.iter().all(|v| !v.split));
    }

    /// Test a descriptor without an alphabet entry is rejected
    #[test]
    fn test_resolve_missing_alphabet() {
        let json = r#"{ "name": "broken", "variants": { "symbols": {} } }"#;
        let descriptor = LayoutSetDescriptor::from_json(json).expect("descriptor should parse");

        let err = descriptor
            .resolve(&key(KeyboardMode::Text, false))
            .expect_err("resolve should fail");
        assert!(matches!(err, LayoutBuildError::MissingAlphabet { .. }));
    }

    /// Test unknown variant names are rejected
    #[test]
    fn test_resolve_unknown_variant() {
        let json = r#"{ "name": "broken", "variants": { "alphabet": {}, "numpad": {} } }"#;
        let descriptor = LayoutSetDescriptor::from_json(json).expect("descriptor should parse");

        match descriptor.resolve(&key(KeyboardMode::Text, false)) {
            Err(LayoutBuildError::UnknownVariant { name, .. }) => assert_eq!(name, "numpad"),
            other => panic!("expected UnknownVariant, got {:?}", other),
        }
    }
}
