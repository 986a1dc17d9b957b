// SPDX-License-Identifier: GPL-3.0-only

//! Core types for keyboard variant resolution.
//!
//! This module defines the configuration key a variant set is built for, the
//! closed set of variant identifiers, resolved variants, the variant set
//! itself and the error type returned by layout-set builders.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::theme::ThemeId;

// ============================================================================
// Variant Identifiers
// ============================================================================

/// Identifies one keyboard variant within a variant set.
///
/// The set is closed; every consumer matches it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantId {
    Alphabet,
    AlphabetManualShifted,
    AlphabetAutomaticShifted,
    AlphabetShiftLocked,
    AlphabetShiftLockShifted,
    Symbols,
    SymbolsShifted,
    Emoji,
}

impl VariantId {
    /// Number of variant identifiers.
    pub const COUNT: usize = 8;

    /// Every variant identifier, in index order.
    pub const ALL: [VariantId; Self::COUNT] = [
        VariantId::Alphabet,
        VariantId::AlphabetManualShifted,
        VariantId::AlphabetAutomaticShifted,
        VariantId::AlphabetShiftLocked,
        VariantId::AlphabetShiftLockShifted,
        VariantId::Symbols,
        VariantId::SymbolsShifted,
        VariantId::Emoji,
    ];

    /// Position of this identifier in [`VariantId::ALL`].
    pub const fn index(self) -> usize {
        match self {
            VariantId::Alphabet => 0,
            VariantId::AlphabetManualShifted => 1,
            VariantId::AlphabetAutomaticShifted => 2,
            VariantId::AlphabetShiftLocked => 3,
            VariantId::AlphabetShiftLockShifted => 4,
            VariantId::Symbols => 5,
            VariantId::SymbolsShifted => 6,
            VariantId::Emoji => 7,
        }
    }

    /// Name used in layout descriptors and logs.
    pub const fn name(self) -> &'static str {
        match self {
            VariantId::Alphabet => "alphabet",
            VariantId::AlphabetManualShifted => "alphabet_manual_shifted",
            VariantId::AlphabetAutomaticShifted => "alphabet_automatic_shifted",
            VariantId::AlphabetShiftLocked => "alphabet_shift_locked",
            VariantId::AlphabetShiftLockShifted => "alphabet_shift_lock_shifted",
            VariantId::Symbols => "symbols",
            VariantId::SymbolsShifted => "symbols_shifted",
            VariantId::Emoji => "emoji",
        }
    }

    /// Parses a descriptor name.
    pub fn from_name(name: &str) -> Option<VariantId> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Returns `true` for the five alphabet variants.
    pub const fn is_alphabet(self) -> bool {
        match self {
            VariantId::Alphabet
            | VariantId::AlphabetManualShifted
            | VariantId::AlphabetAutomaticShifted
            | VariantId::AlphabetShiftLocked
            | VariantId::AlphabetShiftLockShifted => true,
            VariantId::Symbols | VariantId::SymbolsShifted | VariantId::Emoji => false,
        }
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Writing system of a layout set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptId {
    #[default]
    Unknown,
    Latin,
    Cyrillic,
    Greek,
    Arabic,
    Hebrew,
    Armenian,
    Georgian,
    Devanagari,
    Thai,
}

// ============================================================================
// Editor Context
// ============================================================================

/// The kind of text field being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    #[default]
    Text,
    Url,
    Email,
    ShortMessage,
    Password,
    Phone,
    Number,
    Date,
    Time,
    DateTime,
}

/// Keyboard mode derived from the editor's input type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardMode {
    #[default]
    Text,
    Url,
    Email,
    Im,
    Phone,
    Number,
    Date,
    Time,
    DateTime,
}

impl KeyboardMode {
    /// Modes whose alphabet variants are numeric pads.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            KeyboardMode::Phone
                | KeyboardMode::Number
                | KeyboardMode::Date
                | KeyboardMode::Time
                | KeyboardMode::DateTime
        )
    }
}

/// What the dispatcher knows about the text field being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorContext {
    pub input_type: InputType,
}

impl EditorContext {
    pub fn new(input_type: InputType) -> Self {
        Self { input_type }
    }

    pub fn mode(&self) -> KeyboardMode {
        match self.input_type {
            InputType::Text | InputType::Password => KeyboardMode::Text,
            InputType::Url => KeyboardMode::Url,
            InputType::Email => KeyboardMode::Email,
            InputType::ShortMessage => KeyboardMode::Im,
            InputType::Phone => KeyboardMode::Phone,
            InputType::Number => KeyboardMode::Number,
            InputType::Date => KeyboardMode::Date,
            InputType::Time => KeyboardMode::Time,
            InputType::DateTime => KeyboardMode::DateTime,
        }
    }

    pub fn is_password(&self) -> bool {
        self.input_type == InputType::Password
    }
}

// ============================================================================
// Subtype
// ============================================================================

/// An input method subtype: a locale paired with a keyboard layout name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subtype {
    /// Locale such as `"en_US"`, or `"zz"` for no language.
    pub locale: String,
    /// Name of the layout descriptor, such as `"qwerty"`.
    pub keyboard_layout: String,
}

impl Subtype {
    pub fn new(locale: impl Into<String>, keyboard_layout: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            keyboard_layout: keyboard_layout.into(),
        }
    }

    /// Language part of the locale (`"en"` for `"en_US"` or `"en-US"`).
    pub fn language(&self) -> &str {
        self.locale
            .split(['_', '-'])
            .next()
            .unwrap_or(self.locale.as_str())
    }

    /// Returns `true` for subtypes that carry no language.
    pub fn is_no_language(&self) -> bool {
        self.language() == app_settings::NO_LANGUAGE
    }
}

impl Default for Subtype {
    fn default() -> Self {
        Self::new("en_US", "qwerty")
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.locale, self.keyboard_layout)
    }
}

// ============================================================================
// Configuration Key
// ============================================================================

/// Every input that determines which variant set is valid.
///
/// Two keys are equal iff every field is equal; any change invalidates the
/// variant set built for the old key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigurationKey {
    pub theme: ThemeId,
    pub width: u32,
    pub height: u32,
    pub subtype: Subtype,
    pub mode: KeyboardMode,
    pub voice_input_key: bool,
    pub language_switch_key: bool,
    pub split_layout: bool,
}

impl ConfigurationKey {
    /// Whether moving from `current` to `next` requires building a new set.
    pub fn needs_rebuild(current: Option<&ConfigurationKey>, next: &ConfigurationKey) -> bool {
        current != Some(next)
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "theme={} {}x{} subtype={} mode={:?} voice={} lang_switch={} split={}",
            self.theme,
            self.width,
            self.height,
            self.subtype,
            self.mode,
            self.voice_input_key,
            self.language_switch_key,
            self.split_layout
        )
    }
}

// ============================================================================
// Variants
// ============================================================================

/// Icon names keyed by the key they decorate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconSet {
    icons: BTreeMap<String, String>,
}

impl IconSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon(mut self, key: impl Into<String>, icon: impl Into<String>) -> Self {
        self.icons.insert(key.into(), icon.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.icons.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Returns a copy of this set with `overrides` applied on top.
    pub fn merged(&self, overrides: &IconSet) -> IconSet {
        let mut icons = self.icons.clone();
        icons.extend(
            overrides
                .icons
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        IconSet { icons }
    }
}

/// Per-variant values a builder resolves before the set is assembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantTemplate {
    /// Top padding in pixels.
    pub top_padding: u32,
    pub icons: Arc<IconSet>,
    /// Whether the variant is drawn as a split layout.
    pub split: bool,
}

/// A resolved, renderable keyboard for one variant under one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub id: VariantId,
    /// Configuration the variant was built for.
    pub key: Arc<ConfigurationKey>,
    /// Top padding in pixels.
    pub top_padding: u32,
    pub icons: Arc<IconSet>,
    pub split: bool,
}

impl Variant {
    pub fn subtype(&self) -> &Subtype {
        &self.key.subtype
    }

    /// Returns `true` if both variants have the same identity.
    pub fn same_identity(&self, other: &Variant) -> bool {
        self.id == other.id && self.key == other.key
    }
}

/// Every variant for exactly one configuration key.
///
/// Lookup is total: a set can only be assembled with one variant per
/// [`VariantId`].
#[derive(Debug, Clone)]
pub struct VariantSet {
    key: Arc<ConfigurationKey>,
    script: ScriptId,
    variants: Vec<Arc<Variant>>,
}

impl VariantSet {
    /// Assembles a set by resolving a template for every variant identifier.
    ///
    /// Stops at the first error; nothing partially built escapes.
    pub fn try_from_fn<E>(
        key: ConfigurationKey,
        script: ScriptId,
        mut resolve: impl FnMut(VariantId) -> Result<VariantTemplate, E>,
    ) -> Result<Self, E> {
        let key = Arc::new(key);
        let mut variants = Vec::with_capacity(VariantId::COUNT);
        for id in VariantId::ALL {
            let template = resolve(id)?;
            variants.push(Arc::new(Variant {
                id,
                key: Arc::clone(&key),
                top_padding: template.top_padding,
                icons: template.icons,
                split: template.split,
            }));
        }
        Ok(Self {
            key,
            script,
            variants,
        })
    }

    pub fn key(&self) -> &ConfigurationKey {
        &self.key
    }

    pub fn script_id(&self) -> ScriptId {
        self.script
    }

    /// Returns the variant for `id`.
    pub fn get(&self, id: VariantId) -> &Arc<Variant> {
        &self.variants[id.index()]
    }

    /// Returns `true` if `variant` is one of this set's variants.
    pub fn contains(&self, variant: &Arc<Variant>) -> bool {
        Arc::ptr_eq(self.get(variant.id), variant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Variant>> {
        self.variants.iter()
    }
}

// ============================================================================
// Build Errors
// ============================================================================

/// Error returned when a variant set cannot be built for a key.
#[derive(Debug)]
pub enum LayoutBuildError {
    /// No layout descriptor exists for the key's subtype.
    MissingDescriptor {
        key: ConfigurationKey,
    },

    /// The descriptor exists but is not valid JSON for a layout set.
    Malformed {
        key: ConfigurationKey,
        source: serde_json::Error,
    },

    /// The descriptor names a variant that does not exist.
    UnknownVariant {
        key: ConfigurationKey,
        name: String,
    },

    /// The descriptor has no alphabet variant to fall back on.
    MissingAlphabet {
        key: ConfigurationKey,
    },

    /// A descriptor file could not be read.
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl LayoutBuildError {
    pub fn missing_descriptor(key: &ConfigurationKey) -> Self {
        Self::MissingDescriptor { key: key.clone() }
    }

    pub fn malformed(key: &ConfigurationKey, source: serde_json::Error) -> Self {
        Self::Malformed {
            key: key.clone(),
            source,
        }
    }

    pub fn unknown_variant(key: &ConfigurationKey, name: impl Into<String>) -> Self {
        Self::UnknownVariant {
            key: key.clone(),
            name: name.into(),
        }
    }

    pub fn missing_alphabet(key: &ConfigurationKey) -> Self {
        Self::MissingAlphabet { key: key.clone() }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The key the build was attempted for, if any.
    pub fn key(&self) -> Option<&ConfigurationKey> {
        match self {
            Self::MissingDescriptor { key }
            | Self::Malformed { key, .. }
            | Self::UnknownVariant { key, .. }
            | Self::MissingAlphabet { key } => Some(key),
            Self::Io { .. } => None,
        }
    }
}

impl fmt::Display for LayoutBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDescriptor { key } => write!(
                f,
                "no layout descriptor '{}' for [{}]",
                key.subtype.keyboard_layout, key
            ),
            Self::Malformed { key, source } => write!(
                f,
                "malformed layout descriptor '{}' for [{}]: {}",
                key.subtype.keyboard_layout, key, source
            ),
            Self::UnknownVariant { key, name } => write!(
                f,
                "layout descriptor '{}' names unknown variant '{}'",
                key.subtype.keyboard_layout, name
            ),
            Self::MissingAlphabet { key } => write!(
                f,
                "layout descriptor '{}' has no alphabet variant",
                key.subtype.keyboard_layout
            ),
            Self::Io { path, source } => {
                write!(f, "failed to read layout descriptor '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for LayoutBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(theme: u32) -> ConfigurationKey {
        ConfigurationKey {
            theme: ThemeId(theme),
            width: 1080,
            height: 300,
            subtype: Subtype::new("en_US", "qwerty"),
            mode: KeyboardMode::Text,
            voice_input_key: true,
            language_switch_key: false,
            split_layout: false,
        }
    }

    /// Test ALL is in index order and names round-trip
    #[test]
    fn test_variant_id_index_and_names() {
        for (position, id) in VariantId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), position, "{} is out of order", id);
            assert_eq!(VariantId::from_name(id.name()), Some(id));
        }
        assert_eq!(VariantId::from_name("numpad"), None);
    }

    /// Test alphabet classification
    #[test]
    fn test_variant_id_is_alphabet() {
        let alphabet: Vec<_> = VariantId::ALL
            .into_iter()
            .filter(|id| id.is_alphabet())
            .collect();
        assert_eq!(alphabet.len(), 5);
        assert!(!VariantId::Emoji.is_alphabet());
    }

    /// Test rebuild predicate compares every field
    #[test]
    fn test_needs_rebuild() {
        let k1 = key(3);
        assert!(ConfigurationKey::needs_rebuild(None, &k1));
        assert!(!ConfigurationKey::needs_rebuild(Some(&k1), &k1.clone()));

        let mut k2 = k1.clone();
        k2.split_layout = true;
        assert!(ConfigurationKey::needs_rebuild(Some(&k1), &k2));

        assert!(ConfigurationKey::needs_rebuild(Some(&k1), &key(4)));
    }

    /// Test subtype language extraction
    #[test]
    fn test_subtype_language() {
        assert_eq!(Subtype::new("en_US", "qwerty").language(), "en");
        assert_eq!(Subtype::new("pt-BR", "qwerty").language(), "pt");
        assert_eq!(Subtype::new("fr", "azerty").language(), "fr");
        assert!(Subtype::new("zz", "qwerty").is_no_language());
    }

    /// Test editor input types map to keyboard modes
    #[test]
    fn test_editor_mode() {
        assert_eq!(EditorContext::new(InputType::Password).mode(), KeyboardMode::Text);
        assert_eq!(EditorContext::new(InputType::ShortMessage).mode(), KeyboardMode::Im);
        assert!(EditorContext::new(InputType::Phone).mode().is_numeric());
        assert!(!EditorContext::new(InputType::Url).mode().is_numeric());
        assert!(EditorContext::new(InputType::Password).is_password());
    }

    /// Test icon overrides replace base entries
    #[test]
    fn test_icon_set_merged() {
        let base = IconSet::new()
            .with_icon("shift_key", "ic_shift")
            .with_icon("delete_key", "ic_delete");
        let overrides = IconSet::new().with_icon("shift_key", "ic_shift_locked");

        let merged = base.merged(&overrides);
        assert_eq!(merged.get("shift_key"), Some("ic_shift_locked"));
        assert_eq!(merged.get("delete_key"), Some("ic_delete"));
        assert_eq!(base.get("shift_key"), Some("ic_shift"));
    }

    /// Test a set holds one variant per id, all sharing the set's key
    #[test]
    fn test_variant_set_total() {
        let set = VariantSet::try_from_fn(key(3), ScriptId::Latin, |id| {
            Ok::<_, LayoutBuildError>(VariantTemplate {
                top_padding: id.index() as u32,
                ..VariantTemplate::default()
            })
        })
        .expect("set should build");

        assert_eq!(set.iter().count(), VariantId::COUNT);
        for id in VariantId::ALL {
            let variant = set.get(id);
            assert_eq!(variant.id, id);
            assert_eq!(variant.top_padding, id.index() as u32);
            assert_eq!(*variant.key, *set.key());
            assert!(set.contains(variant));
        }
        assert_eq!(set.script_id(), ScriptId::Latin);
    }

    /// Test the first resolve error aborts the build
    #[test]
    fn test_variant_set_build_error() {
        let k = key(3);
        let result = VariantSet::try_from_fn(k.clone(), ScriptId::Latin, |id| match id {
            VariantId::Symbols => Err(LayoutBuildError::missing_alphabet(&k)),
            _ => Ok(VariantTemplate::default()),
        });

        let err = result.expect_err("build should fail");
        assert_eq!(err.key(), Some(&k));
        assert!(err.to_string().contains("qwerty"));
    }

    /// Test variants from different sets are not contained in each other
    #[test]
    fn test_variant_set_contains_is_identity() {
        let build = |theme| {
            VariantSet::try_from_fn(key(theme), ScriptId::Latin, |_| {
                Ok::<_, LayoutBuildError>(VariantTemplate::default())
            })
            .expect("set should build")
        };
        let first = build(3);
        let second = build(3);

        let alphabet = first.get(VariantId::Alphabet);
        assert!(!second.contains(alphabet));
        assert!(alphabet.same_identity(second.get(VariantId::Alphabet)));
    }
}
