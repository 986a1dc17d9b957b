// SPDX-License-Identifier: GPL-3.0-only

//! Presentation parameters applied to the main surface on every switch.
//!
//! Nothing here is cached: [`PresentationParams::derive`] reads the settings
//! snapshot that is live at the moment of the switch.

use crate::config::{KeyPreviewAnimation, Settings};
use crate::layout::{Subtype, Variant};

/// How the spacebar labels the active language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LanguageOnSpacebarFormat {
    /// No label.
    #[default]
    None,
    /// Language name only, e.g. "English".
    LanguageOnly,
    /// Full locale name, e.g. "English (US)".
    FullLocale,
}

impl LanguageOnSpacebarFormat {
    /// Chooses the spacebar label for `subtype` under `settings`.
    pub fn for_subtype(subtype: &Subtype, settings: &Settings) -> Self {
        if subtype.is_no_language() {
            return LanguageOnSpacebarFormat::FullLocale;
        }

        // A lone subtype in the system language needs no label
        if settings.enabled_subtypes.len() < 2 && settings.system_language == subtype.language() {
            return LanguageOnSpacebarFormat::None;
        }

        let same_language_and_layout = settings
            .enabled_subtypes
            .iter()
            .filter(|other| {
                other.language() == subtype.language()
                    && other.keyboard_layout == subtype.keyboard_layout
            })
            .count();

        if same_language_and_layout > 1 {
            LanguageOnSpacebarFormat::FullLocale
        } else {
            LanguageOnSpacebarFormat::LanguageOnly
        }
    }
}

/// Key preview popup configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPreviewParams {
    pub enabled: bool,
    pub dismiss_delay_ms: u32,
    /// The user overrode the surface's built-in animation.
    pub custom_animation: bool,
    pub animation: KeyPreviewAnimation,
}

/// Timing, animation and indicator parameters for one switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationParams {
    pub key_preview: KeyPreviewParams,
    /// The shortcut key is drawn as active.
    pub shortcut_key_ready: bool,
    /// The variant's subtype differs from the one shown before.
    pub subtype_changed: bool,
    pub language_on_spacebar: LanguageOnSpacebarFormat,
    pub has_multiple_enabled_imes: bool,
}

impl PresentationParams {
    /// Derives the parameters for showing `variant` after `previous`.
    pub fn derive(settings: &Settings, variant: &Variant, previous: Option<&Variant>) -> Self {
        let subtype_changed = previous.is_none_or(|old| old.subtype() != variant.subtype());

        Self {
            key_preview: KeyPreviewParams {
                enabled: settings.key_preview_popup_on,
                dismiss_delay_ms: settings.key_preview_popup_dismiss_delay_ms,
                custom_animation: settings.key_preview_animation.is_some(),
                animation: settings.key_preview_animation.unwrap_or_default(),
            },
            shortcut_key_ready: settings.shortcut_ime_ready,
            subtype_changed,
            language_on_spacebar: LanguageOnSpacebarFormat::for_subtype(variant.subtype(), settings),
            has_multiple_enabled_imes: settings.has_multiple_enabled_imes
                || settings.enabled_subtypes.len() > 1,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::{ConfigurationKey, IconSet, KeyboardMode, VariantId};
    use crate::theme::ThemeId;

    fn variant(subtype: Subtype) -> Variant {
        Variant {
            id: VariantId::Alphabet,
            key: Arc::new(ConfigurationKey {
                theme: ThemeId::default(),
                width: 1080,
                height: 300,
                subtype,
                mode: KeyboardMode::Text,
                voice_input_key: true,
                language_switch_key: false,
                split_layout: false,
            }),
            top_padding: 12,
            icons: Arc::new(IconSet::new()),
            split: false,
        }
    }

    /// Test a single subtype in the system language hides the spacebar label
    #[test]
    fn test_spacebar_single_system_language() {
        let settings = Settings::default();
        assert_eq!(
            LanguageOnSpacebarFormat::for_subtype(&Subtype::new("en_US", "qwerty"), &settings),
            LanguageOnSpacebarFormat::None
        );
    }

    /// Test the no-language subtype always shows the full locale
    #[test]
    fn test_spacebar_no_language() {
        let settings = Settings::default();
        assert_eq!(
            LanguageOnSpacebarFormat::for_subtype(&Subtype::new("zz", "qwerty"), &settings),
            LanguageOnSpacebarFormat::FullLocale
        );
    }

    /// Test two subtypes sharing language and layout show the full locale
    #[test]
    fn test_spacebar_ambiguous_language() {
        let settings = Settings {
            enabled_subtypes: vec![
                Subtype::new("en_US", "qwerty"),
                Subtype::new("en_GB", "qwerty"),
                Subtype::new("fr_FR", "azerty"),
            ],
            ..Settings::default()
        };

        assert_eq!(
            LanguageOnSpacebarFormat::for_subtype(&Subtype::new("en_GB", "qwerty"), &settings),
            LanguageOnSpacebarFormat::FullLocale
        );
        assert_eq!(
            LanguageOnSpacebarFormat::for_subtype(&Subtype::new("fr_FR", "azerty"), &settings),
            LanguageOnSpacebarFormat::LanguageOnly
        );
    }

    /// Test params read every value from the snapshot
    #[test]
    fn test_derive_from_snapshot() {
        let settings = Settings {
            key_preview_popup_on: false,
            key_preview_popup_dismiss_delay_ms: 120,
            shortcut_ime_ready: true,
            key_preview_animation: Some(KeyPreviewAnimation {
                dismiss_duration_ms: 90,
                ..KeyPreviewAnimation::default()
            }),
            ..Settings::default()
        };

        let current = variant(Subtype::new("en_US", "qwerty"));
        let params = PresentationParams::derive(&settings, &current, None);

        assert!(!params.key_preview.enabled);
        assert_eq!(params.key_preview.dismiss_delay_ms, 120);
        assert!(params.key_preview.custom_animation);
        assert_eq!(params.key_preview.animation.dismiss_duration_ms, 90);
        assert!(params.shortcut_key_ready);
        assert!(params.subtype_changed, "First switch always counts as a subtype change");
        assert!(!params.has_multiple_enabled_imes);
    }

    /// Test subtype change detection against the previous variant
    #[test]
    fn test_subtype_changed() {
        let settings = Settings::default();
        let english = variant(Subtype::new("en_US", "qwerty"));
        let french = variant(Subtype::new("fr_FR", "azerty"));

        let same = PresentationParams::derive(&settings, &english, Some(&english));
        assert!(!same.subtype_changed);

        let changed = PresentationParams::derive(&settings, &french, Some(&english));
        assert!(changed.subtype_changed);
    }
}
