// SPDX-License-Identifier: GPL-3.0-only

//! Localized keyboard texts.
//!
//! Labels the dispatcher hands to surfaces (such as the emoji panel's
//! "switch back" key) follow the locale of the active subtype, not the
//! desktop language. Each [`KeyboardTexts`] owns its own fluent loader so
//! switching subtypes never affects other localized UI.

use i18n_embed::fluent::{FluentLanguageLoader, fluent_language_loader};
use i18n_embed::unic_langid::LanguageIdentifier;
use i18n_embed::{DefaultLocalizer, LanguageLoader, Localizer};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

/// Language subtag of the desktop's preferred language, such as `"de"`.
///
/// Hosts use it for [`Settings::system_language`](crate::config::Settings)
/// when the platform does not report one.
pub fn desktop_language() -> Option<String> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
        .first()
        .map(|id| id.language.to_string())
}

/// Keys of the locale text table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    /// Label of the key returning from symbols or emoji to the alphabet.
    SwitchToAlpha,
    SwitchToSymbols,
    SwitchToShiftedSymbols,
    EmojiPanel,
}

/// Locale text table for the active subtype.
pub struct KeyboardTexts {
    loader: FluentLanguageLoader,
}

impl std::fmt::Debug for KeyboardTexts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardTexts")
            .field("languages", &self.loader.current_languages())
            .finish()
    }
}

impl KeyboardTexts {
    /// Creates a table holding the fallback language.
    pub fn new() -> Self {
        let loader: FluentLanguageLoader = fluent_language_loader!();
        if let Err(e) = loader.load_fallback_language(&Localizations) {
            tracing::error!("Failed to load fallback keyboard texts: {}", e);
        }
        Self { loader }
    }

    /// Switches the table to a subtype locale such as `"en_US"` or `"ru"`.
    ///
    /// Unknown or unparsable locales leave the fallback language in place.
    pub fn set_locale(&mut self, locale: &str) {
        let tag = locale.replace('_', "-");
        let requested: LanguageIdentifier = match tag.parse() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Unparsable subtype locale '{}': {}", locale, e);
                return;
            }
        };

        let localizer = DefaultLocalizer::new(&self.loader, &Localizations);
        match localizer.select(&[requested]) {
            Ok(selected) => tracing::debug!("Keyboard texts for '{}': {:?}", locale, selected),
            Err(e) => tracing::warn!("Failed to select keyboard texts for '{}': {}", locale, e),
        }
    }

    /// Languages currently providing texts, most preferred first.
    pub fn languages(&self) -> Vec<LanguageIdentifier> {
        self.loader.current_languages()
    }

    /// Looks up a text in the current locale.
    pub fn text(&self, key: TextKey) -> String {
        match key {
            TextKey::SwitchToAlpha => i18n_embed_fl::fl!(self.loader, "switch-to-alpha"),
            TextKey::SwitchToSymbols => i18n_embed_fl::fl!(self.loader, "switch-to-symbols"),
            TextKey::SwitchToShiftedSymbols => {
                i18n_embed_fl::fl!(self.loader, "switch-to-shifted-symbols")
            }
            TextKey::EmojiPanel => i18n_embed_fl::fl!(self.loader, "emoji-panel"),
        }
    }
}

impl Default for KeyboardTexts {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
