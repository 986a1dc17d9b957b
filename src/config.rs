// SPDX-License-Identifier: GPL-3.0-only

//! User settings as seen by the dispatcher.
//!
//! The dispatcher never owns settings storage. It reads point-in-time
//! [`Settings`] snapshots, either handed to it explicitly (layout loading) or
//! pulled from a [`SettingsSource`] at every variant switch, so presentation
//! parameters never go stale.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::layout::Subtype;
use crate::theme::ThemeId;

/// Custom key preview animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyPreviewAnimation {
    pub show_up_start_x_scale: f32,
    pub show_up_start_y_scale: f32,
    pub show_up_duration_ms: u32,
    pub dismiss_end_x_scale: f32,
    pub dismiss_end_y_scale: f32,
    pub dismiss_duration_ms: u32,
}

impl Default for KeyPreviewAnimation {
    fn default() -> Self {
        Self {
            show_up_start_x_scale: 0.98,
            show_up_start_y_scale: 0.98,
            show_up_duration_ms: 17,
            dismiss_end_x_scale: 0.98,
            dismiss_end_y_scale: 0.98,
            dismiss_duration_ms: 53,
        }
    }
}

/// A read-only snapshot of the settings the dispatcher depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme the user selected.
    pub keyboard_theme: ThemeId,
    /// Subtype currently selected in the input method.
    pub subtype: Subtype,
    /// All subtypes the user enabled, including `subtype`.
    pub enabled_subtypes: Vec<Subtype>,
    /// Language of the system UI, e.g. `"en"`.
    pub system_language: String,
    pub show_voice_input_key: bool,
    pub show_language_switch_key: bool,
    pub split_keyboard_enabled: bool,
    /// A physical keyboard is attached; the soft keyboard frame collapses.
    pub has_hardware_keyboard: bool,
    /// Multiplier applied to the theme's default keyboard height.
    pub keyboard_height_scale: f32,
    pub key_preview_popup_on: bool,
    pub key_preview_popup_dismiss_delay_ms: u32,
    /// Custom preview animation; `None` uses the surface's defaults.
    pub key_preview_animation: Option<KeyPreviewAnimation>,
    /// The shortcut input method (e.g. voice) is ready to be invoked.
    pub shortcut_ime_ready: bool,
    /// More than one input method or subtype is enabled system-wide.
    pub has_multiple_enabled_imes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let subtype = Subtype::default();
        Self {
            keyboard_theme: ThemeId::default(),
            enabled_subtypes: vec![subtype.clone()],
            subtype,
            system_language: "en".to_string(),
            show_voice_input_key: true,
            show_language_switch_key: true,
            split_keyboard_enabled: false,
            has_hardware_keyboard: false,
            keyboard_height_scale: 1.0,
            key_preview_popup_on: true,
            key_preview_popup_dismiss_delay_ms: app_settings::DEFAULT_KEY_PREVIEW_DISMISS_DELAY_MS,
            key_preview_animation: None,
            shortcut_ime_ready: false,
            has_multiple_enabled_imes: false,
        }
    }
}

impl Settings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether the language switch key should be shown.
    ///
    /// The key is only useful when there is something to switch to: another
    /// enabled subtype or another input method.
    pub fn language_switch_key_enabled(&self) -> bool {
        self.show_language_switch_key
            && (self.has_multiple_enabled_imes || self.enabled_subtypes.len() > 1)
    }

    /// Whether the user asked for a split layout and the build supports it.
    pub fn split_layout_enabled(&self) -> bool {
        app_settings::SPLIT_KEYBOARD_SUPPORTED && self.split_keyboard_enabled
    }
}

// ============================================================================
// Live Settings
// ============================================================================

/// Source of the live settings snapshot.
pub trait SettingsSource {
    /// Returns the current snapshot.
    fn current(&self) -> Arc<Settings>;
}

/// A fixed snapshot never changes.
impl SettingsSource for Arc<Settings> {
    fn current(&self) -> Arc<Settings> {
        Arc::clone(self)
    }
}

/// Cloneable live settings store.
///
/// All clones observe the same snapshot; publishing replaces it atomically.
#[derive(Debug, Clone)]
pub struct SharedSettings {
    snap: Arc<ArcSwap<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            snap: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    /// Replaces the snapshot.
    pub fn publish(&self, settings: Settings) {
        self.snap.store(Arc::new(settings));
    }

    /// Publishes a modified copy of the current snapshot.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        let mut next = Settings::clone(&self.snap.load());
        f(&mut next);
        self.publish(next);
    }
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsSource for SharedSettings {
    fn current(&self) -> Arc<Settings> {
        self.snap.load_full()
    }
}

// ============================================================================
// Tests
// ============================================================================
