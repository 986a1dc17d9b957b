// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard themes and their binding to the display.
//!
//! A [`ThemeContext`] is what every theme-dependent decision reads from: the
//! keyboard geometry fed into a [`ConfigurationKey`](crate::layout::ConfigurationKey)
//! and the key visual attributes handed to the emoji panel. It is rebound only
//! when the requested theme differs from the bound one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::config::Settings;

// ============================================================================
// Theme Identity
// ============================================================================

/// Stable identifier of a keyboard theme, as stored in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(pub u32);

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match KeyboardTheme::find(*self) {
            Some(theme) => write!(f, "{}", theme.name),
            None => write!(f, "theme#{}", self.0),
        }
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        KeyboardTheme::DEFAULT.id
    }
}

/// Visual attributes shared by every key drawn under a theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyVisualAttributes {
    /// Letter label size as a fraction of the key height.
    pub label_ratio: f32,
    /// Hint label size as a fraction of the key height.
    pub hint_label_ratio: f32,
    /// Key preview text size as a fraction of the key height.
    pub preview_ratio: f32,
    /// Whether keys draw an edge-to-edge background.
    pub edge_to_edge: bool,
}

impl Default for KeyVisualAttributes {
    fn default() -> Self {
        KeyboardTheme::DEFAULT.visual
    }
}

/// A selectable keyboard theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardTheme {
    /// Identifier persisted in settings.
    pub id: ThemeId,
    /// Short name used in logs and layout descriptors.
    pub name: &'static str,
    /// Default keyboard height in dp before clamping and scaling.
    pub default_height_dp: f32,
    /// Key visual attributes for this theme.
    pub visual: KeyVisualAttributes,
}

impl KeyboardTheme {
    pub const ICS: KeyboardTheme = KeyboardTheme {
        id: ThemeId(0),
        name: "ics",
        default_height_dp: 205.6,
        visual: KeyVisualAttributes {
            label_ratio: 0.55,
            hint_label_ratio: 0.18,
            preview_ratio: 0.82,
            edge_to_edge: false,
        },
    };

    pub const KLP: KeyboardTheme = KeyboardTheme {
        id: ThemeId(2),
        name: "klp",
        default_height_dp: 205.6,
        visual: KeyVisualAttributes {
            label_ratio: 0.55,
            hint_label_ratio: 0.18,
            preview_ratio: 0.82,
            edge_to_edge: false,
        },
    };

    pub const LXX_LIGHT: KeyboardTheme = KeyboardTheme {
        id: ThemeId(3),
        name: "lxx_light",
        default_height_dp: 215.0,
        visual: KeyVisualAttributes {
            label_ratio: 0.5,
            hint_label_ratio: 0.2,
            preview_ratio: 0.8,
            edge_to_edge: true,
        },
    };

    pub const LXX_DARK: KeyboardTheme = KeyboardTheme {
        id: ThemeId(4),
        name: "lxx_dark",
        default_height_dp: 215.0,
        visual: KeyVisualAttributes {
            label_ratio: 0.5,
            hint_label_ratio: 0.2,
            preview_ratio: 0.8,
            edge_to_edge: true,
        },
    };

    /// Theme used when settings name no known theme.
    pub const DEFAULT: KeyboardTheme = Self::LXX_LIGHT;

    /// Every available theme.
    pub const ALL: [KeyboardTheme; 4] = [Self::ICS, Self::KLP, Self::LXX_LIGHT, Self::LXX_DARK];

    /// Looks up a theme by identifier.
    pub fn find(id: ThemeId) -> Option<KeyboardTheme> {
        Self::ALL.into_iter().find(|theme| theme.id == id)
    }

    /// Resolves a theme identifier, falling back to [`KeyboardTheme::DEFAULT`].
    pub fn from_id(id: ThemeId) -> KeyboardTheme {
        Self::find(id).unwrap_or_else(|| {
            tracing::warn!("Unknown keyboard theme {:?}, using {}", id, Self::DEFAULT.name);
            Self::DEFAULT
        })
    }
}

// ============================================================================
// Display Metrics
// ============================================================================

/// Physical display properties reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
    /// Pixels per dp.
    pub density: f32,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            width_px: app_settings::DEFAULT_DISPLAY_WIDTH,
            height_px: app_settings::DEFAULT_DISPLAY_HEIGHT,
            density: app_settings::DEFAULT_DISPLAY_DENSITY,
        }
    }
}

// ============================================================================
// Theme Context
// ============================================================================

/// A theme bound to the display it renders on.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeContext {
    theme: KeyboardTheme,
    metrics: DisplayMetrics,
}

impl ThemeContext {
    /// Binds `theme` to the given display.
    pub fn bind(theme: KeyboardTheme, metrics: DisplayMetrics) -> Self {
        Self { theme, metrics }
    }

    pub fn theme(&self) -> &KeyboardTheme {
        &self.theme
    }

    pub fn metrics(&self) -> &DisplayMetrics {
        &self.metrics
    }

    /// Returns `true` if this context is bound to the theme `id`.
    pub fn is_bound_to(&self, id: ThemeId) -> bool {
        self.theme.id == id
    }

    pub fn key_visual_attributes(&self) -> KeyVisualAttributes {
        self.theme.visual
    }

    /// Keyboard width in pixels; the keyboard always spans the display.
    pub fn keyboard_width(&self) -> u32 {
        self.metrics.width_px
    }

    /// Keyboard height in pixels for the given settings.
    ///
    /// The theme's default height is clamped between the minimum and maximum
    /// fractions of the display height, then multiplied by the user's height
    /// scale (itself clamped to the supported range).
    pub fn keyboard_height(&self, settings: &Settings) -> u32 {
        let display_height = self.metrics.height_px as f32;
        let max = display_height * app_settings::MAX_KEYBOARD_HEIGHT_FRACTION;
        let min = display_height * app_settings::MIN_KEYBOARD_HEIGHT_FRACTION;
        let default = (self.theme.default_height_dp * self.metrics.density)
            .min(max)
            .max(min);
        let scale = settings.keyboard_height_scale.clamp(
            app_settings::MIN_KEYBOARD_HEIGHT_SCALE,
            app_settings::MAX_KEYBOARD_HEIGHT_SCALE,
        );
        (default * scale).round() as u32
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test unknown theme ids resolve to the default theme
    #[test]
    fn test_from_id_falls_back_to_default() {
        assert_eq!(KeyboardTheme::from_id(ThemeId(4)).name, "lxx_dark");
        assert_eq!(KeyboardTheme::from_id(ThemeId(99)), KeyboardTheme::DEFAULT);
        assert!(KeyboardTheme::find(ThemeId(1)).is_none());
    }

    /// Test theme ids display by theme name
    #[test]
    fn test_theme_id_display() {
        assert_eq!(ThemeId(0).to_string(), "ics");
        assert_eq!(ThemeId(42).to_string(), "theme#42");
    }

    /// Test keyboard height uses the theme default when it fits
    #[test]
    fn test_keyboard_height_default() {
        let metrics = DisplayMetrics {
            width_px: 1080,
            height_px: 1920,
            density: 2.0,
        };
        let ctx = ThemeContext::bind(KeyboardTheme::LXX_LIGHT, metrics);
        let settings = Settings::default();

        // 215dp * 2.0 = 430px, inside [384, 883.2]
        assert_eq!(ctx.keyboard_height(&settings), 430);
        assert_eq!(ctx.keyboard_width(), 1080);
    }

    /// Test keyboard height is clamped to the display fractions and scaled
    #[test]
    fn test_keyboard_height_clamped_and_scaled() {
        let metrics = DisplayMetrics {
            width_px: 1920,
            height_px: 1000,
            density: 4.0,
        };
        let ctx = ThemeContext::bind(KeyboardTheme::ICS, metrics);
        let mut settings = Settings::default();

        // 205.6dp * 4.0 = 822.4px, capped at 460px
        assert_eq!(ctx.keyboard_height(&settings), 460);

        settings.keyboard_height_scale = 0.5;
        assert_eq!(ctx.keyboard_height(&settings), 230);

        // Out-of-range scales are clamped
        settings.keyboard_height_scale = 10.0;
        assert_eq!(ctx.keyboard_height(&settings), 690);
    }

    /// Test binding identity
    #[test]
    fn test_is_bound_to() {
        let ctx = ThemeContext::bind(KeyboardTheme::KLP, DisplayMetrics::default());
        assert!(ctx.is_bound_to(ThemeId(2)));
        assert!(!ctx.is_bound_to(ThemeId(3)));
        assert_eq!(ctx.key_visual_attributes(), KeyboardTheme::KLP.visual);
    }
}
