// SPDX-License-Identifier: GPL-3.0-only

//! Dispatcher state and the selection operations the state machine drives.
//!
//! [`SwitcherCore`] owns everything except the state machine itself, so the
//! machine can be handed `&mut SwitcherCore` as its [`SwitchActions`] while
//! the facade still holds the machine.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::config::{Settings, SettingsSource};
use crate::i18n::{KeyboardTexts, TextKey};
use crate::input::{AutoCapsFlags, RecapitalizeMode, SwitchActions};
use crate::layout::{
    ConfigurationKey, EditorContext, LayoutSetBuilder, Variant, VariantId, VariantSet,
};
use crate::surface::{
    ActionListener, PresentationParams, SurfaceBundle, SurfaceFactory, SurfaceKind, ViewId,
};
use crate::switcher::SwitchError;
use crate::theme::{DisplayMetrics, KeyboardTheme, ThemeContext, ThemeId};

/// Dispatcher state behind the capability interface.
pub struct SwitcherCore {
    builder: Box<dyn LayoutSetBuilder>,
    surfaces: Box<dyn SurfaceFactory>,
    settings: Box<dyn SettingsSource>,
    listener: Option<ActionListener>,
    texts: KeyboardTexts,
    display: DisplayMetrics,
    theme: Option<ThemeContext>,
    variants: Option<VariantSet>,
    bundle: Option<SurfaceBundle>,
    hardware_acceleration: bool,
    saved: Option<VariantId>,
    /// Shift-state requests issued by the state machine during a callback.
    pub(crate) pending_shift: VecDeque<(AutoCapsFlags, RecapitalizeMode)>,
}

impl fmt::Debug for SwitcherCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitcherCore")
            .field("theme", &self.theme.as_ref().map(|t| t.theme().name))
            .field("key", &self.variants.as_ref().map(VariantSet::key))
            .field("bundle", &self.bundle)
            .field("hardware_acceleration", &self.hardware_acceleration)
            .field("saved", &self.saved)
            .finish_non_exhaustive()
    }
}

impl SwitcherCore {
    pub(crate) fn new(
        builder: Box<dyn LayoutSetBuilder>,
        surfaces: Box<dyn SurfaceFactory>,
        settings: Box<dyn SettingsSource>,
        listener: Option<ActionListener>,
        display: DisplayMetrics,
    ) -> Self {
        Self {
            builder,
            surfaces,
            settings,
            listener,
            texts: KeyboardTexts::new(),
            display,
            theme: None,
            variants: None,
            bundle: None,
            hardware_acceleration: false,
            saved: None,
            pending_shift: VecDeque::new(),
        }
    }

    // ========================================================================
    // Theme & Configuration
    // ========================================================================

    /// Binds `requested` unless it is already bound.
    ///
    /// A rebind drops the variant set; the caller must recreate the surface
    /// bundle and reload the layout configuration.
    pub(crate) fn update_theme(&mut self, requested: ThemeId) -> bool {
        let theme = KeyboardTheme::from_id(requested);
        if self
            .theme
            .as_ref()
            .is_some_and(|bound| bound.is_bound_to(theme.id))
        {
            return false;
        }

        self.theme = Some(ThemeContext::bind(theme, self.display));
        if let Some(stale) = self.variants.take() {
            tracing::info!("Dropped variant set for [{}]", stale.key());
        }
        tracing::info!("Bound keyboard theme '{}'", theme.name);
        true
    }

    /// The bound theme, binding `fallback` if none is bound yet.
    fn bound_theme(&mut self, fallback: ThemeId) -> &ThemeContext {
        let display = self.display;
        self.theme
            .get_or_insert_with(|| ThemeContext::bind(KeyboardTheme::from_id(fallback), display))
    }

    /// Builds the configuration key for an editor under a settings snapshot.
    pub(crate) fn configuration_key_for(
        &mut self,
        editor: &EditorContext,
        settings: &Settings,
    ) -> ConfigurationKey {
        let theme = self.bound_theme(settings.keyboard_theme);
        ConfigurationKey {
            theme: theme.theme().id,
            width: theme.keyboard_width(),
            height: theme.keyboard_height(settings),
            subtype: settings.subtype.clone(),
            mode: editor.mode(),
            voice_input_key: settings.show_voice_input_key && !editor.is_password(),
            language_switch_key: settings.language_switch_key_enabled(),
            split_layout: settings.split_layout_enabled(),
        }
    }

    /// Makes the variant set match `key`, building a new one if needed.
    ///
    /// On failure nothing changes.
    pub(crate) fn install_variant_set(&mut self, key: ConfigurationKey) -> Result<(), SwitchError> {
        if !ConfigurationKey::needs_rebuild(self.configuration_key(), &key) {
            tracing::debug!("Reusing variant set for [{}]", key);
        } else {
            match self.builder.build(&key) {
                Ok(set) => {
                    tracing::info!("Built variant set for [{}] ({:?})", key, set.script_id());
                    self.variants = Some(set);
                }
                Err(e) => {
                    tracing::warn!("Keeping previous layout; build failed for [{}]: {}", key, e);
                    return Err(SwitchError::Build(e));
                }
            }
        }

        self.texts.set_locale(&key.subtype.locale);
        Ok(())
    }

    pub(crate) fn live_settings(&self) -> Arc<Settings> {
        self.settings.current()
    }

    // ========================================================================
    // Surface Lifecycle
    // ========================================================================

    /// Replaces the bundle. The bound theme is kept; the settings theme is
    /// only bound when no theme is bound yet.
    pub(crate) fn create_surface_bundle(&mut self, hardware_acceleration: bool) -> ViewId {
        if let Some(old) = self.bundle.take() {
            tracing::info!("Detaching {}", old.view());
            old.close();
        }

        let fallback = self.settings.current().keyboard_theme;
        let theme = self.bound_theme(fallback).clone();

        let parts = self.surfaces.create(&theme);
        let bundle = SurfaceBundle::new(parts, hardware_acceleration, self.listener.clone());
        let view = bundle.view();
        tracing::info!(
            "Attached {} (theme '{}', hardware acceleration {})",
            view,
            theme.theme().name,
            hardware_acceleration
        );

        self.hardware_acceleration = hardware_acceleration;
        self.bundle = Some(bundle);
        view
    }

    pub(crate) fn destroy_surface_bundle(&mut self) -> Option<ViewId> {
        let bundle = self.bundle.take()?;
        let view = bundle.view();
        bundle.close();
        tracing::info!("Detached {}", view);
        Some(view)
    }

    pub(crate) fn release_resources(&mut self) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.release_resources();
            tracing::debug!("Released surface resources of {}", bundle.view());
        }
    }

    pub(crate) fn on_hide_window(&mut self) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.main_mut().on_hide_window();
        }
    }

    // ========================================================================
    // Soft Reload
    // ========================================================================

    /// Records the shown variant. Returns `false` when nothing is shown.
    pub(crate) fn save_state(&mut self) -> bool {
        match self.current_variant_id() {
            Some(id) => {
                self.saved = Some(id);
                tracing::debug!("Saved keyboard state '{}'", id);
                true
            }
            None => false,
        }
    }

    pub(crate) fn saved_state(&self) -> Option<VariantId> {
        self.saved
    }

    pub(crate) fn clear_saved_state(&mut self) {
        self.saved = None;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub(crate) fn theme(&self) -> Option<&ThemeContext> {
        self.theme.as_ref()
    }

    pub(crate) fn configuration_key(&self) -> Option<&ConfigurationKey> {
        self.variants.as_ref().map(VariantSet::key)
    }

    pub(crate) fn variant_set(&self) -> Option<&VariantSet> {
        self.variants.as_ref()
    }

    pub(crate) fn bundle(&self) -> Option<&SurfaceBundle> {
        self.bundle.as_ref()
    }

    pub(crate) fn texts(&self) -> &KeyboardTexts {
        &self.texts
    }

    /// Variant on the main surface, if it belongs to the live variant set.
    pub(crate) fn current_variant(&self) -> Option<&Arc<Variant>> {
        let set = self.variants.as_ref()?;
        self.bundle
            .as_ref()?
            .applied_variant()
            .filter(|variant| set.contains(variant))
    }

    /// The logical variant on screen, `Emoji` while the panel is showing.
    pub(crate) fn current_variant_id(&self) -> Option<VariantId> {
        if self.is_showing_emoji_panel() {
            return Some(VariantId::Emoji);
        }
        self.current_variant().map(|variant| variant.id)
    }

    pub(crate) fn is_showing_emoji_panel(&self) -> bool {
        self.bundle
            .as_ref()
            .is_some_and(|bundle| bundle.visible() == SurfaceKind::Emoji)
    }

    // ========================================================================
    // Switching
    // ========================================================================

    fn switch_to(&mut self, id: VariantId) -> Result<(), SwitchError> {
        let Some(set) = self.variants.as_ref() else {
            tracing::error!("Select '{}' before any layout configuration was loaded", id);
            return Err(SwitchError::no_layout_set(id));
        };
        let Some(bundle) = self.bundle.as_mut() else {
            tracing::warn!("Select '{}' with no surfaces attached", id);
            return Err(SwitchError::no_surface_bundle(id));
        };

        match id {
            VariantId::Emoji => {
                let alphabet = set.get(VariantId::Alphabet);
                let attributes = KeyboardTheme::from_id(set.key().theme).visual;
                let label = self.texts.text(TextKey::SwitchToAlpha);
                if bundle.show_emoji(&label, &attributes, &alphabet.icons) {
                    tracing::debug!("{}: showing emoji panel", bundle.view());
                }
            }
            VariantId::Alphabet
            | VariantId::AlphabetManualShifted
            | VariantId::AlphabetAutomaticShifted
            | VariantId::AlphabetShiftLocked
            | VariantId::AlphabetShiftLockShifted
            | VariantId::Symbols
            | VariantId::SymbolsShifted => {
                let variant = Arc::clone(set.get(id));
                let settings = self.settings.current();
                let params = PresentationParams::derive(
                    &settings,
                    &variant,
                    bundle.applied_variant().map(Arc::as_ref),
                );
                bundle.show_main(&variant, &params, settings.has_hardware_keyboard);
                tracing::debug!("{}: showing '{}'", bundle.view(), id);
            }
        }
        Ok(())
    }
}

impl SwitchActions for SwitcherCore {
    fn select_alphabet(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::Alphabet)
    }

    fn select_alphabet_manual_shifted(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::AlphabetManualShifted)
    }

    fn select_alphabet_automatic_shifted(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::AlphabetAutomaticShifted)
    }

    fn select_alphabet_shift_locked(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::AlphabetShiftLocked)
    }

    fn select_alphabet_shift_lock_shifted(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::AlphabetShiftLockShifted)
    }

    fn select_symbols(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::Symbols)
    }

    fn select_symbols_shifted(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::SymbolsShifted)
    }

    fn select_emoji(&mut self) -> Result<(), SwitchError> {
        self.switch_to(VariantId::Emoji)
    }

    fn request_updating_shift_state(
        &mut self,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) {
        self.pending_shift.push_back((auto_caps, recapitalize));
    }

    fn start_double_tap_shift_key_timer(&mut self) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.main_mut().start_double_tap_shift_key_timer();
        }
    }

    fn cancel_double_tap_shift_key_timer(&mut self) {
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.main_mut().cancel_double_tap_shift_key_timer();
        }
    }

    fn is_in_double_tap_shift_key_timeout(&self) -> bool {
        self.bundle
            .as_ref()
            .is_some_and(|bundle| bundle.main().is_in_double_tap_shift_key_timeout())
    }
}
