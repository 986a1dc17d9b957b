// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard switcher: resolves variants and keeps the surfaces in step.
//!
//! [`KeyboardSwitcher`] sits between three parties:
//!
//! - the host, which creates input views, loads layout configurations and
//!   relays key events
//! - the external state machine ([`KeyboardStateDriver`]), which decides which
//!   variant should be active and calls back through [`SwitchActions`]
//! - the rendering surfaces ([`SurfaceBundle`](crate::surface::SurfaceBundle)),
//!   which only ever see resolved variants and presentation parameters
//!
//! All calls must come from one control sequence. Hosts with several threads
//! funnel them through a [`Session`](crate::session::Session).
//!
//! # Example
//!
//! ```rust,ignore
//! let mut switcher = KeyboardSwitcher::new(SwitcherParts {
//!     driver: Box::new(my_state_machine),
//!     builder: Box::new(JsonLayoutSetBuilder::bundled()),
//!     surfaces: Box::new(HeadlessSurfaceFactory::new()),
//!     settings: Box::new(shared_settings.clone()),
//!     listener: None,
//!     display: DisplayMetrics::default(),
//! });
//!
//! switcher.create_surface_bundle(true);
//! switcher.load_layout_configuration(&LoadRequest::default(), &settings)?;
//! assert_eq!(switcher.current_variant_id(), Some(VariantId::Alphabet));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::app_settings;
use crate::config::{Settings, SettingsSource};
use crate::i18n::KeyboardTexts;
use crate::input::{
    AutoCapsFlags, CapsMode, Event, KeyCode, KeyboardStateDriver, LoadRequest, RecapitalizeMode,
    SwitchActions,
};
use crate::layout::{ConfigurationKey, LayoutSetBuilder, ScriptId, Variant, VariantId, VariantSet};
use crate::surface::{ActionListener, SurfaceFactory, SurfaceKind, ViewId};
use crate::theme::{DisplayMetrics, ThemeContext, ThemeId};

// Sub-modules
mod dispatch;
mod error;

use self::dispatch::SwitcherCore;
pub use self::error::SwitchError;

/// Collaborators a [`KeyboardSwitcher`] is assembled from.
pub struct SwitcherParts {
    pub driver: Box<dyn KeyboardStateDriver>,
    pub builder: Box<dyn LayoutSetBuilder>,
    pub surfaces: Box<dyn SurfaceFactory>,
    pub settings: Box<dyn SettingsSource>,
    /// Listener wired into every surface bundle.
    pub listener: Option<ActionListener>,
    pub display: DisplayMetrics,
}

/// The keyboard switcher for one input session.
pub struct KeyboardSwitcher {
    driver: Box<dyn KeyboardStateDriver>,
    core: SwitcherCore,
}

impl fmt::Debug for KeyboardSwitcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardSwitcher")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl KeyboardSwitcher {
    pub fn new(parts: SwitcherParts) -> Self {
        let SwitcherParts {
            driver,
            builder,
            surfaces,
            settings,
            listener,
            display,
        } = parts;

        Self {
            driver,
            core: SwitcherCore::new(builder, surfaces, settings, listener, display),
        }
    }

    // ========================================================================
    // Configuration & Theming
    // ========================================================================

    /// Binds `theme` if it differs from the bound theme.
    ///
    /// Returns `true` when the theme changed. The variant set is dropped and
    /// the caller must recreate the surface bundle and reload the layout
    /// configuration.
    pub fn update_theme(&mut self, theme: ThemeId) -> bool {
        self.core.update_theme(theme)
    }

    /// Loads the layout configuration for an editor under `settings`.
    ///
    /// A new variant set is built only when the configuration key changed.
    /// The state machine is told about the load only on success; on failure
    /// the previous variant set and surfaces are left exactly as they were.
    pub fn load_layout_configuration(
        &mut self,
        request: &LoadRequest,
        settings: &Settings,
    ) -> Result<(), SwitchError> {
        let key = self.core.configuration_key_for(&request.editor, settings);
        self.core.install_variant_set(key)?;

        let (auto_caps, recapitalize) = (request.auto_caps, request.recapitalize);
        self.drive(|driver, actions| driver.on_load_keyboard(actions, auto_caps, recapitalize))
    }

    /// Shows the emoji panel, or returns to the alphabet if it is showing.
    ///
    /// With no layout configuration loaded yet, one is loaded first from the
    /// live settings. Returns the surface visible afterwards.
    pub fn toggle_emoji_panel(&mut self, request: &LoadRequest) -> Result<SurfaceKind, SwitchError> {
        if self.core.variant_set().is_none() {
            let settings = self.core.live_settings();
            self.load_layout_configuration(request, &settings)?;
            self.core.select_emoji()?;
        } else if !self.core.is_showing_emoji_panel() {
            self.core.select_emoji()?;
        } else {
            self.core.select_alphabet()?;
        }
        Ok(self.visible_surface().unwrap_or_default())
    }

    // ========================================================================
    // Surface Lifecycle
    // ========================================================================

    /// Replaces the surface bundle with a new one for the bound theme.
    ///
    /// The previous main surface is closed first. Returns the new view.
    pub fn create_surface_bundle(&mut self, hardware_acceleration: bool) -> ViewId {
        self.core.create_surface_bundle(hardware_acceleration)
    }

    /// Detaches the surface bundle when the host tears the input view down.
    pub fn destroy_surface_bundle(&mut self) -> Option<ViewId> {
        self.core.destroy_surface_bundle()
    }

    /// Releases retained drawing and animation resources. No-op without a
    /// surface bundle.
    pub fn release_resources(&mut self) {
        self.core.release_resources();
    }

    pub fn on_hide_window(&mut self) {
        self.core.on_hide_window();
    }

    /// Remembers the shown variant before the host tears the view down.
    pub fn save_state(&mut self) {
        if self.core.save_state() {
            self.driver.on_save_keyboard_state();
        }
    }

    /// Re-selects the variant recorded by [`save_state`](Self::save_state)
    /// on the current variant set.
    ///
    /// Returns the restored variant, or `None` when nothing was saved. A
    /// failed restore keeps the saved variant for the next attempt.
    pub fn restore_state(&mut self) -> Result<Option<VariantId>, SwitchError> {
        let Some(id) = self.core.saved_state() else {
            return Ok(None);
        };
        self.core.select(id)?;
        self.core.clear_saved_state();
        tracing::debug!("Restored keyboard state '{}'", id);
        Ok(Some(id))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The variant on the main surface, if it belongs to the live variant set.
    pub fn current_variant(&self) -> Option<Arc<Variant>> {
        self.core.current_variant().cloned()
    }

    /// The logical variant on screen; `Emoji` while the panel is showing.
    pub fn current_variant_id(&self) -> Option<VariantId> {
        self.core.current_variant_id()
    }

    pub fn current_script_id(&self) -> ScriptId {
        self.core
            .variant_set()
            .map(VariantSet::script_id)
            .unwrap_or_default()
    }

    /// Visible member of the {main, emoji} pair, `None` with no surfaces.
    pub fn visible_surface(&self) -> Option<SurfaceKind> {
        self.core.bundle().map(|bundle| bundle.visible())
    }

    pub fn view_id(&self) -> Option<ViewId> {
        self.core.bundle().map(|bundle| bundle.view())
    }

    pub fn keyboard_shift_mode(&self) -> CapsMode {
        CapsMode::for_variant(self.current_variant_id())
    }

    pub fn is_showing_emoji_panel(&self) -> bool {
        self.core.is_showing_emoji_panel()
    }

    pub fn is_showing_more_keys_panel(&self) -> bool {
        self.core.bundle().is_some_and(|bundle| {
            bundle.visible() == SurfaceKind::Main && bundle.main().is_showing_more_keys_panel()
        })
    }

    pub fn configuration_key(&self) -> Option<&ConfigurationKey> {
        self.core.configuration_key()
    }

    pub fn theme(&self) -> Option<&ThemeContext> {
        self.core.theme()
    }

    pub fn texts(&self) -> &KeyboardTexts {
        self.core.texts()
    }

    // ========================================================================
    // State Machine Pass-Through
    // ========================================================================

    /// Forces the state machine back to the alphabet.
    ///
    /// For hosts that detect the machine's position has drifted from the
    /// visible surface. Nothing calls this automatically.
    pub fn reset_to_alphabet(
        &mut self,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.drive(|driver, actions| {
            driver.on_reset_keyboard_state_to_alphabet(actions, auto_caps, recapitalize)
        })
    }

    pub fn on_press_key(
        &mut self,
        code: KeyCode,
        is_single_pointer: bool,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.drive(|driver, actions| {
            driver.on_press_key(actions, code, is_single_pointer, auto_caps, recapitalize)
        })
    }

    pub fn on_release_key(
        &mut self,
        code: KeyCode,
        with_sliding: bool,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.drive(|driver, actions| {
            driver.on_release_key(actions, code, with_sliding, auto_caps, recapitalize)
        })
    }

    pub fn on_finish_sliding_input(
        &mut self,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.drive(|driver, actions| {
            driver.on_finish_sliding_input(actions, auto_caps, recapitalize)
        })
    }

    pub fn on_event(
        &mut self,
        event: &Event,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.drive(|driver, actions| driver.on_event(actions, event, auto_caps, recapitalize))
    }

    pub fn request_shift_state_update(
        &mut self,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.drive(|driver, actions| {
            driver.on_update_shift_state(actions, auto_caps, recapitalize)
        })
    }

    /// Runs one state machine callback, then replays the shift-state requests
    /// it queued.
    fn drive<F>(&mut self, callback: F) -> Result<(), SwitchError>
    where
        F: FnOnce(&mut dyn KeyboardStateDriver, &mut dyn SwitchActions) -> Result<(), SwitchError>,
    {
        let result = callback(self.driver.as_mut(), &mut self.core);
        let replayed = self.replay_shift_requests();
        result.and(replayed)
    }

    fn replay_shift_requests(&mut self) -> Result<(), SwitchError> {
        let mut replays = 0;
        while let Some((auto_caps, recapitalize)) = self.core.pending_shift.pop_front() {
            if replays == app_settings::MAX_SHIFT_STATE_REPLAYS {
                tracing::error!(
                    "Dropping {} shift state requests after {} replays",
                    self.core.pending_shift.len() + 1,
                    replays
                );
                self.core.pending_shift.clear();
                break;
            }
            replays += 1;

            if let Err(e) =
                self.driver
                    .on_update_shift_state(&mut self.core, auto_caps, recapitalize)
            {
                self.core.pending_shift.clear();
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Direct selections from the host bypass the state machine.
impl SwitchActions for KeyboardSwitcher {
    fn select_alphabet(&mut self) -> Result<(), SwitchError> {
        self.core.select_alphabet()
    }

    fn select_alphabet_manual_shifted(&mut self) -> Result<(), SwitchError> {
        self.core.select_alphabet_manual_shifted()
    }

    fn select_alphabet_automatic_shifted(&mut self) -> Result<(), SwitchError> {
        self.core.select_alphabet_automatic_shifted()
    }

    fn select_alphabet_shift_locked(&mut self) -> Result<(), SwitchError> {
        self.core.select_alphabet_shift_locked()
    }

    fn select_alphabet_shift_lock_shifted(&mut self) -> Result<(), SwitchError> {
        self.core.select_alphabet_shift_lock_shifted()
    }

    fn select_symbols(&mut self) -> Result<(), SwitchError> {
        self.core.select_symbols()
    }

    fn select_symbols_shifted(&mut self) -> Result<(), SwitchError> {
        self.core.select_symbols_shifted()
    }

    fn select_emoji(&mut self) -> Result<(), SwitchError> {
        self.core.select_emoji()
    }

    fn request_updating_shift_state(
        &mut self,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) {
        if let Err(e) = self.request_shift_state_update(auto_caps, recapitalize) {
            tracing::warn!("Shift state update failed: {}", e);
        }
    }

    fn start_double_tap_shift_key_timer(&mut self) {
        self.core.start_double_tap_shift_key_timer();
    }

    fn cancel_double_tap_shift_key_timer(&mut self) {
        self.core.cancel_double_tap_shift_key_timer();
    }

    fn is_in_double_tap_shift_key_timeout(&self) -> bool {
        self.core.is_in_double_tap_shift_key_timeout()
    }
}

// ============================================================================
// Tests
// ============================================================================
