// SPDX-License-Identifier: GPL-3.0-only

//! The external keyboard state machine, seen from the dispatcher.

use crate::input::actions::SwitchActions;
use crate::input::event::{Event, KeyCode};
use crate::input::shift::{AutoCapsFlags, RecapitalizeMode};
use crate::layout::EditorContext;
use crate::switcher::SwitchError;

/// Editor state a layout load is requested for.
///
/// The capitalization values are handed to the driver once the load has
/// succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadRequest {
    pub editor: EditorContext,
    pub auto_caps: AutoCapsFlags,
    pub recapitalize: RecapitalizeMode,
}

impl LoadRequest {
    pub fn new(editor: EditorContext) -> Self {
        Self {
            editor,
            ..Self::default()
        }
    }

    pub fn with_caps(mut self, auto_caps: AutoCapsFlags, recapitalize: RecapitalizeMode) -> Self {
        self.auto_caps = auto_caps;
        self.recapitalize = recapitalize;
        self
    }
}

/// The state machine deciding which variant should be active.
///
/// The dispatcher relays host events to it unchanged and hands it the
/// [`SwitchActions`] it may call back into while handling them. The driver
/// owns every shift, caps-lock and recapitalization decision.
pub trait KeyboardStateDriver {
    /// A layout configuration finished loading; pick the initial variant.
    fn on_load_keyboard(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError>;

    /// The host is about to tear the input view down.
    fn on_save_keyboard_state(&mut self);

    /// Forget the current position and return to the alphabet.
    fn on_reset_keyboard_state_to_alphabet(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError>;

    fn on_press_key(
        &mut self,
        actions: &mut dyn SwitchActions,
        code: KeyCode,
        is_single_pointer: bool,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError>;

    fn on_release_key(
        &mut self,
        actions: &mut dyn SwitchActions,
        code: KeyCode,
        with_sliding: bool,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError>;

    fn on_finish_sliding_input(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError>;

    fn on_update_shift_state(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError>;

    fn on_event(
        &mut self,
        actions: &mut dyn SwitchActions,
        event: &Event,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError>;
}
