// SPDX-License-Identifier: GPL-3.0-only

//! Shared fixtures for the switcher and session tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{Settings, SharedSettings};
use crate::input::{
    AutoCapsFlags, Event, KeyCode, KeyboardStateDriver, RecapitalizeMode, SwitchActions,
};
use crate::layout::{JsonLayoutSetBuilder, LayoutSetBuilder, VariantId};
use crate::surface::{HeadlessSurfaceFactory, HeadlessView};
use crate::switcher::{KeyboardSwitcher, SwitchError, SwitcherParts};
use crate::theme::DisplayMetrics;

/// A call the scripted driver received.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Load(AutoCapsFlags),
    Save,
    Reset,
    Press(KeyCode),
    Release(KeyCode),
    FinishSliding,
    UpdateShift(AutoCapsFlags, RecapitalizeMode),
    Event(KeyCode),
}

/// A small state machine: shift toggles, double-tap locks, the symbol key
/// flips between alphabet and symbols, typed characters request a shift
/// update.
pub struct ScriptedDriver {
    calls: Rc<RefCell<Vec<DriverCall>>>,
    position: VariantId,
}

impl ScriptedDriver {
    pub fn new(calls: Rc<RefCell<Vec<DriverCall>>>) -> Self {
        Self {
            calls,
            position: VariantId::Alphabet,
        }
    }

    fn log(&self, call: DriverCall) {
        self.calls.borrow_mut().push(call);
    }

    fn go(&mut self, actions: &mut dyn SwitchActions, id: VariantId) -> Result<(), SwitchError> {
        actions.select(id)?;
        self.position = id;
        Ok(())
    }
}

impl KeyboardStateDriver for ScriptedDriver {
    fn on_load_keyboard(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.log(DriverCall::Load(auto_caps));
        if auto_caps.is_empty() {
            self.go(actions, VariantId::Alphabet)
        } else {
            self.go(actions, VariantId::AlphabetAutomaticShifted)
        }
    }

    fn on_save_keyboard_state(&mut self) {
        self.log(DriverCall::Save);
    }

    fn on_reset_keyboard_state_to_alphabet(
        &mut self,
        actions: &mut dyn SwitchActions,
        _auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.log(DriverCall::Reset);
        self.go(actions, VariantId::Alphabet)
    }

    fn on_press_key(
        &mut self,
        actions: &mut dyn SwitchActions,
        code: KeyCode,
        _is_single_pointer: bool,
        _auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.log(DriverCall::Press(code));
        match code {
            KeyCode::SHIFT if actions.is_in_double_tap_shift_key_timeout() => {
                actions.cancel_double_tap_shift_key_timer();
                self.go(actions, VariantId::AlphabetShiftLocked)
            }
            KeyCode::SHIFT => {
                actions.start_double_tap_shift_key_timer();
                Ok(())
            }
            KeyCode::SWITCH_ALPHA_SYMBOL if self.position.is_alphabet() => {
                self.go(actions, VariantId::Symbols)
            }
            KeyCode::SWITCH_ALPHA_SYMBOL | KeyCode::ALPHA_FROM_EMOJI => {
                self.go(actions, VariantId::Alphabet)
            }
            KeyCode::EMOJI => self.go(actions, VariantId::Emoji),
            _ => Ok(()),
        }
    }

    fn on_release_key(
        &mut self,
        actions: &mut dyn SwitchActions,
        code: KeyCode,
        _with_sliding: bool,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.log(DriverCall::Release(code));
        match code {
            KeyCode::SHIFT => match self.position {
                VariantId::Alphabet | VariantId::AlphabetAutomaticShifted => {
                    self.go(actions, VariantId::AlphabetManualShifted)
                }
                VariantId::AlphabetManualShifted => self.go(actions, VariantId::Alphabet),
                _ => Ok(()),
            },
            code if !code.is_functional() => {
                actions.request_updating_shift_state(auto_caps, recapitalize);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_finish_sliding_input(
        &mut self,
        _actions: &mut dyn SwitchActions,
        _auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.log(DriverCall::FinishSliding);
        Ok(())
    }

    fn on_update_shift_state(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.log(DriverCall::UpdateShift(auto_caps, recapitalize));
        match self.position {
            VariantId::Alphabet if !auto_caps.is_empty() => {
                self.go(actions, VariantId::AlphabetAutomaticShifted)
            }
            VariantId::AlphabetAutomaticShifted | VariantId::AlphabetManualShifted
                if auto_caps.is_empty() =>
            {
                self.go(actions, VariantId::Alphabet)
            }
            _ => Ok(()),
        }
    }

    fn on_event(
        &mut self,
        actions: &mut dyn SwitchActions,
        event: &Event,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.log(DriverCall::Event(event.code));
        if !event.code.is_functional() {
            actions.request_updating_shift_state(auto_caps, recapitalize);
        }
        Ok(())
    }
}

/// A switcher over the scripted driver and headless surfaces.
pub struct Fixture {
    pub switcher: KeyboardSwitcher,
    pub surfaces: HeadlessSurfaceFactory,
    pub settings: SharedSettings,
    pub calls: Rc<RefCell<Vec<DriverCall>>>,
}

impl Fixture {
    /// Fixture over the bundled layouts.
    pub fn new() -> Self {
        Self::with_builder(JsonLayoutSetBuilder::bundled())
    }

    pub fn with_builder(builder: impl LayoutSetBuilder + 'static) -> Self {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let surfaces = HeadlessSurfaceFactory::new();
        let settings = SharedSettings::new(Settings::default());

        let switcher = KeyboardSwitcher::new(SwitcherParts {
            driver: Box::new(ScriptedDriver::new(Rc::clone(&calls))),
            builder: Box::new(builder),
            surfaces: Box::new(surfaces.clone()),
            settings: Box::new(settings.clone()),
            listener: None,
            display: DisplayMetrics::default(),
        });

        Self {
            switcher,
            surfaces,
            settings,
            calls,
        }
    }

    /// The most recently created view.
    pub fn view(&self) -> HeadlessView {
        self.surfaces
            .last_view()
            .expect("a surface bundle should have been created")
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.borrow().clone()
    }

    /// Asserts exactly one of the main and emoji surfaces is visible.
    pub fn assert_one_visible(&self) {
        let view = self.view();
        let record = view.record();
        assert!(
            record.main_visible != record.emoji_visible,
            "Exactly one of main ({}) and emoji ({}) should be visible",
            record.main_visible,
            record.emoji_visible
        );
    }
}
