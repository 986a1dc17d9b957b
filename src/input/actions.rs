// SPDX-License-Identifier: GPL-3.0-only

//! The capability interface the state machine drives.

use crate::input::shift::{AutoCapsFlags, RecapitalizeMode};
use crate::layout::VariantId;
use crate::switcher::SwitchError;

/// Operations the external state machine may invoke on the dispatcher.
///
/// The state machine calls exactly one `select_*` per logical transition.
/// Every selection is applied synchronously; re-selecting the variant already
/// shown is a legal no-op. A selection before a layout configuration has been
/// loaded fails with [`SwitchError::NoLayoutSet`].
pub trait SwitchActions {
    fn select_alphabet(&mut self) -> Result<(), SwitchError>;

    fn select_alphabet_manual_shifted(&mut self) -> Result<(), SwitchError>;

    fn select_alphabet_automatic_shifted(&mut self) -> Result<(), SwitchError>;

    fn select_alphabet_shift_locked(&mut self) -> Result<(), SwitchError>;

    fn select_alphabet_shift_lock_shifted(&mut self) -> Result<(), SwitchError>;

    fn select_symbols(&mut self) -> Result<(), SwitchError>;

    fn select_symbols_shifted(&mut self) -> Result<(), SwitchError>;

    /// Hides the main surface and shows the emoji panel.
    fn select_emoji(&mut self) -> Result<(), SwitchError>;

    /// Asks for the shift state to be recomputed.
    ///
    /// The request is replayed into the state machine once the callback that
    /// issued it has returned. Requests issued while replaying are replayed
    /// too, up to [`MAX_SHIFT_STATE_REPLAYS`](crate::app_settings::MAX_SHIFT_STATE_REPLAYS)
    /// per host call; any beyond that are dropped and logged as an error.
    fn request_updating_shift_state(
        &mut self,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    );

    fn start_double_tap_shift_key_timer(&mut self);

    fn cancel_double_tap_shift_key_timer(&mut self);

    fn is_in_double_tap_shift_key_timeout(&self) -> bool;

    /// Selects `id` through the matching `select_*` operation.
    fn select(&mut self, id: VariantId) -> Result<(), SwitchError> {
        match id {
            VariantId::Alphabet => self.select_alphabet(),
            VariantId::AlphabetManualShifted => self.select_alphabet_manual_shifted(),
            VariantId::AlphabetAutomaticShifted => self.select_alphabet_automatic_shifted(),
            VariantId::AlphabetShiftLocked => self.select_alphabet_shift_locked(),
            VariantId::AlphabetShiftLockShifted => self.select_alphabet_shift_lock_shifted(),
            VariantId::Symbols => self.select_symbols(),
            VariantId::SymbolsShifted => self.select_symbols_shifted(),
            VariantId::Emoji => self.select_emoji(),
        }
    }
}
