// SPDX-License-Identifier: GPL-3.0-only

//! Capitalization state relayed between the host and the state machine.
//!
//! The dispatcher never interprets these values; it forwards them unchanged
//! to the [`KeyboardStateDriver`](crate::input::KeyboardStateDriver). The only
//! shift-related answer it derives itself is [`CapsMode`], read off the
//! variant currently on the main surface.

use bitflags::bitflags;

use crate::layout::VariantId;

bitflags! {
    /// Automatic capitalization the editor requests at the cursor.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AutoCapsFlags: u32 {
        /// Capitalize every character.
        const CHARACTERS = 0x1000;
        /// Capitalize the first character of every word.
        const WORDS = 0x2000;
        /// Capitalize the first character of every sentence.
        const SENTENCES = 0x4000;
    }
}

/// Position in the recapitalization cycle of the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecapitalizeMode {
    /// No recapitalization in progress.
    #[default]
    None,
    OriginalMixedCase,
    AllLower,
    FirstWordUpper,
    AllUpper,
}

/// Shift state implied by the visible alphabet variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CapsMode {
    #[default]
    Off,
    ManualShifted,
    AutoShifted,
    ManualShiftLocked,
}

impl CapsMode {
    /// Caps mode for the variant on screen, or `Off` when nothing is shown.
    pub fn for_variant(id: Option<VariantId>) -> Self {
        match id {
            Some(VariantId::AlphabetShiftLocked | VariantId::AlphabetShiftLockShifted) => {
                CapsMode::ManualShiftLocked
            }
            Some(VariantId::AlphabetManualShifted) => CapsMode::ManualShifted,
            Some(VariantId::AlphabetAutomaticShifted) => CapsMode::AutoShifted,
            Some(
                VariantId::Alphabet
                | VariantId::Symbols
                | VariantId::SymbolsShifted
                | VariantId::Emoji,
            )
            | None => CapsMode::Off,
        }
    }

    pub fn is_shifted(self) -> bool {
        self != CapsMode::Off
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test caps mode for every variant
    #[test]
    fn test_caps_mode_for_variant() {
        assert_eq!(CapsMode::for_variant(None), CapsMode::Off);
        assert_eq!(CapsMode::for_variant(Some(VariantId::Alphabet)), CapsMode::Off);
        assert_eq!(
            CapsMode::for_variant(Some(VariantId::AlphabetManualShifted)),
            CapsMode::ManualShifted
        );
        assert_eq!(
            CapsMode::for_variant(Some(VariantId::AlphabetAutomaticShifted)),
            CapsMode::AutoShifted
        );
        assert_eq!(
            CapsMode::for_variant(Some(VariantId::AlphabetShiftLockShifted)),
            CapsMode::ManualShiftLocked
        );
        assert_eq!(CapsMode::for_variant(Some(VariantId::SymbolsShifted)), CapsMode::Off);
        assert!(CapsMode::ManualShiftLocked.is_shifted());
    }

    /// Test auto-caps flags combine
    #[test]
    fn test_auto_caps_flags() {
        let flags = AutoCapsFlags::WORDS | AutoCapsFlags::SENTENCES;
        assert!(flags.contains(AutoCapsFlags::SENTENCES));
        assert!(!flags.contains(AutoCapsFlags::CHARACTERS));
        assert!(AutoCapsFlags::default().is_empty());
    }
}
