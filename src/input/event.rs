// SPDX-License-Identifier: GPL-3.0-only

//! Key codes and input events forwarded to the state machine.

/// A key code: a Unicode code point when non-negative, a functional key
/// when negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const SHIFT: KeyCode = KeyCode(-1);
    pub const CAPSLOCK: KeyCode = KeyCode(-2);
    pub const SWITCH_ALPHA_SYMBOL: KeyCode = KeyCode(-3);
    pub const OUTPUT_TEXT: KeyCode = KeyCode(-4);
    pub const DELETE: KeyCode = KeyCode(-5);
    pub const SETTINGS: KeyCode = KeyCode(-6);
    pub const SHORTCUT: KeyCode = KeyCode(-7);
    pub const ACTION_NEXT: KeyCode = KeyCode(-8);
    pub const ACTION_PREVIOUS: KeyCode = KeyCode(-9);
    pub const LANGUAGE_SWITCH: KeyCode = KeyCode(-10);
    pub const EMOJI: KeyCode = KeyCode(-11);
    pub const SHIFT_ENTER: KeyCode = KeyCode(-12);
    pub const SYMBOL_SHIFT: KeyCode = KeyCode(-13);
    pub const ALPHA_FROM_EMOJI: KeyCode = KeyCode(-14);
    pub const UNSPECIFIED: KeyCode = KeyCode(-15);

    /// Key code for a character key.
    pub fn from_char(c: char) -> Self {
        KeyCode(c as i32)
    }

    /// The character this code produces, if it is a character key.
    pub fn as_char(self) -> Option<char> {
        u32::try_from(self.0).ok().and_then(char::from_u32)
    }

    pub fn is_functional(self) -> bool {
        self.0 < 0
    }
}

/// How an [`Event`] was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventKind {
    /// A key pressed on the soft or hardware keyboard.
    #[default]
    Input,
    /// The end of a gesture stroke.
    Gesture,
    /// Synthesized by the host rather than typed.
    SoftwareGenerated,
}

/// An input event, relayed to the state machine without interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub code: KeyCode,
    /// Text carried by software-generated events.
    pub text: Option<String>,
    pub x: i32,
    pub y: i32,
}

impl Event {
    /// A key event at no particular position.
    pub fn key(code: KeyCode) -> Self {
        Self {
            kind: EventKind::Input,
            code,
            text: None,
            x: 0,
            y: 0,
        }
    }

    /// A software-generated text event.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::SoftwareGenerated,
            code: KeyCode::OUTPUT_TEXT,
            text: Some(text.into()),
            x: 0,
            y: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_chars() {
        assert_eq!(KeyCode::from_char('a').as_char(), Some('a'));
        assert_eq!(KeyCode::SHIFT.as_char(), None);
        assert!(KeyCode::EMOJI.is_functional());
        assert!(!KeyCode::from_char(' ').is_functional());
    }

    #[test]
    fn test_event_constructors() {
        let event = Event::text(".com");
        assert_eq!(event.kind, EventKind::SoftwareGenerated);
        assert_eq!(event.code, KeyCode::OUTPUT_TEXT);
        assert_eq!(Event::key(KeyCode::DELETE).text, None);
    }
}
