// SPDX-License-Identifier: GPL-3.0-only

//! Centralized dispatcher settings and constants.

/// Default display width in pixels, used when the host reports no metrics.
pub const DEFAULT_DISPLAY_WIDTH: u32 = 1080;

/// Default display height in pixels.
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 1920;

/// Default display density (pixels per dp).
pub const DEFAULT_DISPLAY_DENSITY: f32 = 2.625;

/// Upper bound of the keyboard height as a fraction of the display height.
pub const MAX_KEYBOARD_HEIGHT_FRACTION: f32 = 0.46;

/// Lower bound of the keyboard height as a fraction of the display height.
pub const MIN_KEYBOARD_HEIGHT_FRACTION: f32 = 0.2;

/// Smallest keyboard height scale accepted from settings.
pub const MIN_KEYBOARD_HEIGHT_SCALE: f32 = 0.5;

/// Largest keyboard height scale accepted from settings.
pub const MAX_KEYBOARD_HEIGHT_SCALE: f32 = 1.5;

/// Default delay before a key preview popup is dismissed, in milliseconds.
pub const DEFAULT_KEY_PREVIEW_DISMISS_DELAY_MS: u32 = 70;

/// Window within which a second shift tap counts as a double tap, in milliseconds.
pub const DOUBLE_TAP_SHIFT_TIMEOUT_MS: u64 = 300;

/// Whether split layouts may be requested at all on this build.
pub const SPLIT_KEYBOARD_SUPPORTED: bool = true;

/// Locale used by subtypes that carry no language (e.g. emoji-only subtypes).
pub const NO_LANGUAGE: &str = "zz";

/// Number of queued commands a session accepts before senders wait.
pub const SESSION_QUEUE_DEPTH: usize = 32;

/// How many times a shift-state update requested from inside the state machine
/// is replayed before further requests are dropped.
pub const MAX_SHIFT_STATE_REPLAYS: usize = 4;
