// SPDX-License-Identifier: GPL-3.0-only

//! Boundary between the dispatcher and the keyboard state machine.
//!
//! The state machine that decides *when* to switch lives outside this crate.
//! This module fixes the two interfaces it meets the dispatcher through:
//!
//! - [`SwitchActions`]: what the state machine may ask of the dispatcher
//!   (one `select_*` per variant, shift-state requests, the double-tap timer).
//! - [`KeyboardStateDriver`]: what the dispatcher relays to the state machine
//!   (key presses, releases, sliding input, events, loads and resets).
//!
//! # Example
//!
//! ```rust,ignore
//! use keyswitch::input::{KeyboardStateDriver, SwitchActions, AutoCapsFlags, RecapitalizeMode};
//!
//! struct AlphabetOnly;
//!
//! impl KeyboardStateDriver for AlphabetOnly {
//!     fn on_load_keyboard(
//!         &mut self,
//!         actions: &mut dyn SwitchActions,
//!         _auto_caps: AutoCapsFlags,
//!         _recapitalize: RecapitalizeMode,
//!     ) -> Result<(), SwitchError> {
//!         actions.select_alphabet()
//!     }
//!     // ...
//! }
//! ```

// Sub-modules
pub mod actions;
pub mod driver;
pub mod event;
pub mod shift;

// Re-export public API
pub use actions::SwitchActions;
pub use driver::{KeyboardStateDriver, LoadRequest};
pub use event::{Event, EventKind, KeyCode};
pub use shift::{AutoCapsFlags, CapsMode, RecapitalizeMode};
