// SPDX-License-Identifier: GPL-3.0-only

//! Rendering surfaces controlled by the dispatcher.
//!
//! The dispatcher never draws. It talks to three opaque display sinks created
//! together for every input view:
//!
//! - [`KeyboardContainer`]: the frame around the main keyboard
//! - [`MainSurface`]: draws the active [`Variant`]
//! - [`EmojiSurface`]: the emoji panel, shown instead of the main surface
//!
//! A [`SurfaceFactory`] produces them from the bound
//! [`ThemeContext`]; [`SurfaceBundle`] owns one set and keeps their
//! visibility consistent. The [`headless`] backend records every call and is
//! used by the demo binary and the tests.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::input::KeyCode;
use crate::layout::{IconSet, Variant};
use crate::theme::{KeyVisualAttributes, ThemeContext};

// Sub-modules
pub mod bundle;
pub mod headless;
pub mod params;

// Re-export public API
pub use bundle::SurfaceBundle;
pub use headless::{HeadlessSurfaceFactory, HeadlessView, SurfaceCall, ViewRecord};
pub use params::{KeyPreviewParams, LanguageOnSpacebarFormat, PresentationParams};

/// Identifies one input view created by a [`SurfaceFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Which member of the {main, emoji} pair is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    #[default]
    Main,
    Emoji,
}

/// Receives key actions from the surfaces on behalf of the host.
pub trait KeyboardActionListener {
    fn on_press_key(&self, code: KeyCode, repeat_count: u32, is_single_pointer: bool);

    fn on_release_key(&self, code: KeyCode, with_sliding: bool);

    fn on_code_input(&self, code: KeyCode, x: i32, y: i32, is_repeat: bool);

    fn on_text_input(&self, text: &str);
}

/// Listener shared by the main and emoji surfaces of a bundle.
pub type ActionListener = Rc<dyn KeyboardActionListener>;

/// The surface drawing the active variant.
pub trait MainSurface {
    /// Replaces the drawn variant.
    fn set_variant(&mut self, variant: &Arc<Variant>);

    fn set_visible(&mut self, visible: bool);

    fn apply_presentation(&mut self, params: &PresentationParams);

    fn set_hardware_acceleration(&mut self, enabled: bool);

    fn set_action_listener(&mut self, listener: ActionListener);

    fn start_double_tap_shift_key_timer(&mut self);

    fn cancel_double_tap_shift_key_timer(&mut self);

    fn is_in_double_tap_shift_key_timeout(&self) -> bool;

    fn is_showing_more_keys_panel(&self) -> bool;

    /// The host hid its input window.
    fn on_hide_window(&mut self);

    /// The surface is being detached and will not be used again.
    fn closing(&mut self);

    fn cancel_all_ongoing_events(&mut self);

    /// Drops cached drawing buffers; they are rebuilt on the next draw.
    fn deallocate_memory(&mut self);
}

/// The emoji panel.
pub trait EmojiSurface {
    fn set_visible(&mut self, visible: bool);

    /// Starts the panel with its "switch back" label, the theme's key
    /// attributes and the icons borrowed from the alphabet variant.
    fn start(
        &mut self,
        switch_back_label: &str,
        attributes: &KeyVisualAttributes,
        icons: &IconSet,
    );

    /// Stops any running animation and releases transient state.
    fn stop(&mut self);

    fn set_hardware_acceleration(&mut self, enabled: bool);

    fn set_action_listener(&mut self, listener: ActionListener);
}

/// The frame holding the main surface.
pub trait KeyboardContainer {
    fn set_visible(&mut self, visible: bool);

    fn set_top_padding(&mut self, padding: u32);
}

/// Surfaces created for one input view.
pub struct SurfaceParts {
    pub view: ViewId,
    pub container: Box<dyn KeyboardContainer>,
    pub main: Box<dyn MainSurface>,
    pub emoji: Box<dyn EmojiSurface>,
}

impl fmt::Debug for SurfaceParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceParts")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

/// Creates the surfaces of a new input view.
pub trait SurfaceFactory {
    fn create(&mut self, theme: &ThemeContext) -> SurfaceParts;
}
