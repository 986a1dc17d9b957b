// SPDX-License-Identifier: GPL-3.0-only

//! Visibility bookkeeping for one set of attached surfaces.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::layout::{IconSet, Variant};
use crate::surface::{
    ActionListener, EmojiSurface, KeyboardContainer, MainSurface, PresentationParams,
    SurfaceKind, SurfaceParts, ViewId,
};
use crate::theme::KeyVisualAttributes;

/// The surfaces of the current input view.
///
/// Exactly one of the main and emoji surfaces is visible at any time. The
/// bundle remembers what it last told each sink and only calls a sink when
/// its state actually changes.
pub struct SurfaceBundle {
    view: ViewId,
    container: Box<dyn KeyboardContainer>,
    main: Box<dyn MainSurface>,
    emoji: Box<dyn EmojiSurface>,
    visible: SurfaceKind,
    container_visible: bool,
    emoji_started: bool,
    top_padding: Option<u32>,
    /// Variant last applied to the main surface.
    variant: Option<Arc<Variant>>,
}

impl fmt::Debug for SurfaceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceBundle")
            .field("view", &self.view)
            .field("visible", &self.visible)
            .field("container_visible", &self.container_visible)
            .field("emoji_started", &self.emoji_started)
            .field("variant", &self.variant.as_ref().map(|v| v.id))
            .finish_non_exhaustive()
    }
}

impl SurfaceBundle {
    /// Takes ownership of freshly created surfaces.
    ///
    /// The main surface and its container start visible, the emoji panel
    /// hidden.
    pub fn new(
        parts: SurfaceParts,
        hardware_acceleration: bool,
        listener: Option<ActionListener>,
    ) -> Self {
        let SurfaceParts {
            view,
            mut container,
            mut main,
            mut emoji,
        } = parts;

        main.set_hardware_acceleration(hardware_acceleration);
        emoji.set_hardware_acceleration(hardware_acceleration);
        if let Some(listener) = listener {
            main.set_action_listener(Rc::clone(&listener));
            emoji.set_action_listener(listener);
        }

        container.set_visible(true);
        main.set_visible(true);
        emoji.set_visible(false);

        Self {
            view,
            container,
            main,
            emoji,
            visible: SurfaceKind::Main,
            container_visible: true,
            emoji_started: false,
            top_padding: None,
            variant: None,
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    /// The visible member of the {main, emoji} pair.
    pub fn visible(&self) -> SurfaceKind {
        self.visible
    }

    pub fn is_container_visible(&self) -> bool {
        self.container_visible
    }

    pub fn is_emoji_started(&self) -> bool {
        self.emoji_started
    }

    /// Variant last applied to the main surface, whether or not it is visible.
    pub fn applied_variant(&self) -> Option<&Arc<Variant>> {
        self.variant.as_ref()
    }

    pub fn main(&self) -> &dyn MainSurface {
        self.main.as_ref()
    }

    pub fn main_mut(&mut self) -> &mut dyn MainSurface {
        self.main.as_mut()
    }

    /// Shows `variant` on the main surface.
    ///
    /// The emoji panel is stopped and hidden if it was showing. Presentation
    /// parameters are applied on every call; the variant and padding only when
    /// they change. With `collapse_container` the frame around the main
    /// surface is hidden (a hardware keyboard is attached) while the main
    /// surface stays the selected member of the pair.
    pub fn show_main(
        &mut self,
        variant: &Arc<Variant>,
        params: &PresentationParams,
        collapse_container: bool,
    ) {
        if self.emoji_started {
            self.emoji.stop();
            self.emoji_started = false;
        }
        if self.visible == SurfaceKind::Emoji {
            self.emoji.set_visible(false);
            self.main.set_visible(true);
            self.visible = SurfaceKind::Main;
        }

        if self.variant.as_ref().is_none_or(|current| !Arc::ptr_eq(current, variant)) {
            self.main.set_variant(variant);
            self.variant = Some(Arc::clone(variant));
        }
        if self.top_padding != Some(variant.top_padding) {
            self.container.set_top_padding(variant.top_padding);
            self.top_padding = Some(variant.top_padding);
        }
        self.main.apply_presentation(params);
        self.set_container_visible(!collapse_container);
    }

    /// Hides the main surface and its frame and shows the emoji panel.
    ///
    /// Returns `false` when the panel was already running and visible.
    pub fn show_emoji(
        &mut self,
        switch_back_label: &str,
        attributes: &KeyVisualAttributes,
        icons: &IconSet,
    ) -> bool {
        if self.visible == SurfaceKind::Emoji && self.emoji_started {
            return false;
        }

        self.set_container_visible(false);
        if self.visible == SurfaceKind::Main {
            self.main.set_visible(false);
        }
        if !self.emoji_started {
            self.emoji.start(switch_back_label, attributes, icons);
            self.emoji_started = true;
        }
        if self.visible == SurfaceKind::Main {
            self.emoji.set_visible(true);
            self.visible = SurfaceKind::Emoji;
        }
        true
    }

    /// Releases retained drawing and animation resources.
    pub fn release_resources(&mut self) {
        self.main.cancel_all_ongoing_events();
        self.main.deallocate_memory();
        if self.emoji_started {
            self.emoji.stop();
            self.emoji_started = false;
        }
    }

    /// Detaches the bundle, letting the main surface release transient
    /// resources.
    pub fn close(mut self) {
        if self.emoji_started {
            self.emoji.stop();
        }
        self.main.closing();
    }

    fn set_container_visible(&mut self, visible: bool) {
        if self.container_visible != visible {
            self.container.set_visible(visible);
            self.container_visible = visible;
        }
    }
}
