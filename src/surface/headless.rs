// SPDX-License-Identifier: GPL-3.0-only

//! Headless surface backend.
//!
//! Every view created by [`HeadlessSurfaceFactory`] records the state its
//! sinks were put into, plus an ordered log of the calls that got it there.
//! Nothing is drawn. The demo binary runs on it, and tests inspect the
//! records through [`HeadlessView`] handles.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_settings;
use crate::layout::{IconSet, Variant, VariantId};
use crate::surface::{
    ActionListener, EmojiSurface, KeyboardContainer, MainSurface, PresentationParams,
    SurfaceFactory, SurfaceParts, ViewId,
};
use crate::theme::{KeyVisualAttributes, ThemeContext};

/// One call made on a headless sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ContainerVisible(bool),
    TopPadding(u32),
    MainVisible(bool),
    SetVariant(VariantId),
    Presentation,
    EmojiVisible(bool),
    EmojiStarted(String),
    EmojiStopped,
    HideWindow,
    Closing,
    CancelOngoingEvents,
    DeallocateMemory,
}

/// Recorded state of one headless view.
#[derive(Debug, Clone)]
pub struct ViewRecord {
    pub view: ViewId,
    /// Theme the view was created for.
    pub theme: &'static str,
    pub container_visible: bool,
    pub top_padding: u32,
    pub main_visible: bool,
    pub variant: Option<Arc<Variant>>,
    pub presentation: Option<PresentationParams>,
    pub presentations_applied: usize,
    pub emoji_visible: bool,
    pub emoji_running: bool,
    pub emoji_label: Option<String>,
    pub emoji_attributes: Option<KeyVisualAttributes>,
    pub emoji_icons: Option<IconSet>,
    pub hardware_acceleration: bool,
    pub has_main_listener: bool,
    pub has_emoji_listener: bool,
    pub showing_more_keys: bool,
    pub closed: bool,
    double_tap_deadline: Option<Instant>,
    pub calls: Vec<SurfaceCall>,
}

impl ViewRecord {
    fn new(view: ViewId, theme: &'static str) -> Self {
        Self {
            view,
            theme,
            container_visible: false,
            top_padding: 0,
            main_visible: false,
            variant: None,
            presentation: None,
            presentations_applied: 0,
            emoji_visible: false,
            emoji_running: false,
            emoji_label: None,
            emoji_attributes: None,
            emoji_icons: None,
            hardware_acceleration: false,
            has_main_listener: false,
            has_emoji_listener: false,
            showing_more_keys: false,
            closed: false,
            double_tap_deadline: None,
            calls: Vec::new(),
        }
    }

    /// Number of visibility changes made on either member of the pair.
    pub fn visibility_changes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::MainVisible(_) | SurfaceCall::EmojiVisible(_)))
            .count()
    }
}

/// Shared handle to a headless view's record.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    record: Rc<RefCell<ViewRecord>>,
}

impl HeadlessView {
    pub fn id(&self) -> ViewId {
        self.record.borrow().view
    }

    /// Borrows the current record.
    pub fn record(&self) -> Ref<'_, ViewRecord> {
        self.record.borrow()
    }

    /// Simulates the user opening or dismissing a more-keys panel.
    pub fn set_showing_more_keys(&self, showing: bool) {
        self.record.borrow_mut().showing_more_keys = showing;
    }
}

/// Factory producing recording surfaces.
///
/// Clones share the list of created views, so a test can keep one clone and
/// hand the other to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurfaceFactory {
    views: Rc<RefCell<Vec<HeadlessView>>>,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every view created so far, oldest first.
    pub fn views(&self) -> Vec<HeadlessView> {
        self.views.borrow().clone()
    }

    pub fn last_view(&self) -> Option<HeadlessView> {
        self.views.borrow().last().cloned()
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create(&mut self, theme: &ThemeContext) -> SurfaceParts {
        let view = ViewId(self.views.borrow().len() as u64 + 1);
        let record = Rc::new(RefCell::new(ViewRecord::new(view, theme.theme().name)));
        self.views.borrow_mut().push(HeadlessView {
            record: Rc::clone(&record),
        });
        tracing::debug!("Created headless {} for theme '{}'", view, theme.theme().name);

        SurfaceParts {
            view,
            container: Box::new(HeadlessContainer {
                record: Rc::clone(&record),
            }),
            main: Box::new(HeadlessMainSurface {
                record: Rc::clone(&record),
                listener: None,
            }),
            emoji: Box::new(HeadlessEmojiSurface {
                record,
                listener: None,
            }),
        }
    }
}

struct HeadlessContainer {
    record: Rc<RefCell<ViewRecord>>,
}

impl KeyboardContainer for HeadlessContainer {
    fn set_visible(&mut self, visible: bool) {
        let mut record = self.record.borrow_mut();
        record.container_visible = visible;
        record.calls.push(SurfaceCall::ContainerVisible(visible));
    }

    fn set_top_padding(&mut self, padding: u32) {
        let mut record = self.record.borrow_mut();
        record.top_padding = padding;
        record.calls.push(SurfaceCall::TopPadding(padding));
    }
}

struct HeadlessMainSurface {
    record: Rc<RefCell<ViewRecord>>,
    // Held for the lifetime of the view; nothing is ever pressed headlessly.
    #[allow(dead_code)]
    listener: Option<ActionListener>,
}

impl MainSurface for HeadlessMainSurface {
    fn set_variant(&mut self, variant: &Arc<Variant>) {
        let mut record = self.record.borrow_mut();
        tracing::trace!("{}: drawing {}", record.view, variant.id);
        record.variant = Some(Arc::clone(variant));
        record.calls.push(SurfaceCall::SetVariant(variant.id));
    }

    fn set_visible(&mut self, visible: bool) {
        let mut record = self.record.borrow_mut();
        record.main_visible = visible;
        record.calls.push(SurfaceCall::MainVisible(visible));
    }

    fn apply_presentation(&mut self, params: &PresentationParams) {
        let mut record = self.record.borrow_mut();
        record.presentation = Some(*params);
        record.presentations_applied += 1;
        record.calls.push(SurfaceCall::Presentation);
    }

    fn set_hardware_acceleration(&mut self, enabled: bool) {
        self.record.borrow_mut().hardware_acceleration = enabled;
    }

    fn set_action_listener(&mut self, listener: ActionListener) {
        self.listener = Some(listener);
        self.record.borrow_mut().has_main_listener = true;
    }

    fn start_double_tap_shift_key_timer(&mut self) {
        let timeout = Duration::from_millis(app_settings::DOUBLE_TAP_SHIFT_TIMEOUT_MS);
        self.record.borrow_mut().double_tap_deadline = Some(Instant::now() + timeout);
    }

    fn cancel_double_tap_shift_key_timer(&mut self) {
        self.record.borrow_mut().double_tap_deadline = None;
    }

    fn is_in_double_tap_shift_key_timeout(&self) -> bool {
        self.record
            .borrow()
            .double_tap_deadline
            .is_some_and(|deadline| Instant::now() < deadline)
    }

    fn is_showing_more_keys_panel(&self) -> bool {
        self.record.borrow().showing_more_keys
    }

    fn on_hide_window(&mut self) {
        let mut record = self.record.borrow_mut();
        record.showing_more_keys = false;
        record.calls.push(SurfaceCall::HideWindow);
    }

    fn closing(&mut self) {
        let mut record = self.record.borrow_mut();
        record.double_tap_deadline = None;
        record.showing_more_keys = false;
        record.closed = true;
        record.calls.push(SurfaceCall::Closing);
        tracing::debug!("{} closing", record.view);
    }

    fn cancel_all_ongoing_events(&mut self) {
        let mut record = self.record.borrow_mut();
        record.double_tap_deadline = None;
        record.calls.push(SurfaceCall::CancelOngoingEvents);
    }

    fn deallocate_memory(&mut self) {
        self.record
            .borrow_mut()
            .calls
            .push(SurfaceCall::DeallocateMemory);
    }
}

struct HeadlessEmojiSurface {
    record: Rc<RefCell<ViewRecord>>,
    #[allow(dead_code)]
    listener: Option<ActionListener>,
}

impl EmojiSurface for HeadlessEmojiSurface {
    fn set_visible(&mut self, visible: bool) {
        let mut record = self.record.borrow_mut();
        record.emoji_visible = visible;
        record.calls.push(SurfaceCall::EmojiVisible(visible));
    }

    fn start(
        &mut self,
        switch_back_label: &str,
        attributes: &KeyVisualAttributes,
        icons: &IconSet,
    ) {
        let mut record = self.record.borrow_mut();
        record.emoji_running = true;
        record.emoji_label = Some(switch_back_label.to_string());
        record.emoji_attributes = Some(*attributes);
        record.emoji_icons = Some(icons.clone());
        record
            .calls
            .push(SurfaceCall::EmojiStarted(switch_back_label.to_string()));
    }

    fn stop(&mut self) {
        let mut record = self.record.borrow_mut();
        record.emoji_running = false;
        record.calls.push(SurfaceCall::EmojiStopped);
    }

    fn set_hardware_acceleration(&mut self, enabled: bool) {
        self.record.borrow_mut().hardware_acceleration = enabled;
    }

    fn set_action_listener(&mut self, listener: ActionListener) {
        self.listener = Some(listener);
        self.record.borrow_mut().has_emoji_listener = true;
    }
}
