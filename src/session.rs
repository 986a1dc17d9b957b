// SPDX-License-Identifier: GPL-3.0-only

//! Single-consumer command queue in front of a [`KeyboardSwitcher`].
//!
//! The switcher must only be driven from one control sequence. Hosts that
//! receive input or lifecycle events on other threads send
//! [`SessionCommand`]s through a cloneable [`SessionHandle`]; one
//! [`Session`] drains them in order and applies each to the switcher.
//!
//! # Example
//!
//! ```rust,ignore
//! let (handle, session) = keyswitch::session::channel();
//!
//! let host = async move {
//!     handle.send(SessionCommand::CreateSurfaceBundle { hardware_acceleration: true }).await?;
//!     let snapshot = handle.inspect().await?;
//!     handle.send(SessionCommand::Shutdown).await
//! };
//!
//! let (processed, result) = futures::join!(session.run(&mut switcher), host);
//! ```

use std::fmt;
use std::sync::Arc;

use futures::channel::{mpsc, oneshot};
use futures::{SinkExt, StreamExt};

use crate::app_settings::SESSION_QUEUE_DEPTH;
use crate::config::Settings;
use crate::input::{AutoCapsFlags, CapsMode, Event, KeyCode, LoadRequest, RecapitalizeMode};
use crate::layout::{ConfigurationKey, ScriptId, VariantId};
use crate::surface::{SurfaceKind, ViewId};
use crate::switcher::{KeyboardSwitcher, SwitchError};
use crate::theme::ThemeId;

/// Commands a host can queue for the switcher.
#[derive(Debug)]
pub enum SessionCommand {
    UpdateTheme(ThemeId),
    LoadLayout {
        request: LoadRequest,
        settings: Arc<Settings>,
    },
    ToggleEmojiPanel(LoadRequest),
    CreateSurfaceBundle {
        hardware_acceleration: bool,
    },
    DestroySurfaceBundle,
    ReleaseResources,
    HideWindow,
    SaveState,
    RestoreState,
    PressKey {
        code: KeyCode,
        is_single_pointer: bool,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    },
    ReleaseKey {
        code: KeyCode,
        with_sliding: bool,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    },
    FinishSlidingInput {
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    },
    Event {
        event: Event,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    },
    UpdateShiftState {
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    },
    ResetToAlphabet {
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    },
    /// Replies with a snapshot of the switcher's observable state.
    Inspect(oneshot::Sender<SwitcherSnapshot>),
    /// Stops the session after the commands queued before it.
    Shutdown,
}

/// Observable switcher state at one point of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitcherSnapshot {
    pub view: Option<ViewId>,
    pub visible: Option<SurfaceKind>,
    pub variant: Option<VariantId>,
    pub top_padding: Option<u32>,
    pub script: ScriptId,
    pub shift: CapsMode,
    pub key: Option<ConfigurationKey>,
}

impl SwitcherSnapshot {
    pub fn of(switcher: &KeyboardSwitcher) -> Self {
        Self {
            view: switcher.view_id(),
            visible: switcher.visible_surface(),
            variant: switcher.current_variant_id(),
            top_padding: switcher.current_variant().map(|variant| variant.top_padding),
            script: switcher.current_script_id(),
            shift: switcher.keyboard_shift_mode(),
            key: switcher.configuration_key().cloned(),
        }
    }
}

/// The session stopped before the command could be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClosed;

impl fmt::Display for SessionClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("keyboard session is closed")
    }
}

impl std::error::Error for SessionClosed {}

/// Cloneable sender side of a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Queues a command, waiting while the queue is full.
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionClosed> {
        let mut tx = self.command_tx.clone();
        tx.send(command).await.map_err(|_| SessionClosed)
    }

    /// Waits for every earlier command to be handled and returns the state
    /// they left behind.
    pub async fn inspect(&self) -> Result<SwitcherSnapshot, SessionClosed> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Inspect(reply_tx)).await?;
        reply_rx.await.map_err(|_| SessionClosed)
    }
}

/// Receiver side of a session.
#[derive(Debug)]
pub struct Session {
    command_rx: mpsc::Receiver<SessionCommand>,
}

/// Creates a session and its first handle.
pub fn channel() -> (SessionHandle, Session) {
    let (command_tx, command_rx) = mpsc::channel(SESSION_QUEUE_DEPTH);
    (SessionHandle { command_tx }, Session { command_rx })
}

impl Session {
    /// Applies queued commands until `Shutdown` or until every handle is
    /// dropped. Returns the number of commands handled.
    ///
    /// A failing command is logged and the session continues.
    pub async fn run(mut self, switcher: &mut KeyboardSwitcher) -> usize {
        let mut handled = 0;
        while let Some(command) = self.command_rx.next().await {
            if matches!(command, SessionCommand::Shutdown) {
                tracing::debug!("Keyboard session shutting down after {} commands", handled);
                break;
            }
            if let Err(e) = apply(switcher, command) {
                tracing::error!("Keyboard session command failed: {}", e);
            }
            handled += 1;
        }
        handled
    }
}

fn apply(switcher: &mut KeyboardSwitcher, command: SessionCommand) -> Result<(), SwitchError> {
    match command {
        SessionCommand::UpdateTheme(theme) => {
            if switcher.update_theme(theme) {
                tracing::debug!("Theme changed to {}; surfaces must be recreated", theme);
            }
        }
        SessionCommand::LoadLayout { request, settings } => {
            switcher.load_layout_configuration(&request, &settings)?;
        }
        SessionCommand::ToggleEmojiPanel(request) => {
            switcher.toggle_emoji_panel(&request)?;
        }
        SessionCommand::CreateSurfaceBundle {
            hardware_acceleration,
        } => {
            switcher.create_surface_bundle(hardware_acceleration);
        }
        SessionCommand::DestroySurfaceBundle => {
            switcher.destroy_surface_bundle();
        }
        SessionCommand::ReleaseResources => switcher.release_resources(),
        SessionCommand::HideWindow => switcher.on_hide_window(),
        SessionCommand::SaveState => switcher.save_state(),
        SessionCommand::RestoreState => {
            switcher.restore_state()?;
        }
        SessionCommand::PressKey {
            code,
            is_single_pointer,
            auto_caps,
            recapitalize,
        } => switcher.on_press_key(code, is_single_pointer, auto_caps, recapitalize)?,
        SessionCommand::ReleaseKey {
            code,
            with_sliding,
            auto_caps,
            recapitalize,
        } => switcher.on_release_key(code, with_sliding, auto_caps, recapitalize)?,
        SessionCommand::FinishSlidingInput {
            auto_caps,
            recapitalize,
        } => switcher.on_finish_sliding_input(auto_caps, recapitalize)?,
        SessionCommand::Event {
            event,
            auto_caps,
            recapitalize,
        } => switcher.on_event(&event, auto_caps, recapitalize)?,
        SessionCommand::UpdateShiftState {
            auto_caps,
            recapitalize,
        } => switcher.request_shift_state_update(auto_caps, recapitalize)?,
        SessionCommand::ResetToAlphabet {
            auto_caps,
            recapitalize,
        } => switcher.reset_to_alphabet(auto_caps, recapitalize)?,
        SessionCommand::Inspect(reply) => {
            // The requester may have given up waiting
            let _ = reply.send(SwitcherSnapshot::of(switcher));
        }
        SessionCommand::Shutdown => {}
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
