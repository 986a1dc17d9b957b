// SPDX-License-Identifier: GPL-3.0-only

//! Keyswitch demo
//!
//! Replays a scripted input session against the headless surfaces and the
//! bundled layouts, logging every transition. Pass a settings JSON file as the
//! first argument to override the default settings.
//!
//! ```text
//! RUST_LOG=keyswitch=debug keyswitch-demo settings.json
//! ```

use std::error::Error;
use std::fs;
use std::sync::Arc;

use keyswitch::config::{Settings, SharedSettings};
use keyswitch::i18n;
use keyswitch::input::{
    AutoCapsFlags, Event, KeyCode, KeyboardStateDriver, LoadRequest, RecapitalizeMode,
    SwitchActions,
};
use keyswitch::layout::{EditorContext, InputType, JsonLayoutSetBuilder, VariantId};
use keyswitch::session::{self, SessionClosed, SessionCommand, SessionHandle};
use keyswitch::surface::{HeadlessSurfaceFactory, KeyboardActionListener};
use keyswitch::theme::{DisplayMetrics, KeyboardTheme};
use keyswitch::{KeyboardSwitcher, SwitchError, SwitcherParts};

/// Minimal state machine: shift, symbols and emoji keys.
struct DemoDriver {
    position: VariantId,
}

impl DemoDriver {
    fn go(&mut self, actions: &mut dyn SwitchActions, id: VariantId) -> Result<(), SwitchError> {
        actions.select(id)?;
        self.position = id;
        Ok(())
    }

    fn alphabet_for(auto_caps: AutoCapsFlags) -> VariantId {
        if auto_caps.is_empty() {
            VariantId::Alphabet
        } else {
            VariantId::AlphabetAutomaticShifted
        }
    }
}

impl KeyboardStateDriver for DemoDriver {
    fn on_load_keyboard(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.go(actions, Self::alphabet_for(auto_caps))
    }

    fn on_save_keyboard_state(&mut self) {
        tracing::info!("State machine saved position '{}'", self.position);
    }

    fn on_reset_keyboard_state_to_alphabet(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        self.go(actions, Self::alphabet_for(auto_caps))
    }

    fn on_press_key(
        &mut self,
        actions: &mut dyn SwitchActions,
        code: KeyCode,
        _is_single_pointer: bool,
        _auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
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
            KeyCode::SYMBOL_SHIFT if self.position == VariantId::Symbols => {
                self.go(actions, VariantId::SymbolsShifted)
            }
            KeyCode::SYMBOL_SHIFT if self.position == VariantId::SymbolsShifted => {
                self.go(actions, VariantId::Symbols)
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
        match code {
            KeyCode::SHIFT => match self.position {
                VariantId::Alphabet | VariantId::AlphabetAutomaticShifted => {
                    self.go(actions, VariantId::AlphabetManualShifted)
                }
                VariantId::AlphabetManualShifted | VariantId::AlphabetShiftLocked => {
                    self.go(actions, VariantId::Alphabet)
                }
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
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        actions.request_updating_shift_state(auto_caps, recapitalize);
        Ok(())
    }

    fn on_update_shift_state(
        &mut self,
        actions: &mut dyn SwitchActions,
        auto_caps: AutoCapsFlags,
        _recapitalize: RecapitalizeMode,
    ) -> Result<(), SwitchError> {
        match self.position {
            VariantId::Alphabet | VariantId::AlphabetAutomaticShifted
            | VariantId::AlphabetManualShifted => self.go(actions, Self::alphabet_for(auto_caps)),
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
        if let Some(text) = &event.text {
            tracing::info!("Committed text {:?}", text);
        }
        actions.request_updating_shift_state(auto_caps, recapitalize);
        Ok(())
    }
}

/// Logs key actions reported by the surfaces.
struct LoggingListener;

impl KeyboardActionListener for LoggingListener {
    fn on_press_key(&self, code: KeyCode, repeat_count: u32, is_single_pointer: bool) {
        tracing::debug!(
            "Surface press {:?} (repeat {}, single pointer {})",
            code,
            repeat_count,
            is_single_pointer
        );
    }

    fn on_release_key(&self, code: KeyCode, with_sliding: bool) {
        tracing::debug!("Surface release {:?} (sliding {})", code, with_sliding);
    }

    fn on_code_input(&self, code: KeyCode, x: i32, y: i32, is_repeat: bool) {
        tracing::debug!("Surface code {:?} at ({}, {}) repeat {}", code, x, y, is_repeat);
    }

    fn on_text_input(&self, text: &str) {
        tracing::debug!("Surface text {:?}", text);
    }
}

fn load_settings() -> Result<Settings, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)?;
            let settings = Settings::from_json(&json)?;
            tracing::info!("Loaded settings from {}", path);
            Ok(settings)
        }
        None => {
            let mut settings = Settings::default();
            if let Some(language) = i18n::desktop_language() {
                settings.system_language = language;
            }
            Ok(settings)
        }
    }
}

fn press(code: KeyCode) -> SessionCommand {
    SessionCommand::PressKey {
        code,
        is_single_pointer: true,
        auto_caps: AutoCapsFlags::empty(),
        recapitalize: RecapitalizeMode::None,
    }
}

fn release(code: KeyCode, auto_caps: AutoCapsFlags) -> SessionCommand {
    SessionCommand::ReleaseKey {
        code,
        with_sliding: false,
        auto_caps,
        recapitalize: RecapitalizeMode::None,
    }
}

async fn report(handle: &SessionHandle, step: &str) -> Result<(), SessionClosed> {
    let snapshot = handle.inspect().await?;
    tracing::info!(
        "{:<28} view={:?} visible={:?} variant={:?} shift={:?} script={:?}",
        step,
        snapshot.view.map(|view| view.0),
        snapshot.visible,
        snapshot.variant,
        snapshot.shift,
        snapshot.script
    );
    Ok(())
}

/// The scripted session a host would drive.
async fn script(
    handle: SessionHandle,
    settings: Arc<Settings>,
    live: SharedSettings,
) -> Result<(), SessionClosed> {
    let text = LoadRequest::new(EditorContext::new(InputType::Text))
        .with_caps(AutoCapsFlags::SENTENCES, RecapitalizeMode::None);

    handle
        .send(SessionCommand::CreateSurfaceBundle {
            hardware_acceleration: true,
        })
        .await?;
    handle
        .send(SessionCommand::LoadLayout {
            request: text,
            settings: Arc::clone(&settings),
        })
        .await?;
    report(&handle, "loaded").await?;

    handle
        .send(release(KeyCode::from_char('H'), AutoCapsFlags::empty()))
        .await?;
    report(&handle, "typed 'H'").await?;

    handle.send(press(KeyCode::SHIFT)).await?;
    handle
        .send(release(KeyCode::SHIFT, AutoCapsFlags::empty()))
        .await?;
    handle.send(press(KeyCode::SHIFT)).await?;
    report(&handle, "double-tapped shift").await?;

    handle.send(press(KeyCode::SWITCH_ALPHA_SYMBOL)).await?;
    handle.send(press(KeyCode::SYMBOL_SHIFT)).await?;
    report(&handle, "shifted symbols").await?;

    handle
        .send(SessionCommand::ToggleEmojiPanel(text))
        .await?;
    report(&handle, "emoji panel").await?;
    handle
        .send(SessionCommand::ToggleEmojiPanel(text))
        .await?;
    report(&handle, "emoji panel toggled off").await?;

    live.update(|settings| settings.has_hardware_keyboard = true);
    handle.send(press(KeyCode::SWITCH_ALPHA_SYMBOL)).await?;
    report(&handle, "hardware keyboard").await?;
    live.update(|settings| settings.has_hardware_keyboard = false);

    let number = LoadRequest::new(EditorContext::new(InputType::Number));
    handle
        .send(SessionCommand::LoadLayout {
            request: number,
            settings: Arc::clone(&settings),
        })
        .await?;
    report(&handle, "number field").await?;

    handle.send(SessionCommand::SaveState).await?;
    handle.send(SessionCommand::DestroySurfaceBundle).await?;
    handle
        .send(SessionCommand::CreateSurfaceBundle {
            hardware_acceleration: true,
        })
        .await?;
    handle.send(SessionCommand::RestoreState).await?;
    report(&handle, "restored after rebuild").await?;

    let dark = KeyboardTheme::LXX_DARK.id;
    live.update(|settings| settings.keyboard_theme = dark);
    handle.send(SessionCommand::UpdateTheme(dark)).await?;
    handle
        .send(SessionCommand::CreateSurfaceBundle {
            hardware_acceleration: true,
        })
        .await?;
    handle
        .send(SessionCommand::LoadLayout {
            request: text,
            settings,
        })
        .await?;
    report(&handle, "dark theme").await?;

    handle.send(SessionCommand::ReleaseResources).await?;
    handle.send(SessionCommand::Shutdown).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("keyswitch=info".parse()?),
        )
        .init();

    let settings = Arc::new(load_settings()?);
    let live = SharedSettings::new(Settings::clone(&settings));
    let builder = JsonLayoutSetBuilder::bundled();
    tracing::info!("Bundled layouts: {}", builder.layout_names().join(", "));

    let mut switcher = KeyboardSwitcher::new(SwitcherParts {
        driver: Box::new(DemoDriver {
            position: VariantId::Alphabet,
        }),
        builder: Box::new(builder),
        surfaces: Box::new(HeadlessSurfaceFactory::new()),
        settings: Box::new(live.clone()),
        listener: Some(std::rc::Rc::new(LoggingListener)),
        display: DisplayMetrics::default(),
    });

    let (handle, session) = session::channel();
    let (handled, result) = futures::join!(
        session.run(&mut switcher),
        script(handle, settings, live)
    );
    result?;

    tracing::info!("Demo session handled {} commands", handled);
    Ok(())
}
