// SPDX-License-Identifier: GPL-3.0-only

//! Keyswitch - runtime keyboard-variant dispatcher for soft keyboards
//!
//! This crate swaps the visible keyboard of a soft keyboard in response to an
//! external state machine. It does not decide *when* to switch; it resolves
//! the concrete variant for the current layout configuration, keeps the
//! rendering surfaces in a consistent visible/hidden state and applies
//! presentation parameters from the live settings.
//!
//! # Architecture
//!
//! 1. **Layout sets** (`layout`): a [`layout::VariantSet`] per
//!    [`layout::ConfigurationKey`], built by a [`layout::LayoutSetBuilder`] and
//!    replaced as a whole when the key changes.
//!
//! 2. **Surfaces** (`surface`): opaque display sinks created per input view
//!    and owned by a [`surface::SurfaceBundle`].
//!
//! 3. **Switcher** (`switcher`): the [`switcher::KeyboardSwitcher`] tying
//!    both together behind the [`input::SwitchActions`] interface the state
//!    machine drives.
//!
//! Hosts that cannot guarantee a single control sequence put the switcher
//! behind a [`session::Session`].
//!
//! # Modules
//!
//! - `app_settings`: Centralized constants
//! - `config`: Settings snapshots and the live settings store
//! - `i18n`: Locale texts handed to surfaces
//! - `input`: State machine boundary (actions, driver, shift state, events)
//! - `layout`: Configuration keys, variants, variant sets and builders
//! - `session`: Command queue serializing switcher calls
//! - `surface`: Display sink traits, bundle bookkeeping, headless backend
//! - `switcher`: The keyboard switcher
//! - `theme`: Keyboard themes bound to the display

pub mod app_settings;
pub mod config;
pub mod i18n;
pub mod input;
pub mod layout;
pub mod session;
pub mod surface;
pub mod switcher;
pub mod theme;

#[cfg(test)]
mod test_support;

pub use crate::input::{KeyboardStateDriver, LoadRequest, SwitchActions};
pub use crate::switcher::{KeyboardSwitcher, SwitchError, SwitcherParts};

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use std::fs;
    use std::sync::Arc;

    use crate::config::Settings;
    use crate::input::{AutoCapsFlags, KeyCode, LoadRequest, RecapitalizeMode, SwitchActions};
    use crate::layout::{JsonLayoutSetBuilder, Subtype, VariantId};
    use crate::session::{self, SessionCommand};
    use crate::surface::SurfaceKind;
    use crate::test_support::Fixture;

    /// Integration Test 1: Typing session from attach to emoji and back
    ///
    /// This test walks the switcher through a realistic input session: the
    /// host attaches surfaces, loads the layout, the user shifts, types,
    /// opens the emoji panel and comes back.
    #[test]
    fn test_typing_session() {
        let mut fixture = Fixture::new();
        let none = AutoCapsFlags::empty();
        let recap = RecapitalizeMode::None;

        fixture.switcher.create_surface_bundle(true);
        fixture
            .switcher
            .load_layout_configuration(
                &LoadRequest::default().with_caps(AutoCapsFlags::SENTENCES, recap),
                &Settings::default(),
            )
            .expect("layout should load");
        assert_eq!(
            fixture.switcher.current_variant_id(),
            Some(VariantId::AlphabetAutomaticShifted),
            "Sentence start should load auto-shifted"
        );

        // Typing a letter clears the automatic shift
        fixture
            .switcher
            .on_release_key(KeyCode::from_char('H'), false, none, recap)
            .expect("release");
        assert_eq!(fixture.switcher.current_variant_id(), Some(VariantId::Alphabet));

        fixture
            .switcher
            .on_press_key(KeyCode::EMOJI, true, none, recap)
            .expect("emoji key");
        assert_eq!(fixture.switcher.visible_surface(), Some(SurfaceKind::Emoji));
        fixture.assert_one_visible();

        fixture
            .switcher
            .on_press_key(KeyCode::ALPHA_FROM_EMOJI, true, none, recap)
            .expect("back to alphabet");
        assert_eq!(fixture.switcher.visible_surface(), Some(SurfaceKind::Main));
        assert_eq!(fixture.switcher.current_variant_id(), Some(VariantId::Alphabet));
        fixture.assert_one_visible();
    }

    /// Integration Test 2: Soft reload across an input view rebuild
    ///
    /// This test verifies the logical variant survives the host tearing the
    /// input view down and creating a new one without a layout rebuild.
    #[test]
    fn test_soft_reload() {
        let mut fixture = Fixture::new();
        fixture.switcher.create_surface_bundle(false);
        fixture
            .switcher
            .load_layout_configuration(&LoadRequest::default(), &Settings::default())
            .expect("layout should load");
        fixture.switcher.select_symbols().expect("symbols");
        let key = fixture.switcher.configuration_key().cloned();

        fixture.switcher.save_state();
        fixture.switcher.destroy_surface_bundle();
        fixture.switcher.create_surface_bundle(false);
        let restored = fixture.switcher.restore_state().expect("restore");

        assert_eq!(restored, Some(VariantId::Symbols));
        assert_eq!(fixture.switcher.configuration_key().cloned(), key);
        assert_eq!(fixture.surfaces.views().len(), 2);
        assert!(fixture.surfaces.views()[0].record().closed);
    }

    /// Integration Test 3: Layouts loaded from a descriptor directory
    ///
    /// This test verifies a builder reading descriptors from disk feeds the
    /// switcher, and that a broken descriptor only fails its own subtype.
    #[test]
    fn test_directory_layouts() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(
            dir.path().join("custom.json"),
            r#"{
                "name": "custom",
                "script": "latin",
                "variants": { "alphabet": { "top_padding": 0.1 } }
            }"#,
        )
        .expect("write descriptor");
        fs::write(dir.path().join("broken.json"), "{ not json").expect("write descriptor");

        let builder = JsonLayoutSetBuilder::from_dir(dir.path()).expect("directory should load");
        let mut fixture = Fixture::with_builder(builder);
        fixture.switcher.create_surface_bundle(false);

        let custom = Settings {
            subtype: Subtype::new("en_US", "custom"),
            ..Settings::default()
        };
        fixture
            .switcher
            .load_layout_configuration(&LoadRequest::default(), &custom)
            .expect("custom layout should load");

        // Symbols fall back to the alphabet entry
        let alphabet_padding = fixture
            .switcher
            .current_variant()
            .map(|variant| variant.top_padding)
            .expect("alphabet shown");
        fixture.switcher.select_symbols().expect("symbols");
        assert_eq!(
            fixture.switcher.current_variant().map(|variant| variant.top_padding),
            Some(alphabet_padding)
        );

        let broken = Settings {
            subtype: Subtype::new("en_US", "broken"),
            ..Settings::default()
        };
        assert!(
            fixture
                .switcher
                .load_layout_configuration(&LoadRequest::default(), &broken)
                .is_err()
        );
        assert_eq!(fixture.switcher.current_variant_id(), Some(VariantId::Symbols));
    }

    /// Integration Test 4: Settings published between switches
    ///
    /// This test verifies a settings change published from another owner of
    /// the live store is picked up on the very next switch.
    #[test]
    fn test_live_settings_between_switches() {
        let mut fixture = Fixture::new();
        let publisher = fixture.settings.clone();
        fixture.switcher.create_surface_bundle(false);
        fixture
            .switcher
            .load_layout_configuration(&LoadRequest::default(), &Settings::default())
            .expect("layout should load");

        publisher.update(|settings| {
            settings.key_preview_popup_on = false;
            settings.shortcut_ime_ready = true;
        });
        fixture.switcher.select_symbols().expect("symbols");

        let params = fixture
            .view()
            .record()
            .presentation
            .expect("presentation applied");
        assert!(!params.key_preview.enabled);
        assert!(params.shortcut_key_ready);
    }

    /// Integration Test 5: Session queue drives a full switch sequence
    ///
    /// This test verifies commands sent through a session handle reach the
    /// switcher in order and leave it in the expected state.
    #[tokio::test]
    async fn test_session_sequence() {
        let mut fixture = Fixture::new();
        let (handle, session) = session::channel();
        let none = AutoCapsFlags::empty();
        let recap = RecapitalizeMode::None;

        let host = async move {
            handle
                .send(SessionCommand::CreateSurfaceBundle {
                    hardware_acceleration: false,
                })
                .await?;
            handle
                .send(SessionCommand::LoadLayout {
                    request: LoadRequest::default(),
                    settings: Arc::new(Settings::default()),
                })
                .await?;
            handle
                .send(SessionCommand::PressKey {
                    code: KeyCode::SWITCH_ALPHA_SYMBOL,
                    is_single_pointer: true,
                    auto_caps: none,
                    recapitalize: recap,
                })
                .await?;
            let symbols = handle.inspect().await?;
            handle
                .send(SessionCommand::ResetToAlphabet {
                    auto_caps: none,
                    recapitalize: recap,
                })
                .await?;
            let alphabet = handle.inspect().await?;
            handle.send(SessionCommand::Shutdown).await?;
            Ok::<_, session::SessionClosed>((symbols, alphabet))
        };

        let (_, result) = futures::join!(session.run(&mut fixture.switcher), host);
        let (symbols, alphabet) = result.expect("session should stay open");

        assert_eq!(symbols.variant, Some(VariantId::Symbols));
        assert_eq!(alphabet.variant, Some(VariantId::Alphabet));
        assert!(alphabet.top_padding.is_some());
    }
}
