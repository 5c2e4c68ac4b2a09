//! Game composition root.
//!
//! - `run`: loads and validates tunables, then opens the window.
//! - `configure_full`: DefaultPlugins (window/render) + game plugins, behind the onboarding gate.
//! - `configure_headless`: gameplay only, for integration tests. Starts ungated.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::{GameState, SimContext};
use crate::common::tunables::{Tunables, TunablesError};
use crate::plugins;

#[cfg(target_os = "windows")]
use bevy::render::{
    RenderPlugin,
    settings::{Backends, PowerPreference, WgpuSettings},
};

/// Fails before any window opens if the tunables are invalid.
pub fn run() -> Result<(), TunablesError> {
    let tunables = Tunables::load_or_default();
    tunables.validate()?;

    App::new()
        .insert_resource(tunables)
        .add_plugins(configure_full)
        .run();
    Ok(())
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    let default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Arcane Survivors".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    });

    // DX12 on Windows; Vulkan is unreliable on some drivers.
    #[cfg(target_os = "windows")]
    let default_plugins = default_plugins.set(RenderPlugin {
        render_creation: WgpuSettings {
            backends: Some(Backends::DX12),
            power_preference: PowerPreference::HighPerformance,
            ..default()
        }
        .into(),
        ..default()
    });

    app.add_plugins(default_plugins);
    app.insert_resource(SimContext::guided());

    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (Firefly/camera/HUD text).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}
