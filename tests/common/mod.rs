//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `arcane_survivors::game::configure_headless` to install gameplay plugins.
//! - every `app.update()` advances time by exactly one fixed step.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use arcane_survivors::common::tunables::Tunables;

pub fn app_headless() -> App {
    app_with(Tunables { seed: Some(42), ..Tunables::default() })
}

pub fn app_with(tunables: Tunables) -> App {
    let step = Duration::from_secs_f64(1.0 / tunables.fixed_hz);
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists for avian.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step));
    app.insert_resource(tunables);

    arcane_survivors::game::configure_headless(&mut app);
    // Plugin::finish registers resources (avian's collision diagnostics) that the first
    // fixed step needs; `App::run` would call these for us.
    app.finish();
    app.cleanup();
    app
}

/// Run `n` frames.
pub fn step(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

pub fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<arcane_survivors::plugins::player::Player>>()
        .single(app.world())
        .expect("player spawned")
}
