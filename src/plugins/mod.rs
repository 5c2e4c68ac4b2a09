//! Feature plugins.

use bevy::prelude::*;

pub mod audio;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod physics;
pub mod pickups;
pub mod player;
pub mod progression;
pub mod ui;
pub mod upgrades;
pub mod weapons;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    audio::plugin(app);
    player::plugin(app);
    progression::plugin(app);
    enemies::plugin(app);
    weapons::plugin(app);
    pickups::plugin(app);
    upgrades::plugin(app);
    ui::hud::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    ui::view::plugin(app);
}
