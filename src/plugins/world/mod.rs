//! World plugin: the ground plane and the arena it surrounds.
//!
//! Solid-color sprites only, so the game ships without assets. Tiles inside the arena are
//! lighter than the surrounding ground; enemies spawn out on the ground and walk in.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;

/// Floor tile edge, meters.
pub const TILE: f32 = 10.0;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorTile {
    pub in_arena: bool,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_floor);
}

fn spawn_floor(mut commands: Commands, tunables: Res<Tunables>) {
    let reach = (tunables.ground_half_extent / TILE).ceil() as i32;
    let arena = tunables.arena_half_extent;

    (-reach..=reach)
        .flat_map(|y| (-reach..=reach).map(move |x| (x, y)))
        .for_each(|(x, y)| {
            let pos = Vec2::new(x as f32, y as f32) * TILE;
            let in_arena = pos.x.abs() <= arena && pos.y.abs() <= arena;
            let color = match (in_arena, (x + y) % 2 == 0) {
                (true, true) => Color::srgb(0.16, 0.2, 0.15),
                (true, false) => Color::srgb(0.14, 0.18, 0.13),
                (false, true) => Color::srgb(0.09, 0.1, 0.09),
                (false, false) => Color::srgb(0.08, 0.09, 0.08),
            };

            commands.spawn((
                FloorTile { in_arena },
                Sprite::from_color(color, Vec2::splat(TILE)),
                Transform::from_translation(pos.extend(0.0)),
                DespawnOnExit(GameState::InGame),
            ));
        });
}
