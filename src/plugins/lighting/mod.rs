//! Firefly lighting (render-only): a light that follows the player and shadows cast by enemies.
//!
//! Occluders are attached here rather than in the enemy bundle so the gameplay plugins never
//! touch Firefly types and stay usable headless.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{Enemy, Rank};
use crate::plugins::player::Player;

#[derive(Component)]
pub struct PlayerLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), spawn_player_light)
        .add_systems(Update, (follow_player_light, add_enemy_occluders));
}

fn spawn_player_light(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: Color::srgb(0.85, 0.8, 1.0),
            radius: 14.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player_light(
    q_player: Query<&Transform, (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Player>)>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
}

fn add_enemy_occluders(
    mut commands: Commands,
    tunables: Res<Tunables>,
    q_new: Query<(Entity, &Rank), Added<Enemy>>,
) {
    for (e, rank) in &q_new {
        commands
            .entity(e)
            .try_insert(Occluder2d::circle(rank.body_radius(&tunables.enemies)));
    }
}
