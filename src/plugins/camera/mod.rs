//! Follow camera (render-only).
//!
//! Gameplay runs in meters. The orthographic scale maps `pixels_per_meter` screen pixels to one
//! meter, so nothing else has to know about pixels.
//!
//! B0001 note: the follow system reads the player `Transform` and writes the camera
//! `Transform`; the `Without<...>` filters prove the two queries are disjoint.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::player::Player;

#[derive(Component)]
pub struct MainCamera {
    /// Exponential smoothing rate, 1/s.
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / tunables.pixels_per_meter.max(1.0),
            ..OrthographicProjection::default_2d()
        }),
        MainCamera { responsiveness: 5.0 },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player(
    time: Res<Time>,
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok((mut tf_cam, cam)) = q_cam.single_mut() else {
        return;
    };

    let alpha = 1.0 - (-cam.responsiveness * time.delta_secs()).exp();
    let target = tf_player.translation.truncate();
    let next = tf_cam.translation.truncate().lerp(target, alpha);
    tf_cam.translation.x = next.x;
    tf_cam.translation.y = next.y;
}
