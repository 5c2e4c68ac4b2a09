//! Player plugin.
//!
//! Pipeline:
//! - Update: sample WASD into the `PlayerInput` resource, tick the onboarding gate
//! - FixedUpdate (`SimSet::Player`): velocity + facing from input, clamp to the arena
//! - FixedUpdate (`SimSet::Deaths`): death grace, then permanent game over
//!
//! Movement only checks the pause flag. While guided, physics time is frozen, so input turns
//! the player in place without moving it.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::{GameState, SimClock, SimContext, SimSet};
use crate::common::tunables::Tunables;
use crate::plugins::combat::{AnimTag, Facing, Health};
use crate::plugins::progression::Progression;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Stats the upgrade system may raise.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerAttributes {
    pub speed: f32,
    pub collect_range: f32,
}

#[derive(Component, Debug, Clone)]
pub enum PlayerLife {
    Alive,
    Dying { grace: Timer },
    Gone,
}

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct GameOver {
    pub survived_secs: f32,
}

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
}

/// Which of W, A, S, D have been pressed since the run started.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct Onboarding {
    pressed: [bool; 4],
}

const ONBOARDING_KEYS: [KeyCode; 4] = [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD];

impl Onboarding {
    /// Record a key. Returns true once all four have been seen.
    pub fn press(&mut self, key: KeyCode) -> bool {
        if let Some(i) = ONBOARDING_KEYS.iter().position(|k| *k == key) {
            self.pressed[i] = true;
        }
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.pressed.iter().all(|p| *p)
    }
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .init_resource::<Onboarding>()
        .add_message::<GameOver>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, (gather_input, track_onboarding))
        .add_systems(
            FixedUpdate,
            (apply_movement, clamp_to_arena)
                .chain()
                .in_set(SimSet::Player),
        )
        .add_systems(FixedUpdate, player_death.in_set(SimSet::Deaths));
}

pub fn player_bundle(tunables: &Tunables, position: Vec2) -> impl Bundle {
    let p = &tunables.player;
    let layers = CollisionLayers::new(Layer::Player, [Layer::Enemy, Layer::Pickup]);

    (
        (
            Name::new("Player"),
            Player,
            PlayerAttributes { speed: p.speed, collect_range: p.collect_range },
            Health::new(p.max_health),
            Progression::new(p.first_threshold, p.threshold_growth),
            Facing::default(),
            AnimTag::Idle,
            PlayerLife::Alive,
        ),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(p.radius * 2.0)),
            ..default()
        },
        Transform::from_translation(position.extend(1.0)),
        RigidBody::Kinematic,
        Collider::circle(p.radius),
        layers,
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    )
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn(player_bundle(&tunables, Vec2::ZERO));
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        return;
    };
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = axis.normalize_or_zero();
}

fn track_onboarding(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut onboarding: ResMut<Onboarding>,
    mut ctx: ResMut<SimContext>,
) {
    if !ctx.is_guided() {
        return;
    }
    let Some(keys) = keys else {
        return;
    };
    let mut complete = onboarding.is_complete();
    for key in keys.get_just_pressed() {
        complete = onboarding.press(*key);
    }
    if complete {
        ctx.set_guided(false);
        info!("Onboarding complete, starting run");
    }
}

fn apply_movement(
    input: Res<PlayerInput>,
    mut q_player: Query<
        (&PlayerAttributes, &PlayerLife, &mut LinearVelocity, &mut Facing, &mut AnimTag),
        With<Player>,
    >,
) {
    let Ok((attrs, life, mut vel, mut facing, mut anim)) = q_player.single_mut() else {
        return;
    };
    if !matches!(life, PlayerLife::Alive) {
        vel.0 = Vec2::ZERO;
        return;
    }

    vel.0 = input.move_axis * attrs.speed;
    if let Some(f) = Facing::towards(input.move_axis) {
        *facing = f;
        *anim = AnimTag::Run;
    } else {
        *anim = AnimTag::Idle;
    }
}

fn clamp_to_arena(tunables: Res<Tunables>, mut q_player: Query<&mut Transform, With<Player>>) {
    let Ok(mut tf) = q_player.single_mut() else {
        return;
    };
    let limit = tunables.arena_half_extent;
    let clamped = tf.translation.truncate().clamp(Vec2::splat(-limit), Vec2::splat(limit));
    if clamped != tf.translation.truncate() {
        tf.translation.x = clamped.x;
        tf.translation.y = clamped.y;
    }
}

fn player_death(
    time: Res<Time>,
    tunables: Res<Tunables>,
    clock: Res<SimClock>,
    mut ctx: ResMut<SimContext>,
    mut game_over: MessageWriter<GameOver>,
    mut q_player: Query<(&Health, &mut PlayerLife, &mut LinearVelocity, &mut AnimTag), With<Player>>,
) {
    let Ok((health, mut life, mut vel, mut anim)) = q_player.single_mut() else {
        return;
    };

    if matches!(*life, PlayerLife::Alive) {
        if health.is_alive() {
            return;
        }
        info!("Player defeated after {:.1}s", clock.elapsed_secs());
        vel.0 = Vec2::ZERO;
        *anim = AnimTag::Death;
        *life = PlayerLife::Dying {
            grace: Timer::from_seconds(tunables.player.death_grace_secs, TimerMode::Once),
        };
    }

    let PlayerLife::Dying { grace } = &mut *life else {
        return;
    };
    grace.tick(time.delta());
    if grace.is_finished() {
        *life = PlayerLife::Gone;
        ctx.end_game();
        game_over.write(GameOver { survived_secs: clock.elapsed_secs() });
        info!("Game over");
    }
}
