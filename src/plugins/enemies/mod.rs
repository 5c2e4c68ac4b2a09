//! Enemies plugin: spawn director, per-enemy controller and the two-phase death.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED (ECS)
//! ---------------------------
//! 1) FACTS live in components/resources:
//!    - `Health`, `EnemyStats`, `EnemyState`, `AttackTimer` per enemy.
//!    - `SpawnDirector` (timers + current base stats) and `EnemyRoster` (who is alive, kill count).
//!
//! 2) RULES mutate facts in fixed places, in `SimSet` order:
//!    - Director: ratchet, elite spawn, regular spawn (`director::run_director`).
//!    - Enemies: chase/attack/dead state machine, then culling (`controller`, `director`).
//!    - Deaths: health at or below zero flips an enemy to `Dead` exactly once and writes
//!      `EnemyDied` (`enemy_death_trigger`).
//!
//! 3) STRUCTURAL CHANGES are deferred:
//!    - culling marks `PendingDespawn`; `despawn_marked_enemies` removes them in PostUpdate,
//!      outside the fixed step.
//!
//! The roster is the only list of enemies that gameplay iterates. It is a `Vec` so scans run in
//! spawn order and ties resolve the same way every run.

pub mod controller;
pub mod director;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::{GameState, SimSet};
use crate::common::tunables::{EnemyTuning, Tunables};
use crate::plugins::combat::{AnimTag, Facing, Health};

pub use director::{EnemyRoster, SpawnDirector};

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rank {
    #[default]
    Regular,
    Elite,
}

impl Rank {
    pub fn body_radius(self, tuning: &EnemyTuning) -> f32 {
        match self {
            Rank::Regular => tuning.radius,
            Rank::Elite => tuning.radius * 1.25,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
}

/// Seconds since the last swing finished. Accumulates every enemy update.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct AttackTimer(pub f32);

/// Enemy state machine: `Chasing <-> Attacking -> Dead`.
#[derive(Component, Debug, Clone)]
pub enum EnemyState {
    Chasing,
    /// Facing is locked for the whole swing.
    Attacking { elapsed: f32, struck: bool },
    /// Collision is already off. `grace` gates removal.
    Dead { grace: Timer },
}

impl EnemyState {
    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self, EnemyState::Dead { .. })
    }

    /// Dead and done with the death clip.
    #[inline]
    pub fn ready_for_removal(&self) -> bool {
        matches!(self, EnemyState::Dead { grace } if grace.is_finished())
    }
}

/// Marker: enemy should be removed from the world.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct EnemyDied {
    pub entity: Entity,
    pub position: Vec2,
    pub rank: Rank,
}

/// Health/speed/damage an enemy is created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStatBundle {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
}

impl EnemyStatBundle {
    pub fn base(tuning: &EnemyTuning) -> Self {
        Self { health: tuning.health, speed: tuning.speed, damage: tuning.damage }
    }

    pub fn elite(self, tuning: &EnemyTuning) -> Self {
        Self {
            health: self.health * tuning.elite_health_mult,
            speed: self.speed * tuning.elite_speed_mult,
            damage: self.damage * tuning.elite_damage_mult,
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<EnemyDied>()
        .init_resource::<EnemyRoster>()
        .add_systems(OnEnter(GameState::InGame), director::reset_director)
        .add_systems(FixedUpdate, director::run_director.in_set(SimSet::Director))
        .add_systems(
            FixedUpdate,
            (controller::update_enemies, director::cull_enemies)
                .chain()
                .in_set(SimSet::Enemies),
        )
        .add_systems(FixedUpdate, enemy_death_trigger.in_set(SimSet::Deaths))
        .add_systems(
            PostUpdate,
            despawn_marked_enemies.run_if(in_state(GameState::InGame)),
        );
}

/// Collision layers for an enemy that should no longer interact with anything.
///
/// Membership stays "Enemy"; the empty filter stops new contacts immediately.
#[inline]
fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Enemy,
        [Layer::Player, Layer::Enemy, Layer::PlayerBolt, Layer::Striker],
    )
}

pub fn enemy_bundle(
    tuning: &EnemyTuning,
    stats: EnemyStatBundle,
    position: Vec2,
    rank: Rank,
) -> impl Bundle {
    let radius = rank.body_radius(tuning);
    let color = match rank {
        Rank::Regular => Color::srgb(0.9, 0.25, 0.25),
        Rank::Elite => Color::srgb(0.95, 0.75, 0.15),
    };

    (
        (
            Name::new(match rank {
                Rank::Regular => "Enemy",
                Rank::Elite => "EliteEnemy",
            }),
            Enemy,
            rank,
            EnemyStats {
                speed: stats.speed,
                damage: stats.damage,
                attack_range: tuning.attack_range,
                attack_cooldown: tuning.attack_cooldown,
            },
            Health::new(stats.health),
            EnemyState::Chasing,
            AttackTimer::default(),
            Facing::default(),
            AnimTag::Run,
        ),
        Sprite {
            color,
            custom_size: Some(Vec2::splat(radius * 2.0)),
            ..default()
        },
        Transform::from_translation(position.extend(1.0)),
        RigidBody::Dynamic,
        Collider::circle(radius),
        LockedAxes::ROTATION_LOCKED,
        enemy_layers(),
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    )
}

/// Flip enemies whose health ran out to `Dead`.
///
/// Runs after every damage source in the tick, so an enemy killed twice in one tick still
/// dies once and leaves one pickup.
fn enemy_death_trigger(
    tunables: Res<Tunables>,
    mut died: MessageWriter<EnemyDied>,
    mut q: Query<
        (
            Entity,
            &Health,
            &Rank,
            &Transform,
            &mut EnemyState,
            &mut CollisionLayers,
            &mut LinearVelocity,
            &mut AnimTag,
        ),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (e, hp, rank, tf, mut state, mut layers, mut vel, mut anim) in &mut q {
        if state.is_dead() || hp.is_alive() {
            continue;
        }

        let grace = tunables.enemies.death_clip_secs.map_or(0.0, |clip| clip * 0.5);
        *state = EnemyState::Dead {
            grace: Timer::from_seconds(grace, TimerMode::Once),
        };
        *layers = non_interacting_enemy_layers();
        vel.0 = Vec2::ZERO;
        *anim = AnimTag::Death;

        if *rank == Rank::Elite {
            info!("Elite enemy defeated");
        }
        died.write(EnemyDied {
            entity: e,
            position: tf.translation.truncate(),
            rank: *rank,
        });
    }
}

/// Despawn enemies marked for removal.
fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
