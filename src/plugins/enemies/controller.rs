//! Per-enemy chase/attack state machine.
//!
//! - Chasing, out of range: steer straight at the player, face the movement direction.
//! - Chasing, in range, cooling down: stand still facing the player.
//! - In range with the attack timer at or past the cooldown: start a swing. The swing lands at
//!   `strike_at` if the enemy is still alive and ends at `recover_at`, resetting the timer.
//! - Dead: hold still and run down the removal grace.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::{EnemyTuning, Tunables};
use crate::plugins::combat::{AnimTag, Facing, Health};
use crate::plugins::player::Player;

use super::{AttackTimer, Enemy, EnemyState, EnemyStats, PendingDespawn};

/// What one controller step decided for one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub velocity: Vec2,
    pub facing: Option<Facing>,
    pub anim: Option<AnimTag>,
    /// Damage to apply to the player this step.
    pub strike: Option<f32>,
}

/// Advance one enemy by `dt`.
pub fn step_enemy(
    state: &mut EnemyState,
    attack_timer: &mut AttackTimer,
    stats: &EnemyStats,
    alive: bool,
    to_player: Vec2,
    dt: f32,
    tuning: &EnemyTuning,
) -> Step {
    let mut step = Step { velocity: Vec2::ZERO, facing: None, anim: None, strike: None };

    if let EnemyState::Dead { grace } = &mut *state {
        grace.tick(std::time::Duration::from_secs_f32(dt.max(0.0)));
        return step;
    }

    attack_timer.0 += dt;

    let recovered = match &mut *state {
        EnemyState::Attacking { elapsed, struck } => {
            *elapsed += dt;
            if !*struck && *elapsed >= tuning.strike_at {
                *struck = true;
                if alive {
                    step.strike = Some(stats.damage);
                }
            }
            Some(*elapsed >= tuning.recover_at)
        }
        _ => None,
    };
    match recovered {
        Some(true) => {
            attack_timer.0 = 0.0;
            *state = EnemyState::Chasing;
            return step;
        }
        Some(false) => return step,
        None => {}
    }

    let distance = to_player.length();
    let toward = Facing::towards(to_player);

    if distance <= stats.attack_range {
        step.facing = toward;
        if attack_timer.0 >= stats.attack_cooldown {
            *state = EnemyState::Attacking { elapsed: 0.0, struck: false };
            step.anim = Some(AnimTag::Attack);
        } else {
            step.anim = Some(AnimTag::Idle);
        }
    } else {
        step.velocity = to_player.normalize_or_zero() * stats.speed;
        step.facing = toward;
        step.anim = Some(AnimTag::Run);
    }

    step
}

pub(super) fn update_enemies(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q_player: Query<(&Transform, &mut Health), (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<
        (
            &Transform,
            &EnemyStats,
            &Health,
            &mut EnemyState,
            &mut AttackTimer,
            &mut LinearVelocity,
            &mut Facing,
            &mut AnimTag,
        ),
        (With<Enemy>, Without<Player>, Without<PendingDespawn>),
    >,
) {
    let Ok((player_tf, mut player_health)) = q_player.single_mut() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();
    let dt = time.delta_secs();

    for (tf, stats, health, mut state, mut timer, mut vel, mut facing, mut anim) in &mut q_enemies {
        let to_player = player_pos - tf.translation.truncate();
        let step = step_enemy(
            &mut state,
            &mut timer,
            stats,
            health.is_alive(),
            to_player,
            dt,
            &tunables.enemies,
        );

        vel.0 = step.velocity;
        if let Some(f) = step.facing {
            *facing = f;
        }
        if let Some(a) = step.anim {
            *anim = a;
        }
        if let Some(damage) = step.strike {
            player_health.apply_damage(damage);
        }
    }
}
