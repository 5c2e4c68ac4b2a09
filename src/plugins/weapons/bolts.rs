//! Bolt caster: target selection, fan spread, spawn, hits and expiry.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::{CasterTuning, Tunables};
use crate::plugins::audio::AudioCue;
use crate::plugins::combat::{Facing, Health};
use crate::plugins::enemies::{Enemy, EnemyRoster};
use crate::plugins::physics::{ContactEvent, ContactPhase};
use crate::plugins::player::Player;

use super::Arsenal;

#[derive(Component, Debug, Clone, Copy)]
pub struct Bolt {
    /// Damage at the time of firing.
    pub damage: f32,
}

#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct Lifetime(pub Timer);

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct FireBoltRequest {
    pub origin: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
}

/// Nearest alive enemy to `origin` in roster order. Ties keep the earlier entry.
pub fn nearest_alive(
    origin: Vec2,
    candidates: impl IntoIterator<Item = (Entity, Vec2, bool)>,
) -> Option<(Entity, f32)> {
    let mut best: Option<(Entity, f32)> = None;
    for (e, pos, alive) in candidates {
        if !alive {
            continue;
        }
        let d = origin.distance(pos);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((e, d));
        }
    }
    best
}

/// `count` directions fanned symmetrically around `aim`.
pub fn fan_directions(aim: Vec2, count: u32, tuning: &CasterTuning) -> Vec<Vec2> {
    if count <= 1 {
        return vec![aim];
    }
    let n = count as f32;
    let spread = (tuning.base_spread_deg + tuning.spread_step_deg * (n - 1.0)).min(tuning.max_spread_deg);
    let step = spread / (n - 1.0);
    (0..count)
        .map(|i| {
            let offset = -spread / 2.0 + step * i as f32;
            Vec2::from_angle(offset.to_radians()).rotate(aim)
        })
        .collect()
}

pub(super) fn request_bolts(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut arsenal: ResMut<Arsenal>,
    roster: Res<EnemyRoster>,
    q_player: Query<(&Transform, &Facing), With<Player>>,
    q_enemies: Query<(&Transform, &Health), With<Enemy>>,
    mut requests: MessageWriter<FireBoltRequest>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Ok((player_tf, facing)) = q_player.single() else {
        return;
    };
    if !arsenal.caster.tick(time.delta_secs()) {
        return;
    }

    let caster = &arsenal.caster;
    let origin = player_tf.translation.truncate();
    let candidates = roster.iter().filter_map(|e| {
        q_enemies
            .get(e)
            .ok()
            .map(|(tf, hp)| (e, tf.translation.truncate(), hp.is_alive()))
    });

    let aim = match nearest_alive(origin, candidates) {
        Some((target, d)) if d < caster.range => q_enemies
            .get(target)
            .ok()
            .and_then(|(tf, _)| (tf.translation.truncate() - origin).try_normalize())
            .unwrap_or_else(|| facing.direction()),
        _ => facing.direction(),
    };

    for direction in fan_directions(aim, caster.projectile_count, &tunables.caster) {
        requests.write(FireBoltRequest {
            origin,
            direction,
            speed: caster.bolt_speed,
            damage: caster.damage,
        });
    }
    cues.write(AudioCue::Attack);
}

pub(super) fn spawn_bolts(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut requests: MessageReader<FireBoltRequest>,
) {
    let c = &tunables.caster;
    for req in requests.read() {
        commands.spawn((
            Name::new("Bolt"),
            Bolt { damage: req.damage },
            Lifetime(Timer::from_seconds(c.bolt_ttl, TimerMode::Once)),
            Sprite {
                color: Color::srgb(0.65, 0.55, 1.0),
                custom_size: Some(Vec2::splat(c.bolt_radius * 2.0)),
                ..default()
            },
            Transform::from_translation(req.origin.extend(2.0)),
            RigidBody::Kinematic,
            Collider::circle(c.bolt_radius),
            Sensor,
            CollisionLayers::new(Layer::PlayerBolt, [Layer::Enemy]),
            LinearVelocity(req.direction * req.speed),
            // Avian only reports CollisionStart if one side opts in.
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// First enemy contact consumes the bolt. No penetration.
pub(super) fn resolve_bolt_hits(
    mut commands: Commands,
    mut contacts: MessageReader<ContactEvent>,
    q_bolts: Query<&Bolt>,
    mut q_health: Query<&mut Health, With<Enemy>>,
    mut cues: MessageWriter<AudioCue>,
    mut spent: Local<HashSet<Entity>>,
) {
    spent.clear();

    for ev in contacts.read() {
        if ev.phase == ContactPhase::Stay {
            continue;
        }
        let Some((bolt_e, other)) = ev.split(|e| q_bolts.contains(e)) else {
            continue;
        };
        if spent.contains(&bolt_e) {
            continue;
        }
        let Ok(mut hp) = q_health.get_mut(other) else {
            continue;
        };
        if !hp.is_alive() {
            continue;
        }
        let Ok(bolt) = q_bolts.get(bolt_e) else {
            continue;
        };

        hp.apply_damage(bolt.damage);
        spent.insert(bolt_e);
        commands.entity(bolt_e).try_despawn();
        cues.write(AudioCue::EnemyHit);
        debug!("Bolt hit {other:?} for {}", bolt.damage);
    }
}

pub(super) fn expire_bolts(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q: Query<(Entity, &Transform, &mut Lifetime), With<Bolt>>,
) {
    let limit = tunables.caster.world_radius;
    for (e, tf, mut lifetime) in &mut q {
        lifetime.tick(time.delta());
        if lifetime.is_finished() || tf.translation.truncate().length() > limit {
            commands.entity(e).try_despawn();
        }
    }
}
