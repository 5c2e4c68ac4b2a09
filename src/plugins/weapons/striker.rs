//! Orbiting striker: orb ring entities, orbit motion and rate-limited contact damage.
//!
//! Orbs damage on contact start and keep damaging while the contact persists, at most once per
//! `hit_interval` for each (orb, enemy) pair. Every hit shoves the enemy `knockback` units
//! directly away from the player.

use avian2d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::{GameState, SimClock};
use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioCue;
use crate::plugins::combat::Health;
use crate::plugins::enemies::Enemy;
use crate::plugins::physics::{ContactEvent, ReportContactStay};
use crate::plugins::player::Player;

use super::Arsenal;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orb {
    pub index: u32,
}

/// Last hit time (sim clock seconds) per (orb, enemy) pair.
#[derive(Resource, Debug, Default, Clone)]
pub struct StrikerHits {
    last: HashMap<(Entity, Entity), f32>,
}

impl StrikerHits {
    /// Record a hit at `now` unless the pair hit less than `interval` ago.
    pub fn try_hit(&mut self, orb: Entity, enemy: Entity, now: f32, interval: f32) -> bool {
        match self.last.get(&(orb, enemy)) {
            Some(&t) if now - t < interval => false,
            _ => {
                self.last.insert((orb, enemy), now);
                true
            }
        }
    }

    /// Drop pairs that can no longer be rate limited.
    pub fn forget_before(&mut self, cutoff: f32) {
        self.last.retain(|_, t| *t >= cutoff);
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }
}

/// Rebuild the ring when the orb count changed.
pub(super) fn sync_striker_ring(
    mut commands: Commands,
    tunables: Res<Tunables>,
    arsenal: Res<Arsenal>,
    mut hits: ResMut<StrikerHits>,
    q_player: Query<&Transform, With<Player>>,
    q_orbs: Query<Entity, With<Orb>>,
) {
    let Some(striker) = arsenal.striker.as_ref() else {
        return;
    };
    if q_orbs.iter().count() == striker.orb_count as usize {
        return;
    }
    let Ok(player_tf) = q_player.single() else {
        return;
    };

    for e in &q_orbs {
        commands.entity(e).despawn();
    }
    hits.clear();

    let center = player_tf.translation.truncate();
    let r = tunables.striker.orb_radius;
    for index in 0..striker.orb_count {
        commands.spawn((
            Name::new(format!("Orb{index}")),
            Orb { index },
            Sprite {
                color: Color::srgb(0.55, 0.95, 1.0),
                custom_size: Some(Vec2::splat(r * 2.0)),
                ..default()
            },
            Transform::from_translation((center + striker.orb_offset(index)).extend(2.0)),
            RigidBody::Kinematic,
            Collider::circle(r),
            Sensor,
            CollisionLayers::new(Layer::Striker, [Layer::Enemy]),
            CollisionEventsEnabled,
            CollidingEntities::default(),
            ReportContactStay,
            DespawnOnExit(GameState::InGame),
        ));
    }
    debug!("Striker ring rebuilt with {} orbs", striker.orb_count);
}

pub(super) fn orbit_striker(
    time: Res<Time>,
    mut arsenal: ResMut<Arsenal>,
    q_player: Query<&Transform, (With<Player>, Without<Orb>)>,
    mut q_orbs: Query<(&Orb, &mut Transform), Without<Player>>,
) {
    let Some(striker) = arsenal.striker.as_mut() else {
        return;
    };
    let Ok(player_tf) = q_player.single() else {
        return;
    };

    striker.advance(time.delta_secs());
    let center = player_tf.translation.truncate();
    for (orb, mut tf) in &mut q_orbs {
        let p = center + striker.orb_offset(orb.index);
        tf.translation.x = p.x;
        tf.translation.y = p.y;
    }
}

pub(super) fn resolve_striker_hits(
    tunables: Res<Tunables>,
    clock: Res<SimClock>,
    arsenal: Res<Arsenal>,
    mut hits: ResMut<StrikerHits>,
    mut contacts: MessageReader<ContactEvent>,
    mut cues: MessageWriter<AudioCue>,
    q_orbs: Query<(), With<Orb>>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<(&mut Health, &mut Transform), (With<Enemy>, Without<Player>)>,
) {
    let Some(striker) = arsenal.striker.as_ref() else {
        contacts.clear();
        return;
    };
    let Ok(player_tf) = q_player.single() else {
        contacts.clear();
        return;
    };
    let center = player_tf.translation.truncate();
    let now = clock.elapsed_secs();
    let interval = tunables.striker.hit_interval;

    for ev in contacts.read() {
        let Some((orb, other)) = ev.split(|e| q_orbs.contains(e)) else {
            continue;
        };
        let Ok((mut hp, mut tf)) = q_enemies.get_mut(other) else {
            continue;
        };
        if !hp.is_alive() || !hits.try_hit(orb, other, now, interval) {
            continue;
        }

        hp.apply_damage(striker.damage);
        let away = (tf.translation.truncate() - center).normalize_or_zero();
        tf.translation.x += away.x * tunables.striker.knockback;
        tf.translation.y += away.y * tunables.striker.knockback;
        cues.write(AudioCue::EnemyHit);
    }

    hits.forget_before(now - interval);
}
