//! XP pickups.
//!
//! Every `EnemyDied` drops one orb at the death position. Orbs sit idle and poll the player
//! distance on a short timer; once the player is within its collect range an orb latches into
//! homing and accelerates toward the player until it is close enough to be collected. Touching
//! the player collects an orb at once, whatever its state.
//!
//! Collection writes `XpCollected` (read by progression) and `AudioCue::Collect`, then despawns
//! the orb. An orb pays out once even when several paths collect it in the same tick.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::{GameState, SimClock, SimSet};
use crate::common::tunables::{PickupTuning, Tunables};
use crate::plugins::audio::AudioCue;
use crate::plugins::enemies::{EnemyDied, Rank};
use crate::plugins::physics::{ContactEvent, ContactPhase};
use crate::plugins::player::{Player, PlayerAttributes};
use crate::plugins::progression::XpCollected;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpOrb {
    pub value: u32,
}

#[derive(Component, Debug, Clone)]
pub enum OrbMotion {
    Idle { poll: Timer },
    Homing { speed: f32 },
}

impl OrbMotion {
    pub fn idle(tuning: &PickupTuning) -> Self {
        OrbMotion::Idle { poll: Timer::from_seconds(tuning.poll_interval, TimerMode::Repeating) }
    }

    #[inline]
    pub fn is_homing(&self) -> bool {
        matches!(self, OrbMotion::Homing { .. })
    }
}

/// XP carried by an orb dropped after `minutes` whole minutes of play.
pub fn orb_value(tuning: &PickupTuning, minutes: u32, rank: Rank) -> u32 {
    let scaled = (tuning.base_xp as f32 * (1.0 + minutes as f32 * tuning.per_minute_bonus)).floor() as u32;
    match rank {
        Rank::Regular => scaled,
        Rank::Elite => scaled.saturating_mul(tuning.elite_mult),
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (drop_orbs, collect_on_contact, home_orbs)
            .chain()
            .in_set(SimSet::Pickups),
    );
}

pub fn orb_bundle(tuning: &PickupTuning, position: Vec2, value: u32, rank: Rank) -> impl Bundle {
    let (color, radius) = match rank {
        Rank::Regular => (Color::srgb(0.35, 0.9, 0.45), tuning.radius),
        Rank::Elite => (Color::srgb(0.3, 0.6, 1.0), tuning.radius * 1.6),
    };

    (
        Name::new("XpOrb"),
        XpOrb { value },
        OrbMotion::idle(tuning),
        Sprite {
            color,
            custom_size: Some(Vec2::splat(radius * 2.0)),
            ..default()
        },
        Transform::from_translation(position.extend(0.5)),
        RigidBody::Kinematic,
        Collider::circle(radius),
        Sensor,
        CollisionLayers::new(Layer::Pickup, [Layer::Player]),
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    )
}

fn drop_orbs(
    mut commands: Commands,
    tunables: Res<Tunables>,
    clock: Res<SimClock>,
    mut died: MessageReader<EnemyDied>,
) {
    for ev in died.read() {
        let value = orb_value(&tunables.pickups, clock.minutes(), ev.rank);
        commands.spawn(orb_bundle(&tunables.pickups, ev.position, value, ev.rank));
        debug!("Dropped {value} xp at {:?}", ev.position);
    }
}

fn collect(
    commands: &mut Commands,
    orb_e: Entity,
    orb: &XpOrb,
    xp: &mut MessageWriter<XpCollected>,
    cues: &mut MessageWriter<AudioCue>,
) {
    xp.write(XpCollected { amount: orb.value });
    cues.write(AudioCue::Collect);
    commands.entity(orb_e).try_despawn();
}

fn collect_on_contact(
    mut commands: Commands,
    mut contacts: MessageReader<ContactEvent>,
    q_orbs: Query<&XpOrb>,
    q_player: Query<(), With<Player>>,
    mut xp: MessageWriter<XpCollected>,
    mut cues: MessageWriter<AudioCue>,
    mut taken: Local<HashSet<Entity>>,
) {
    taken.clear();

    for ev in contacts.read() {
        if ev.phase == ContactPhase::Stay {
            continue;
        }
        let Some((orb_e, other)) = ev.split(|e| q_orbs.contains(e)) else {
            continue;
        };
        if !q_player.contains(other) || !taken.insert(orb_e) {
            continue;
        }
        if let Ok(orb) = q_orbs.get(orb_e) {
            collect(&mut commands, orb_e, orb, &mut xp, &mut cues);
        }
    }
}

fn home_orbs(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    q_player: Query<(&Transform, &PlayerAttributes), (With<Player>, Without<XpOrb>)>,
    mut q_orbs: Query<(Entity, &XpOrb, &mut OrbMotion, &mut Transform), Without<Player>>,
    mut xp: MessageWriter<XpCollected>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Ok((player_tf, attrs)) = q_player.single() else {
        return;
    };
    let t = &tunables.pickups;
    let dt = time.delta_secs();
    let target = player_tf.translation.truncate();

    for (e, orb, mut motion, mut tf) in &mut q_orbs {
        let pos = tf.translation.truncate();
        let dist = pos.distance(target);

        match &mut *motion {
            OrbMotion::Idle { poll } => {
                poll.tick(time.delta());
                if poll.just_finished() && dist <= attrs.collect_range {
                    *motion = OrbMotion::Homing { speed: t.home_speed };
                }
            }
            OrbMotion::Homing { speed } => {
                if dist < t.collect_distance {
                    collect(&mut commands, e, orb, &mut xp, &mut cues);
                    continue;
                }
                let step = (*speed * dt).min(dist);
                let next = pos + (target - pos) / dist * step;
                tf.translation.x = next.x;
                tf.translation.y = next.y;
                *speed += t.home_accel * dt;
            }
        }
    }
}
