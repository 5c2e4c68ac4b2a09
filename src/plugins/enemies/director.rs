//! Spawn director: when, where and what enemies spawn, plus the difficulty ratchet.
//!
//! ```text
//! run_director (SimSet::Director), per update:
//!   1. ratchet   base stats += increment every 30..60 s (re-rolled each time)
//!   2. elite     every elite_interval, spawn base.elite()
//!   3. regular   every spawn_cooldown, spawn base
//!
//! cull_enemies (SimSet::Enemies, after the controller):
//!   off the ground plane -> removed, no death processing
//!   dead + grace done    -> removed, kill counted
//! ```

use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::tunables::{DirectorTuning, Tunables};
use crate::plugins::combat::Health;
use crate::plugins::player::Player;

use super::{Enemy, EnemyStatBundle, EnemyState, PendingDespawn, Rank, enemy_bundle};

/// Live enemies in spawn order, plus the kill counter.
#[derive(Resource, Debug, Default, Clone)]
pub struct EnemyRoster {
    members: Vec<Entity>,
    kills: u32,
}

impl EnemyRoster {
    pub fn add(&mut self, e: Entity) {
        self.members.push(e);
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }
}

/// Which spawns an update owes, in spawn order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirectorTick {
    pub ratcheted: bool,
    pub elite: bool,
    pub regular: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct SpawnDirector {
    spawn_timer: f32,
    elite_timer: f32,
    ratchet_timer: f32,
    next_ratchet: f32,
    base: EnemyStatBundle,
}

impl SpawnDirector {
    pub fn new(tunables: &Tunables, rng: &mut SimRng) -> Self {
        let d = &tunables.director;
        Self {
            spawn_timer: 0.0,
            elite_timer: 0.0,
            ratchet_timer: 0.0,
            next_ratchet: rng.range(d.ratchet_min_secs, d.ratchet_max_secs),
            base: EnemyStatBundle::base(&tunables.enemies),
        }
    }

    pub fn base_stats(&self) -> EnemyStatBundle {
        self.base
    }

    pub fn next_ratchet_secs(&self) -> f32 {
        self.next_ratchet
    }

    /// Advance all timers by `dt`.
    pub fn tick(&mut self, dt: f32, tuning: &DirectorTuning, rng: &mut SimRng) -> DirectorTick {
        let mut out = DirectorTick::default();

        self.ratchet_timer += dt;
        if self.ratchet_timer >= self.next_ratchet {
            self.ratchet_timer = 0.0;
            self.next_ratchet = rng.range(tuning.ratchet_min_secs, tuning.ratchet_max_secs);
            self.base.health += tuning.ratchet_health;
            self.base.speed += tuning.ratchet_speed;
            self.base.damage += tuning.ratchet_damage;
            out.ratcheted = true;
        }

        self.elite_timer += dt;
        if self.elite_timer >= tuning.elite_interval {
            self.elite_timer = 0.0;
            out.elite = true;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= tuning.spawn_cooldown {
            self.spawn_timer = 0.0;
            out.regular = true;
        }

        out
    }
}

/// One uniform sample on the spawn annulus around `center`.
pub fn sample_annulus(center: Vec2, tuning: &DirectorTuning, rng: &mut SimRng) -> Vec2 {
    let angle = rng.angle();
    let dist = rng.range(tuning.spawn_distance, tuning.spawn_distance + tuning.spawn_radius);
    center + Vec2::from_angle(angle) * dist
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSite {
    pub position: Vec2,
    /// False when every attempt was too crowded and the unchecked fallback was used.
    pub spaced: bool,
}

/// First annulus sample at least `min_spacing` from every occupied point, else one unchecked sample.
pub fn find_spawn_position(
    center: Vec2,
    occupied: &[Vec2],
    tuning: &DirectorTuning,
    rng: &mut SimRng,
) -> SpawnSite {
    for _ in 0..tuning.max_attempts {
        let candidate = sample_annulus(center, tuning, rng);
        if occupied.iter().all(|p| p.distance(candidate) >= tuning.min_spacing) {
            return SpawnSite { position: candidate, spaced: true };
        }
    }
    SpawnSite { position: sample_annulus(center, tuning, rng), spaced: false }
}

pub(super) fn reset_director(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
) {
    commands.insert_resource(SpawnDirector::new(&tunables, &mut rng));
    commands.insert_resource(EnemyRoster::default());
}

pub(super) fn run_director(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut director: ResMut<SpawnDirector>,
    mut roster: ResMut<EnemyRoster>,
    q_player: Query<&Transform, With<Player>>,
    q_enemies: Query<(&Transform, &Health), With<Enemy>>,
) {
    let Ok(player_tf) = q_player.single() else {
        return;
    };
    let center = player_tf.translation.truncate();

    let tick = director.tick(time.delta_secs(), &tunables.director, &mut rng);
    if tick.ratcheted {
        let base = director.base_stats();
        info!(
            "Difficulty up: health {:.0}, speed {:.1}, damage {:.0}",
            base.health, base.speed, base.damage
        );
    }
    if !tick.elite && !tick.regular {
        return;
    }

    let mut occupied: Vec<Vec2> = roster
        .iter()
        .filter_map(|e| q_enemies.get(e).ok())
        .filter(|(_, hp)| hp.is_alive())
        .map(|(tf, _)| tf.translation.truncate())
        .collect();

    let base = director.base_stats();
    let orders = [
        (tick.elite, Rank::Elite, base.elite(&tunables.enemies)),
        (tick.regular, Rank::Regular, base),
    ];
    for (due, rank, stats) in orders {
        if !due {
            continue;
        }
        let site = find_spawn_position(center, &occupied, &tunables.director, &mut rng);
        if !site.spaced {
            debug!("No spaced spawn site after {} attempts", tunables.director.max_attempts);
        }
        if rank == Rank::Elite {
            info!("Elite enemy spawned at {:?}", site.position);
        }
        let e = commands
            .spawn(enemy_bundle(&tunables.enemies, stats, site.position, rank))
            .id();
        roster.add(e);
        occupied.push(site.position);
    }
}

pub(super) fn cull_enemies(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut roster: ResMut<EnemyRoster>,
    q: Query<(&Transform, &EnemyState), (With<Enemy>, Without<PendingDespawn>)>,
) {
    let limit = tunables.ground_half_extent;
    let mut kills = 0;

    roster.members.retain(|&e| {
        let Ok((tf, state)) = q.get(e) else {
            return false;
        };
        let pos = tf.translation.truncate();
        let off_ground = pos.x.abs() > limit || pos.y.abs() > limit;
        if off_ground {
            commands.entity(e).insert(PendingDespawn);
            return false;
        }
        if state.ready_for_removal() {
            kills += 1;
            commands.entity(e).insert(PendingDespawn);
            return false;
        }
        true
    });

    roster.kills += kills;
}
