//! Weapons plugin: the bolt caster and the orbiting striker.
//!
//! # Data flow
//! ```text
//!   FixedUpdate, SimSet::Weapons (chained)
//!┌──────────────────────────────────────────────────────────────────────────┐
//!│  (A) Producer: bolts::request_bolts                                      │
//!│      - ticks the caster, picks the nearest alive enemy from the roster   │
//!│      - writes: FireBoltRequest (one per fan direction), AudioCue::Attack │
//!│                                                                          │
//!│  (B) Consumer: bolts::spawn_bolts                                        │
//!│      - reads: FireBoltRequest, spawns kinematic sensor bolts             │
//!│                                                                          │
//!│  (C) bolts::resolve_bolt_hits   ContactEvent -> damage, despawn bolt     │
//!│  (D) bolts::expire_bolts        TTL or out of world -> despawn           │
//!│                                                                          │
//!│  (E) striker::sync_striker_ring     orb entities match the orb count     │
//!│  (F) striker::orbit_striker         orbs follow the player on a circle   │
//!│  (G) striker::resolve_striker_hits  rate-limited damage + knockback      │
//!└──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Arsenal` resource is the single source of truth for weapon stats. Only the upgrade
//! flow mutates it; the systems above only read it (plus the caster's fire timer).

pub mod bolts;
pub mod striker;

use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::state::{GameState, SimSet};
use crate::common::tunables::{CasterTuning, StrikerTuning, Tunables};

/// Forward-firing projectile weapon. Always equipped.
#[derive(Debug, Clone, PartialEq)]
pub struct BoltCaster {
    pub fire_interval: f32,
    pub range: f32,
    pub bolt_speed: f32,
    pub damage: f32,
    pub projectile_count: u32,
    pub max_projectiles: u32,
    pub level: u32,
    pub max_level: u32,
    fire_timer: f32,
}

impl BoltCaster {
    pub fn new(tuning: &CasterTuning) -> Self {
        Self {
            fire_interval: tuning.fire_interval,
            range: tuning.range,
            bolt_speed: tuning.bolt_speed,
            damage: tuning.damage,
            projectile_count: 1,
            max_projectiles: tuning.max_projectiles,
            level: 1,
            max_level: tuning.max_level,
            fire_timer: 0.0,
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.projectile_count >= self.max_projectiles
    }

    /// +1 projectile and +1 level. No-op at the projectile cap.
    pub fn add_projectile(&mut self) -> bool {
        if self.is_maxed() {
            return false;
        }
        self.projectile_count += 1;
        self.level = (self.level + 1).min(self.max_level);
        true
    }

    /// Returns true when a volley is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval {
            self.fire_timer = 0.0;
            true
        } else {
            false
        }
    }
}

/// Ring of orbs circling the player. Exists only after the unlock upgrade.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitStriker {
    pub damage: f32,
    pub radius: f32,
    pub rotation_speed: f32,
    pub orb_count: u32,
    pub max_orbs: u32,
    /// 1 at unlock, +1 per repeat box.
    pub level: u32,
    /// Ring angle, radians.
    pub angle: f32,
}

impl OrbitStriker {
    /// Fresh striker with boosts that were bought before the unlock folded in.
    pub fn unlock(tuning: &StrikerTuning, pending_damage: u32, pending_rotation: u32, phase: f32) -> Self {
        Self {
            damage: tuning.damage * tuning.growth.powi(pending_damage as i32),
            radius: tuning.radius,
            rotation_speed: tuning.rotation_speed * tuning.growth.powi(pending_rotation as i32),
            orb_count: 1,
            max_orbs: tuning.max_orbs,
            level: 1,
            angle: phase,
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.orb_count >= self.max_orbs
    }

    /// Offset of orb `index` from the player.
    pub fn orb_offset(&self, index: u32) -> Vec2 {
        let n = self.orb_count.max(1) as f32;
        let a = self.angle + index as f32 * std::f32::consts::TAU / n;
        Vec2::new(a.cos(), a.sin()) * self.radius
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + self.rotation_speed * dt).rem_euclid(std::f32::consts::TAU);
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Arsenal {
    pub caster: BoltCaster,
    pub striker: Option<OrbitStriker>,
    /// Damage boosts bought while the striker was locked.
    pub pending_damage_boosts: u32,
    /// Fire-rate boosts bought while the striker was locked.
    pub pending_rotation_boosts: u32,
}

impl Arsenal {
    pub fn new(tunables: &Tunables) -> Self {
        Self {
            caster: BoltCaster::new(&tunables.caster),
            striker: None,
            pending_damage_boosts: 0,
            pending_rotation_boosts: 0,
        }
    }
}

impl Default for Arsenal {
    fn default() -> Self {
        Self::new(&Tunables::default())
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Arsenal>()
        .init_resource::<striker::StrikerHits>()
        .add_message::<bolts::FireBoltRequest>()
        .add_systems(OnEnter(GameState::InGame), reset_arsenal)
        .add_systems(
            FixedUpdate,
            (
                bolts::request_bolts,
                bolts::spawn_bolts,
                bolts::resolve_bolt_hits,
                bolts::expire_bolts,
                striker::sync_striker_ring,
                striker::orbit_striker,
                striker::resolve_striker_hits,
            )
                .chain()
                .in_set(SimSet::Weapons),
        );
}

fn reset_arsenal(mut commands: Commands, tunables: Res<Tunables>) {
    commands.insert_resource(Arsenal::new(&tunables));
    commands.insert_resource(striker::StrikerHits::default());
}

/// Random starting phase for a newly unlocked ring.
pub fn random_phase(rng: &mut SimRng) -> f32 {
    rng.angle()
}
