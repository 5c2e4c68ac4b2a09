//! Tunable gameplay constants.
//!
//! Defaults reproduce the shipped balance. A RON file can override any subset:
//! `$SURVIVORS_TUNABLES` if set, otherwise `tunables.ron` in the working directory.

use std::fmt;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const TUNABLES_ENV: &str = "SURVIVORS_TUNABLES";
pub const TUNABLES_FILE: &str = "tunables.ron";

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Render scale only; simulation units are meters.
    pub pixels_per_meter: f32,
    pub fixed_hz: f64,
    /// Fixed seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Half side of the square the player may walk in.
    pub arena_half_extent: f32,
    /// Half side of the ground plane; enemies beyond it are culled.
    pub ground_half_extent: f32,
    pub player: PlayerTuning,
    pub enemies: EnemyTuning,
    pub director: DirectorTuning,
    pub caster: CasterTuning,
    pub striker: StrikerTuning,
    pub pickups: PickupTuning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub speed: f32,
    pub collect_range: f32,
    pub first_threshold: u32,
    pub threshold_growth: f64,
    pub death_grace_secs: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Seconds into the swing when damage lands.
    pub strike_at: f32,
    /// Seconds into the swing when the enemy recovers.
    pub recover_at: f32,
    /// Length of the death clip; removal waits half of it. `None` removes at once.
    pub death_clip_secs: Option<f32>,
    pub elite_health_mult: f32,
    pub elite_speed_mult: f32,
    pub elite_damage_mult: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorTuning {
    pub spawn_cooldown: f32,
    pub spawn_distance: f32,
    pub spawn_radius: f32,
    pub min_spacing: f32,
    pub max_attempts: u32,
    pub elite_interval: f32,
    pub ratchet_min_secs: f32,
    pub ratchet_max_secs: f32,
    pub ratchet_health: f32,
    pub ratchet_speed: f32,
    pub ratchet_damage: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CasterTuning {
    pub fire_interval: f32,
    pub min_fire_interval: f32,
    pub range: f32,
    pub bolt_speed: f32,
    pub damage: f32,
    pub max_projectiles: u32,
    pub max_level: u32,
    pub bolt_ttl: f32,
    pub bolt_radius: f32,
    /// Bolts further than this from the origin are discarded.
    pub world_radius: f32,
    pub base_spread_deg: f32,
    pub spread_step_deg: f32,
    pub max_spread_deg: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrikerTuning {
    pub damage: f32,
    pub radius: f32,
    pub rotation_speed: f32,
    pub max_orbs: u32,
    /// Minimum seconds between two hits of the same orb on the same enemy.
    pub hit_interval: f32,
    pub knockback: f32,
    pub orb_radius: f32,
    /// Multiplier applied per pending boost and per repeat upgrade.
    pub growth: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub base_xp: u32,
    /// Extra fraction of `base_xp` per whole minute survived.
    pub per_minute_bonus: f32,
    pub elite_mult: u32,
    pub poll_interval: f32,
    pub home_speed: f32,
    pub home_accel: f32,
    pub collect_distance: f32,
    pub radius: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 32.0,
            fixed_hz: 60.0,
            seed: None,
            arena_half_extent: 50.0,
            ground_half_extent: 200.0,
            player: PlayerTuning::default(),
            enemies: EnemyTuning::default(),
            director: DirectorTuning::default(),
            caster: CasterTuning::default(),
            striker: StrikerTuning::default(),
            pickups: PickupTuning::default(),
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 2.0,
            collect_range: 1.5,
            first_threshold: 50,
            threshold_growth: 1.2,
            death_grace_secs: 2.0,
            radius: 0.5,
        }
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            health: 20.0,
            speed: 2.0,
            damage: 10.0,
            attack_range: 0.7,
            attack_cooldown: 2.0,
            strike_at: 1.0,
            recover_at: 1.2,
            death_clip_secs: Some(1.2),
            elite_health_mult: 6.0,
            elite_speed_mult: 1.5,
            elite_damage_mult: 2.0,
            radius: 0.4,
        }
    }
}

impl Default for DirectorTuning {
    fn default() -> Self {
        Self {
            spawn_cooldown: 2.0,
            spawn_distance: 18.0,
            spawn_radius: 19.0,
            min_spacing: 2.0,
            max_attempts: 10,
            elite_interval: 180.0,
            ratchet_min_secs: 30.0,
            ratchet_max_secs: 60.0,
            ratchet_health: 5.0,
            ratchet_speed: 0.2,
            ratchet_damage: 2.0,
        }
    }
}

impl Default for CasterTuning {
    fn default() -> Self {
        Self {
            fire_interval: 1.8,
            min_fire_interval: 0.1,
            range: 10.0,
            bolt_speed: 15.0,
            damage: 10.0,
            max_projectiles: 8,
            max_level: 16,
            bolt_ttl: 3.5,
            bolt_radius: 0.2,
            world_radius: 400.0,
            base_spread_deg: 10.0,
            spread_step_deg: 10.0,
            max_spread_deg: 60.0,
        }
    }
}

impl Default for StrikerTuning {
    fn default() -> Self {
        Self {
            damage: 5.0,
            radius: 1.5,
            rotation_speed: 1.0,
            max_orbs: 6,
            hit_interval: 0.25,
            knockback: 0.25,
            orb_radius: 0.3,
            growth: 1.1,
        }
    }
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            base_xp: 50,
            per_minute_bonus: 0.5,
            elite_mult: 5,
            poll_interval: 0.2,
            home_speed: 10.0,
            home_accel: 15.0,
            collect_distance: 0.5,
            radius: 0.25,
        }
    }
}

#[derive(Debug)]
pub enum TunablesError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: ron::error::SpannedError },
    Invalid(String),
}

impl fmt::Display for TunablesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TunablesError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            TunablesError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            TunablesError::Invalid(reason) => write!(f, "invalid tunables: {reason}"),
        }
    }
}

impl std::error::Error for TunablesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TunablesError::Io { source, .. } => Some(source),
            TunablesError::Parse { source, .. } => Some(source),
            TunablesError::Invalid(_) => None,
        }
    }
}

impl Tunables {
    pub fn file_path() -> PathBuf {
        std::env::var_os(TUNABLES_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(TUNABLES_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, TunablesError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TunablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| TunablesError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Load from file, or fall back to defaults.
    ///
    /// A missing file is normal. A broken one is logged and ignored.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(tunables) => {
                info!("Loaded tunables from {}", path.display());
                tunables
            }
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), TunablesError> {
        fn positive(name: &str, v: f32) -> Result<(), TunablesError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TunablesError::Invalid(format!("{name} must be > 0, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f32) -> Result<(), TunablesError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(TunablesError::Invalid(format!("{name} must be >= 0, got {v}")))
            }
        }

        positive("pixels_per_meter", self.pixels_per_meter)?;
        if !(self.fixed_hz.is_finite() && self.fixed_hz > 0.0) {
            return Err(TunablesError::Invalid(format!(
                "fixed_hz must be > 0, got {}",
                self.fixed_hz
            )));
        }
        positive("arena_half_extent", self.arena_half_extent)?;
        if self.ground_half_extent < self.arena_half_extent {
            return Err(TunablesError::Invalid(
                "ground_half_extent must not be smaller than arena_half_extent".into(),
            ));
        }

        let p = &self.player;
        positive("player.max_health", p.max_health)?;
        non_negative("player.speed", p.speed)?;
        non_negative("player.collect_range", p.collect_range)?;
        if p.first_threshold == 0 {
            return Err(TunablesError::Invalid("player.first_threshold must be > 0".into()));
        }
        if !(p.threshold_growth >= 1.0) {
            return Err(TunablesError::Invalid("player.threshold_growth must be >= 1".into()));
        }
        non_negative("player.death_grace_secs", p.death_grace_secs)?;
        positive("player.radius", p.radius)?;

        let e = &self.enemies;
        positive("enemies.health", e.health)?;
        non_negative("enemies.speed", e.speed)?;
        non_negative("enemies.damage", e.damage)?;
        non_negative("enemies.attack_range", e.attack_range)?;
        non_negative("enemies.attack_cooldown", e.attack_cooldown)?;
        if !(0.0..=e.recover_at).contains(&e.strike_at) {
            return Err(TunablesError::Invalid(
                "enemies.strike_at must lie within [0, recover_at]".into(),
            ));
        }
        if let Some(clip) = e.death_clip_secs {
            non_negative("enemies.death_clip_secs", clip)?;
        }
        positive("enemies.radius", e.radius)?;

        let d = &self.director;
        positive("director.spawn_cooldown", d.spawn_cooldown)?;
        non_negative("director.spawn_distance", d.spawn_distance)?;
        non_negative("director.spawn_radius", d.spawn_radius)?;
        non_negative("director.min_spacing", d.min_spacing)?;
        positive("director.elite_interval", d.elite_interval)?;
        positive("director.ratchet_min_secs", d.ratchet_min_secs)?;
        if d.ratchet_max_secs < d.ratchet_min_secs {
            return Err(TunablesError::Invalid(
                "director.ratchet_max_secs must be >= ratchet_min_secs".into(),
            ));
        }

        let c = &self.caster;
        positive("caster.fire_interval", c.fire_interval)?;
        positive("caster.min_fire_interval", c.min_fire_interval)?;
        positive("caster.bolt_speed", c.bolt_speed)?;
        positive("caster.bolt_ttl", c.bolt_ttl)?;
        positive("caster.bolt_radius", c.bolt_radius)?;
        positive("caster.world_radius", c.world_radius)?;
        if c.max_projectiles == 0 || c.max_level == 0 {
            return Err(TunablesError::Invalid(
                "caster.max_projectiles and caster.max_level must be > 0".into(),
            ));
        }

        let s = &self.striker;
        positive("striker.radius", s.radius)?;
        positive("striker.orb_radius", s.orb_radius)?;
        positive("striker.hit_interval", s.hit_interval)?;
        positive("striker.growth", s.growth)?;
        if s.max_orbs == 0 {
            return Err(TunablesError::Invalid("striker.max_orbs must be > 0".into()));
        }

        let k = &self.pickups;
        positive("pickups.poll_interval", k.poll_interval)?;
        non_negative("pickups.home_speed", k.home_speed)?;
        non_negative("pickups.home_accel", k.home_accel)?;
        positive("pickups.collect_distance", k.collect_distance)?;
        positive("pickups.radius", k.radius)?;

        Ok(())
    }
}
