//! Upgrade catalog, offer drawing and upgrade effects.

use crate::common::rng::SimRng;
use crate::common::tunables::Tunables;
use crate::plugins::combat::Health;
use crate::plugins::player::PlayerAttributes;
use crate::plugins::weapons::{Arsenal, OrbitStriker, random_phase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Damage,
    MaxHealth,
    Speed,
    CollectRange,
    FireRateBoost,
    MagicStaff,
    MagicBox,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeOption {
    pub title: &'static str,
    pub kind: UpgradeKind,
    pub value: f32,
    pub description: &'static str,
}

pub const CATALOG: [UpgradeOption; 7] = [
    UpgradeOption {
        title: "Sharpened Runes",
        kind: UpgradeKind::Damage,
        value: 0.15,
        description: "+15% damage for every weapon",
    },
    UpgradeOption {
        title: "Vital Draught",
        kind: UpgradeKind::MaxHealth,
        value: 25.0,
        description: "+25 max health and a full heal",
    },
    UpgradeOption {
        title: "Swift Boots",
        kind: UpgradeKind::Speed,
        value: 0.2,
        description: "+20% movement speed",
    },
    UpgradeOption {
        title: "Lodestone",
        kind: UpgradeKind::CollectRange,
        value: 1.0,
        description: "+1 xp pickup range",
    },
    UpgradeOption {
        title: "Quickened Mind",
        kind: UpgradeKind::FireRateBoost,
        value: 0.1,
        description: "Bolts fire faster, orbs spin faster",
    },
    UpgradeOption {
        title: "Magic Staff",
        kind: UpgradeKind::MagicStaff,
        value: 1.0,
        description: "+1 bolt per volley",
    },
    UpgradeOption {
        title: "Magic Box",
        kind: UpgradeKind::MagicBox,
        value: 1.0,
        description: "Unlock the orbiting striker, or add an orb",
    },
];

/// Structurally exhausted options are never offered.
pub fn is_available(kind: UpgradeKind, arsenal: &Arsenal) -> bool {
    match kind {
        UpgradeKind::MagicStaff => !arsenal.caster.is_maxed(),
        UpgradeKind::MagicBox => !arsenal.striker.as_ref().is_some_and(OrbitStriker::is_maxed),
        _ => true,
    }
}

/// Up to `count` distinct options, drawn uniformly without replacement.
pub fn draw_offers(arsenal: &Arsenal, rng: &mut SimRng, count: usize) -> Vec<UpgradeOption> {
    let mut pool: Vec<UpgradeOption> = CATALOG
        .iter()
        .copied()
        .filter(|o| is_available(o.kind, arsenal))
        .collect();

    let mut picks = Vec::with_capacity(count.min(pool.len()));
    while picks.len() < count && !pool.is_empty() {
        let i = rng.index(pool.len());
        picks.push(pool.remove(i));
    }
    picks
}

/// Apply one upgrade to the arsenal and the player.
pub fn apply_upgrade(
    option: &UpgradeOption,
    tunables: &Tunables,
    arsenal: &mut Arsenal,
    attrs: &mut PlayerAttributes,
    health: &mut Health,
    rng: &mut SimRng,
) {
    let v = option.value;
    let growth = tunables.striker.growth;

    match option.kind {
        UpgradeKind::Damage => {
            arsenal.caster.damage *= 1.0 + v;
            match arsenal.striker.as_mut() {
                Some(striker) => striker.damage *= 1.0 + v,
                None => arsenal.pending_damage_boosts += 1,
            }
        }
        UpgradeKind::MaxHealth => health.raise_max(v),
        UpgradeKind::Speed => attrs.speed *= 1.0 + v,
        UpgradeKind::CollectRange => attrs.collect_range += v,
        UpgradeKind::FireRateBoost => {
            let caster = &mut arsenal.caster;
            caster.fire_interval = (caster.fire_interval - v).max(tunables.caster.min_fire_interval);
            match arsenal.striker.as_mut() {
                Some(striker) => striker.rotation_speed *= 1.0 + v,
                None => arsenal.pending_rotation_boosts += 1,
            }
        }
        UpgradeKind::MagicStaff => {
            arsenal.caster.add_projectile();
        }
        UpgradeKind::MagicBox => match arsenal.striker.as_mut() {
            Some(striker) => {
                if !striker.is_maxed() {
                    striker.orb_count += 1;
                }
                striker.level += 1;
                striker.damage *= growth;
                striker.rotation_speed *= growth;
            }
            None => {
                arsenal.striker = Some(OrbitStriker::unlock(
                    &tunables.striker,
                    arsenal.pending_damage_boosts,
                    arsenal.pending_rotation_boosts,
                    random_phase(rng),
                ));
            }
        },
    }
}
