use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{add_message, clear_messages, read_messages, run_system_once, sim_world};
use crate::plugins::player::player_bundle;

fn option(kind: UpgradeKind) -> UpgradeOption {
    CATALOG.iter().copied().find(|o| o.kind == kind).unwrap()
}

fn apply(kind: UpgradeKind, arsenal: &mut Arsenal, attrs: &mut PlayerAttributes, health: &mut Health) {
    let tunables = Tunables::default();
    let mut rng = SimRng::seeded(1);
    apply_upgrade(&option(kind), &tunables, arsenal, attrs, health, &mut rng);
}

fn fresh() -> (Arsenal, PlayerAttributes, Health) {
    (Arsenal::default(), PlayerAttributes { speed: 2.0, collect_range: 1.5 }, Health::new(100.0))
}

fn world_with_player() -> (World, Entity) {
    let mut world = sim_world();
    world.init_resource::<Arsenal>();
    world.init_resource::<PendingUpgrades>();
    add_message::<LevelUp>(&mut world);
    add_message::<UpgradeOffered>(&mut world);
    add_message::<UpgradeChosen>(&mut world);
    let player = world.spawn(player_bundle(&Tunables::default(), Vec2::ZERO)).id();
    (world, player)
}

#[test]
fn catalog_lists_each_kind_once() {
    let kinds: HashSet<UpgradeKind> = CATALOG.iter().map(|o| o.kind).collect();
    assert_eq!(kinds.len(), 7);
}

#[test]
fn offers_are_distinct_and_capped_at_three() {
    let arsenal = Arsenal::default();
    let mut rng = SimRng::seeded(11);
    for _ in 0..200 {
        let offers = draw_offers(&arsenal, &mut rng, OFFER_SIZE);
        assert_eq!(offers.len(), 3);
        let kinds: HashSet<UpgradeKind> = offers.iter().map(|o| o.kind).collect();
        assert_eq!(kinds.len(), 3);
    }
}

#[test]
fn maxed_caster_never_offers_staff() {
    let mut arsenal = Arsenal::default();
    while arsenal.caster.add_projectile() {}
    let mut rng = SimRng::seeded(5);
    for _ in 0..1000 {
        let offers = draw_offers(&arsenal, &mut rng, OFFER_SIZE);
        assert!(offers.iter().all(|o| o.kind != UpgradeKind::MagicStaff));
    }
}

#[test]
fn full_ring_never_offers_box() {
    let (mut arsenal, mut attrs, mut health) = fresh();
    for _ in 0..6 {
        apply(UpgradeKind::MagicBox, &mut arsenal, &mut attrs, &mut health);
    }
    let striker = arsenal.striker.as_ref().unwrap();
    assert_eq!(striker.orb_count, 6);
    assert_eq!(striker.level, 6);

    let mut rng = SimRng::seeded(9);
    for _ in 0..1000 {
        let offers = draw_offers(&arsenal, &mut rng, OFFER_SIZE);
        assert!(offers.iter().all(|o| o.kind != UpgradeKind::MagicBox));
    }
}

#[test]
fn damage_boost_is_pending_until_unlock() {
    let (mut arsenal, mut attrs, mut health) = fresh();
    apply(UpgradeKind::Damage, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::Damage, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::FireRateBoost, &mut arsenal, &mut attrs, &mut health);

    assert!((arsenal.caster.damage - 10.0 * 1.15 * 1.15).abs() < 1e-4);
    assert!((arsenal.caster.fire_interval - 1.7).abs() < 1e-5);
    assert_eq!(arsenal.pending_damage_boosts, 2);
    assert_eq!(arsenal.pending_rotation_boosts, 1);

    apply(UpgradeKind::MagicBox, &mut arsenal, &mut attrs, &mut health);
    let striker = arsenal.striker.as_ref().unwrap();
    assert_eq!(striker.orb_count, 1);
    assert_eq!(striker.level, 1);
    assert!((striker.damage - 5.0 * 1.1 * 1.1).abs() < 1e-4);
    assert!((striker.rotation_speed - 1.1).abs() < 1e-5);
}

#[test]
fn unlocked_striker_takes_boosts_directly() {
    let (mut arsenal, mut attrs, mut health) = fresh();
    apply(UpgradeKind::MagicBox, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::Damage, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::FireRateBoost, &mut arsenal, &mut attrs, &mut health);

    let striker = arsenal.striker.as_ref().unwrap();
    assert!((striker.damage - 5.0 * 1.15).abs() < 1e-4);
    assert!((striker.rotation_speed - 1.1).abs() < 1e-5);
    assert_eq!(arsenal.pending_damage_boosts, 0);
}

#[test]
fn second_box_adds_orb_and_grows() {
    let (mut arsenal, mut attrs, mut health) = fresh();
    apply(UpgradeKind::MagicBox, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::MagicBox, &mut arsenal, &mut attrs, &mut health);

    let striker = arsenal.striker.as_ref().unwrap();
    assert_eq!(striker.orb_count, 2);
    assert_eq!(striker.level, 2);
    assert!((striker.damage - 5.5).abs() < 1e-4);
    assert!((striker.rotation_speed - 1.1).abs() < 1e-5);
}

#[test]
fn box_past_full_ring_still_levels_up() {
    let (mut arsenal, mut attrs, mut health) = fresh();
    for _ in 0..8 {
        apply(UpgradeKind::MagicBox, &mut arsenal, &mut attrs, &mut health);
    }
    let striker = arsenal.striker.as_ref().unwrap();
    assert_eq!(striker.orb_count, 6);
    assert_eq!(striker.level, 8);
}

#[test]
fn fire_rate_floors_at_minimum() {
    let (mut arsenal, mut attrs, mut health) = fresh();
    for _ in 0..40 {
        apply(UpgradeKind::FireRateBoost, &mut arsenal, &mut attrs, &mut health);
    }
    assert!((arsenal.caster.fire_interval - 0.1).abs() < 1e-6);
}

#[test]
fn player_upgrades_change_attributes() {
    let (mut arsenal, mut attrs, mut health) = fresh();
    health.apply_damage(60.0);

    apply(UpgradeKind::MaxHealth, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::Speed, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::CollectRange, &mut arsenal, &mut attrs, &mut health);
    apply(UpgradeKind::MagicStaff, &mut arsenal, &mut attrs, &mut health);

    assert_eq!(health.max(), 125.0);
    assert_eq!(health.current(), 125.0);
    assert!((attrs.speed - 2.4).abs() < 1e-5);
    assert!((attrs.collect_range - 2.5).abs() < 1e-5);
    assert_eq!(arsenal.caster.projectile_count, 2);
    assert_eq!(arsenal.caster.level, 2);
}

#[test]
fn level_up_pauses_and_offers() {
    let (mut world, _) = world_with_player();
    world.write_message(LevelUp { level: 2 });

    run_system_once(&mut world, super::offer_upgrades);

    assert!(world.resource::<SimContext>().is_paused());
    let offered = read_messages::<UpgradeOffered>(&mut world);
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0].level, 2);
    assert_eq!(offered[0].choices.len(), 3);
}

#[test]
fn choice_applies_and_resumes() {
    let (mut world, player) = world_with_player();
    world.write_message(LevelUp { level: 2 });
    run_system_once(&mut world, super::offer_upgrades);
    let picked = world.resource::<PendingUpgrades>().offer().unwrap().choices[1];

    world.write_message(UpgradeChosen { index: 1 });
    run_system_once(&mut world, super::choose_upgrade);

    assert!(!world.resource::<SimContext>().is_paused());
    assert!(world.resource::<PendingUpgrades>().offer().is_none());

    let changed = match picked.kind {
        UpgradeKind::Damage => world.resource::<Arsenal>().caster.damage > 10.0,
        UpgradeKind::MaxHealth => world.get::<Health>(player).unwrap().max() > 100.0,
        UpgradeKind::Speed => world.get::<PlayerAttributes>(player).unwrap().speed > 2.0,
        UpgradeKind::CollectRange => world.get::<PlayerAttributes>(player).unwrap().collect_range > 1.5,
        UpgradeKind::FireRateBoost => world.resource::<Arsenal>().caster.fire_interval < 1.8,
        UpgradeKind::MagicStaff => world.resource::<Arsenal>().caster.projectile_count == 2,
        UpgradeKind::MagicBox => world.resource::<Arsenal>().striker.is_some(),
    };
    assert!(changed, "{:?} had no effect", picked.kind);
}

#[test]
fn out_of_range_choice_is_ignored() {
    let (mut world, _) = world_with_player();
    world.write_message(LevelUp { level: 2 });
    run_system_once(&mut world, super::offer_upgrades);

    world.write_message(UpgradeChosen { index: 7 });
    run_system_once(&mut world, super::choose_upgrade);

    assert!(world.resource::<SimContext>().is_paused());
    assert!(world.resource::<PendingUpgrades>().offer().is_some());
}

#[test]
fn choice_without_offer_is_ignored() {
    let (mut world, _) = world_with_player();
    world.write_message(UpgradeChosen { index: 0 });
    run_system_once(&mut world, super::choose_upgrade);

    assert_eq!(*world.resource::<Arsenal>(), Arsenal::default());
    assert!(!world.resource::<SimContext>().is_paused());
}

#[test]
fn queued_level_ups_offer_one_after_another() {
    let (mut world, _) = world_with_player();
    world.write_message(LevelUp { level: 2 });
    world.write_message(LevelUp { level: 3 });
    run_system_once(&mut world, super::offer_upgrades);
    assert_eq!(world.resource::<PendingUpgrades>().offer().unwrap().level, 2);
    assert_eq!(world.resource::<PendingUpgrades>().queued(), 1);
    clear_messages::<LevelUp>(&mut world);

    world.write_message(UpgradeChosen { index: 0 });
    run_system_once(&mut world, super::choose_upgrade);
    assert!(world.resource::<SimContext>().is_paused());
    clear_messages::<UpgradeChosen>(&mut world);

    run_system_once(&mut world, super::offer_upgrades);
    assert_eq!(world.resource::<PendingUpgrades>().offer().unwrap().level, 3);

    world.write_message(UpgradeChosen { index: 0 });
    run_system_once(&mut world, super::choose_upgrade);
    assert!(!world.resource::<SimContext>().is_paused());
}
