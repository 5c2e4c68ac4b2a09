use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{run_system_once, sim_world};

#[test]
fn snapshot_tracks_player_and_clock() {
    let mut world = sim_world();
    world.init_resource::<Hud>();
    world.init_resource::<EnemyRoster>();
    world.insert_resource(SimClock::at(3725.4));

    let mut health = Health::new(100.0);
    health.apply_damage(30.0);
    let mut progression = Progression::new(50, 1.2);
    progression.gain(60);
    world.spawn((Player, health, progression));

    run_system_once(&mut world, refresh_hud);

    let hud = world.resource::<Hud>();
    assert_eq!(hud.health, 70.0);
    assert_eq!((hud.level, hud.xp, hud.threshold), (2, 10, 60));
    assert_eq!(hud.time, (1, 2, 5));
    assert_eq!(hud.time_label(), "1:02:05");
}

#[test]
fn dead_player_shows_zero_health() {
    let mut world = sim_world();
    world.init_resource::<Hud>();
    world.init_resource::<EnemyRoster>();
    let mut health = Health::new(100.0);
    health.apply_damage(130.0);
    world.spawn((Player, health, Progression::new(50, 1.2)));

    run_system_once(&mut world, refresh_hud);

    assert_eq!(world.resource::<Hud>().health, 0.0);
}

#[test]
fn short_runs_omit_hours() {
    let hud = Hud { time: (0, 4, 9), ..default() };
    assert_eq!(hud.time_label(), "04:09");
    assert_eq!(Hud::default().xp_fraction(), 0.0);
}
