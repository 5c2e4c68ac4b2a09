use bevy::prelude::*;

use crate::common::state::{SimClock, SimContext};
use crate::common::test_utils::{run_system_once, sim_world, time_with_delta};
use crate::common::tunables::Tunables;
use crate::plugins::core;

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<SimContext>().is_some());
    assert!(app.world().get_resource::<SimClock>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
}

#[test]
fn keeps_preloaded_tunables() {
    let mut app = App::new();
    let mut tunables = Tunables::default();
    tunables.director.spawn_cooldown = 0.25;
    app.insert_resource(tunables);
    core::plugin(&mut app);
    assert_eq!(app.world().resource::<Tunables>().director.spawn_cooldown, 0.25);
}

#[test]
fn clock_accumulates_delta() {
    let mut world = sim_world();
    world.insert_resource(time_with_delta(0.5));
    run_system_once(&mut world, super::advance_clock);
    run_system_once(&mut world, super::advance_clock);
    assert!((world.resource::<SimClock>().elapsed_secs() - 1.0).abs() < 1e-5);
}

#[test]
fn game_over_pause_is_permanent() {
    let mut ctx = SimContext::default();
    ctx.set_paused(true);
    ctx.set_paused(false);
    assert!(ctx.is_running());

    ctx.end_game();
    ctx.set_paused(false);
    assert!(ctx.is_paused());
    assert!(!ctx.is_running());
}

#[test]
fn guided_blocks_simulation_but_not_player() {
    let ctx = SimContext::guided();
    assert!(!ctx.is_running());
    assert!(!ctx.is_paused());
}

#[test]
fn clock_formats_hours_minutes_seconds() {
    let clock = SimClock::at(3_725.9);
    assert_eq!(clock.hms(), (1, 2, 5));
    assert_eq!(clock.minutes(), 62);
}
