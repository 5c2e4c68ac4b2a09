mod common;

use bevy::prelude::*;

use arcane_survivors::common::state::SimContext;
use arcane_survivors::common::tunables::Tunables;
use arcane_survivors::plugins::combat::Health;
use arcane_survivors::plugins::enemies::{EnemyRoster, EnemyStatBundle, EnemyState, Rank, enemy_bundle};
use arcane_survivors::plugins::physics::{ContactEvent, ContactPhase};
use arcane_survivors::plugins::pickups::XpOrb;
use arcane_survivors::plugins::ui::Hud;
use arcane_survivors::plugins::weapons::bolts::Bolt;

fn spawn_enemy(app: &mut App, at: Vec2) -> Entity {
    let tuning = Tunables::default().enemies;
    let e = app
        .world_mut()
        .spawn(enemy_bundle(&tuning, EnemyStatBundle::base(&tuning), at, Rank::Regular))
        .id();
    app.world_mut().resource_mut::<EnemyRoster>().add(e);
    e
}

#[test]
fn overkill_bolt_kills_once_and_drops_one_orb() {
    let mut app = common::app_headless();
    common::step(&mut app, 2);

    let enemy = spawn_enemy(&mut app, Vec2::new(6.0, 0.0));
    let bolt = app
        .world_mut()
        .spawn((Bolt { damage: 25.0 }, Transform::from_xyz(6.0, 0.0, 2.0)))
        .id();
    app.world_mut().write_message(ContactEvent::new(bolt, enemy, ContactPhase::TriggerEntered));
    common::step(&mut app, 1);

    let health = *app.world().get::<Health>(enemy).unwrap();
    assert_eq!(health.current(), -5.0);
    assert!(!health.is_alive());
    assert!(app.world().get::<EnemyState>(enemy).unwrap().is_dead());
    assert!(app.world().get_entity(bolt).is_err());

    common::step(&mut app, 3);
    let orbs: Vec<u32> = app
        .world_mut()
        .query::<&XpOrb>()
        .iter(app.world())
        .map(|o| o.value)
        .collect();
    assert_eq!(orbs, vec![50]);
}

#[test]
fn dead_enemy_is_removed_and_counted() {
    let mut app = common::app_headless();
    common::step(&mut app, 2);

    let enemy = spawn_enemy(&mut app, Vec2::new(6.0, 0.0));
    app.world_mut().get_mut::<Health>(enemy).unwrap().apply_damage(100.0);

    // Half of the 1.2 s death clip, plus slack.
    common::step(&mut app, 45);

    assert!(app.world().get_entity(enemy).is_err());
    assert_eq!(app.world().resource::<EnemyRoster>().kills(), 1);
}

#[test]
fn player_death_ends_the_run() {
    let mut app = common::app_headless();
    common::step(&mut app, 2);
    let player = common::player(&mut app);
    app.world_mut().get_mut::<Health>(player).unwrap().apply_damage(500.0);

    common::step(&mut app, 60);
    assert!(!app.world().resource::<SimContext>().is_game_over());

    common::step(&mut app, 70);
    let ctx = app.world().resource::<SimContext>().clone();
    assert!(ctx.is_game_over());
    assert!(ctx.is_paused());

    app.world_mut().resource_mut::<SimContext>().set_paused(false);
    assert!(app.world().resource::<SimContext>().is_paused());
    assert!(app.world().resource::<Hud>().game_over);
}
