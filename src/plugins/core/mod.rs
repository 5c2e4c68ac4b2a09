//! Core plugin: shared resources, fixed tick rate and the simulation set order.

use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::state::{GameState, SimClock, SimContext, SimSet, player_active, sim_running};
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::default());
    }
    let tunables = app.world().resource::<Tunables>().clone();

    app.insert_resource(SimRng::from_seed_option(tunables.seed))
        .insert_resource(Time::<Fixed>::from_hz(tunables.fixed_hz))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.07, 0.05)))
        .init_resource::<SimContext>()
        .init_resource::<SimClock>();

    let in_game = || in_state(GameState::InGame);
    app.configure_sets(
        FixedUpdate,
        (
            SimSet::Contacts.run_if(in_game()),
            SimSet::Director.run_if(in_game()).run_if(sim_running),
            SimSet::Enemies.run_if(in_game()).run_if(sim_running),
            SimSet::Player.run_if(in_game()).run_if(player_active),
            SimSet::Weapons.run_if(in_game()).run_if(sim_running),
            SimSet::Deaths.run_if(in_game()).run_if(sim_running),
            SimSet::Pickups.run_if(in_game()).run_if(sim_running),
            SimSet::Clock.run_if(in_game()).run_if(sim_running),
            SimSet::Progression.run_if(in_game()),
            SimSet::Upgrades.run_if(in_game()),
            SimSet::Hud.run_if(in_game()),
        )
            .chain(),
    );

    app.add_systems(FixedUpdate, advance_clock.in_set(SimSet::Clock));
}

fn advance_clock(time: Res<Time>, mut clock: ResMut<SimClock>) {
    clock.advance(time.delta_secs());
}

#[cfg(test)]
mod tests;
