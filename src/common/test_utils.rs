//! Test helpers.
//!
//! `World::run_system_once` runs a single system without a schedule. Commands it queued are
//! applied with `world.flush()` before assertions.

use std::time::Duration;

use bevy::ecs::message::{Message, Messages};
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::state::{SimClock, SimContext};
use crate::common::tunables::Tunables;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// `Time` whose last delta is `dt` seconds.
pub fn time_with_delta(dt: f32) -> Time {
    let mut t = Time::<()>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// World with the shared simulation resources and registered message queues for `M`.
pub fn sim_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(SimContext::default());
    world.insert_resource(SimClock::default());
    world.insert_resource(SimRng::seeded(7));
    world.insert_resource(time_with_delta(1.0 / 60.0));
    world
}

/// Register a message type on a bare world.
pub fn add_message<M: Message>(world: &mut World) {
    world.init_resource::<Messages<M>>();
}

/// Every `M` still buffered in the world, read by a fresh reader.
pub fn read_messages<M: Message + Clone>(world: &mut World) -> Vec<M> {
    run_system_once(world, |mut reader: MessageReader<M>| {
        reader.read().cloned().collect::<Vec<M>>()
    })
}

/// Drop every buffered `M`.
pub fn clear_messages<M: Message>(world: &mut World) {
    world.resource_mut::<Messages<M>>().clear();
}
