//! Physics plugin: avian setup plus the contact feed used by gameplay.
//!
//! ```text
//! FixedPostUpdate: avian step -> CollisionStart messages, CollidingEntities
//! FixedUpdate (next tick, SimSet::Contacts): relay_contacts -> ContactEvent
//! ```
//!
//! Resolvers only ever read `ContactEvent`, so tests can inject contacts without a physics step.
//! Physics time is paused whenever the simulation is (level-up offer, onboarding, game over).

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::state::{SimContext, SimSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactPhase {
    Started,
    /// Contact persisted through the last physics step.
    Stay,
    /// Either side is a sensor.
    TriggerEntered,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct ContactEvent {
    pub a: Entity,
    pub b: Entity,
    pub phase: ContactPhase,
}

impl ContactEvent {
    pub fn new(a: Entity, b: Entity, phase: ContactPhase) -> Self {
        Self { a, b, phase }
    }

    /// `(matching, other)` when exactly one side satisfies `is_kind`.
    #[inline]
    pub fn split(&self, is_kind: impl Fn(Entity) -> bool) -> Option<(Entity, Entity)> {
        match (is_kind(self.a), is_kind(self.b)) {
            (true, false) => Some((self.a, self.b)),
            (false, true) => Some((self.b, self.a)),
            _ => None,
        }
    }
}

/// Opt-in marker: report every tick of a persisting contact as `ContactPhase::Stay`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ReportContactStay;

pub fn plugin(app: &mut App) {
    // Simulation units are meters; only rendering scales by pixels_per_meter.
    app.add_plugins(PhysicsPlugins::default());
    app.insert_resource(Gravity(Vec2::ZERO));
    app.add_message::<ContactEvent>();

    app.add_systems(FixedUpdate, relay_contacts.in_set(SimSet::Contacts))
        .add_systems(FixedUpdate, sync_physics_clock.after(SimSet::Hud));
}

#[inline]
fn gameplay_owner(collider: Entity, body: Option<Entity>) -> Entity {
    body.unwrap_or(collider)
}

fn relay_contacts(
    mut started: MessageReader<CollisionStart>,
    q_sensor: Query<(), With<Sensor>>,
    q_stay: Query<(Entity, &CollidingEntities), With<ReportContactStay>>,
    mut out: MessageWriter<ContactEvent>,
) {
    for ev in started.read() {
        let phase = if q_sensor.contains(ev.collider1) || q_sensor.contains(ev.collider2) {
            ContactPhase::TriggerEntered
        } else {
            ContactPhase::Started
        };
        out.write(ContactEvent::new(
            gameplay_owner(ev.collider1, ev.body1),
            gameplay_owner(ev.collider2, ev.body2),
            phase,
        ));
    }

    for (e, colliding) in &q_stay {
        for &other in colliding.iter() {
            out.write(ContactEvent::new(e, other, ContactPhase::Stay));
        }
    }
}

fn sync_physics_clock(ctx: Res<SimContext>, mut physics_time: ResMut<Time<Physics>>) {
    let should_pause = !ctx.is_running();
    if should_pause && !physics_time.is_paused() {
        physics_time.pause();
    } else if !should_pause && physics_time.is_paused() {
        physics_time.unpause();
    }
}

#[cfg(test)]
mod tests;
