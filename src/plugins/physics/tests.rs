use super::*;
use crate::common::test_utils::{add_message, read_messages, run_system_once};

#[test]
fn split_requires_exactly_one_match() {
    let mut world = World::new();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();
    let ev = ContactEvent::new(a, b, ContactPhase::Started);

    assert_eq!(ev.split(|e| e == b), Some((b, a)));
    assert_eq!(ev.split(|e| e == a), Some((a, b)));
    assert_eq!(ev.split(|_| true), None);
    assert_eq!(ev.split(|_| false), None);
}

#[test]
fn colliding_entities_become_stay_contacts() {
    let mut world = World::new();
    add_message::<CollisionStart>(&mut world);
    add_message::<ContactEvent>(&mut world);

    let other = world.spawn_empty().id();
    let mut colliding = CollidingEntities::default();
    colliding.insert(other);
    let orb = world.spawn((ReportContactStay, colliding)).id();

    run_system_once(&mut world, relay_contacts);

    let events = read_messages::<ContactEvent>(&mut world);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].a, orb);
    assert_eq!(events[0].b, other);
    assert_eq!(events[0].phase, ContactPhase::Stay);
}
