//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum Layer {
    #[default]
    Default,
    Player,
    Enemy,
    PlayerBolt,
    Striker,
    Pickup,
}
