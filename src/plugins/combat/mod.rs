//! Actor health and the shared damage/death contract for the player and enemies.
//!
//! Damage is not floored: an actor at 20 hit for 25 sits at -5. The first hit that takes
//! health to zero or below returns `DamageOutcome::Killed`, exactly once. Anything hitting a
//! dead actor is `Ignored`.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Wounded,
    Killed,
    Ignored,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max, alive: true }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.current -= amount;
        if self.current <= 0.0 {
            self.alive = false;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    pub fn heal_full(&mut self) {
        if self.alive {
            self.current = self.max;
        }
    }

    /// Raise max health and heal to the new max.
    pub fn raise_max(&mut self, amount: f32) {
        self.max += amount;
        self.heal_full();
    }

    /// Keep `current <= max`.
    pub fn clamp_to_max(&mut self) {
        self.current = self.current.min(self.max);
    }
}

/// Ground-plane heading in radians, 0 along +Y, counter-clockwise.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Facing(pub f32);

impl Facing {
    pub fn towards(dir: Vec2) -> Option<Self> {
        (dir.length_squared() > 1e-6).then(|| Self((-dir.x).atan2(dir.y)))
    }

    pub fn direction(self) -> Vec2 {
        Vec2::new(-self.0.sin(), self.0.cos())
    }
}

/// Advisory animation clip. Rendering may ignore it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimTag {
    #[default]
    Idle,
    Run,
    Attack,
    Death,
}
