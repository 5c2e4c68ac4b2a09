//! XP and leveling.
//!
//! Pickups write `XpCollected`; `apply_xp` feeds it through `Progression::gain`, which may cross
//! several thresholds in one call. Every level reached heals the player to full and writes one
//! `LevelUp`, the only thing the upgrade flow listens to.

use bevy::prelude::*;

use crate::common::state::SimSet;
use crate::plugins::combat::Health;
use crate::plugins::player::Player;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Progression {
    xp: u32,
    level: u32,
    threshold: u32,
    growth: f64,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct XpCollected {
    pub amount: u32,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
}

impl Progression {
    pub fn new(first_threshold: u32, growth: f64) -> Self {
        Self { xp: 0, level: 1, threshold: first_threshold.max(1), growth }
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Add xp and return the levels reached, in order.
    pub fn gain(&mut self, amount: u32) -> Vec<u32> {
        self.xp = self.xp.saturating_add(amount);
        let mut reached = Vec::new();
        while self.xp >= self.threshold {
            self.xp -= self.threshold;
            self.level += 1;
            self.threshold = ((f64::from(self.threshold) * self.growth).floor() as u32).max(1);
            reached.push(self.level);
        }
        reached
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<XpCollected>()
        .add_message::<LevelUp>()
        .add_systems(FixedUpdate, apply_xp.in_set(SimSet::Progression));
}

fn apply_xp(
    mut collected: MessageReader<XpCollected>,
    mut level_ups: MessageWriter<LevelUp>,
    mut q_player: Query<(&mut Progression, &mut Health), With<Player>>,
) {
    let Ok((mut progression, mut health)) = q_player.single_mut() else {
        collected.clear();
        return;
    };

    for ev in collected.read() {
        for level in progression.gain(ev.amount) {
            health.heal_full();
            info!("Level up! Now level {level}");
            level_ups.write(LevelUp { level });
        }
    }
}
