//! Level-up offers.
//!
//! ```text
//! LevelUp ──► queue ──► (no offer open) draw 3, pause, write UpgradeOffered
//!                                  │
//! UpgradeChosen { index } ─────────┴─► apply, close offer
//!                                      queue empty  -> resume
//!                                      queue not    -> next offer, still paused
//! ```
//!
//! The set runs while paused, otherwise nothing could ever close an offer.

pub mod catalog;

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::state::{GameState, SimContext, SimSet};
use crate::common::tunables::Tunables;
use crate::plugins::combat::Health;
use crate::plugins::player::{Player, PlayerAttributes};
use crate::plugins::progression::LevelUp;
use crate::plugins::weapons::Arsenal;

pub use catalog::{CATALOG, UpgradeKind, UpgradeOption, apply_upgrade, draw_offers};

pub const OFFER_SIZE: usize = 3;

#[derive(Message, Clone, Debug, PartialEq)]
pub struct UpgradeOffered {
    pub level: u32,
    pub choices: Vec<UpgradeOption>,
}

/// Index into the open offer's choices.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeChosen {
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Offer {
    pub level: u32,
    pub choices: Vec<UpgradeOption>,
}

#[derive(Resource, Default, Debug)]
pub struct PendingUpgrades {
    queued: VecDeque<u32>,
    offer: Option<Offer>,
}

impl PendingUpgrades {
    pub fn offer(&self) -> Option<&Offer> {
        self.offer.as_ref()
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PendingUpgrades>()
        .add_message::<UpgradeOffered>()
        .add_message::<UpgradeChosen>()
        .add_systems(OnEnter(GameState::InGame), |mut commands: Commands| {
            commands.insert_resource(PendingUpgrades::default());
        })
        .add_systems(
            FixedUpdate,
            (choose_upgrade, offer_upgrades).chain().in_set(SimSet::Upgrades),
        );
}

fn choose_upgrade(
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut ctx: ResMut<SimContext>,
    mut pending: ResMut<PendingUpgrades>,
    mut arsenal: ResMut<Arsenal>,
    mut chosen: MessageReader<UpgradeChosen>,
    mut q_player: Query<(&mut PlayerAttributes, &mut Health), With<Player>>,
) {
    for ev in chosen.read() {
        let Some(option) = pending.offer.as_ref().and_then(|o| o.choices.get(ev.index)).copied() else {
            debug!("Ignoring upgrade choice {}", ev.index);
            continue;
        };
        let Ok((mut attrs, mut health)) = q_player.single_mut() else {
            continue;
        };

        apply_upgrade(&option, &tunables, &mut arsenal, &mut attrs, &mut health, &mut rng);
        pending.offer = None;
        info!("Upgrade chosen: {}", option.title);

        if pending.queued.is_empty() {
            ctx.set_paused(false);
        }
    }
}

fn offer_upgrades(
    mut rng: ResMut<SimRng>,
    mut ctx: ResMut<SimContext>,
    mut pending: ResMut<PendingUpgrades>,
    arsenal: Res<Arsenal>,
    mut level_ups: MessageReader<LevelUp>,
    mut offered: MessageWriter<UpgradeOffered>,
) {
    pending.queued.extend(level_ups.read().map(|ev| ev.level));

    if pending.offer.is_some() {
        return;
    }
    let Some(level) = pending.queued.pop_front() else {
        return;
    };

    let choices = draw_offers(&arsenal, &mut rng, OFFER_SIZE);
    if choices.is_empty() {
        return;
    }
    ctx.set_paused(true);
    offered.write(UpgradeOffered { level, choices: choices.clone() });
    pending.offer = Some(Offer { level, choices });
}

#[cfg(test)]
mod tests;
