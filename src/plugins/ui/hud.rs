use bevy::prelude::*;

use crate::common::state::{SimClock, SimContext, SimSet};
use crate::plugins::combat::Health;
use crate::plugins::enemies::EnemyRoster;
use crate::plugins::player::Player;
use crate::plugins::progression::Progression;

/// Everything the HUD shows, refreshed once per tick.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct Hud {
    pub health: f32,
    pub max_health: f32,
    pub xp: u32,
    pub threshold: u32,
    pub level: u32,
    /// Survival time as (hours, minutes, seconds).
    pub time: (u32, u32, u32),
    pub kills: u32,
    pub paused: bool,
    pub guided: bool,
    pub game_over: bool,
}

impl Hud {
    pub fn time_label(&self) -> String {
        let (h, m, s) = self.time;
        if h > 0 {
            format!("{h}:{m:02}:{s:02}")
        } else {
            format!("{m:02}:{s:02}")
        }
    }

    /// XP bar fill in `[0, 1]`.
    pub fn xp_fraction(&self) -> f32 {
        if self.threshold == 0 {
            return 0.0;
        }
        (self.xp as f32 / self.threshold as f32).clamp(0.0, 1.0)
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Hud>()
        .add_systems(FixedUpdate, refresh_hud.in_set(SimSet::Hud));
}

fn refresh_hud(
    clock: Res<SimClock>,
    ctx: Res<SimContext>,
    roster: Res<EnemyRoster>,
    mut hud: ResMut<Hud>,
    q_player: Query<(&Health, &Progression), With<Player>>,
) {
    if let Ok((health, progression)) = q_player.single() {
        hud.health = health.current().max(0.0);
        hud.max_health = health.max();
        hud.xp = progression.xp();
        hud.threshold = progression.threshold();
        hud.level = progression.level();
    }
    hud.time = clock.hms();
    hud.kills = roster.kills();
    hud.paused = ctx.is_paused();
    hud.guided = ctx.is_guided();
    hud.game_over = ctx.is_game_over();
}

#[cfg(test)]
mod tests;
