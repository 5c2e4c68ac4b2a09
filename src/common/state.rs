//! Global state: the app state machine plus the simulation gates.
//!
//! ```text
//! SimContext { paused, guided, game_over }
//!   paused  -> level-up offer open, or game over (permanent)
//!   guided  -> onboarding: waiting for W/A/S/D
//!
//! sim_running   = !paused && !guided   (director, enemies, weapons, pickups, clock)
//! player_active = !paused              (player input + movement)
//! ```

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}

/// Fixed-step ordering of one simulation tick.
///
/// Physics (avian) runs in `FixedPostUpdate`, after all of these.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Relay last step's physics contacts into `ContactEvent`s.
    Contacts,
    Director,
    Enemies,
    Player,
    Weapons,
    Deaths,
    Pickups,
    Clock,
    Progression,
    Upgrades,
    Hud,
}

/// Pause and onboarding gates.
#[derive(Resource, Debug, Default, Clone)]
pub struct SimContext {
    paused: bool,
    guided: bool,
    game_over: bool,
}

impl SimContext {
    /// Context for a run that starts behind the onboarding gate.
    pub fn guided() -> Self {
        Self { guided: true, ..default() }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Resuming after game over is ignored.
    pub fn set_paused(&mut self, paused: bool) {
        if !paused && self.game_over {
            return;
        }
        self.paused = paused;
    }

    pub fn is_guided(&self) -> bool {
        self.guided
    }

    pub fn set_guided(&mut self, guided: bool) {
        self.guided = guided;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn end_game(&mut self) {
        self.game_over = true;
        self.paused = true;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.paused && !self.guided
    }
}

/// Elapsed unpaused game time.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimClock {
    elapsed: f32,
}

impl SimClock {
    pub fn at(elapsed: f32) -> Self {
        Self { elapsed: elapsed.max(0.0) }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Whole minutes survived.
    pub fn minutes(&self) -> u32 {
        (self.elapsed / 60.0).floor() as u32
    }

    /// `(hours, minutes, seconds)` for display.
    pub fn hms(&self) -> (u32, u32, u32) {
        let total = self.elapsed.floor() as u32;
        (total / 3600, (total / 60) % 60, total % 60)
    }
}

pub fn sim_running(ctx: Res<SimContext>) -> bool {
    ctx.is_running()
}

pub fn player_active(ctx: Res<SimContext>) -> bool {
    !ctx.is_paused()
}
