//! Audio cues.
//!
//! Gameplay writes fire-and-forget `AudioCue` messages. No clips ship with the game, so the
//! sink only traces them; a playback backend would consume the same messages.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Attack,
    EnemyHit,
    Collect,
}

impl AudioCue {
    pub fn clip_name(self) -> &'static str {
        match self {
            AudioCue::Attack => "attack",
            AudioCue::EnemyHit => "hit",
            AudioCue::Collect => "collect",
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<AudioCue>()
        .add_systems(Update, trace_cues);
}

fn trace_cues(mut cues: MessageReader<AudioCue>) {
    for cue in cues.read() {
        trace!("sfx: {}", cue.clip_name());
    }
}
